use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 注文作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub store_id: Uuid,
    pub customer_name: String,
    pub items: Vec<CreateOrderItemRequest>,
    pub coupon_code: Option<String>,
    pub fulfillment: FulfillmentRequest,
    pub notes: Option<String>,
}

/// 注文明細用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateOrderItemRequest {
    pub inventory_id: Uuid,
    pub quantity: u32,
}

/// 受け渡し方法用のリクエストDTO
/// kind は "pickup" または "delivery"
#[derive(Serialize, Deserialize)]
pub struct FulfillmentRequest {
    pub kind: String,
    pub pickup_person_name: Option<String>,
    pub address: Option<DeliveryAddressRequest>,
}

/// 配達先住所用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct DeliveryAddressRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// 注文ステータス更新用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// クーポン評価用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct EvaluateCouponRequest {
    pub code: String,
    pub subtotal_amount: i64, // USD in cents
}

/// 在庫登録用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateInventoryRequest {
    pub store_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub unit_price_amount: i64, // USD in cents
    pub quantity: u32,
}

/// 注文一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct OrdersQueryParams {
    pub store_id: Uuid,
    pub status: Option<String>,
}

/// 在庫一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct InventoryQueryParams {
    pub store_id: Uuid,
}
