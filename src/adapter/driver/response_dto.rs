use crate::domain::model::{
    AppliedCoupon, DeliveryAddress, FulfillmentDetails, InventoryLine, Order, OrderItem,
};
use serde::Serialize;

/// 注文一覧用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderSummaryResponse {
    pub order_id: String,
    pub order_number: String,
    pub store_id: String,
    pub customer_name: String,
    pub status: String,
    pub total_amount: i64,
    pub currency: String,
    pub created_at: String,
}

/// 注文詳細用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderDetailResponse {
    pub order_id: String,
    pub order_number: String,
    pub store_id: String,
    pub customer_name: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub fulfillment: FulfillmentResponse,
    pub subtotal_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub currency: String,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub confirmed_at: Option<String>,
    pub completed_at: Option<String>,
    pub cancelled_at: Option<String>,
}

/// 注文明細用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_amount: i64,
    pub line_subtotal_amount: i64,
}

/// 受け渡し方法用のレスポンスDTO
#[derive(Serialize)]
pub struct FulfillmentResponse {
    pub kind: String,
    pub pickup_person_name: Option<String>,
    pub address: Option<DeliveryAddressResponse>,
}

/// 配達先住所用のレスポンスDTO
#[derive(Serialize)]
pub struct DeliveryAddressResponse {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// 在庫行用のレスポンスDTO
#[derive(Serialize)]
pub struct InventoryResponse {
    pub inventory_id: String,
    pub store_id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit_price_amount: i64,
    pub currency: String,
    pub quantity: u32,
}

/// クーポン評価結果用のレスポンスDTO
#[derive(Serialize)]
pub struct EvaluateCouponResponse {
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub discount_amount: i64,
}

impl OrderSummaryResponse {
    /// ドメインオブジェクトからOrderSummaryResponseを作成
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id().to_string(),
            order_number: order.order_number().as_str().to_string(),
            store_id: order.store_id().to_string(),
            customer_name: order.customer_name().to_string(),
            status: order.status().as_str().to_string(),
            total_amount: order.total().amount(),
            currency: order.total().currency(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

impl OrderDetailResponse {
    /// ドメインオブジェクトからOrderDetailResponseを作成
    pub fn from_order(order: &Order) -> Self {
        let items: Vec<OrderItemResponse> = order
            .items()
            .iter()
            .map(OrderItemResponse::from_order_item)
            .collect();

        Self {
            order_id: order.id().to_string(),
            order_number: order.order_number().as_str().to_string(),
            store_id: order.store_id().to_string(),
            customer_name: order.customer_name().to_string(),
            status: order.status().as_str().to_string(),
            items,
            fulfillment: FulfillmentResponse::from_fulfillment(order.fulfillment()),
            subtotal_amount: order.subtotal().amount(),
            discount_amount: order.discount_amount().amount(),
            total_amount: order.total().amount(),
            currency: order.total().currency(),
            coupon_code: order.coupon_code().map(|s| s.to_string()),
            notes: order.notes().map(|s| s.to_string()),
            created_at: order.created_at().to_rfc3339(),
            confirmed_at: order.confirmed_at().map(|t| t.to_rfc3339()),
            completed_at: order.completed_at().map(|t| t.to_rfc3339()),
            cancelled_at: order.cancelled_at().map(|t| t.to_rfc3339()),
        }
    }
}

impl OrderItemResponse {
    /// ドメインオブジェクトからOrderItemResponseを作成
    pub fn from_order_item(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id().to_string(),
            product_name: item.name().to_string(),
            quantity: item.quantity(),
            unit_price_amount: item.unit_price().amount(),
            line_subtotal_amount: item.line_subtotal().amount(),
        }
    }
}

impl FulfillmentResponse {
    /// ドメインオブジェクトからFulfillmentResponseを作成
    pub fn from_fulfillment(fulfillment: &FulfillmentDetails) -> Self {
        match fulfillment {
            FulfillmentDetails::Pickup { person_name } => Self {
                kind: "pickup".to_string(),
                pickup_person_name: person_name.clone(),
                address: None,
            },
            FulfillmentDetails::Delivery { address } => Self {
                kind: "delivery".to_string(),
                pickup_person_name: None,
                address: Some(DeliveryAddressResponse::from_address(address)),
            },
        }
    }
}

impl DeliveryAddressResponse {
    /// ドメインオブジェクトからDeliveryAddressResponseを作成
    pub fn from_address(address: &DeliveryAddress) -> Self {
        Self {
            street: address.street().to_string(),
            city: address.city().to_string(),
            state: address.state().to_string(),
            zip: address.zip().to_string(),
        }
    }
}

impl InventoryResponse {
    /// ドメインオブジェクトからInventoryResponseを作成
    pub fn from_inventory_line(line: &InventoryLine) -> Self {
        Self {
            inventory_id: line.inventory_id().to_string(),
            store_id: line.store_id().to_string(),
            product_id: line.product_id().to_string(),
            product_name: line.name().to_string(),
            unit_price_amount: line.unit_price().amount(),
            currency: line.unit_price().currency(),
            quantity: line.available_quantity(),
        }
    }
}

impl EvaluateCouponResponse {
    /// 適用済みクーポンのスナップショットからEvaluateCouponResponseを作成
    pub fn from_applied_coupon(applied: &AppliedCoupon) -> Self {
        Self {
            code: applied.code.clone(),
            discount_type: applied.discount_type.as_str().to_string(),
            discount_value: applied.discount_value,
            discount_amount: applied.discount_amount.amount(),
        }
    }
}
