use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    CreateInventoryRequest, CreateOrderRequest, EvaluateCouponRequest, InventoryQueryParams,
    OrdersQueryParams, UpdateOrderStatusRequest,
};
use crate::adapter::driver::response_dto::{
    EvaluateCouponResponse, InventoryResponse, OrderDetailResponse, OrderSummaryResponse,
};
use crate::application::service::{
    InventoryApplicationService, OrderApplicationService, OrderDraft, OrderDraftLine,
    OrderQueryService,
};
use crate::application::ApplicationError;
use crate::domain::model::{
    DeliveryAddress, FulfillmentDetails, InventoryId, Money, OrderId, OrderStatus, ProductId,
    StoreId,
};
use crate::domain::port::StockShortage;
use crate::domain::service::CouponEvaluator;

/// エラーレスポンスDTO
/// 在庫不足の場合のみ shortages に不足した行の内訳が入る
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortages: Option<Vec<StockShortageResponse>>,
}

impl ApiError {
    fn new(error: String, code: &str) -> Self {
        Self {
            error,
            code: code.to_string(),
            shortages: None,
        }
    }
}

/// 在庫不足の明細用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct StockShortageResponse {
    pub inventory_id: String,
    pub product_id: String,
    pub product_name: String,
    pub requested: u32,
    pub available: u32,
}

impl StockShortageResponse {
    fn from_shortage(shortage: &StockShortage) -> Self {
        Self {
            inventory_id: shortage.inventory_id.to_string(),
            product_id: shortage.product_id.to_string(),
            product_name: shortage.product_name.clone(),
            requested: shortage.requested,
            available: shortage.available,
        }
    }
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub order_service: Arc<OrderApplicationService>,
    pub order_query_service: Arc<OrderQueryService>,
    pub inventory_service: Arc<InventoryApplicationService>,
    pub coupon_evaluator: Arc<CouponEvaluator>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/orders", post(create_order))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
        .route("/orders/:order_id/status", post(update_order_status))
        .route("/coupons/evaluate", post(evaluate_coupon))
        .route("/inventory", post(create_inventory))
        .route("/inventory", get(get_inventories))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "store-order-management",
        "version": "0.1.0"
    }))
}

// 注文作成エンドポイント
async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>), (StatusCode, Json<ApiError>)> {
    let fulfillment = build_fulfillment(&request)?;

    let draft = OrderDraft {
        store_id: StoreId::from_uuid(request.store_id),
        customer_name: request.customer_name,
        lines: request
            .items
            .iter()
            .map(|item| OrderDraftLine {
                inventory_id: InventoryId::from_uuid(item.inventory_id),
                quantity: item.quantity,
            })
            .collect(),
        coupon_code: request.coupon_code,
        fulfillment,
        notes: request.notes,
    };

    match state.order_service.create_order(draft).await {
        Ok(order) => Ok((
            StatusCode::CREATED,
            Json(OrderDetailResponse::from_order(&order)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// リクエストDTOから受け渡し方法を組み立てる
fn build_fulfillment(
    request: &CreateOrderRequest,
) -> Result<FulfillmentDetails, (StatusCode, Json<ApiError>)> {
    match request.fulfillment.kind.as_str() {
        "pickup" => Ok(FulfillmentDetails::Pickup {
            person_name: request.fulfillment.pickup_person_name.clone(),
        }),
        "delivery" => {
            let address = request.fulfillment.address.as_ref().ok_or((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(
                    "配達には住所が必要です".to_string(),
                    "VALIDATION_FAILED",
                )),
            ))?;

            let address = DeliveryAddress::new(
                address.street.clone(),
                address.city.clone(),
                address.state.clone(),
                address.zip.clone(),
            )
            .map_err(|err| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::new(format!("{}", err), "VALIDATION_FAILED")),
                )
            })?;

            Ok(FulfillmentDetails::Delivery { address })
        }
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                format!("無効な受け渡し方法: {}", other),
                "VALIDATION_FAILED",
            )),
        )),
    }
}

// 注文一覧取得エンドポイント
async fn get_orders(
    State(state): State<AppState>,
    query: Result<Query<OrdersQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<OrderSummaryResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "無効なクエリパラメータです".to_string(),
                "INVALID_PARAMETER",
            )),
        )
    })?;

    let store_id = StoreId::from_uuid(params.store_id);

    // ステータスフィルターを解析（任意）
    let status = match params.status {
        Some(status_str) => match OrderStatus::from_string(&status_str) {
            Ok(status) => Some(status),
            Err(_) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::new(
                        format!("無効なステータス値: {}", status_str),
                        "INVALID_STATUS",
                    )),
                ))
            }
        },
        None => None,
    };

    match state
        .order_query_service
        .get_orders_by_store(store_id, status)
        .await
    {
        Ok(orders) => {
            let response: Vec<OrderSummaryResponse> =
                orders.iter().map(OrderSummaryResponse::from_order).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_query_service.get_order_by_id(order_id).await {
        Ok(Some(order)) => Ok(Json(OrderDetailResponse::from_order(&order))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                "指定された注文が見つかりません".to_string(),
                "ORDER_NOT_FOUND",
            )),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文ステータス更新エンドポイント
async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderDetailResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    let target = match OrderStatus::from_string(&request.status) {
        Ok(status) => status,
        Err(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(
                    format!("無効なステータス値: {}", request.status),
                    "INVALID_STATUS",
                )),
            ))
        }
    };

    match state.order_service.transition_order(order_id, target).await {
        Ok(order) => Ok(Json(OrderDetailResponse::from_order(&order))),
        Err(ApplicationError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                "指定された注文が見つかりません".to_string(),
                "ORDER_NOT_FOUND",
            )),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// クーポン評価エンドポイント（UIの割引プレビュー用）
async fn evaluate_coupon(
    State(state): State<AppState>,
    Json(request): Json<EvaluateCouponRequest>,
) -> Result<Json<EvaluateCouponResponse>, (StatusCode, Json<ApiError>)> {
    let subtotal = Money::usd(request.subtotal_amount.max(0));

    match state.coupon_evaluator.evaluate(&request.code, subtotal).await {
        Ok(applied) => Ok(Json(EvaluateCouponResponse::from_applied_coupon(&applied))),
        // レジストリ照会の失敗は500（リトライ可能）、ルール違反は4xxに割り当てる
        Err(err) => Err(map_application_error(err.into())),
    }
}

// 在庫登録エンドポイント（新規追加・補充用）
async fn create_inventory(
    State(state): State<AppState>,
    Json(request): Json<CreateInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryResponse>), (StatusCode, Json<ApiError>)> {
    let store_id = StoreId::from_uuid(request.store_id);
    let product_id = request
        .product_id
        .map(ProductId::from_uuid)
        .unwrap_or_else(ProductId::new);

    match state
        .inventory_service
        .register_inventory_line(
            store_id,
            product_id,
            request.product_name,
            Money::usd(request.unit_price_amount),
            request.quantity,
        )
        .await
    {
        Ok(line) => Ok((
            StatusCode::CREATED,
            Json(InventoryResponse::from_inventory_line(&line)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫一覧取得エンドポイント（ピッカー向けの販売可能スナップショット）
async fn get_inventories(
    State(state): State<AppState>,
    query: Result<Query<InventoryQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<InventoryResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "無効なクエリパラメータです".to_string(),
                "INVALID_PARAMETER",
            )),
        )
    })?;

    let store_id = StoreId::from_uuid(params.store_id);

    match state.inventory_service.get_sellable_inventory(store_id).await {
        Ok(lines) => {
            let response: Vec<InventoryResponse> = lines
                .iter()
                .map(InventoryResponse::from_inventory_line)
                .collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::InsufficientStock(shortages) => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: "在庫が不足しています".to_string(),
                code: "INSUFFICIENT_STOCK".to_string(),
                shortages: Some(
                    shortages
                        .iter()
                        .map(StockShortageResponse::from_shortage)
                        .collect(),
                ),
            }),
        ),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(format!("{}", repo_err), "REPOSITORY_ERROR")),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(msg, "NOT_FOUND")),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(domain_err: crate::domain::error::DomainError) -> (StatusCode, Json<ApiError>) {
    use crate::domain::error::DomainError;

    match domain_err {
        DomainError::ValidationFailed(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(msg, "VALIDATION_FAILED")),
        ),
        DomainError::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "無効な数量です".to_string(),
                "INVALID_QUANTITY",
            )),
        ),
        DomainError::EmptyCart => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "カートが空です".to_string(),
                "EMPTY_CART",
            )),
        ),
        DomainError::CouponNotFound(code) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                format!("クーポンが見つかりません: {}", code),
                "COUPON_NOT_FOUND",
            )),
        ),
        DomainError::CouponInactive(code) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new(
                format!("クーポンは無効化されています: {}", code),
                "COUPON_INACTIVE",
            )),
        ),
        DomainError::CouponAlreadyApplied => (
            StatusCode::CONFLICT,
            Json(ApiError::new(
                "クーポンは既に適用されています".to_string(),
                "COUPON_ALREADY_APPLIED",
            )),
        ),
        DomainError::IllegalTransition { from, to } => (
            StatusCode::CONFLICT,
            Json(ApiError::new(
                format!("許可されていないステータス遷移です: {} -> {}", from, to),
                "ILLEGAL_TRANSITION",
            )),
        ),
        DomainError::CurrencyMismatch => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "通貨が一致しません".to_string(),
                "CURRENCY_MISMATCH",
            )),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(msg, "INVALID_VALUE")),
        ),
    }
}
