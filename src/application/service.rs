pub mod inventory_service;
pub mod order_query_service;

pub use inventory_service::InventoryApplicationService;
pub use order_query_service::OrderQueryService;

use crate::application::ApplicationError;
use crate::domain::event::{DomainEvent, OrderCreated, OrderStatusChanged};
use crate::domain::model::{
    Cart, FulfillmentDetails, InventoryId, Order, OrderId, OrderNumber, OrderStatus, StoreId,
};
use crate::domain::port::{
    CreateOrderError, InventoryRepository, Logger, OrderNotifier, OrderRepository, StockShortage,
};
use crate::domain::service::CouponEvaluator;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// 注文番号の衝突時に再採番を試みる最大回数
const ORDER_NUMBER_MAX_ATTEMPTS: u32 = 3;

/// 注文ドラフトの明細
#[derive(Debug, Clone)]
pub struct OrderDraftLine {
    /// 在庫行ID
    pub inventory_id: InventoryId,
    /// 数量
    pub quantity: u32,
}

/// 注文ドラフト
/// スタッフが入力した注文作成リクエストの内容
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// 店舗ID
    pub store_id: StoreId,
    /// 顧客名
    pub customer_name: String,
    /// 明細のリスト
    pub lines: Vec<OrderDraftLine>,
    /// クーポンコード（オプション）
    pub coupon_code: Option<String>,
    /// 受け渡し方法
    pub fulfillment: FulfillmentDetails,
    /// 備考（オプション）
    pub notes: Option<String>,
}

/// 注文アプリケーションサービス
/// 注文の組み立て・原子的な作成・ステータス遷移のユースケースを提供する
pub struct OrderApplicationService {
    order_repository: Arc<dyn OrderRepository>,
    inventory_repository: Arc<dyn InventoryRepository>,
    coupon_evaluator: CouponEvaluator,
    notifier: Arc<dyn OrderNotifier>,
    logger: Arc<dyn Logger>,
}

impl OrderApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    /// * `inventory_repository` - 在庫リポジトリ
    /// * `coupon_evaluator` - クーポン評価サービス
    /// * `notifier` - 注文通知
    /// * `logger` - ロガー
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        inventory_repository: Arc<dyn InventoryRepository>,
        coupon_evaluator: CouponEvaluator,
        notifier: Arc<dyn OrderNotifier>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            order_repository,
            inventory_repository,
            coupon_evaluator,
            notifier,
            logger,
        }
    }

    /// ドラフトからカートを組み立てる
    /// 各明細の在庫行を取得してスナップショットを取り、
    /// この時点で既に不足している行があれば全行の内訳つきで失敗する
    async fn build_cart(&self, draft: &OrderDraft) -> Result<Cart, ApplicationError> {
        let mut cart = Cart::new();
        let mut shortages: Vec<StockShortage> = Vec::new();
        let mut seen_lines: HashSet<InventoryId> = HashSet::new();

        for draft_line in &draft.lines {
            // 同じ在庫行を複数の明細に分けた入力は数量の解釈が曖昧なので拒否する
            if !seen_lines.insert(draft_line.inventory_id) {
                return Err(ApplicationError::DomainError(
                    crate::domain::error::DomainError::ValidationFailed(format!(
                        "在庫行 {} が複数の明細で指定されています",
                        draft_line.inventory_id
                    )),
                ));
            }

            let line = self
                .inventory_repository
                .find_by_id(draft_line.inventory_id)
                .await?
                .ok_or_else(|| {
                    ApplicationError::NotFound(format!(
                        "在庫行が見つかりません: {}",
                        draft_line.inventory_id
                    ))
                })?;

            if line.store_id() != draft.store_id {
                return Err(ApplicationError::DomainError(
                    crate::domain::error::DomainError::ValidationFailed(format!(
                        "在庫行 {} は指定された店舗のものではありません",
                        line.inventory_id()
                    )),
                ));
            }

            if draft_line.quantity == 0 {
                return Err(ApplicationError::DomainError(
                    crate::domain::error::DomainError::InvalidQuantity,
                ));
            }

            if !line.has_available(draft_line.quantity) {
                shortages.push(StockShortage {
                    inventory_id: line.inventory_id(),
                    product_id: line.product_id(),
                    product_name: line.name().to_string(),
                    requested: draft_line.quantity,
                    available: line.available_quantity(),
                });
                continue;
            }

            cart.add_line(
                line.inventory_id(),
                line.product_id(),
                line.name().to_string(),
                line.unit_price(),
                line.available_quantity(),
            )?;
            cart.set_quantity(line.product_id(), draft_line.quantity)?;
        }

        if !shortages.is_empty() {
            return Err(ApplicationError::InsufficientStock(shortages));
        }

        Ok(cart)
    }

    /// 新しい注文を作成
    /// カートの組み立て、クーポン評価、原子的な作成（在庫減算＋永続化）を行う。
    /// 注文番号が衝突した場合は再採番して限定回数までリトライする
    ///
    /// # Arguments
    /// * `draft` - 注文ドラフト
    ///
    /// # Returns
    /// * `Ok(Order)` - 作成された注文
    /// * `Err(ApplicationError)` - 作成失敗（副作用なし）
    pub async fn create_order(&self, draft: OrderDraft) -> Result<Order, ApplicationError> {
        let mut cart = self.build_cart(&draft).await?;

        if let Some(code) = &draft.coupon_code {
            let applied = self.coupon_evaluator.evaluate(code, cart.subtotal()).await?;
            cart.apply_coupon(applied)?;
        }

        let order_id = self.order_repository.next_identity();
        let correlation_id = Uuid::new_v4();

        let mut attempts = 0;
        loop {
            let order = Order::assemble(
                order_id,
                OrderNumber::generate(),
                draft.store_id,
                draft.customer_name.clone(),
                &cart,
                draft.fulfillment.clone(),
                draft.notes.clone(),
            )?;

            match self.order_repository.create(&order).await {
                Ok(()) => {
                    self.logger.info(
                        "OrderApplicationService",
                        &format!("注文を作成しました: {}", order.order_number()),
                        Some(correlation_id),
                        Some(HashMap::from([(
                            "order_id".to_string(),
                            order.id().to_string(),
                        )])),
                    );
                    self.notify(
                        DomainEvent::OrderCreated(OrderCreated::new(
                            order.id(),
                            order.order_number().clone(),
                            order.store_id(),
                            order.total(),
                        )),
                        correlation_id,
                    )
                    .await;
                    return Ok(order);
                }
                Err(CreateOrderError::DuplicateOrderNumber)
                    if attempts + 1 < ORDER_NUMBER_MAX_ATTEMPTS =>
                {
                    attempts += 1;
                    self.logger.warn(
                        "OrderApplicationService",
                        &format!("注文番号が衝突しました。再採番します（{}回目）", attempts),
                        Some(correlation_id),
                        None,
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// 注文のステータスを遷移させる
    /// 遷移の妥当性は注文集約が検証する。キャンセルしても在庫は戻さない
    /// （店舗スタッフが実物を棚に戻した時点で在庫補充として別途記録する）
    ///
    /// # Arguments
    /// * `order_id` - 注文ID
    /// * `target` - 遷移先ステータス
    ///
    /// # Returns
    /// * `Ok(Order)` - 遷移適用後の注文
    /// * `Err(ApplicationError)` - 遷移失敗
    pub async fn transition_order(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, ApplicationError> {
        let mut order = self
            .order_repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("注文が見つかりません: {}", order_id))
            })?;

        let from = order.status();
        order.transition(target)?;
        self.order_repository.save_status(&order).await?;

        let correlation_id = Uuid::new_v4();
        self.notify(
            DomainEvent::OrderStatusChanged(OrderStatusChanged::new(order.id(), from, target)),
            correlation_id,
        )
        .await;

        Ok(order)
    }

    /// イベントを通知する
    /// 通知の失敗は注文処理の成否に影響させず、警告ログのみ残す
    async fn notify(&self, event: DomainEvent, correlation_id: Uuid) {
        if let Err(e) = self.notifier.notify(event).await {
            self.logger.warn(
                "OrderApplicationService",
                &format!("通知の送信に失敗しました: {}", e),
                Some(correlation_id),
                None,
            );
        }
    }
}
