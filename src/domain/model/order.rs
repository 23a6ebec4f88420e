use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::model::{
    Cart, FulfillmentDetails, Money, OrderId, OrderItem, OrderNumber, OrderStatus, StoreId,
};

/// Order集約
/// カートから一度だけ組み立てられ、以後はステートマシン経由でのみ変更される。
/// 削除されることはなく、終端ステータスへ移動するのみ
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    order_number: OrderNumber,
    store_id: StoreId,
    customer_name: String,
    items: Vec<OrderItem>,
    subtotal: Money,
    discount_amount: Money,
    total: Money,
    fulfillment: FulfillmentDetails,
    coupon_code: Option<String>,
    notes: Option<String>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// 確定済みカートから注文を組み立てる
    /// スタッフがカートからコミットするフローは確定の意思を含むため、
    /// 注文は直接confirmedステータスで作成される
    ///
    /// 事前条件:
    /// - カートが空でない
    /// - 顧客名が空でない
    /// - 割引額が小計を超えない
    /// - 配達の場合は住所が検証済み（FulfillmentDetails構築時に担保）
    pub fn assemble(
        id: OrderId,
        order_number: OrderNumber,
        store_id: StoreId,
        customer_name: String,
        cart: &Cart,
        fulfillment: FulfillmentDetails,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }
        if customer_name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "顧客名は空にできません".to_string(),
            ));
        }

        let subtotal = cart.subtotal();
        let discount_amount = cart.discount_amount();
        if discount_amount.amount() > subtotal.amount() {
            return Err(DomainError::ValidationFailed(
                "割引額が小計を超えています".to_string(),
            ));
        }
        let total = subtotal.subtract_clamped(&discount_amount);

        let mut items = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            items.push(OrderItem::new(
                line.product_id(),
                line.name().to_string(),
                line.quantity(),
                line.unit_price(),
            )?);
        }

        let coupon_code = cart.applied_coupon().map(|c| c.code.clone());
        let now = Utc::now();

        Ok(Self {
            id,
            order_number,
            store_id,
            customer_name,
            items,
            subtotal,
            discount_amount,
            total,
            fulfillment,
            coupon_code,
            notes,
            status: OrderStatus::Confirmed,
            created_at: now,
            confirmed_at: Some(now),
            completed_at: None,
            cancelled_at: None,
        })
    }

    /// データベースから取得したデータで注文を再構築
    /// リポジトリでの使用を想定
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: OrderId,
        order_number: OrderNumber,
        store_id: StoreId,
        customer_name: String,
        items: Vec<OrderItem>,
        subtotal: Money,
        discount_amount: Money,
        total: Money,
        fulfillment: FulfillmentDetails,
        coupon_code: Option<String>,
        notes: Option<String>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        confirmed_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            order_number,
            store_id,
            customer_name,
            items,
            subtotal,
            discount_amount,
            total,
            fulfillment,
            coupon_code,
            notes,
            status,
            created_at,
            confirmed_at,
            completed_at,
            cancelled_at,
        }
    }

    /// 注文IDを取得
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// 注文番号を取得
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// 店舗IDを取得
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// 顧客名を取得
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// 注文明細のリストを取得（作成後は不変）
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// 小計を取得
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// 割引額を取得
    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    /// 合計を取得
    pub fn total(&self) -> Money {
        self.total
    }

    /// 受け渡し方法を取得
    pub fn fulfillment(&self) -> &FulfillmentDetails {
        &self.fulfillment
    }

    /// 適用されたクーポンコードを取得
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// 備考を取得
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// 注文ステータスを取得
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// 作成日時を取得
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 確定日時を取得
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// 完了日時（delivered/completed時に設定）を取得
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// キャンセル日時を取得
    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// 明細から小計を再計算する
    /// 不変条件の検証用: subtotal は常にこの値と一致する
    pub fn computed_subtotal(&self) -> Money {
        self.items
            .iter()
            .map(|item| item.line_subtotal())
            .fold(Money::zero(), |acc, amount| acc.add(&amount).unwrap_or(acc))
    }

    /// 注文のステータスを遷移させる
    /// 遷移先が現在のステータスの後続として許可されていない場合、
    /// または現在のステータスが終端の場合は IllegalTransition で失敗する。
    /// 成功時は対応するタイムスタンプのみを設定し、他は変更しない
    pub fn transition(&mut self, target: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::IllegalTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        let now = Utc::now();
        match target {
            OrderStatus::Confirmed => self.confirmed_at = Some(now),
            OrderStatus::Delivered | OrderStatus::Completed => self.completed_at = Some(now),
            OrderStatus::Cancelled => self.cancelled_at = Some(now),
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        AppliedCoupon, CouponId, DeliveryAddress, DiscountType, InventoryId, ProductId,
    };

    fn cart_with_line(price: i64, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        let product_id = ProductId::new();
        cart.add_line(
            InventoryId::new(),
            product_id,
            "テスト商品".to_string(),
            Money::usd(price),
            100,
        )
        .unwrap();
        cart.set_quantity(product_id, quantity).unwrap();
        cart
    }

    fn pickup() -> FulfillmentDetails {
        FulfillmentDetails::Pickup { person_name: None }
    }

    fn assemble_order(cart: &Cart, fulfillment: FulfillmentDetails) -> Result<Order, DomainError> {
        Order::assemble(
            OrderId::new(),
            OrderNumber::generate(),
            StoreId::new(),
            "山田太郎".to_string(),
            cart,
            fulfillment,
            None,
        )
    }

    #[test]
    fn test_assemble_creates_confirmed_order() {
        let cart = cart_with_line(1000, 3);
        let order = assemble_order(&cart, pickup()).unwrap();

        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.subtotal().amount(), 3000);
        assert_eq!(order.discount_amount().amount(), 0);
        assert_eq!(order.total().amount(), 3000);
        assert!(order.confirmed_at().is_some());
        assert!(order.completed_at().is_none());
    }

    #[test]
    fn test_assemble_with_empty_cart_fails() {
        let cart = Cart::new();
        let result = assemble_order(&cart, pickup());
        assert_eq!(result.unwrap_err(), DomainError::EmptyCart);
    }

    #[test]
    fn test_assemble_with_empty_customer_name_fails() {
        let cart = cart_with_line(1000, 1);
        let result = Order::assemble(
            OrderId::new(),
            OrderNumber::generate(),
            StoreId::new(),
            "  ".to_string(),
            &cart,
            pickup(),
            None,
        );
        assert!(matches!(
            result.unwrap_err(),
            DomainError::ValidationFailed(_)
        ));
    }

    #[test]
    fn test_assemble_with_coupon_records_code_and_discount() {
        let mut cart = cart_with_line(1000, 3);
        cart.apply_coupon(AppliedCoupon {
            coupon_id: CouponId::new(),
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            discount_amount: Money::usd(300),
        })
        .unwrap();

        let order = assemble_order(&cart, pickup()).unwrap();
        assert_eq!(order.coupon_code(), Some("SAVE10"));
        assert_eq!(order.discount_amount().amount(), 300);
        assert_eq!(order.total().amount(), 2700);
    }

    #[test]
    fn test_assemble_with_delivery_address() {
        let cart = cart_with_line(500, 2);
        let address = DeliveryAddress::new(
            "123 Main St".to_string(),
            "Springfield".to_string(),
            "IL".to_string(),
            "62704".to_string(),
        )
        .unwrap();
        let order = assemble_order(&cart, FulfillmentDetails::Delivery { address }).unwrap();
        assert_eq!(order.fulfillment().kind(), "delivery");
    }

    #[test]
    fn test_total_matches_computed_subtotal_minus_discount() {
        let mut cart = cart_with_line(750, 4);
        cart.apply_coupon(AppliedCoupon {
            coupon_id: CouponId::new(),
            code: "FIVEOFF".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 500,
            discount_amount: Money::usd(500),
        })
        .unwrap();

        let order = assemble_order(&cart, pickup()).unwrap();
        let expected = order
            .computed_subtotal()
            .subtract_clamped(&order.discount_amount());
        assert_eq!(order.total(), expected);
    }

    #[test]
    fn test_transition_through_delivery_pipeline() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::ReadyForPickup).unwrap();
        order.transition(OrderStatus::OutForDelivery).unwrap();
        order.transition(OrderStatus::Delivered).unwrap();

        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.completed_at().is_some());
        assert!(order.cancelled_at().is_none());
    }

    #[test]
    fn test_transition_pickup_completion() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::ReadyForPickup).unwrap();
        order.transition(OrderStatus::Completed).unwrap();

        assert_eq!(order.status(), OrderStatus::Completed);
        assert!(order.completed_at().is_some());
    }

    #[test]
    fn test_transition_direct_delivery_from_ready_for_pickup() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::ReadyForPickup).unwrap();
        // 配達員への引き渡しと配達完了が同時に記録されるケース
        order.transition(OrderStatus::Delivered).unwrap();

        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.completed_at().is_some());

        // 配達完了後のキャンセルは不可
        let result = order.transition(OrderStatus::Cancelled);
        assert!(matches!(
            result.unwrap_err(),
            DomainError::IllegalTransition { .. }
        ));
    }

    #[test]
    fn test_transition_skipping_state_fails() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        let result = order.transition(OrderStatus::Delivered);
        assert_eq!(
            result.unwrap_err(),
            DomainError::IllegalTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Delivered,
            }
        );
        // 失敗した遷移はステータスを変更しない
        assert_eq!(order.status(), OrderStatus::Confirmed);
    }

    #[test]
    fn test_cancel_stamps_cancelled_at() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        order.transition(OrderStatus::Cancelled).unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert!(order.cancelled_at().is_some());
        assert!(order.completed_at().is_none());
    }

    #[test]
    fn test_delivered_order_cannot_be_cancelled() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::ReadyForPickup).unwrap();
        order.transition(OrderStatus::OutForDelivery).unwrap();
        order.transition(OrderStatus::Delivered).unwrap();

        let result = order.transition(OrderStatus::Cancelled);
        assert!(matches!(
            result.unwrap_err(),
            DomainError::IllegalTransition { .. }
        ));
    }

    #[test]
    fn test_refund_after_delivery() {
        let cart = cart_with_line(1000, 1);
        let mut order = assemble_order(&cart, pickup()).unwrap();

        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::ReadyForPickup).unwrap();
        order.transition(OrderStatus::Completed).unwrap();
        order.transition(OrderStatus::Refunded).unwrap();

        // 返金の記録はステータスのみで、totalは変更されない
        assert_eq!(order.status(), OrderStatus::Refunded);
        assert_eq!(order.total().amount(), 1000);
    }
}
