use crate::domain::error::DomainError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 注文の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// 新しい一意のOrderIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから OrderId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からOrderIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

/// 店舗の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId(Uuid);

impl StoreId {
    /// 新しい一意のStoreIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから StoreId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からStoreIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

/// 商品の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 新しい一意のProductIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから ProductId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からProductIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 在庫行の一意識別子（店舗×商品ごとに一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryId(Uuid);

impl InventoryId {
    /// 新しい一意のInventoryIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから InventoryId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からInventoryIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for InventoryId {
    fn default() -> Self {
        Self::new()
    }
}

/// クーポンの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CouponId(Uuid);

impl CouponId {
    /// 新しい一意のCouponIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから CouponId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からCouponIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CouponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for CouponId {
    fn default() -> Self {
        Self::new()
    }
}

/// 通貨
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// 米ドル
    #[allow(clippy::upper_case_acronyms)]
    USD,
}

/// 金額を表す値オブジェクト
/// 内部表現はセント単位の整数（通貨精度2桁）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// 金額と通貨から作成
    pub fn new(amount: i64, currency: String) -> Result<Self, DomainError> {
        let currency = match currency.as_str() {
            "USD" => Currency::USD,
            _ => {
                return Err(DomainError::InvalidValue(format!(
                    "サポートされていない通貨: {}",
                    currency
                )))
            }
        };
        Ok(Self { amount, currency })
    }

    /// 米ドルの金額をセント単位で作成
    pub fn usd(amount: i64) -> Self {
        Self {
            amount,
            currency: Currency::USD,
        }
    }

    /// ゼロ金額
    pub fn zero() -> Self {
        Self::usd(0)
    }

    /// 金額（セント）を取得
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// 通貨を文字列として取得
    pub fn currency(&self) -> String {
        match self.currency {
            Currency::USD => "USD".to_string(),
        }
    }

    /// 金額を加算
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch);
        }
        Ok(Money {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// 金額を減算（下限0でクランプ）
    pub fn subtract_clamped(&self, other: &Money) -> Money {
        Money {
            amount: (self.amount - other.amount).max(0),
            currency: self.currency,
        }
    }

    /// 金額を乗算
    pub fn multiply(&self, factor: u32) -> Money {
        Money {
            amount: self.amount * factor as i64,
            currency: self.currency,
        }
    }

    /// 指定されたパーセントの金額を計算（セント精度、四捨五入）
    pub fn percentage(&self, percent: i64) -> Money {
        Money {
            amount: (self.amount * percent + 50) / 100,
            currency: self.currency,
        }
    }
}

/// 注文番号を表す値オブジェクト
/// 時刻ベースのトークン。一意性は永続化層のユニーク制約で担保し、
/// 衝突時は再生成してリトライする
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// 新しい注文番号を生成
    pub fn generate() -> Self {
        let suffix = (Uuid::new_v4().as_u128() % 10_000) as u32;
        Self(format!(
            "ORD-{}-{:04}",
            Utc::now().format("%Y%m%d%H%M%S"),
            suffix
        ))
    }

    /// 文字列からOrderNumberを作成（リポジトリでの再構築用）
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// 内部の文字列を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 注文明細を表す値オブジェクト
/// 注文作成後は変更不可
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    name: String,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    /// 新しい注文明細を作成
    /// 数量は1以上である必要がある
    pub fn new(
        product_id: ProductId,
        name: String,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            product_id,
            name,
            quantity,
            unit_price,
        })
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 単価を取得
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// 明細小計を計算（単価 × 数量）
    pub fn line_subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// 配達先住所を表す値オブジェクト
/// バリデーション: 番地・市・州・郵便番号はすべて空でない必要がある
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    street: String,
    city: String,
    state: String,
    zip: String,
}

impl DeliveryAddress {
    /// 新しい配達先住所を作成
    pub fn new(
        street: String,
        city: String,
        state: String,
        zip: String,
    ) -> Result<Self, DomainError> {
        if street.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "配達先の番地は空にできません".to_string(),
            ));
        }
        if city.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "配達先の市は空にできません".to_string(),
            ));
        }
        if state.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "配達先の州は空にできません".to_string(),
            ));
        }
        if zip.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "配達先の郵便番号は空にできません".to_string(),
            ));
        }

        Ok(Self {
            street,
            city,
            state,
            zip,
        })
    }

    /// 番地を取得
    pub fn street(&self) -> &str {
        &self.street
    }

    /// 市を取得
    pub fn city(&self) -> &str {
        &self.city
    }

    /// 州を取得
    pub fn state(&self) -> &str {
        &self.state
    }

    /// 郵便番号を取得
    pub fn zip(&self) -> &str {
        &self.zip
    }
}

/// 受け渡し方法を表すタグ付きバリアント
/// 受け取り（任意の受取人名）または配達（必須の住所）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FulfillmentDetails {
    /// 店頭受け取り
    Pickup { person_name: Option<String> },
    /// 配達
    Delivery { address: DeliveryAddress },
}

impl FulfillmentDetails {
    /// 受け渡し種別を文字列として取得
    pub fn kind(&self) -> &'static str {
        match self {
            FulfillmentDetails::Pickup { .. } => "pickup",
            FulfillmentDetails::Delivery { .. } => "delivery",
        }
    }
}

/// 注文のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// 保留中（作成直後）
    Pending,
    /// 確定済み
    Confirmed,
    /// 準備中
    Processing,
    /// 受け取り待ち
    ReadyForPickup,
    /// 配達中
    OutForDelivery,
    /// 配達完了（終端）
    Delivered,
    /// 受け取り完了（終端）
    Completed,
    /// キャンセル済み（終端）
    Cancelled,
    /// 返金済み（終端）
    Refunded,
}

impl OrderStatus {
    /// 終端ステータスかどうか
    /// 終端からの遷移はrefunded補正を除いて存在しない
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered
                | OrderStatus::Completed
                | OrderStatus::Cancelled
                | OrderStatus::Refunded
        )
    }

    /// 指定されたステータスへの遷移が許可されているかチェック
    /// cancelledへの遷移は非終端のすべてのステータスから可能
    /// refundedはdelivered/completedからのみ到達可能（出荷後の補正）
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if target == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        match self {
            OrderStatus::Pending => target == OrderStatus::Confirmed,
            OrderStatus::Confirmed => target == OrderStatus::Processing,
            OrderStatus::Processing => target == OrderStatus::ReadyForPickup,
            // 受け取り待ちからは配達への引き渡し（out_for_delivery を
            // 経由しない直接配達完了を含む）と受け取り完了の両方に進める
            OrderStatus::ReadyForPickup => {
                target == OrderStatus::OutForDelivery
                    || target == OrderStatus::Delivered
                    || target == OrderStatus::Completed
            }
            OrderStatus::OutForDelivery => target == OrderStatus::Delivered,
            OrderStatus::Delivered | OrderStatus::Completed => target == OrderStatus::Refunded,
            OrderStatus::Cancelled | OrderStatus::Refunded => false,
        }
    }

    /// ステータスを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// 文字列からOrderStatusを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "ready_for_pickup" => Ok(OrderStatus::ReadyForPickup),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な注文ステータス: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_creation() {
        let id1 = OrderId::new();
        let id2 = OrderId::new();
        assert_ne!(id1, id2, "Each OrderId should be unique");
    }

    #[test]
    fn test_money_addition() {
        let money1 = Money::usd(1000);
        let money2 = Money::usd(500);
        let result = money1.add(&money2).unwrap();
        assert_eq!(result.amount(), 1500);
    }

    #[test]
    fn test_money_multiplication() {
        let money = Money::usd(100);
        let result = money.multiply(5);
        assert_eq!(result.amount(), 500);
    }

    #[test]
    fn test_money_subtract_clamped_floor_at_zero() {
        let subtotal = Money::usd(1000);
        let discount = Money::usd(5000);
        assert_eq!(subtotal.subtract_clamped(&discount).amount(), 0);
    }

    #[test]
    fn test_money_percentage_rounds_half_up() {
        // 1050セントの10% = 105セント（端数なし）
        assert_eq!(Money::usd(1050).percentage(10).amount(), 105);
        // 1005セントの10% = 100.5 → 101セント
        assert_eq!(Money::usd(1005).percentage(10).amount(), 101);
        // 1004セントの10% = 100.4 → 100セント
        assert_eq!(Money::usd(1004).percentage(10).amount(), 100);
    }

    #[test]
    fn test_order_number_format() {
        let number = OrderNumber::generate();
        assert!(number.as_str().starts_with("ORD-"));
    }

    #[test]
    fn test_order_item_creation() {
        let product_id = ProductId::new();
        let price = Money::usd(1000);
        let item = OrderItem::new(product_id, "コーヒー豆".to_string(), 2, price).unwrap();
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.line_subtotal().amount(), 2000);
    }

    #[test]
    fn test_order_item_invalid_quantity() {
        let product_id = ProductId::new();
        let price = Money::usd(1000);
        let result = OrderItem::new(product_id, "コーヒー豆".to_string(), 0, price);
        assert!(result.is_err());
    }

    #[test]
    fn test_delivery_address_valid() {
        let address = DeliveryAddress::new(
            "123 Main St".to_string(),
            "Springfield".to_string(),
            "IL".to_string(),
            "62704".to_string(),
        );
        assert!(address.is_ok());
    }

    #[test]
    fn test_delivery_address_empty_city_rejected() {
        let result = DeliveryAddress::new(
            "123 Main St".to_string(),
            "".to_string(),
            "IL".to_string(),
            "62704".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::ReadyForPickup.is_terminal());
    }

    #[test]
    fn test_status_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::ReadyForPickup));
        assert!(OrderStatus::ReadyForPickup.can_transition_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::ReadyForPickup.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::ReadyForPickup.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_status_no_skipping_states() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::OutForDelivery));
    }

    #[test]
    fn test_status_refunded_only_from_fulfilled() {
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Refunded));
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Refunded));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Refunded));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Refunded));
    }

    #[test]
    fn test_status_cancel_only_from_non_terminal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert_eq!(OrderStatus::from_string(status.as_str()).unwrap(), status);
        }
        assert!(OrderStatus::from_string("shipped").is_err());
    }
}
