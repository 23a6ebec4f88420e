use crate::domain::model::OrderStatus;

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 入力の検証失敗（例: 顧客名が空、配達先住所の必須項目が空）
    /// I/Oが発生する前に拒否され、呼び出し側の修正で回復可能
    ValidationFailed(String),
    /// 無効な数量（例: 0以下の数量）
    InvalidQuantity,
    /// カートが空の状態で注文を確定しようとした
    EmptyCart,
    /// クーポンコードが見つからない
    CouponNotFound(String),
    /// クーポンが無効化されている
    CouponInactive(String),
    /// クーポンが既に適用済み（適用は注文ドラフトごとに一度だけ）
    CouponAlreadyApplied,
    /// 許可されていないステータス遷移
    IllegalTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
    /// 通貨の不一致
    CurrencyMismatch,
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            DomainError::InvalidQuantity => write!(f, "Invalid quantity"),
            DomainError::EmptyCart => write!(f, "Cart is empty"),
            DomainError::CouponNotFound(code) => write!(f, "Coupon not found: {}", code),
            DomainError::CouponInactive(code) => write!(f, "Coupon is inactive: {}", code),
            DomainError::CouponAlreadyApplied => write!(f, "A coupon is already applied"),
            DomainError::IllegalTransition { from, to } => {
                write!(f, "Illegal transition: {} -> {}", from, to)
            }
            DomainError::CurrencyMismatch => write!(f, "Currency mismatch"),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
