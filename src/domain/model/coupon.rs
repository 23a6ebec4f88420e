use crate::domain::model::{CouponId, Money};
use serde::{Deserialize, Serialize};

/// 割引種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    /// 小計に対するパーセント割引
    Percentage,
    /// 固定額割引
    Fixed,
}

impl DiscountType {
    /// 割引種別を文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    /// 文字列からDiscountTypeを作成
    pub fn from_string(s: &str) -> Result<Self, crate::domain::error::DomainError> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            _ => Err(crate::domain::error::DomainError::InvalidValue(format!(
                "無効な割引種別: {}",
                s
            ))),
        }
    }
}

/// クーポン
/// 外部レジストリが所有する割引ルール（ここでは読み取り専用）
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    id: CouponId,
    code: String,
    discount_type: DiscountType,
    discount_value: i64,
    is_active: bool,
}

impl Coupon {
    /// 新しいクーポンを作成
    ///
    /// # Arguments
    /// * `id` - クーポンID
    /// * `code` - クーポンコード（大文字に正規化して保持）
    /// * `discount_type` - 割引種別
    /// * `discount_value` - 割引値（percentageならパーセント、fixedならセント。0以上）
    /// * `is_active` - 有効フラグ
    pub fn new(
        id: CouponId,
        code: String,
        discount_type: DiscountType,
        discount_value: i64,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            code: code.to_uppercase(),
            discount_type,
            discount_value: discount_value.max(0),
            is_active,
        }
    }

    /// クーポンIDを取得
    pub fn id(&self) -> CouponId {
        self.id
    }

    /// クーポンコードを取得
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 割引種別を取得
    pub fn discount_type(&self) -> DiscountType {
        self.discount_type
    }

    /// 割引値を取得
    pub fn discount_value(&self) -> i64 {
        self.discount_value
    }

    /// 有効かどうか
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// 指定された小計に対する割引額を計算
    /// percentage: 小計 × 割引値/100（セント精度、四捨五入）
    /// fixed: 割引値そのもの
    /// いずれの場合も [0, 小計] にクランプされる
    pub fn discount_amount(&self, subtotal: Money) -> Money {
        let raw = match self.discount_type {
            DiscountType::Percentage => subtotal.percentage(self.discount_value),
            DiscountType::Fixed => Money::usd(self.discount_value),
        };
        Money::usd(raw.amount().clamp(0, subtotal.amount()))
    }
}

/// 適用済みクーポン
/// 評価結果のスナップショット。カートの小計に対して一度だけ確定される
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    pub coupon_id: CouponId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub discount_amount: Money,
}
