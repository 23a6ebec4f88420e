// ドメインサービス
// 集約単体に収まらないビジネスロジックを実装

use crate::domain::error::DomainError;
use crate::domain::model::{AppliedCoupon, Money};
use crate::domain::port::{CouponRepository, RepositoryError};
use std::sync::Arc;

/// クーポン評価のエラー型
/// ビジネスルール違反（コード不明・無効化済み）と、
/// レジストリ照会そのものの失敗を区別する。
/// 後者は一時的なインフラ障害であり、呼び出し側がリトライできる
#[derive(Debug, Clone, PartialEq)]
pub enum CouponEvaluationError {
    /// クーポンのビジネスルール違反
    Domain(DomainError),
    /// クーポンレジストリの照会失敗
    Repository(RepositoryError),
}

impl std::fmt::Display for CouponEvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponEvaluationError::Domain(e) => write!(f, "{}", e),
            CouponEvaluationError::Repository(e) => write!(f, "Coupon lookup failed: {}", e),
        }
    }
}

impl std::error::Error for CouponEvaluationError {}

impl From<DomainError> for CouponEvaluationError {
    fn from(error: DomainError) -> Self {
        CouponEvaluationError::Domain(error)
    }
}

impl From<RepositoryError> for CouponEvaluationError {
    fn from(error: RepositoryError) -> Self {
        CouponEvaluationError::Repository(error)
    }
}

/// クーポン評価サービス
/// クーポンコードの照合と、小計に対する割引額の確定を担当
pub struct CouponEvaluator {
    coupon_repository: Arc<dyn CouponRepository>,
}

impl CouponEvaluator {
    /// 新しいクーポン評価サービスを作成
    ///
    /// # Arguments
    /// * `coupon_repository` - クーポンリポジトリ
    pub fn new(coupon_repository: Arc<dyn CouponRepository>) -> Self {
        Self { coupon_repository }
    }

    /// クーポンコードを評価し、適用済みクーポンのスナップショットを返す
    /// コードは大文字に正規化して照合する。
    /// 割引額はこの時点の小計に対して確定され、以後再計算されない
    ///
    /// # Arguments
    /// * `code` - クーポンコード
    /// * `subtotal` - 評価時点のカート小計
    ///
    /// # Returns
    /// * `Ok(AppliedCoupon)` - 評価成功
    /// * `Err(CouponEvaluationError)` - コード不明・無効化済み、またはレジストリ照会失敗
    pub async fn evaluate(
        &self,
        code: &str,
        subtotal: Money,
    ) -> Result<AppliedCoupon, CouponEvaluationError> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::CouponNotFound(code.to_string()).into());
        }

        let coupon = self
            .coupon_repository
            .find_by_code(&normalized)
            .await?
            .ok_or(DomainError::CouponNotFound(normalized.clone()))?;

        if !coupon.is_active() {
            return Err(DomainError::CouponInactive(normalized).into());
        }

        Ok(AppliedCoupon {
            coupon_id: coupon.id(),
            code: coupon.code().to_string(),
            discount_type: coupon.discount_type(),
            discount_value: coupon.discount_value(),
            discount_amount: coupon.discount_amount(subtotal),
        })
    }
}
