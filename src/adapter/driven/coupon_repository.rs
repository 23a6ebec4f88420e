use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Coupon, CouponId, DiscountType};
use crate::domain::port::{CouponRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQLクーポンリポジトリ
/// クーポンレジストリの読み取り専用ビュー
#[derive(Clone)]
pub struct MySqlCouponRepository {
    pool: Pool<MySql>,
}

impl MySqlCouponRepository {
    /// 新しいMySQLクーポンリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlCouponRepositoryのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponRepository for MySqlCouponRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        // コードは大文字で保存されている（Coupon::newが正規化する）
        let row = sqlx::query(
            "SELECT id, code, discount_type, discount_value, is_active FROM coupons WHERE code = ?",
        )
        .bind(code.to_uppercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("クーポンの取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => {
                let id = CouponId::from_string(row.get("id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("クーポンIDの解析に失敗しました: {}", e))
                })?;
                let discount_type =
                    DiscountType::from_string(row.get("discount_type")).map_err(|e| {
                        RepositoryError::FetchFailed(format!("割引種別の解析に失敗しました: {}", e))
                    })?;

                Ok(Some(Coupon::new(
                    id,
                    row.get("code"),
                    discount_type,
                    row.get("discount_value"),
                    row.get("is_active"),
                )))
            }
            None => Ok(None),
        }
    }
}
