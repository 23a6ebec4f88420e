use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{InventoryId, InventoryLine, Money, ProductId, StoreId};
use crate::domain::port::{InventoryRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL在庫リポジトリ
/// MySQLデータベースの在庫行を読み書きする。
/// 注文確定時の減算は MySqlOrderRepository のトランザクション内で行われる
#[derive(Clone)]
pub struct MySqlInventoryRepository {
    pool: Pool<MySql>,
}

impl MySqlInventoryRepository {
    /// 新しいMySQL在庫リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlInventoryRepositoryのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から在庫行を再構築する
    fn build_line_from_row(row: &sqlx::mysql::MySqlRow) -> Result<InventoryLine, RepositoryError> {
        let inventory_id = InventoryId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("在庫行IDの解析に失敗しました: {}", e))
        })?;
        let store_id = StoreId::from_string(row.get("store_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("店舗IDの解析に失敗しました: {}", e))
        })?;
        let product_id = ProductId::from_string(row.get("product_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
        })?;
        let unit_price = Money::new(row.get("unit_price_amount"), row.get("currency"))
            .map_err(|e| RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e)))?;

        Ok(InventoryLine::new(
            inventory_id,
            store_id,
            product_id,
            row.get("product_name"),
            unit_price,
            row.get::<u32, _>("quantity"),
        ))
    }
}

#[async_trait]
impl InventoryRepository for MySqlInventoryRepository {
    async fn find_by_id(
        &self,
        inventory_id: InventoryId,
    ) -> Result<Option<InventoryLine>, RepositoryError> {
        // inventoriesテーブルから在庫行を取得
        let row = sqlx::query(
            "SELECT id, store_id, product_id, product_name, unit_price_amount, currency, quantity FROM inventories WHERE id = ?"
        )
        .bind(inventory_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_line_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_sellable_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<InventoryLine>, RepositoryError> {
        // 在庫が1以上の行のみを商品名の昇順で取得
        let rows = sqlx::query(
            r#"
            SELECT id, store_id, product_id, product_name, unit_price_amount, currency, quantity
            FROM inventories
            WHERE store_id = ? AND quantity > 0
            ORDER BY product_name ASC
            "#,
        )
        .bind(store_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut lines = Vec::new();
        for row in rows {
            lines.push(Self::build_line_from_row(&row)?);
        }

        Ok(lines)
    }

    async fn save(&self, line: &InventoryLine) -> Result<(), RepositoryError> {
        // 在庫行をinventoriesテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO inventories (id, store_id, product_id, product_name, unit_price_amount, currency, quantity)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                product_name = VALUES(product_name),
                unit_price_amount = VALUES(unit_price_amount),
                currency = VALUES(currency),
                quantity = VALUES(quantity)
            "#,
        )
        .bind(line.inventory_id().to_string())
        .bind(line.store_id().to_string())
        .bind(line.product_id().to_string())
        .bind(line.name())
        .bind(line.unit_price().amount())
        .bind(line.unit_price().currency())
        .bind(line.available_quantity())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }
}
