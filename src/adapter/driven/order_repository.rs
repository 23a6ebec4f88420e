use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Order, OrderId};
use crate::domain::port::{CreateOrderError, OrderRepository, RepositoryError, StockShortage};
use async_trait::async_trait;

// MySQL関連のインポート
use crate::domain::model::{
    DeliveryAddress, FulfillmentDetails, InventoryId, Money, OrderItem, OrderNumber, OrderStatus,
    ProductId, StoreId,
};
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

/// MySQL注文リポジトリ
/// MySQLデータベースを使用して注文を永続化する。
/// 注文の作成は単一トランザクションで条件付き在庫減算と挿入を行う
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlOrderRepositoryのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// 不足していた明細の内訳を組み立てる
    /// ロールバック後に現在の在庫数量を読み直す（報告用のスナップショット）
    async fn build_shortage_report(
        &self,
        order: &Order,
        failed_products: &[ProductId],
    ) -> Result<Vec<StockShortage>, RepositoryError> {
        let mut shortages = Vec::new();

        for item in order.items() {
            if !failed_products.contains(&item.product_id()) {
                continue;
            }

            let row = sqlx::query(
                "SELECT id, quantity FROM inventories WHERE store_id = ? AND product_id = ?",
            )
            .bind(order.store_id().to_string())
            .bind(item.product_id().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

            let (inventory_id, available) = match row {
                Some(row) => {
                    let id_str: String = row.get("id");
                    let inventory_id = InventoryId::from_string(&id_str).map_err(|e| {
                        RepositoryError::FetchFailed(format!("在庫行IDの解析に失敗しました: {}", e))
                    })?;
                    (inventory_id, row.get::<u32, _>("quantity"))
                }
                // 在庫行自体が消えている場合は在庫0として報告
                None => (InventoryId::new(), 0),
            };

            shortages.push(StockShortage {
                inventory_id,
                product_id: item.product_id(),
                product_name: item.name().to_string(),
                requested: item.quantity(),
                available,
            });
        }

        Ok(shortages)
    }

    /// データベースの行から注文オブジェクトのリストを構築する
    /// JOINされた結果から複数の注文を再構築する
    fn build_orders_from_rows(
        &self,
        rows: Vec<sqlx::mysql::MySqlRow>,
    ) -> Result<Vec<Order>, RepositoryError> {
        use std::collections::HashMap;

        // 注文IDごとにグループ化（作成日時の降順を保つため挿入順も記録）
        let mut order_groups: HashMap<String, Vec<&sqlx::mysql::MySqlRow>> = HashMap::new();
        let mut order_ids_in_order: Vec<String> = Vec::new();
        for row in &rows {
            let order_id: String = row.get("id");
            if !order_groups.contains_key(&order_id) {
                order_ids_in_order.push(order_id.clone());
            }
            order_groups.entry(order_id).or_default().push(row);
        }

        let mut orders = Vec::new();

        for order_id_str in order_ids_in_order {
            let order_rows = &order_groups[&order_id_str];
            if order_rows.is_empty() {
                continue;
            }

            orders.push(self.build_order_from_rows(&order_id_str, order_rows)?);
        }

        Ok(orders)
    }

    /// 1つの注文に属する行から注文集約を再構築する
    fn build_order_from_rows(
        &self,
        order_id_str: &str,
        rows: &[&sqlx::mysql::MySqlRow],
    ) -> Result<Order, RepositoryError> {
        // 最初の行から注文の基本情報を取得
        let first_row = rows[0];

        let order_id = OrderId::from_string(order_id_str).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
        })?;

        let store_id = StoreId::from_string(first_row.get("store_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("店舗IDの解析に失敗しました: {}", e))
        })?;

        let order_number = OrderNumber::from_string(first_row.get("order_number"));
        let customer_name: String = first_row.get("customer_name");

        let status = OrderStatus::from_string(first_row.get("status")).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文ステータスの解析に失敗しました: {}", e))
        })?;

        let currency: String = first_row.get("currency");
        let subtotal = Money::new(first_row.get("subtotal_amount"), currency.clone())
            .map_err(|e| RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e)))?;
        let discount_amount = Money::new(first_row.get("discount_amount"), currency.clone())
            .map_err(|e| RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e)))?;
        let total = Money::new(first_row.get("total_amount"), currency.clone())
            .map_err(|e| RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e)))?;

        // 受け渡し方法を再構築
        let fulfillment_kind: String = first_row.get("fulfillment_kind");
        let fulfillment = if fulfillment_kind == "delivery" {
            let address = DeliveryAddress::new(
                first_row
                    .get::<Option<String>, _>("delivery_street")
                    .unwrap_or_default(),
                first_row
                    .get::<Option<String>, _>("delivery_city")
                    .unwrap_or_default(),
                first_row
                    .get::<Option<String>, _>("delivery_state")
                    .unwrap_or_default(),
                first_row
                    .get::<Option<String>, _>("delivery_zip")
                    .unwrap_or_default(),
            )
            .map_err(|e| {
                RepositoryError::FetchFailed(format!("配達先住所の構築に失敗しました: {}", e))
            })?;
            FulfillmentDetails::Delivery { address }
        } else {
            FulfillmentDetails::Pickup {
                person_name: first_row.get("pickup_person_name"),
            }
        };

        // 注文明細を再構築
        let mut items = Vec::new();
        for row in rows {
            if let (Some(product_id_str), Some(name), Some(quantity), Some(amount)) = (
                row.get::<Option<String>, _>("product_id"),
                row.get::<Option<String>, _>("product_name"),
                row.get::<Option<u32>, _>("quantity"),
                row.get::<Option<i64>, _>("unit_price_amount"),
            ) {
                let product_id = ProductId::from_string(&product_id_str).map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
                })?;

                let unit_price = Money::new(amount, currency.clone()).map_err(|e| {
                    RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e))
                })?;

                let item = OrderItem::new(product_id, name, quantity, unit_price).map_err(|e| {
                    RepositoryError::FetchFailed(format!("注文明細の構築に失敗しました: {}", e))
                })?;

                items.push(item);
            }
        }

        Ok(Order::reconstruct(
            order_id,
            order_number,
            store_id,
            customer_name,
            items,
            subtotal,
            discount_amount,
            total,
            fulfillment,
            first_row.get("coupon_code"),
            first_row.get("notes"),
            status,
            first_row.get::<DateTime<Utc>, _>("created_at"),
            first_row.get::<Option<DateTime<Utc>>, _>("confirmed_at"),
            first_row.get::<Option<DateTime<Utc>>, _>("completed_at"),
            first_row.get::<Option<DateTime<Utc>>, _>("cancelled_at"),
        ))
    }
}

/// 注文取得クエリの共通SELECT句
const SELECT_ORDERS: &str = r#"
    SELECT
        o.id, o.order_number, o.store_id, o.customer_name,
        o.subtotal_amount, o.discount_amount, o.total_amount, o.currency,
        o.fulfillment_kind, o.pickup_person_name,
        o.delivery_street, o.delivery_city, o.delivery_state, o.delivery_zip,
        o.coupon_code, o.notes, o.status,
        o.created_at, o.confirmed_at, o.completed_at, o.cancelled_at,
        oi.product_id, oi.product_name, oi.quantity, oi.unit_price_amount
    FROM orders o
    LEFT JOIN order_items oi ON o.id = oi.order_id
"#;

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), CreateOrderError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 全明細の条件付き在庫減算
        // quantity >= 要求数量 の行だけが更新される。0行更新は在庫不足
        let mut failed_products = Vec::new();
        for item in order.items() {
            let result = sqlx::query(
                r#"
                UPDATE inventories
                SET quantity = quantity - ?
                WHERE store_id = ? AND product_id = ? AND quantity >= ?
                "#,
            )
            .bind(item.quantity())
            .bind(order.store_id().to_string())
            .bind(item.product_id().to_string())
            .bind(item.quantity())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の減算に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

            if result.rows_affected() == 0 {
                failed_products.push(item.product_id());
            }
        }

        if !failed_products.is_empty() {
            // どの減算も確定させない
            tx.rollback()
                .await
                .map_err(|e| {
                    DatabaseError::QueryError(format!("ロールバックに失敗しました: {}", e))
                })
                .map_err(RepositoryError::from)?;

            let shortages = self.build_shortage_report(order, &failed_products).await?;
            return Err(CreateOrderError::InsufficientStock(shortages));
        }

        // 注文データをordersテーブルにINSERT
        let (pickup_person_name, street, city, state, zip) = match order.fulfillment() {
            FulfillmentDetails::Pickup { person_name } => {
                (person_name.clone(), None, None, None, None)
            }
            FulfillmentDetails::Delivery { address } => (
                None,
                Some(address.street().to_string()),
                Some(address.city().to_string()),
                Some(address.state().to_string()),
                Some(address.zip().to_string()),
            ),
        };

        let insert_result = sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, store_id, customer_name,
                subtotal_amount, discount_amount, total_amount, currency,
                fulfillment_kind, pickup_person_name,
                delivery_street, delivery_city, delivery_state, delivery_zip,
                coupon_code, notes, status,
                created_at, confirmed_at, completed_at, cancelled_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.id().to_string())
        .bind(order.order_number().as_str())
        .bind(order.store_id().to_string())
        .bind(order.customer_name())
        .bind(order.subtotal().amount())
        .bind(order.discount_amount().amount())
        .bind(order.total().amount())
        .bind(order.subtotal().currency())
        .bind(order.fulfillment().kind())
        .bind(pickup_person_name)
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(zip)
        .bind(order.coupon_code())
        .bind(order.notes())
        .bind(order.status().as_str())
        .bind(order.created_at())
        .bind(order.confirmed_at())
        .bind(order.completed_at())
        .bind(order.cancelled_at())
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert_result {
            // 注文番号の一意インデックス違反は再採番でリトライ可能
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Err(CreateOrderError::DuplicateOrderNumber);
                }
            }
            return Err(CreateOrderError::Repository(RepositoryError::from(
                DatabaseError::QueryError(format!("注文の保存に失敗しました: {}", e)),
            )));
        }

        // 注文明細データをorder_itemsテーブルにINSERT
        for item in order.items() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price_amount)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(order.id().to_string())
            .bind(item.product_id().to_string())
            .bind(item.name())
            .bind(item.quantity())
            .bind(item.unit_price().amount())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文明細の保存に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        }

        // トランザクションをコミット
        // ここで初めて在庫減算と注文挿入の両方が可視になる
        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn save_status(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE orders
            SET status = ?, confirmed_at = ?, completed_at = ?, cancelled_at = ?
            WHERE id = ?
            "#,
        )
        .bind(order.status().as_str())
        .bind(order.confirmed_at())
        .bind(order.completed_at())
        .bind(order.cancelled_at())
        .bind(order.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("注文ステータスの保存に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let query = format!("{} WHERE o.id = ?", SELECT_ORDERS);
        let rows = sqlx::query(&query)
            .bind(order_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let row_refs: Vec<&sqlx::mysql::MySqlRow> = rows.iter().collect();
        let order = self.build_order_from_rows(&order_id.to_string(), &row_refs)?;
        Ok(Some(order))
    }

    async fn find_by_store(
        &self,
        store_id: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        // 作成日時の降順で並べる
        let rows = match status {
            Some(status) => {
                let query = format!(
                    "{} WHERE o.store_id = ? AND o.status = ? ORDER BY o.created_at DESC",
                    SELECT_ORDERS
                );
                sqlx::query(&query)
                    .bind(store_id.to_string())
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!(
                    "{} WHERE o.store_id = ? ORDER BY o.created_at DESC",
                    SELECT_ORDERS
                );
                sqlx::query(&query)
                    .bind(store_id.to_string())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| DatabaseError::QueryError(format!("注文一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        self.build_orders_from_rows(rows)
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}
