use crate::application::ApplicationError;
use crate::domain::model::{Order, OrderId, OrderStatus, StoreId};
use crate::domain::port::OrderRepository;
use std::sync::Arc;

/// 注文クエリサービス
/// 読み取り専用の注文操作を提供する
pub struct OrderQueryService {
    order_repository: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    /// 新しい注文クエリサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    pub fn new(order_repository: Arc<dyn OrderRepository>) -> Self {
        Self { order_repository }
    }

    /// 注文IDで注文を取得
    ///
    /// # Arguments
    /// * `id` - 注文ID
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, ApplicationError> {
        self.order_repository
            .find_by_id(id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された店舗の注文を取得
    /// ステータスを指定した場合はさらに絞り込む。
    /// 作成日時の降順で並べて返す
    ///
    /// # Arguments
    /// * `store_id` - 店舗ID
    /// * `status` - フィルタリングする注文ステータス（省略可）
    ///
    /// # Returns
    /// * `Ok(Vec<Order>)` - 注文のリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_orders_by_store(
        &self,
        store_id: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_by_store(store_id, status)
            .await
            .map_err(ApplicationError::from)
    }
}
