use crate::application::ApplicationError;
use crate::domain::model::{InventoryId, InventoryLine, Money, ProductId, StoreId};
use crate::domain::port::InventoryRepository;
use std::sync::Arc;

/// 在庫アプリケーションサービス
/// ピッカー向けの在庫一覧と、在庫行の登録・補充を提供する
pub struct InventoryApplicationService {
    inventory_repository: Arc<dyn InventoryRepository>,
}

impl InventoryApplicationService {
    /// 新しい在庫アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `inventory_repository` - 在庫リポジトリ
    pub fn new(inventory_repository: Arc<dyn InventoryRepository>) -> Self {
        Self {
            inventory_repository,
        }
    }

    /// 指定された店舗の販売可能な在庫行を取得
    /// 在庫が1以上の行のみを商品名の昇順で並べて返す
    ///
    /// # Arguments
    /// * `store_id` - 店舗ID
    ///
    /// # Returns
    /// * `Ok(Vec<InventoryLine>)` - 販売可能な在庫行のリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_sellable_inventory(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<InventoryLine>, ApplicationError> {
        self.inventory_repository
            .find_sellable_by_store(store_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 在庫行IDで在庫行を取得
    ///
    /// # Arguments
    /// * `inventory_id` - 在庫行ID
    ///
    /// # Returns
    /// * `Ok(Some(InventoryLine))` - 在庫行が見つかった
    /// * `Ok(None)` - 在庫行が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_inventory_by_id(
        &self,
        inventory_id: InventoryId,
    ) -> Result<Option<InventoryLine>, ApplicationError> {
        self.inventory_repository
            .find_by_id(inventory_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 在庫行を登録する（新規追加・補充）
    ///
    /// # Arguments
    /// * `store_id` - 店舗ID
    /// * `product_id` - 商品ID
    /// * `name` - 商品名
    /// * `unit_price` - 単価
    /// * `quantity` - 在庫数量
    ///
    /// # Returns
    /// * `Ok(InventoryLine)` - 登録された在庫行
    /// * `Err(ApplicationError)` - 登録失敗
    pub async fn register_inventory_line(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        name: String,
        unit_price: Money,
        quantity: u32,
    ) -> Result<InventoryLine, ApplicationError> {
        let line = InventoryLine::new(
            InventoryId::new(),
            store_id,
            product_id,
            name,
            unit_price,
            quantity,
        );
        self.inventory_repository.save(&line).await?;
        Ok(line)
    }
}
