use crate::domain::model::{InventoryId, Money, ProductId, StoreId};

/// 在庫行
/// 外部カタログ/在庫ストアが所有する店舗×商品ごとの在庫レコード。
/// このコアでは読み取りと条件付き減算のみ行う。
/// 不変条件: available_quantity は負にならない（減算は在庫十分な場合のみ）
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryLine {
    inventory_id: InventoryId,
    store_id: StoreId,
    product_id: ProductId,
    name: String,
    unit_price: Money,
    available_quantity: u32,
}

impl InventoryLine {
    /// 新しい在庫行を作成
    ///
    /// # Arguments
    /// * `inventory_id` - 在庫行ID
    /// * `store_id` - 店舗ID
    /// * `product_id` - 商品ID
    /// * `name` - 商品名
    /// * `unit_price` - 単価
    /// * `available_quantity` - 販売可能数量
    pub fn new(
        inventory_id: InventoryId,
        store_id: StoreId,
        product_id: ProductId,
        name: String,
        unit_price: Money,
        available_quantity: u32,
    ) -> Self {
        Self {
            inventory_id,
            store_id,
            product_id,
            name,
            unit_price,
            available_quantity,
        }
    }

    /// 在庫行IDを取得
    pub fn inventory_id(&self) -> InventoryId {
        self.inventory_id
    }

    /// 店舗IDを取得
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 単価を取得
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// 販売可能数量を取得
    pub fn available_quantity(&self) -> u32 {
        self.available_quantity
    }

    /// 指定された数量が販売可能かチェック
    pub fn has_available(&self, quantity: u32) -> bool {
        self.available_quantity >= quantity
    }

    /// ピッカーに表示できる（販売可能在庫がある）かどうか
    pub fn is_sellable(&self) -> bool {
        self.available_quantity > 0
    }
}
