// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::event::DomainEvent;
use crate::domain::model::{
    Coupon, InventoryId, InventoryLine, Order, OrderId, OrderStatus, ProductId, StoreId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 在庫不足の明細
/// 注文作成が在庫不足で失敗したとき、不足している行ごとに1つ返される
#[derive(Debug, Clone, PartialEq)]
pub struct StockShortage {
    /// 在庫行ID
    pub inventory_id: InventoryId,
    /// 商品ID
    pub product_id: ProductId,
    /// 商品名
    pub product_name: String,
    /// 要求数量
    pub requested: u32,
    /// 失敗時点で確認できた在庫数量
    pub available: u32,
}

/// 注文作成エラー型
/// 注文の原子的な作成（在庫減算＋永続化）で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOrderError {
    /// 1行以上の在庫が不足していた
    /// トランザクションはロールバック済みで、どの減算も適用されていない
    InsufficientStock(Vec<StockShortage>),
    /// 注文番号が既存の注文と衝突した
    /// 番号を再生成してリトライ可能
    DuplicateOrderNumber,
    /// リポジトリ操作の失敗
    Repository(RepositoryError),
}

impl std::fmt::Display for CreateOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateOrderError::InsufficientStock(shortages) => {
                write!(f, "Insufficient stock for {} line(s)", shortages.len())
            }
            CreateOrderError::DuplicateOrderNumber => write!(f, "Duplicate order number"),
            CreateOrderError::Repository(e) => write!(f, "Repository error: {}", e),
        }
    }
}

impl std::error::Error for CreateOrderError {}

impl From<RepositoryError> for CreateOrderError {
    fn from(error: RepositoryError) -> Self {
        CreateOrderError::Repository(error)
    }
}

/// 注文リポジトリトレイト
/// 注文集約の永続化を抽象化する
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 注文を原子的に作成する
    /// 単一トランザクション内で、全明細の条件付き在庫減算と
    /// 注文＋明細の挿入を行う。いずれかの減算が失敗した場合は
    /// 全体をロールバックし InsufficientStock を返す
    ///
    /// # Arguments
    /// * `order` - 作成する注文
    ///
    /// # Returns
    /// * `Ok(())` - 作成成功（在庫減算も確定済み）
    /// * `Err(CreateOrderError)` - 作成失敗（副作用なし）
    async fn create(&self, order: &Order) -> Result<(), CreateOrderError>;

    /// 注文のステータスと関連タイムスタンプを保存する
    ///
    /// # Arguments
    /// * `order` - 遷移適用済みの注文
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗
    async fn save_status(&self, order: &Order) -> Result<(), RepositoryError>;

    /// 注文IDで注文を検索する
    ///
    /// # Arguments
    /// * `order_id` - 検索する注文ID
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// 指定された店舗の注文を取得する
    /// ステータスを指定した場合はさらに絞り込む。
    /// 作成日時の降順で並べて返す
    ///
    /// # Arguments
    /// * `store_id` - 店舗ID
    /// * `status` - フィルタリングする注文ステータス（省略可）
    ///
    /// # Returns
    /// * `Ok(Vec<Order>)` - 注文のリスト
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_by_store(
        &self,
        store_id: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// 新しい一意の注文IDを生成する
    ///
    /// # Returns
    /// * 新しい注文ID
    fn next_identity(&self) -> OrderId;
}

/// 在庫リポジトリトレイト
/// 在庫行の読み取りを抽象化する（減算は OrderRepository::create が担う）
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// 在庫行IDで在庫行を検索する
    ///
    /// # Arguments
    /// * `inventory_id` - 検索する在庫行ID
    ///
    /// # Returns
    /// * `Ok(Some(InventoryLine))` - 在庫行が見つかった
    /// * `Ok(None)` - 在庫行が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(
        &self,
        inventory_id: InventoryId,
    ) -> Result<Option<InventoryLine>, RepositoryError>;

    /// 指定された店舗の販売可能な在庫行を取得する
    /// 在庫が1以上の行のみを商品名の昇順で並べて返す
    ///
    /// # Arguments
    /// * `store_id` - 店舗ID
    ///
    /// # Returns
    /// * `Ok(Vec<InventoryLine>)` - 販売可能な在庫行のリスト
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_sellable_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<InventoryLine>, RepositoryError>;

    /// 在庫行を保存する（新規追加・補充）
    ///
    /// # Arguments
    /// * `line` - 保存する在庫行
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗
    async fn save(&self, line: &InventoryLine) -> Result<(), RepositoryError>;
}

/// クーポンリポジトリトレイト
/// クーポンレジストリの読み取りを抽象化する
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// クーポンコードでクーポンを検索する
    /// コードは大文字小文字を区別せずに照合される
    ///
    /// # Arguments
    /// * `code` - 検索するクーポンコード
    ///
    /// # Returns
    /// * `Ok(Some(Coupon))` - クーポンが見つかった
    /// * `Ok(None)` - クーポンが見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError>;
}

/// 通知エラー
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Notification failed: {0}")]
    NotificationFailed(String),
}

/// 注文通知トレイト
/// 注文イベントの外部への通知を抽象化するポート。
/// 通知の失敗は注文処理の成否に影響させない（呼び出し側でログのみ）
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// ドメインイベントを通知する
    async fn notify(&self, event: DomainEvent) -> Result<(), NotifierError>;
}
