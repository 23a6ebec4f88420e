use chrono::{DateTime, Utc};
use crate::domain::model::{Money, OrderId, OrderNumber, OrderStatus, StoreId};

/// ドメインイベント列挙型
/// ビジネス上の重要なイベントを表現する
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// 注文が作成された
    OrderCreated(OrderCreated),
    /// 注文のステータスが変更された
    OrderStatusChanged(OrderStatusChanged),
}

/// 注文作成イベント
/// 在庫減算と注文永続化が確定した後に発行される
#[derive(Debug, Clone)]
pub struct OrderCreated {
    /// 注文ID
    pub order_id: OrderId,
    /// 注文番号
    pub order_number: OrderNumber,
    /// 店舗ID
    pub store_id: StoreId,
    /// 合計金額
    pub total: Money,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl OrderCreated {
    /// 新しい注文作成イベントを作成
    pub fn new(order_id: OrderId, order_number: OrderNumber, store_id: StoreId, total: Money) -> Self {
        Self {
            order_id,
            order_number,
            store_id,
            total,
            occurred_at: Utc::now(),
        }
    }
}

/// 注文ステータス変更イベント
#[derive(Debug, Clone)]
pub struct OrderStatusChanged {
    /// 注文ID
    pub order_id: OrderId,
    /// 変更前のステータス
    pub from: OrderStatus,
    /// 変更後のステータス
    pub to: OrderStatus,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl OrderStatusChanged {
    /// 新しいステータス変更イベントを作成
    pub fn new(order_id: OrderId, from: OrderStatus, to: OrderStatus) -> Self {
        Self {
            order_id,
            from,
            to,
            occurred_at: Utc::now(),
        }
    }
}
