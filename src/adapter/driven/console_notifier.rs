use crate::domain::event::DomainEvent;
use crate::domain::port::{NotifierError, OrderNotifier};
use async_trait::async_trait;

/// コンソール注文通知
/// 注文イベントをコンソールに出力する。
/// 実運用ではメールやプッシュ通知のゲートウェイに置き換わる想定
pub struct ConsoleOrderNotifier;

impl ConsoleOrderNotifier {
    /// 新しいコンソール注文通知を作成
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleOrderNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderNotifier for ConsoleOrderNotifier {
    async fn notify(&self, event: DomainEvent) -> Result<(), NotifierError> {
        match event {
            DomainEvent::OrderCreated(e) => {
                println!("📦 [通知] 注文作成");
                println!("  注文ID: {}", e.order_id);
                println!("  注文番号: {}", e.order_number);
                println!("  店舗ID: {}", e.store_id);
                println!("  合計金額: {}セント", e.total.amount());
                println!("  発生日時: {}", e.occurred_at.format("%Y-%m-%d %H:%M:%S"));
            }
            DomainEvent::OrderStatusChanged(e) => {
                println!("🔄 [通知] 注文ステータス変更");
                println!("  注文ID: {}", e.order_id);
                println!("  遷移: {} -> {}", e.from, e.to);
                println!("  発生日時: {}", e.occurred_at.format("%Y-%m-%d %H:%M:%S"));
            }
        }
        println!(); // 空行を追加
        Ok(())
    }
}
