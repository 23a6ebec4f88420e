// 駆動される側アダプター（リポジトリ実装など）

mod console_logger;
mod console_notifier;
mod coupon_repository;
mod inventory_repository;
mod order_repository;

pub use console_logger::ConsoleLogger;
pub use console_notifier::ConsoleOrderNotifier;
pub use coupon_repository::MySqlCouponRepository;
pub use inventory_repository::MySqlInventoryRepository;
pub use order_repository::MySqlOrderRepository;
