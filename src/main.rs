use store_order_management::adapter::driven::{
    ConsoleLogger, ConsoleOrderNotifier, MySqlCouponRepository, MySqlInventoryRepository,
    MySqlOrderRepository,
};
use store_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use store_order_management::adapter::{DatabaseConfig, DatabaseMigration};
use store_order_management::application::service::{
    InventoryApplicationService, OrderApplicationService, OrderQueryService,
};
use store_order_management::domain::service::CouponEvaluator;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 店舗注文管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQLリポジトリを作成
    let order_repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
    let inventory_repository = Arc::new(MySqlInventoryRepository::new(pool.clone()));

    // 通知とロガーを作成
    let notifier = Arc::new(ConsoleOrderNotifier::new());
    let logger = Arc::new(ConsoleLogger::new());

    // アプリケーションサービスを作成
    let order_service = OrderApplicationService::new(
        order_repository.clone(),
        inventory_repository.clone(),
        CouponEvaluator::new(Arc::new(MySqlCouponRepository::new(pool.clone()))),
        notifier,
        logger,
    );

    let order_query_service = OrderQueryService::new(order_repository);
    let inventory_service = InventoryApplicationService::new(inventory_repository);

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        order_service: Arc::new(order_service),
        order_query_service: Arc::new(order_query_service),
        inventory_service: Arc::new(inventory_service),
        coupon_evaluator: Arc::new(CouponEvaluator::new(Arc::new(MySqlCouponRepository::new(
            pool,
        )))),
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("REST APIサーバーが起動しました: http://localhost:3000");
    println!("ヘルスチェック: GET http://localhost:3000/health");
    println!("API仕様:");
    println!("  POST /orders - 注文作成（カート明細＋受け渡し方法＋クーポン）");
    println!("  GET  /orders?store_id=...&status=... - 注文一覧取得");
    println!("  GET  /orders/:id - 注文詳細取得");
    println!("  POST /orders/:id/status - 注文ステータス遷移");
    println!("  POST /coupons/evaluate - クーポン評価（割引プレビュー）");
    println!("  GET  /inventory?store_id=... - 販売可能在庫一覧取得");
    println!("  POST /inventory - 在庫登録（新規追加・補充）");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
