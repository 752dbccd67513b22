use event_ticket_inventory::adapter::driven::{InMemoryTicketRepository, MySqlTicketRepository};
use event_ticket_inventory::adapter::driver::rest_api::{create_router, AppState};
use event_ticket_inventory::adapter::telemetry::setup_tracing;
use event_ticket_inventory::adapter::{AppConfig, DatabaseConfig, DatabaseMigration, StoreBackend};
use event_ticket_inventory::domain::port::TicketRepository;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    setup_tracing();
    info!("イベントチケット在庫管理 REST API を起動します");

    let config = AppConfig::from_env()?;
    info!(
        max_attempts = config.inventory.max_attempts,
        retry_delay_ms = config.inventory.retry_delay.as_millis() as u64,
        operation_timeout_ms = config.inventory.operation_timeout.as_millis() as u64,
        "在庫制御の設定を読み込みました"
    );

    let ticket_repository: Arc<dyn TicketRepository> = match config.store_backend {
        StoreBackend::MySql => {
            let db_config = DatabaseConfig::from_env()?;
            info!(host = %db_config.host, port = db_config.port, "データベース設定を読み込みました");

            // 接続はリクエストごとにプールから取得・返却される
            let pool = MySqlPoolOptions::new()
                .max_connections(db_config.max_connections)
                .acquire_timeout(db_config.acquire_timeout)
                .connect(&db_config.connection_string())
                .await?;
            info!("データベース接続プールを作成しました");

            DatabaseMigration::new(pool.clone()).run().await?;

            Arc::new(MySqlTicketRepository::new(pool))
        }
        StoreBackend::Memory => {
            warn!("インメモリストアを使用します。再起動するとデータは失われます");
            Arc::new(InMemoryTicketRepository::new())
        }
    };

    let app_state = AppState::new(ticket_repository, config.inventory.clone());

    // REST APIルーターを作成
    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    info!(addr = %config.server_addr, "REST APIサーバーが起動しました");

    axum::serve(listener, app).await?;

    Ok(())
}
