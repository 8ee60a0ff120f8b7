use deskserver::api_router::configure_api_routes;
use deskserver::config::AppConfig;
use deskserver::directory::{HeaderIdentity, PgRoleDirectory};
use deskserver::realtime::ChangeFeed;
use deskserver::shared::state::AppState;
use deskserver::shared::utils::{create_conn, run_migrations};
use deskserver::tickets::PgTicketStore;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    let pool = create_conn(&config.database.url)?;
    if let Err(e) = run_migrations(&pool) {
        error!("Failed to run migrations: {}", e);
        return Err(anyhow::anyhow!("Migration failure: {}", e));
    }

    let change_feed = ChangeFeed::default();
    let store = Arc::new(PgTicketStore::new(pool.clone(), change_feed.clone()));
    let directory = Arc::new(PgRoleDirectory::new(pool.clone()));

    let app_state = Arc::new(AppState {
        conn: pool,
        config: Some(config.clone()),
        store,
        directory,
        identity: Arc::new(HeaderIdentity),
        change_feed,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = configure_api_routes().layer(cors).with_state(app_state);

    info!(
        "Starting HTTP server on {}:{}",
        config.server.host, config.server.port
    );
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
