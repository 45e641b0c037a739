use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use flickgram::config::{AppState, Config};
use flickgram::middleware::rate_limiter::RateLimiter;
use flickgram::services::scraper_service::FlickrScraper;
use flickgram::{build_app, seeders};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::init()?;
    tracing::info!("Starting Flickgram...");

    // 1. Database Connection
    let db = Database::connect(&cfg.database_url).await?;
    tracing::info!("Database connected");

    // 2. Schema
    if cfg.auto_migrate {
        Migrator::up(&db, None).await?;
        tracing::info!("Migrations applied");
    }

    // 3. Database Seeding
    if let Err(e) = seeders::run_seeders(&db).await {
        tracing::error!("Seeding failed: {}", e);
    }

    // 4. Build App State
    let state = AppState {
        db,
        photo_source: Arc::new(FlickrScraper::new()),
        rate_limiter: Arc::new(RateLimiter::from_config(&cfg)),
        config: cfg.clone(),
    };

    // 5. Start Server
    let addr: SocketAddr = format!("{}:{}", cfg.server_host, cfg.server_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server ready! Listening on http://{}", addr);

    axum::serve(
        listener,
        build_app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
