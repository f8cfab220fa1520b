mod config;
mod db;
mod errors;
mod files;
mod identity;
mod models;
mod profile;
mod render;
mod routes;
mod state;
mod tailor;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::files::FileRegistry;
use crate::render::{ChromePdfRenderer, TemplateRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    let templates = Arc::new(TemplateRenderer::new(config.templates_dir.clone()));
    info!("Templates loaded from {}", config.templates_dir.display());

    let pdf = Arc::new(ChromePdfRenderer::new(config.chrome_path.clone()));

    tokio::fs::create_dir_all(&config.generated_dir).await?;
    let registry = Arc::new(FileRegistry::new(
        config.generated_dir.clone(),
        &config.public_app_url,
    ));
    info!(
        "Generated documents stored under {}",
        registry.root().display()
    );

    let tailor = tailor::from_config(&config);
    if tailor.is_none() {
        warn!("No tailoring backend configured; POST /resume/tailor will answer 501");
    }

    // Build app state
    let state = AppState {
        db,
        templates,
        pdf,
        registry,
        tailor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to PUBLIC_APP_URL

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
