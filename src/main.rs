//! multischema server: binds the router and wires the PostgreSQL provisioner.

use multischema::{
    app_router, ensure_database_exists, AppState, ModelBlueprint, ModelCache, PgProvisioner,
    ServiceConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("multischema=info".parse()?))
        .init();

    let config = ServiceConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let state = AppState {
        provisioner: Arc::new(PgProvisioner::new(pool)),
        models: Arc::new(ModelCache::new()),
        blueprint: Arc::new(ModelBlueprint::application_default()),
        environment: config.environment,
    };

    let app = app_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(environment = ?config.environment, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
