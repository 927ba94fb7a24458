//! Alarm health dashboard.
//!
//! Serves the issues and descriptions widgets as HTML fragments, plus an
//! index page that loads both via HTMX.

mod config;
mod error;
mod links;
mod render;
mod routes;
mod state;

use std::sync::Arc;

use report_store::ReportDatabase;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::links::ConsoleLinks;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting alarm dashboard");

    // Connect to the report store
    let db = ReportDatabase::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(
        Arc::new(db),
        ConsoleLinks::new(config.console_domain.clone()),
        config.widget_timeout,
    );

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Alarm dashboard listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
