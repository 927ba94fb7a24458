//! Route handlers for the dashboard.

pub mod health;
pub mod index;
pub mod widgets;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(index::index_page))
        // Widget fragments
        .route("/widgets/issues", get(widgets::issues_widget))
        .route("/widgets/descriptions", get(widgets::descriptions_widget))
        // Health check
        .route("/health", get(health::health))
}
