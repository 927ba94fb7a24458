//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    /// Issue groups currently stored, `None` when the store is unreadable.
    pub issue_groups: Option<usize>,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    match state.store.scan_issue_groups().await {
        Ok(groups) => Json(Health {
            status: "ok".to_string(),
            issue_groups: Some(groups.len()),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Report store unreadable");
            Json(Health {
                status: "degraded".to_string(),
                issue_groups: None,
            })
        }
    }
}
