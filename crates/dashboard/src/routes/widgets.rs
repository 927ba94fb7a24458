//! Widget fragment routes.
//!
//! Each widget reads the store and renders independently within the
//! configured budget. Failures and timeouts produce the error fragment,
//! never a partial table or a failed request.

use std::future::Future;

use axum::extract::State;
use axum::response::Html;
use tracing::error;

use crate::error::{Result, WidgetError};
use crate::render;
use crate::state::AppState;

/// Render the issues widget.
pub async fn issues_widget(State(state): State<AppState>) -> Html<String> {
    bounded(&state, "Issues", async {
        let groups = state.store.scan_issue_groups().await?;
        render::render_issues(&groups, &state.links)
    })
    .await
}

/// Render the descriptions widget.
pub async fn descriptions_widget(State(state): State<AppState>) -> Html<String> {
    bounded(&state, "Descriptions", async {
        let records = state.store.scan_descriptions().await?;
        render::render_descriptions(&records, &state.links)
    })
    .await
}

async fn bounded<F>(state: &AppState, title: &str, widget: F) -> Html<String>
where
    F: Future<Output = Result<String>>,
{
    let result = match tokio::time::timeout(state.widget_timeout, widget).await {
        Ok(result) => result,
        Err(_) => Err(WidgetError::Timeout(state.widget_timeout)),
    };

    match result {
        Ok(html) => Html(html),
        Err(e) => {
            error!(widget = title, error = %e, "Widget failed");
            Html(render::render_error(title, &e))
        }
    }
}
