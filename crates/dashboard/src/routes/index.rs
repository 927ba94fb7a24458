//! Index page embedding both widgets.

use askama::Template;
use axum::response::Html;
use tracing::error;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub refresh_secs: u64,
}

/// Render the index page.
pub async fn index_page() -> Html<String> {
    match (IndexTemplate { refresh_secs: 300 }).render() {
        Ok(html) => Html(html),
        Err(e) => {
            error!(error = %e, "Index page failed to render");
            Html("<p>Dashboard unavailable.</p>".to_string())
        }
    }
}
