//! Error types for widget rendering.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while producing a widget.
///
/// None of these reach the dashboard host as a failed request; the widget
/// routes turn them into an error fragment.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Reading the report store failed.
    #[error("Report store error: {0}")]
    Store(#[from] report_store::StoreError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The widget did not finish within its budget.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;
