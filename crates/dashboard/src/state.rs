//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use report_store::ReportStore;

use crate::links::ConsoleLinks;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Report store the widgets read from.
    pub store: Arc<dyn ReportStore>,
    /// Deep link builder.
    pub links: ConsoleLinks,
    /// Budget for rendering one widget.
    pub widget_timeout: Duration,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn ReportStore>, links: ConsoleLinks, widget_timeout: Duration) -> Self {
        Self {
            store,
            links,
            widget_timeout,
        }
    }
}
