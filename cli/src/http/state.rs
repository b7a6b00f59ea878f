use std::sync::Arc;

use covwatch_core::api::ReportState;

/// Shared by every request handler; only ever reads the report state.
#[derive(Clone)]
pub struct AppState {
    pub report: Arc<ReportState>,
}

impl AppState {
    pub fn new(report: Arc<ReportState>) -> Self {
        Self { report }
    }
}
