mod report_state;

pub use report_state::{ReportSnapshot, ReportState};
