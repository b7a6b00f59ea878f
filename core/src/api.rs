//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `covwatch_core::api` instead of reaching into internal modules.

pub use crate::config::{
    AppConfig, CaptureConfig, CommandTemplate, CommandToolchainConfig, GoToolchainConfig,
    LoggingConfig, ServerConfig, ToolchainConfig, WatchConfig,
};
pub use crate::error::{CliError, ConfigError, RunError, WatchError};
pub use crate::runner::{CommandSpec, CoverageToolchain, RunExecutor, RunOutcome};
pub use crate::state::{ReportSnapshot, ReportState};
pub use crate::watcher::{spawn_watch_task, watch_loop, WatchSignal};
