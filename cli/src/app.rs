use std::sync::Arc;

use covwatch_core::api::{
    spawn_watch_task, AppConfig, CliError, ReportState, RunExecutor,
};
use covwatch_plugins::build_toolchain;
use tracing::info;

use crate::commands::cli::Args;
use crate::http::{server, AppState};

/// Load and validate config: file, then environment, then flags.
pub fn resolve_config(args: &Args) -> Result<AppConfig, CliError> {
    let mut cfg = covwatch_core::config::load(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);
    cfg.ignore_log_file();
    cfg.validate()?;
    Ok(cfg)
}

/// Wire the pipeline together and serve until shutdown.
pub async fn run_app(args: Args, cfg: AppConfig) -> Result<(), CliError> {
    let report = Arc::new(ReportState::with_capture_limit(cfg.capture.max_bytes));
    let toolchain = build_toolchain(&cfg);
    info!(
        toolchain = toolchain.name(),
        dir = %cfg.watch.dir.display(),
        extra_args = ?args.test_args,
        max_capture_bytes = ?cfg.capture.max_bytes,
        "starting covwatch"
    );

    let executor = Arc::new(
        RunExecutor::new(Arc::clone(&report), toolchain)
            .with_extra_args(args.test_args)
            .with_workdir(cfg.watch.dir.clone()),
    );
    let watch_task = spawn_watch_task(&cfg.watch, executor)?;

    let result = server::start_server(&cfg.server, AppState::new(report)).await;
    watch_task.abort();
    result.map_err(CliError::Server)
}
