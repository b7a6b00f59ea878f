mod debounce;
mod fs;

pub use debounce::{watch_loop, DebounceState, Debouncer};
pub use fs::{FsWatcher, PathFilter, WatchSignal};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::runner::RunExecutor;

/// Start watching `cfg.dir` and spawn the loop that runs `executor` on every
/// debounced trigger, including once shortly after startup.
///
/// Watcher setup errors are returned; everything after that is logged.
pub fn spawn_watch_task(
    cfg: &WatchConfig,
    executor: Arc<RunExecutor>,
) -> Result<JoinHandle<()>, WatchError> {
    let (watcher, signals) = FsWatcher::spawn(cfg)?;
    let interval = Duration::from_millis(cfg.debounce_ms);
    info!(
        target: "covwatch.watcher",
        dir = %watcher.root().display(),
        recursive = cfg.recursive,
        debounce_ms = cfg.debounce_ms,
        "watching for changes"
    );

    Ok(tokio::spawn(async move {
        // keep the OS watcher alive for as long as the loop runs
        let _watcher = watcher;
        watch_loop(signals, interval, || executor.run_logged()).await;
    }))
}
