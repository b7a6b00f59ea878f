//! Bridge from `notify` callbacks into a tokio channel of watch signals.

use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::WatchConfig;
use crate::error::WatchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    Changed(Vec<PathBuf>),
    Error(String),
}

/// Decides which filesystem events count as source changes.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    ignore: Vec<Pattern>,
}

impl PathFilter {
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self, WatchError> {
        let ignore = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| WatchError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        Ok(Self { root, ignore })
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let rel: PathBuf = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .skip_while(|c| matches!(c, Component::CurDir))
            .collect();
        self.ignore.iter().any(|p| p.matches_path(&rel))
    }

    /// `None` when the event should not re-arm the debounce timer.
    pub fn classify(&self, event: &Event) -> Option<Vec<PathBuf>> {
        if matches!(event.kind, EventKind::Access(_)) {
            return None;
        }
        if event.paths.is_empty() {
            return Some(Vec::new());
        }
        let paths: Vec<PathBuf> = event
            .paths
            .iter()
            .filter(|p| !self.is_ignored(p))
            .cloned()
            .collect();
        if paths.is_empty() {
            None
        } else {
            Some(paths)
        }
    }
}

/// Owns the OS watcher; dropping it closes the signal channel.
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FsWatcher {
    pub fn spawn(cfg: &WatchConfig) -> Result<(Self, UnboundedReceiver<WatchSignal>), WatchError> {
        // watch the resolved path so event paths line up with the filter root
        let dir = std::fs::canonicalize(&cfg.dir).map_err(|e| WatchError::Watch {
            path: cfg.dir.clone(),
            source: notify::Error::io(e),
        })?;
        let filter = PathFilter::new(&dir, &cfg.ignore)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let signal = match res {
                Ok(event) => match filter.classify(&event) {
                    Some(paths) => WatchSignal::Changed(paths),
                    None => return,
                },
                Err(err) => WatchSignal::Error(err.to_string()),
            };
            // receiver gone means the loop has stopped
            let _ = tx.send(signal);
        })
        .map_err(WatchError::Init)?;

        let mode = if cfg.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&dir, mode)
            .map_err(|source| WatchError::Watch {
                path: cfg.dir.clone(),
                source,
            })?;

        Ok((
            Self {
                _watcher: watcher,
                root: dir,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::time::Duration;

    fn filter(root: &Path) -> PathFilter {
        PathFilter::new(root, &WatchConfig::default().ignore).unwrap()
    }

    #[test]
    fn ignores_access_events() {
        let dir = tempfile::tempdir().unwrap();
        let f = filter(dir.path());
        let event = Event::new(EventKind::Access(AccessKind::Any)).add_path(dir.path().join("a.go"));
        assert_eq!(f.classify(&event), None);
    }

    #[test]
    fn keeps_source_changes() {
        let dir = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        let f = filter(dir.path());
        let path = root.join("main.go");
        let event = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());
        assert_eq!(f.classify(&event), Some(vec![path]));
    }

    #[test]
    fn drops_ignored_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        let f = filter(dir.path());

        assert!(f.is_ignored(&root.join(".git/index")));
        assert!(f.is_ignored(&root.join("pkg/.main.go.swp")));
        assert!(!f.is_ignored(&root.join("pkg/main.go")));

        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(root.join(".git/index"))
            .add_path(root.join("util.go"));
        assert_eq!(f.classify(&event), Some(vec![root.join("util.go")]));

        let only_ignored = Event::new(EventKind::Create(CreateKind::File)).add_path(root.join(".git/HEAD"));
        assert_eq!(f.classify(&only_ignored), None);
    }

    #[test]
    fn relative_event_paths_still_match_ignores() {
        let f = filter(Path::new("."));
        assert!(f.is_ignored(Path::new("./.git/index")));
        assert!(!f.is_ignored(Path::new("./main.go")));
    }

    #[test]
    fn rolled_log_file_does_not_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        let mut cfg = AppConfig::default();
        cfg.watch.dir = dir.path().to_path_buf();
        cfg.logging.file = Some(dir.path().join("covwatch.log"));
        cfg.ignore_log_file();
        let f = PathFilter::new(&cfg.watch.dir, &cfg.watch.ignore).unwrap();

        let log_write = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(root.join("covwatch.log.2026-10-19"));
        assert_eq!(f.classify(&log_write), None);

        let source = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(root.join("main.go"));
        assert_eq!(f.classify(&source), Some(vec![root.join("main.go")]));
    }

    #[test]
    fn pathless_events_count_as_changes() {
        let dir = tempfile::tempdir().unwrap();
        let event = Event::new(EventKind::Any);
        assert_eq!(filter(dir.path()).classify(&event), Some(Vec::new()));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = PathFilter::new(Path::new("."), &["[".to_string()]).unwrap_err();
        assert!(matches!(err, WatchError::InvalidPattern { .. }));
    }

    #[test]
    fn missing_directory_fails_to_watch() {
        let cfg = WatchConfig {
            dir: PathBuf::from("/nonexistent/covwatch-test-dir"),
            ..WatchConfig::default()
        };
        assert!(FsWatcher::spawn(&cfg).is_err());
    }

    #[tokio::test]
    async fn reports_file_writes() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = WatchConfig {
            dir: dir.path().to_path_buf(),
            ..WatchConfig::default()
        };
        let (_watcher, mut rx) = FsWatcher::spawn(&cfg).unwrap();

        std::fs::write(dir.path().join("main.go"), "package main\n").unwrap();

        let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event within timeout")
            .expect("channel closed");
        assert!(matches!(signal, WatchSignal::Changed(_)));
    }
}
