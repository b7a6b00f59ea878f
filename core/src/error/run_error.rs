// core/src/error/run_error.rs
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to create temporary {purpose} file")]
    TempFile {
        purpose: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn process: {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("child process has no {stream} pipe")]
    MissingPipe { stream: &'static str },

    #[error("failed to wait for process: {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stream} drain task did not finish cleanly")]
    DrainJoin {
        stream: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("test command failed: code={code}")]
    TestsFailed { code: i32 },

    #[error("report conversion failed: code={code}: {stderr}")]
    ConvertFailed { code: i32, stderr: String },

    #[error("failed to read converted report: {}", path.display())]
    ReadReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
