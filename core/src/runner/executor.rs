use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::RunError;
use crate::state::ReportState;

use super::drain::{drain_into_state, StreamKind};
use super::exit::normalize_exit;
use super::toolchain::{CommandSpec, CoverageToolchain};

const TEMP_PREFIX: &str = "covwatch-";
const CONVERT_STDERR_TAIL: usize = 2048;
/// How long the output readers may keep going once the test process has
/// exited. A background grandchild can hold the pipes open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub run_id: u64,
    pub exit_code: i32,
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
    pub report_bytes: usize,
    pub elapsed: Duration,
}

/// Performs one test-and-convert cycle at a time against the shared state.
pub struct RunExecutor {
    state: Arc<ReportState>,
    toolchain: Arc<dyn CoverageToolchain>,
    extra_args: Vec<String>,
    workdir: Option<PathBuf>,
}

impl RunExecutor {
    pub fn new(state: Arc<ReportState>, toolchain: Arc<dyn CoverageToolchain>) -> Self {
        Self {
            state,
            toolchain,
            extra_args: Vec::new(),
            workdir: None,
        }
    }

    /// Arguments appended verbatim to the test command.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Directory both commands run in; defaults to the process cwd.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn state(&self) -> &Arc<ReportState> {
        &self.state
    }

    /// Run once and log the result. Never fails: the next trigger starts a
    /// fresh run.
    pub async fn run_logged(&self) {
        match self.run_once().await {
            Ok(outcome) => info!(
                target: "covwatch.runner",
                run_id = outcome.run_id,
                stdout_bytes = outcome.stdout_bytes,
                stderr_bytes = outcome.stderr_bytes,
                report_bytes = outcome.report_bytes,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "coverage report published"
            ),
            Err(err @ (RunError::TestsFailed { .. } | RunError::ConvertFailed { .. })) => warn!(
                target: "covwatch.runner",
                toolchain = self.toolchain.name(),
                error = %err,
                "run finished without a report"
            ),
            Err(err) => error!(
                target: "covwatch.runner",
                toolchain = self.toolchain.name(),
                error = %err,
                source = ?std::error::Error::source(&err),
                "run aborted"
            ),
        }
    }

    pub async fn run_once(&self) -> Result<RunOutcome, RunError> {
        let started = Instant::now();
        let run_id = self.state.begin_run();

        let profile = temp_file("profile", ".out")?;
        let mut test = self.toolchain.test_command(profile.path());
        test.args.extend(self.extra_args.iter().cloned());
        self.apply_workdir(&mut test);
        info!(
            target: "covwatch.runner",
            run_id,
            program = %test.program,
            args = ?test.args,
            "RUN"
        );

        let mut child = test
            .to_command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: test.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(RunError::MissingPipe { stream: "stdout" })?;
        let stderr = child
            .stderr
            .take()
            .ok_or(RunError::MissingPipe { stream: "stderr" })?;
        let stdout_task = tokio::spawn(drain_into_state(
            stdout,
            StreamKind::Stdout,
            Arc::clone(&self.state),
        ));
        let stderr_task = tokio::spawn(drain_into_state(
            stderr,
            StreamKind::Stderr,
            Arc::clone(&self.state),
        ));

        let status = child.wait().await.map_err(|source| RunError::Wait {
            program: test.program.clone(),
            source,
        })?;
        // The pipes may still hold output after exit.
        let drain_deadline = tokio::time::Instant::now() + DRAIN_GRACE;
        let stdout_bytes = join_drain(stdout_task, StreamKind::Stdout, drain_deadline, run_id).await?;
        let stderr_bytes = join_drain(stderr_task, StreamKind::Stderr, drain_deadline, run_id).await?;

        let exit_code = normalize_exit(status);
        if !status.success() {
            return Err(RunError::TestsFailed { code: exit_code });
        }

        let html = temp_file("report", ".html")?;
        let mut convert = self.toolchain.convert_command(profile.path(), html.path());
        self.apply_workdir(&mut convert);
        info!(
            target: "covwatch.runner",
            run_id,
            program = %convert.program,
            args = ?convert.args,
            "RUN"
        );

        let output = convert
            .to_command()
            .output()
            .await
            .map_err(|source| RunError::Spawn {
                program: convert.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(RunError::ConvertFailed {
                code: normalize_exit(output.status),
                stderr: lossy_tail(&output.stderr, CONVERT_STDERR_TAIL),
            });
        }

        let report = tokio::fs::read(html.path())
            .await
            .map_err(|source| RunError::ReadReport {
                path: html.path().to_path_buf(),
                source,
            })?;
        let report_bytes = report.len();
        self.state.complete_run(report);

        Ok(RunOutcome {
            run_id,
            exit_code,
            stdout_bytes,
            stderr_bytes,
            report_bytes,
            elapsed: started.elapsed(),
        })
    }

    fn apply_workdir(&self, spec: &mut CommandSpec) {
        if spec.cwd.is_none() {
            spec.cwd = self.workdir.clone();
        }
    }
}

fn temp_file(purpose: &'static str, suffix: &str) -> Result<NamedTempFile, RunError> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(suffix)
        .tempfile()
        .map_err(|source| RunError::TempFile { purpose, source })
}

/// Wait for a drain task until `deadline`, then abort it. Output read before
/// the abort stays in the shared state; the returned count is then zero.
async fn join_drain(
    mut task: JoinHandle<u64>,
    stream: StreamKind,
    deadline: tokio::time::Instant,
    run_id: u64,
) -> Result<u64, RunError> {
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(joined) => joined.map_err(|source| RunError::DrainJoin {
            stream: stream.as_str(),
            source,
        }),
        Err(_) => {
            task.abort();
            warn!(
                target: "covwatch.runner",
                run_id,
                stream = stream.as_str(),
                grace_ms = DRAIN_GRACE.as_millis() as u64,
                "output pipe still open after exit, detaching reader"
            );
            Ok(0)
        }
    }
}

fn lossy_tail(bytes: &[u8], max: usize) -> String {
    let start = bytes.len().saturating_sub(max);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}
