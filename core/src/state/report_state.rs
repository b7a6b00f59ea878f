//! Process-wide report state shared between the run executor (the only
//! writer) and the HTTP server (concurrent readers).
//!
//! Every operation takes the lock once, so readers always observe whole
//! chunks and a `begin_run` is never half-applied.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

#[derive(Debug, Default)]
struct Inner {
    started: bool,
    run_id: u64,
    report: Option<Bytes>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    stdout_dropped: u64,
    stderr_dropped: u64,
}

/// Point-in-time copy of the state taken under one read lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub started: bool,
    pub run_id: u64,
    pub report: Option<Bytes>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_dropped: u64,
    pub stderr_dropped: u64,
}

#[derive(Debug, Default)]
pub struct ReportState {
    inner: RwLock<Inner>,
    max_capture_bytes: Option<usize>,
}

impl ReportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max` of the newest bytes per stream.
    pub fn with_capture_limit(max: Option<usize>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_capture_bytes: max,
        }
    }

    /// Drop the previous report and output, returning the new run id.
    pub fn begin_run(&self) -> u64 {
        let mut inner = self.write();
        inner.started = true;
        inner.run_id += 1;
        inner.report = None;
        inner.stdout.clear();
        inner.stderr.clear();
        inner.stdout_dropped = 0;
        inner.stderr_dropped = 0;
        inner.run_id
    }

    pub fn append_stdout(&self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let mut inner = self.write();
        let Inner {
            stdout,
            stdout_dropped,
            ..
        } = &mut *inner;
        *stdout_dropped += append_capped(stdout, chunk, self.max_capture_bytes);
    }

    pub fn append_stderr(&self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let mut inner = self.write();
        let Inner {
            stderr,
            stderr_dropped,
            ..
        } = &mut *inner;
        *stderr_dropped += append_capped(stderr, chunk, self.max_capture_bytes);
    }

    pub fn complete_run(&self, report: impl Into<Bytes>) {
        self.write().report = Some(report.into());
    }

    pub fn snapshot(&self) -> ReportSnapshot {
        let inner = self.read();
        ReportSnapshot {
            started: inner.started,
            run_id: inner.run_id,
            report: inner.report.clone(),
            stdout: inner.stdout.clone(),
            stderr: inner.stderr.clone(),
            stdout_dropped: inner.stdout_dropped,
            stderr_dropped: inner.stderr_dropped,
        }
    }

    // Poisoning is ignored: every write leaves the buffers usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Append `chunk`, trimming the front of `buf` so it stays within `max`.
/// Returns the number of bytes discarded.
fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], max: Option<usize>) -> u64 {
    let Some(max) = max else {
        buf.extend_from_slice(chunk);
        return 0;
    };

    if chunk.len() >= max {
        let dropped = buf.len() + (chunk.len() - max);
        buf.clear();
        buf.extend_from_slice(&chunk[chunk.len() - max..]);
        return dropped as u64;
    }

    let overflow = (buf.len() + chunk.len()).saturating_sub(max);
    if overflow > 0 {
        buf.drain(..overflow);
    }
    buf.extend_from_slice(chunk);
    overflow as u64
}
