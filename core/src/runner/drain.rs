use std::io::ErrorKind;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::state::ReportState;

pub const READ_CHUNK_BYTES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// Copy `reader` into the matching buffer of `state` chunk by chunk until
/// EOF. A read error ends this stream only. Returns the bytes copied.
pub async fn drain_into_state<R>(mut reader: R, stream: StreamKind, state: Arc<ReportState>) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    let mut total = 0u64;
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                match stream {
                    StreamKind::Stdout => state.append_stdout(&buf[..n]),
                    StreamKind::Stderr => state.append_stderr(&buf[..n]),
                }
                total += n as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(
                    target: "covwatch.runner",
                    stream = stream.as_str(),
                    bytes = total,
                    error = %e,
                    "output reader failed"
                );
                break;
            }
        }
    }
    total
}
