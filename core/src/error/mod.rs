mod config_error;
mod run_error;
mod watch_error;

pub use config_error::ConfigError;
pub use run_error::RunError;
pub use watch_error::WatchError;

use thiserror::Error;

/// Errors that stop the binary at startup. Anything that happens once the
/// pipeline is running is logged and recovered instead.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error("http server error: {0}")]
    Server(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn server_error_keeps_io_source() {
        let err = CliError::Server(io::Error::new(io::ErrorKind::AddrInUse, "port 6066 taken"));

        assert_eq!(err.to_string(), "http server error: port 6066 taken");
        let source = err
            .source()
            .and_then(|s| s.downcast_ref::<io::Error>())
            .expect("io source");
        assert_eq!(source.kind(), io::ErrorKind::AddrInUse);
    }
}
