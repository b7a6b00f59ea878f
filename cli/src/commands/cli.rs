use std::path::PathBuf;

use clap::Parser;
use covwatch_core::api::AppConfig;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "covwatch",
    version,
    about = "Re-run tests with coverage whenever the source directory changes and serve the HTML report",
    long_about = None
)]
pub struct Args {
    /// Config file; defaults to ./covwatch.toml when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch and run the tests in.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Listen port; overrides config and $PORT.
    #[arg(long)]
    pub port: Option<u16>,

    /// Extra arguments forwarded verbatim to the test command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TEST_ARGS")]
    pub test_args: Vec<String>,
}

impl Args {
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(dir) = &self.dir {
            cfg.watch.dir = dir.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
    }
}
