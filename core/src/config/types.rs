use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 6066;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_watch_dir")]
    pub dir: PathBuf,

    /// Quiet period after the last change before a run starts.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub recursive: bool,

    /// Glob patterns (relative to `dir`) whose changes never trigger a run.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_ignore() -> Vec<String> {
    vec![
        ".git/**".to_string(),
        "**/*.swp".to_string(),
        "**/*~".to_string(),
    ]
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            dir: default_watch_dir(),
            debounce_ms: default_debounce_ms(),
            recursive: false,
            ignore: default_ignore(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Per-stream cap on captured output; unset keeps everything.
    #[serde(default)]
    pub max_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum ToolchainConfig {
    #[serde(rename = "go")]
    Go(GoToolchainConfig),

    #[serde(rename = "command")]
    Command(CommandToolchainConfig),
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig::Go(GoToolchainConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoToolchainConfig {
    #[serde(default = "default_go_bin")]
    pub go_bin: String,
}

fn default_go_bin() -> String {
    "go".to_string()
}

impl Default for GoToolchainConfig {
    fn default() -> Self {
        Self {
            go_bin: default_go_bin(),
        }
    }
}

/// Arbitrary test/convert commands. `{profile}` and `{html}` in args are
/// replaced with the run's temporary file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandToolchainConfig {
    pub test: CommandTemplate,
    pub convert: CommandTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandTemplate {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a daily rolling file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}
