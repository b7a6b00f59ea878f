use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

use super::types::{AppConfig, ToolchainConfig};

pub const DEFAULT_CONFIG_FILE: &str = "covwatch.toml";

/// Load config from `path` (which must exist) or from `covwatch.toml` in the
/// working directory when present, then apply environment overrides.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(path, |key| std::env::var(key).ok())
}

pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.to_path_buf()));
            }
            read_file(p)?
        }
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if p.exists() {
                read_file(&p)?
            } else {
                AppConfig::default()
            }
        }
    };

    apply_env_overrides(&mut cfg, env)?;
    Ok(cfg)
}

pub fn parse_str(s: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str::<AppConfig>(s).map_err(ConfigError::Parse)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&s)
}

fn apply_env_overrides<F>(cfg: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = env_parse::<u16, _>(&env, "PORT")? {
        cfg.server.port = port;
    }
    if let Some(v) = env_value(&env, "COVWATCH_HOST") {
        cfg.server.host = v;
    }
    if let Some(ms) = env_parse::<u64, _>(&env, "COVWATCH_DEBOUNCE_MS")? {
        cfg.watch.debounce_ms = ms;
    }
    if let Some(max) = env_parse::<usize, _>(&env, "COVWATCH_MAX_CAPTURE_BYTES")? {
        cfg.capture.max_bytes = Some(max);
    }
    Ok(())
}

fn env_value<F>(env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T, F>(env: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env_value(env, key) {
        None => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|_| ConfigError::EnvInvalid {
            key: key.to_string(),
            value: v,
        }),
    }
}

impl AppConfig {
    /// Add the rolled log files to `watch.ignore` when they land inside the
    /// watched directory, so log writes never re-trigger a run.
    pub fn ignore_log_file(&mut self) {
        let Some(file) = self.logging.file.as_deref() else {
            return;
        };
        let Some(rel) = path_under(file, &self.watch.dir) else {
            return;
        };
        // the appender suffixes the file name with the date
        let pattern = format!("{}*", glob::Pattern::escape(&rel.to_string_lossy()));
        if !self.watch.ignore.contains(&pattern) {
            self.watch.ignore.push(pattern);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "watch.debounce_ms must be greater than zero".into(),
            ));
        }
        if self.capture.max_bytes == Some(0) {
            return Err(ConfigError::Validation(
                "capture.max_bytes must be greater than zero when set".into(),
            ));
        }
        match &self.toolchain {
            ToolchainConfig::Go(go) if go.go_bin.trim().is_empty() => Err(
                ConfigError::Validation("toolchain.go_bin must not be empty".into()),
            ),
            ToolchainConfig::Command(cmd)
                if cmd.test.program.trim().is_empty() || cmd.convert.program.trim().is_empty() =>
            {
                Err(ConfigError::Validation(
                    "toolchain.test.program and toolchain.convert.program are required".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// `file` relative to `root`, if it lives under it. Both are resolved against
/// the filesystem; a missing directory yields `None`.
fn path_under(file: &Path, root: &Path) -> Option<PathBuf> {
    let name = file.file_name()?;
    let parent = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let parent = std::fs::canonicalize(parent).ok()?;
    let root = std::fs::canonicalize(root).ok()?;
    parent
        .join(name)
        .strip_prefix(&root)
        .ok()
        .map(Path::to_path_buf)
}
