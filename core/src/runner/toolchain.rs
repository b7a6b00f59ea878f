use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// One external command invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build a `tokio` command with null stdin. Children are killed if the
    /// handle is dropped before they exit.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// The pair of external tools a run invokes: a coverage-instrumented test
/// command and a profile-to-HTML converter.
pub trait CoverageToolchain: Send + Sync {
    fn name(&self) -> &str;

    /// Run the tests, writing the coverage profile to `profile`.
    fn test_command(&self, profile: &Path) -> CommandSpec;

    /// Render `profile` as HTML into `html_out`.
    fn convert_command(&self, profile: &Path, html_out: &Path) -> CommandSpec;
}
