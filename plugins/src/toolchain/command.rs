use std::path::Path;

use covwatch_core::api::{CommandSpec, CommandTemplate, CommandToolchainConfig, CoverageToolchain};

pub const PROFILE_PLACEHOLDER: &str = "{profile}";
pub const HTML_PLACEHOLDER: &str = "{html}";

/// Operator-defined test and convert commands.
pub struct CommandToolchain {
    test: CommandTemplate,
    convert: CommandTemplate,
}

impl CommandToolchain {
    pub fn new(cfg: &CommandToolchainConfig) -> Self {
        Self {
            test: cfg.test.clone(),
            convert: cfg.convert.clone(),
        }
    }
}

impl CoverageToolchain for CommandToolchain {
    fn name(&self) -> &str {
        "command"
    }

    fn test_command(&self, profile: &Path) -> CommandSpec {
        render(&self.test, profile, None)
    }

    fn convert_command(&self, profile: &Path, html_out: &Path) -> CommandSpec {
        render(&self.convert, profile, Some(html_out))
    }
}

fn render(template: &CommandTemplate, profile: &Path, html: Option<&Path>) -> CommandSpec {
    let profile = profile.display().to_string();
    let html = html.map(|p| p.display().to_string());
    CommandSpec::new(&template.program).args(template.args.iter().map(|arg| {
        let arg = arg.replace(PROFILE_PLACEHOLDER, &profile);
        match &html {
            Some(html) => arg.replace(HTML_PLACEHOLDER, html),
            None => arg,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toolchain() -> CommandToolchain {
        CommandToolchain::new(&CommandToolchainConfig {
            test: CommandTemplate {
                program: "cargo".into(),
                args: vec![
                    "llvm-cov".into(),
                    "--lcov".into(),
                    "--output-path={profile}".into(),
                ],
            },
            convert: CommandTemplate {
                program: "genhtml".into(),
                args: vec!["{profile}".into(), "-o".into(), "{html}".into()],
            },
        })
    }

    #[test]
    fn substitutes_profile_in_test_args() {
        let spec = toolchain().test_command(Path::new("/tmp/p.out"));
        assert_eq!(spec.program, "cargo");
        assert_eq!(spec.args, vec!["llvm-cov", "--lcov", "--output-path=/tmp/p.out"]);
    }

    #[test]
    fn substitutes_both_paths_in_convert_args() {
        let spec = toolchain().convert_command(Path::new("/tmp/p.out"), Path::new("/tmp/r.html"));
        assert_eq!(spec.program, "genhtml");
        assert_eq!(spec.args, vec!["/tmp/p.out", "-o", "/tmp/r.html"]);
    }

    #[test]
    fn html_placeholder_is_left_alone_in_test_args() {
        let tc = CommandToolchain::new(&CommandToolchainConfig {
            test: CommandTemplate {
                program: "run-tests".into(),
                args: vec!["{html}".into()],
            },
            convert: CommandTemplate {
                program: "render".into(),
                args: vec![],
            },
        });
        assert_eq!(tc.test_command(Path::new("/tmp/p")).args, vec!["{html}"]);
    }
}
