use std::path::Path;

use covwatch_core::api::{CommandSpec, CoverageToolchain, GoToolchainConfig};

/// `go test` with a coverage profile, rendered by `go tool cover -html`.
pub struct GoToolchain {
    go_bin: String,
}

impl GoToolchain {
    pub fn new(cfg: &GoToolchainConfig) -> Self {
        Self {
            go_bin: cfg.go_bin.clone(),
        }
    }
}

impl CoverageToolchain for GoToolchain {
    fn name(&self) -> &str {
        "go"
    }

    fn test_command(&self, profile: &Path) -> CommandSpec {
        // -x traces the commands go runs, -v streams per-test results
        CommandSpec::new(&self.go_bin)
            .args(["test", "-x", "-v", "-coverprofile"])
            .arg(profile.display().to_string())
    }

    fn convert_command(&self, profile: &Path, html_out: &Path) -> CommandSpec {
        CommandSpec::new(&self.go_bin)
            .args(["tool", "cover", "-html"])
            .arg(profile.display().to_string())
            .arg("-o")
            .arg(html_out.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_go_test_command() {
        let tc = GoToolchain::new(&GoToolchainConfig::default());
        let spec = tc.test_command(Path::new("/tmp/covwatch-1.out"));
        assert_eq!(spec.program, "go");
        assert_eq!(
            spec.args,
            vec!["test", "-x", "-v", "-coverprofile", "/tmp/covwatch-1.out"]
        );
        assert_eq!(spec.cwd, None);
    }

    #[test]
    fn builds_cover_html_command() {
        let tc = GoToolchain::new(&GoToolchainConfig {
            go_bin: "/usr/local/go/bin/go".into(),
        });
        let spec = tc.convert_command(
            Path::new("/tmp/covwatch-1.out"),
            Path::new("/tmp/covwatch-2.html"),
        );
        assert_eq!(spec.program, "/usr/local/go/bin/go");
        assert_eq!(
            spec.args,
            vec!["tool", "cover", "-html", "/tmp/covwatch-1.out", "-o", "/tmp/covwatch-2.html"]
        );
    }
}
