use std::sync::Arc;

use covwatch_core::api::{AppConfig, CoverageToolchain, ToolchainConfig};

use crate::toolchain::{CommandToolchain, GoToolchain};

pub fn build_toolchain(cfg: &AppConfig) -> Arc<dyn CoverageToolchain> {
    let toolchain: Arc<dyn CoverageToolchain> = match &cfg.toolchain {
        ToolchainConfig::Go(go_cfg) => Arc::new(GoToolchain::new(go_cfg)),
        ToolchainConfig::Command(cmd_cfg) => Arc::new(CommandToolchain::new(cmd_cfg)),
    };
    tracing::debug!(toolchain = toolchain.name(), "coverage toolchain selected");
    toolchain
}
