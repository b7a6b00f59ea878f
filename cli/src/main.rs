use clap::Parser;

mod app;
mod commands;
mod http;
mod logging;

use commands::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let cfg = app::resolve_config(&args)?;
    let _log_guard = logging::init_tracing(&cfg.logging);

    app::run_app(args, cfg).await?;
    Ok(())
}
