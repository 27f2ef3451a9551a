use anyhow::Result;
use clap::Parser;
use tau_github_trigger_runtime::{run_create_prompt, Cli};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let report = run_create_prompt(&cli)?;
    println!("prompt written to {}", report.prompt_path.display());
    Ok(())
}
