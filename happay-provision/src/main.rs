mod api;
mod cli;
mod config;
mod input;
mod mapping;
mod report;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use cli::commands::provision::handle_provision_command;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let fail_on_error = cli.provision.fail_on_error;

    let report = handle_provision_command(cli.provision).await?;

    if fail_on_error && report.has_failures() {
        log::error!("{} of {} rows failed", report.failed(), report.total());
        std::process::exit(1);
    }

    Ok(())
}
