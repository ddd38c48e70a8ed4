use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dental_panel::{Cli, ConsoleNotifier, Shell};
use shared_config::PanelConfig;
use shared_models::{report_failure, Notifier};

#[tokio::main]
async fn main() -> ExitCode {
    // Loading Env Vars
    dotenv().ok();

    // Logs go to stderr, screens to stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,dental_panel=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(screen) => {
            if !screen.is_empty() {
                println!("{}", screen);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Already shown to the user by the notifier.
            debug!("Command failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = PanelConfig::from_env();
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    let shell = Shell::new(&config, notifier.clone())
        .map_err(|e| report_failure(notifier.as_ref(), "Start panel", e))?;

    Ok(shell.run(cli.command).await?)
}
