//! Resumatch command-line client - entry point

use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use clap::Parser;

use resumatch::{App, Cli, Command};
use resumatch_infrastructure::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let command = Cli::parse().into_command();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(command).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<String, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.client.base_url,
        "starting resumatch"
    );

    let app = App::new(config)?;
    Ok(app.run(command).await?)
}
