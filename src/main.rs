use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidlearn::cli::{Cli, Commands};
use vidlearn::config::Config;
use vidlearn::server;

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed arguments
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vidlearn=info,tower_http=info".into());
    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = Config::load(cli.config.as_deref(), &cli.settings)?;
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            server::run(config).await?;
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                match Config::config_path() {
                    Some(path) => println!("Configuration file: {}", path.display()),
                    None => println!("No configuration directory available on this platform"),
                }
                println!("Use --show to print the effective configuration");
            }
        }
    }

    Ok(())
}
