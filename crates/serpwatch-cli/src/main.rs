mod history;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "serpwatch-cli")]
#[command(about = "Brand visibility monitoring over search engine result pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one monitoring job in the foreground
    Run(RunArgs),
    /// Show recent runs from the history log
    History {
        /// Maximum number of runs to show, newest first
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = serpwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run::run_monitor(&config, args).await?,
        Commands::History { limit } => history::run_history(&config, limit)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
