use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod app;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API
    Serve {
        /// Load the fixtures before accepting requests
        #[arg(long)]
        seed: bool,
    },
    /// Drop and recreate the schema, then load the fixtures
    Seed,
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("restaurant_service=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve { seed } => app::serve::main(*seed).await,
        Commands::Seed => app::seed::main().await,
    }
}
