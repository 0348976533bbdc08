use clap::{Parser, Subcommand};

mod rank;
mod reviews;

#[derive(Debug, Parser)]
#[command(name = "maprank-cli")]
#[command(about = "Map search-rank and review extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check where a business ranks for one or more search keywords.
    Rank(rank::RankArgs),
    /// Harvest reviews for a business.
    Reviews(reviews::ReviewsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = maprank_core::load_app_config()?;
    let cli = Cli::parse();
    match cli.command {
        Commands::Rank(args) => rank::run_rank(&config, &args).await,
        Commands::Reviews(args) => reviews::run_reviews(&config, &args).await,
    }
}
