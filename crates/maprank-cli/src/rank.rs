//! Ranking command handler.
//!
//! Drives sequential keyword scans through one browser pool. Per-keyword
//! failures surface in each result's `error` field rather than aborting
//! the run.

use clap::Args;
use maprank_core::{AppConfig, GeoLocation};
use maprank_scraper::{
    check_multiple_keywords, BrowserPool, Geocoder, RankingOptions, DEFAULT_MAX_RESULTS,
};

#[derive(Debug, Args)]
pub(crate) struct RankArgs {
    /// Keywords to check, in order.
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Target place identifier (exact match, authoritative).
    #[arg(long)]
    pub place_id: Option<String>,

    /// Target business name (fuzzy fallback when a row has no identifier).
    #[arg(long)]
    pub name: Option<String>,

    /// Business address; geocoded into the search-origin bias.
    #[arg(long)]
    pub address: Option<String>,

    /// Explicit search-origin latitude, overriding --address.
    #[arg(long, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Explicit search-origin longitude, overriding --address.
    #[arg(long, requires = "latitude")]
    pub longitude: Option<f64>,

    /// Size of the scanned top-N window.
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: u32,

    /// Run the browser with a visible window.
    #[arg(long)]
    pub visible: bool,

    /// Emit results as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

pub(crate) async fn run_rank(config: &AppConfig, args: &RankArgs) -> anyhow::Result<()> {
    if args.place_id.is_none() && args.name.is_none() {
        anyhow::bail!("pass --place-id or --name to identify the target business");
    }

    let location = resolve_location(config, args).await;
    let options = RankingOptions {
        target_place_id: args.place_id.clone(),
        target_name: args.name.clone(),
        location,
        max_results: args.max_results,
        headless: args.visible.then_some(false),
    };
    let mut pool = BrowserPool::new(config.clone());
    let results = check_multiple_keywords(&mut pool, &args.keywords, &options).await;
    pool.close().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        match (&result.error, result.rank) {
            (Some(error), _) => println!("{}: failed ({error})", result.keyword),
            (None, Some(rank)) => println!(
                "{}: rank {rank} of {} scanned",
                result.keyword, result.total_results
            ),
            (None, None) => println!(
                "{}: not in the top {} results",
                result.keyword, result.total_results
            ),
        }
    }
    Ok(())
}

/// Resolves the search-origin bias: explicit coordinates win, then a
/// geocoded address, then `None` (the pool's default applies).
async fn resolve_location(config: &AppConfig, args: &RankArgs) -> Option<GeoLocation> {
    if let (Some(latitude), Some(longitude)) = (args.latitude, args.longitude) {
        return Some(GeoLocation {
            latitude,
            longitude,
        });
    }
    let address = args.address.as_deref()?;
    match Geocoder::new(config) {
        Ok(geocoder) => geocoder.geocode_address(address).await,
        Err(e) => {
            tracing::warn!(error = %e, "geocoder unavailable, using default location");
            None
        }
    }
}
