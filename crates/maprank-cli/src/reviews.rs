//! Reviews command handler.

use clap::Args;
use maprank_core::AppConfig;
use maprank_scraper::{fetch_reviews, BrowserPool, ReviewsRequest, DEFAULT_MAX_REVIEWS};

#[derive(Debug, Args)]
pub(crate) struct ReviewsArgs {
    /// Business name; falls back to opening the first search result.
    pub name: Option<String>,

    /// Place identifier of the business (preferred over the name).
    #[arg(long)]
    pub place_id: Option<String>,

    /// Search phrase used instead of the bare name for the fallback search.
    #[arg(long)]
    pub keyword: Option<String>,

    /// Maximum number of reviews to harvest.
    #[arg(long, default_value_t = DEFAULT_MAX_REVIEWS)]
    pub max_reviews: u32,

    /// Run the browser with a visible window.
    #[arg(long)]
    pub visible: bool,

    /// Emit the result as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

pub(crate) async fn run_reviews(config: &AppConfig, args: &ReviewsArgs) -> anyhow::Result<()> {
    if args.place_id.is_none() && args.name.is_none() {
        anyhow::bail!("pass a business name or --place-id to identify the business");
    }

    let request = ReviewsRequest {
        place_id: args.place_id.clone(),
        place_name: args.name.clone(),
        search_keyword: args.keyword.clone(),
        location: None,
        max_reviews: args.max_reviews,
        headless: args.visible.then_some(false),
    };
    let mut pool = BrowserPool::new(config.clone());
    let result = fetch_reviews(&mut pool, &request).await;
    pool.close().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if let Some(error) = &result.error {
        println!("review harvest failed: {error}");
        return Ok(());
    }
    println!(
        "{}: {} reviews on record, average {:.1}, harvested {}",
        if result.place_name.is_empty() {
            "(unnamed place)"
        } else {
            &result.place_name
        },
        result.total_reviews,
        result.average_rating,
        result.reviews.len()
    );
    for review in &result.reviews {
        let stars = "★".repeat(usize::from(review.rating));
        println!("  {stars}  {} — {}", review.author_name, review.relative_time);
        if !review.text.is_empty() {
            println!("      {}", review.text);
        }
    }
    Ok(())
}
