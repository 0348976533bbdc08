//! Review extraction: opens a business detail panel, switches to the
//! reviews tab, and harvests the rendered review cards with their star
//! ratings, authors and relative timestamps.

use std::collections::HashSet;
use std::time::Duration;

use chromiumoxide::Page;
use chrono::Utc;
use maprank_core::{GeoLocation, Review, ReviewsResult};
use serde::Deserialize;

use crate::dom::{evaluate_json, scroll_container};
use crate::error::ScraperError;
use crate::maps_url::{place_url, search_url};
use crate::parse::{
    generate_review_id, parse_rating_label, parse_relative_time, parse_review_count,
    parse_star_rating,
};
use crate::pool::{navigate, BrowserPool, ContextOptions};
use crate::selector::{resolve_text, try_selectors};

/// Default cap on harvested reviews per call.
pub const DEFAULT_MAX_REVIEWS: u32 = 20;

/// Fixed per-pass scroll distance over the review pane.
const SCROLL_DELTA_PX: u32 = 1000;

/// Attributed author when a card renders without one.
const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Pause after expanding truncated review bodies, letting the re-layout land
/// before the cards are read.
const EXPAND_SETTLE_MS: u64 = 300;

/// Business title candidates on the detail panel.
const TITLE_SELECTORS: [&str; 3] = ["h1.DUwDvf", "div[role='main'] h1", "h1"];

/// Aggregate-rating candidates near the title.
const RATING_SELECTORS: [&str; 2] = ["div.F7nice span[aria-hidden='true']", "div.F7nice"];

/// Review-count candidates near the title.
const COUNT_SELECTORS: [&str; 3] = [
    "div.F7nice span[aria-label]",
    "div.F7nice",
    "button[jsaction*='reviewChart']",
];

/// Scrollable review-pane candidates.
const PANE_SELECTORS: [&str; 3] = [
    "div.m6QErb[tabindex='-1']",
    "div[role='main'] div[tabindex='-1']",
    "div[role='main']",
];

/// First keyword-search result, used when only a business name is known.
const FIRST_RESULT_SELECTORS: [&str; 2] = [
    "div[role='feed'] a[href*='/maps/place/']",
    "a[href*='/maps/place/']",
];

/// One review harvest request. Identification by place identifier is
/// preferred; a bare name falls back to a keyword search whose first result
/// is opened.
#[derive(Debug, Clone)]
pub struct ReviewsRequest {
    pub place_id: Option<String>,
    pub place_name: Option<String>,
    /// Explicit search phrase for the name fallback; the bare name is
    /// searched when unset.
    pub search_keyword: Option<String>,
    pub location: Option<GeoLocation>,
    pub max_reviews: u32,
    pub headless: Option<bool>,
}

impl ReviewsRequest {
    #[must_use]
    pub fn for_place_id(place_id: impl Into<String>) -> Self {
        Self {
            place_id: Some(place_id.into()),
            place_name: None,
            search_keyword: None,
            location: None,
            max_reviews: DEFAULT_MAX_REVIEWS,
            headless: None,
        }
    }

    #[must_use]
    pub fn for_place_name(place_name: impl Into<String>) -> Self {
        Self {
            place_id: None,
            place_name: Some(place_name.into()),
            search_keyword: None,
            location: None,
            max_reviews: DEFAULT_MAX_REVIEWS,
            headless: None,
        }
    }
}

/// Raw strings captured from one rendered review card.
#[derive(Debug, Deserialize)]
struct ReviewCapture {
    author: Option<String>,
    rating_label: Option<String>,
    relative_time: Option<String>,
    text: Option<String>,
}

/// Harvests reviews for one business.
///
/// Never fails: engine and navigation errors are folded into an empty
/// result with `error` set. Partial pages degrade field by field — a
/// missing aggregate rating or count leaves the default, not an error.
pub async fn fetch_reviews(pool: &mut BrowserPool, request: &ReviewsRequest) -> ReviewsResult {
    match scan_reviews(pool, request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                place_id = request.place_id.as_deref().unwrap_or(""),
                error = %e,
                "review harvest failed"
            );
            let mut result =
                ReviewsResult::empty(request.place_id.as_deref(), request.place_name.as_deref());
            result.error = Some(e.to_string());
            result
        }
    }
}

async fn scan_reviews(
    pool: &mut BrowserPool,
    request: &ReviewsRequest,
) -> Result<ReviewsResult, ScraperError> {
    let config = pool.config().clone();
    let page = pool
        .context(&ContextOptions {
            headless: request.headless,
            geolocation: request.location,
        })
        .await?;
    let settle = Duration::from_millis(config.scroll_settle_ms);
    let selector_timeout = Duration::from_secs(config.selector_timeout_secs);

    match (request.place_id.as_deref(), request.place_name.as_deref()) {
        (Some(place_id), _) => {
            let url = place_url(place_id, &config.locale);
            tracing::debug!(place_id, url = %url, "loading place detail");
            navigate(&page, &url, config.navigation_timeout_secs).await?;
        }
        (None, Some(place_name)) => {
            let keyword = request.search_keyword.as_deref().unwrap_or(place_name);
            let url = search_url(keyword, request.location.as_ref(), &config.locale);
            tracing::debug!(place_name, url = %url, "searching place by name");
            navigate(&page, &url, config.navigation_timeout_secs).await?;
            tokio::time::sleep(settle).await;
            open_first_result(&page, selector_timeout).await;
        }
        (None, None) => {
            let mut result = ReviewsResult::empty(None, None);
            result.error = Some("neither place identifier nor name was given".to_string());
            return Ok(result);
        }
    }
    tokio::time::sleep(settle).await;

    let place_name = resolve_text(&page, &TITLE_SELECTORS, selector_timeout)
        .await
        .unwrap_or_default();
    let average_rating = resolve_text(&page, &RATING_SELECTORS, selector_timeout)
        .await
        .as_deref()
        .and_then(parse_rating_label)
        .unwrap_or(0.0);
    let labelled_total = resolve_text(&page, &COUNT_SELECTORS, selector_timeout)
        .await
        .as_deref()
        .and_then(parse_review_count);

    open_reviews_tab(&page).await;
    tokio::time::sleep(settle).await;

    let max_reviews = request.max_reviews.max(1) as usize;
    let mut reviews: Vec<Review> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for pass in 0..config.max_scroll_passes {
        expand_truncated_bodies(&page).await;
        tokio::time::sleep(Duration::from_millis(EXPAND_SETTLE_MS)).await;

        let captures = read_review_cards(&page).await;
        let before = reviews.len();
        for capture in &captures {
            if let Some(review) = capture_to_review(capture) {
                if seen.insert(review.id.clone()) {
                    reviews.push(review);
                    if reviews.len() >= max_reviews {
                        break;
                    }
                }
            }
        }
        if reviews.len() >= max_reviews {
            break;
        }
        if pass > 0 && reviews.len() == before {
            tracing::debug!(pass, harvested = reviews.len(), "review pane exhausted");
            break;
        }

        scroll_container(&page, &PANE_SELECTORS, SCROLL_DELTA_PX).await;
        tokio::time::sleep(settle).await;
    }

    let total_reviews =
        labelled_total.unwrap_or_else(|| u32::try_from(reviews.len()).unwrap_or(u32::MAX));

    Ok(ReviewsResult {
        place_id: request.place_id.clone(),
        place_name,
        total_reviews,
        average_rating,
        reviews,
        checked_at: Utc::now(),
        error: None,
    })
}

/// Clicks through to the first search result. Best-effort: a miss leaves the
/// search page as-is and the title resolution reports what it finds there.
async fn open_first_result(page: &Page, timeout: Duration) {
    let Some(element) = try_selectors(page, &FIRST_RESULT_SELECTORS, timeout).await else {
        tracing::warn!("no search result to open");
        return;
    };
    if let Err(e) = element.click().await {
        tracing::warn!(error = %e, "could not open first search result");
        return;
    }
    let _ = page.wait_for_navigation().await;
}

/// Switches the detail panel to its reviews tab. Best-effort: some layouts
/// render reviews inline without a tab.
async fn open_reviews_tab(page: &Page) {
    let script = r#"(() => {
        const tabs = Array.from(document.querySelectorAll("button[role='tab'], button"));
        for (const tab of tabs) {
            const label = (tab.getAttribute('aria-label') || '') + ' ' + (tab.textContent || '');
            if (label.includes('クチコミ') || /reviews/i.test(label)) {
                tab.click();
                return true;
            }
        }
        return false;
    })()"#;
    match page.evaluate(script).await {
        Ok(result) => {
            let clicked = result.into_value::<bool>().unwrap_or(false);
            tracing::debug!(clicked, "reviews tab switch");
        }
        Err(e) => tracing::debug!(error = %e, "reviews tab switch failed"),
    }
}

/// Clicks every visible "more" toggle so truncated review bodies are fully
/// rendered before capture.
async fn expand_truncated_bodies(page: &Page) {
    let script = r#"(() => {
        const toggles = Array.from(document.querySelectorAll('button'));
        let clicked = 0;
        for (const toggle of toggles) {
            const label = (toggle.getAttribute('aria-label') || '') + ' ' + (toggle.textContent || '');
            if ((label.includes('もっと見る') || /\bmore\b/i.test(label)) && toggle.offsetParent !== null) {
                toggle.click();
                clicked += 1;
            }
        }
        return clicked;
    })()"#;
    if let Err(e) = page.evaluate(script).await {
        tracing::debug!(error = %e, "expanding review bodies failed");
    }
}

/// Reads every currently rendered review card in one evaluation round-trip.
async fn read_review_cards(page: &Page) -> Vec<ReviewCapture> {
    let script = r#"(() => {
        const cards = Array.from(document.querySelectorAll('div[data-review-id], div.jftiEf'));
        const text = (el, sel) => {
            const m = el.querySelector(sel);
            return m && m.textContent ? m.textContent.trim() : null;
        };
        return JSON.stringify(cards.map(card => {
            const ratingEl = card.querySelector("span[role='img']");
            return {
                author: text(card, '.d4r55') || card.getAttribute('aria-label'),
                rating_label: ratingEl ? ratingEl.getAttribute('aria-label') : null,
                relative_time: text(card, '.rsqaWe') || text(card, '.DU9Pgb'),
                text: text(card, '.wiI7pd') || text(card, '.MyEned'),
            };
        }));
    })()"#;
    evaluate_json(page, script).await.unwrap_or_default()
}

/// Converts one captured card. A card whose star rating cannot be read is
/// dropped entirely — without the rating the identifier would collide across
/// unrelated reviews. Everything else degrades to a placeholder or empty
/// string.
fn capture_to_review(capture: &ReviewCapture) -> Option<Review> {
    let rating = capture.rating_label.as_deref().and_then(parse_star_rating)?;
    let author_name = capture
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(ANONYMOUS_AUTHOR)
        .to_string();
    let relative_time = capture
        .relative_time
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let text = capture
        .text
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Some(Review {
        id: generate_review_id(&author_name, &relative_time, rating),
        rating,
        text,
        author_name,
        published_at: parse_relative_time(&relative_time, Utc::now()),
        relative_time,
    })
}

/// Filters `current` down to the reviews whose identifiers are not in
/// `previous_ids`, preserving rendered order. Pure; the caller owns the
/// persistence of seen identifiers.
#[must_use]
pub fn detect_new_reviews(current: &[Review], previous_ids: &[String]) -> Vec<Review> {
    let known: HashSet<&str> = previous_ids.iter().map(String::as_str).collect();
    current
        .iter()
        .filter(|review| !known.contains(review.id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "reviews_test.rs"]
mod reviews_test;
