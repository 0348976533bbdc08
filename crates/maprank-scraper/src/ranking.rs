//! Keyword ranking extraction: loads a map keyword search, walks the
//! infinite-scroll results feed, and locates the target business among the
//! ranked rows.

use std::time::Duration;

use chromiumoxide::Page;
use chrono::Utc;
use maprank_core::{GeoLocation, PlaceResult, RankingResult};
use serde::Deserialize;

use crate::dom::{evaluate_json, scroll_container};
use crate::error::ScraperError;
use crate::maps_url::{extract_place_id_from_url, search_url};
use crate::parse::{parse_rating_label, parse_review_count};
use crate::pool::{navigate, BrowserPool, ContextOptions};
use crate::selector::{resolve_selector, try_selectors};

/// Default size of the scanned "top N" window.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Fixed per-pass scroll distance over the results feed.
const SCROLL_DELTA_PX: u32 = 800;

/// Results-feed container candidates, most specific first.
const FEED_SELECTORS: [&str; 3] = [
    "div[role='feed']",
    "div[role='main'] div[tabindex='-1']",
    "div[role='main']",
];

/// Result-row candidates within the feed. The winning pattern is re-queried
/// on every scroll pass.
const ROW_SELECTORS: [&str; 3] = [
    "div[role='feed'] div[role='article']",
    "div[role='feed'] > div > div[jsaction]",
    "div[role='feed'] a[href*='/maps/place/']",
];

/// One keyword ranking scan request. At least one of `target_place_id` /
/// `target_name` is expected; without either the scan still collects the
/// window but can never produce a rank.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub keyword: String,
    pub target_place_id: Option<String>,
    pub target_name: Option<String>,
    /// Search-origin bias; the pool's default location applies when unset.
    pub location: Option<GeoLocation>,
    pub max_results: u32,
    /// Per-call override of the pool's headless default.
    pub headless: Option<bool>,
}

impl RankingRequest {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            target_place_id: None,
            target_name: None,
            location: None,
            max_results: DEFAULT_MAX_RESULTS,
            headless: None,
        }
    }
}

/// Shared scan options for a multi-keyword run; each keyword gets its own
/// [`RankingRequest`] built from these.
#[derive(Debug, Clone)]
pub struct RankingOptions {
    pub target_place_id: Option<String>,
    pub target_name: Option<String>,
    pub location: Option<GeoLocation>,
    pub max_results: u32,
    pub headless: Option<bool>,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            target_place_id: None,
            target_name: None,
            location: None,
            max_results: DEFAULT_MAX_RESULTS,
            headless: None,
        }
    }
}

/// Raw strings captured from one rendered row; parsing happens Rust-side.
#[derive(Debug, Deserialize)]
struct RowCapture {
    name: Option<String>,
    href: Option<String>,
    rating_label: Option<String>,
    count_text: Option<String>,
    address: Option<String>,
}

/// Checks where the target business ranks for `keyword`.
///
/// Never fails: navigation and engine errors are caught here and folded
/// into an all-defaulted result with `error` set, so batch and scheduler
/// callers always get a well-formed, inspectable value. A target that is
/// simply absent from the scanned window yields `rank: None` with no error.
pub async fn check_maps_ranking(pool: &mut BrowserPool, request: &RankingRequest) -> RankingResult {
    match scan_ranking(pool, request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(keyword = %request.keyword, error = %e, "ranking scan failed");
            let mut result =
                RankingResult::empty(&request.keyword, request.target_place_id.as_deref());
            result.error = Some(e.to_string());
            result
        }
    }
}

/// Runs sequential ranking scans for several keywords against the same
/// target, with a fixed courtesy delay between calls.
pub async fn check_multiple_keywords(
    pool: &mut BrowserPool,
    keywords: &[String],
    options: &RankingOptions,
) -> Vec<RankingResult> {
    let delay = Duration::from_millis(pool.config().inter_keyword_delay_ms);
    let mut results = Vec::with_capacity(keywords.len());
    for (index, keyword) in keywords.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(delay).await;
        }
        let request = RankingRequest {
            keyword: keyword.clone(),
            target_place_id: options.target_place_id.clone(),
            target_name: options.target_name.clone(),
            location: options.location,
            max_results: options.max_results,
            headless: options.headless,
        };
        results.push(check_maps_ranking(pool, &request).await);
    }
    results
}

async fn scan_ranking(
    pool: &mut BrowserPool,
    request: &RankingRequest,
) -> Result<RankingResult, ScraperError> {
    let config = pool.config().clone();
    let page = pool
        .context(&ContextOptions {
            headless: request.headless,
            geolocation: request.location,
        })
        .await?;

    let location = request.location.unwrap_or(config.default_location);
    let url = search_url(&request.keyword, Some(&location), &config.locale);
    tracing::debug!(keyword = %request.keyword, url = %url, "loading keyword search");
    navigate(&page, &url, config.navigation_timeout_secs).await?;
    tokio::time::sleep(Duration::from_millis(config.scroll_settle_ms)).await;

    let selector_timeout = Duration::from_secs(config.selector_timeout_secs);
    if try_selectors(&page, &FEED_SELECTORS, selector_timeout)
        .await
        .is_none()
    {
        // Feed never rendered: graceful empty result, not an error.
        tracing::warn!(keyword = %request.keyword, "results feed did not resolve");
        return Ok(RankingResult::empty(
            &request.keyword,
            request.target_place_id.as_deref(),
        ));
    }
    let Some(row_selector) = resolve_selector(&page, &ROW_SELECTORS, selector_timeout).await else {
        tracing::warn!(keyword = %request.keyword, "no result-row pattern resolved");
        return Ok(RankingResult::empty(
            &request.keyword,
            request.target_place_id.as_deref(),
        ));
    };

    let max_results = request.max_results.max(1) as usize;
    let mut collected: Vec<PlaceResult> = Vec::new();
    let mut processed = 0usize;

    for pass in 0..config.max_scroll_passes {
        let captures = read_rows(&page, row_selector).await;

        // No-progress early exit: a scroll pass that surfaces zero new rows
        // means the feed is exhausted.
        if pass > 0 && captures.len() <= processed {
            tracing::debug!(pass, rows = captures.len(), "feed stopped growing");
            break;
        }

        for capture in &captures[processed.min(captures.len())..] {
            let rank = u32::try_from(collected.len() + 1).unwrap_or(u32::MAX);
            if let Some(place) = row_to_place(capture, rank) {
                collected.push(place);
                if collected.len() >= max_results {
                    break;
                }
            }
        }
        processed = captures.len();

        if collected.len() >= max_results {
            break;
        }

        scroll_container(&page, &FEED_SELECTORS, SCROLL_DELTA_PX).await;
        tokio::time::sleep(Duration::from_millis(config.scroll_settle_ms)).await;
    }

    let rank = match_target(
        &collected,
        request.target_place_id.as_deref(),
        request.target_name.as_deref(),
    );

    Ok(RankingResult {
        keyword: request.keyword.clone(),
        target_place_id: request.target_place_id.clone(),
        rank,
        total_results: u32::try_from(collected.len()).unwrap_or(u32::MAX),
        top_results: collected,
        checked_at: Utc::now(),
        error: None,
    })
}

/// Reads every currently rendered row in one evaluation round-trip.
async fn read_rows(page: &Page, row_selector: &str) -> Vec<RowCapture> {
    let selector_json = match serde_json::to_string(row_selector) {
        Ok(json) => json,
        Err(_) => return Vec::new(),
    };
    let script = format!(
        r#"(() => {{
            const rows = Array.from(document.querySelectorAll({selector_json}));
            const text = (el, sel) => {{
                const m = el.querySelector(sel);
                return m && m.textContent ? m.textContent.trim() : null;
            }};
            const attr = (el, sel, name) => {{
                const m = el.querySelector(sel);
                return m ? m.getAttribute(name) : null;
            }};
            return JSON.stringify(rows.map(row => {{
                const link = row.tagName === 'A'
                    ? row
                    : (row.querySelector('a[href*="/maps/place/"]') || row.querySelector('a[href]'));
                const name = row.getAttribute('aria-label')
                    || (link ? link.getAttribute('aria-label') : null)
                    || text(row, '.qBF1Pd')
                    || text(row, '.fontHeadlineSmall');
                let address = null;
                for (const el of row.querySelectorAll('.W4Efsd')) {{
                    const t = el.textContent || '';
                    if (t.includes('·')) {{
                        const parts = t.split('·');
                        const last = parts[parts.length - 1].trim();
                        if (last) {{ address = last; }}
                    }}
                }}
                return {{
                    name: name,
                    href: link ? link.getAttribute('href') : null,
                    rating_label: attr(row, 'span[role="img"]', 'aria-label'),
                    count_text: (row.textContent || '').slice(0, 300),
                    address: address,
                }};
            }}));
        }})()"#
    );
    evaluate_json(page, &script).await.unwrap_or_default()
}

/// Best-effort conversion of one captured row. A row without a name is
/// skipped entirely; any other missing field degrades to `None` without
/// dropping the row.
fn row_to_place(capture: &RowCapture, rank: u32) -> Option<PlaceResult> {
    let name = capture
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())?
        .to_string();

    let url = capture.href.as_deref().map(absolutize);
    let place_id = url.as_deref().and_then(extract_place_id_from_url);
    let rating = capture.rating_label.as_deref().and_then(parse_rating_label);
    let review_count = capture
        .rating_label
        .as_deref()
        .and_then(parse_review_count)
        .or_else(|| capture.count_text.as_deref().and_then(parse_review_count));
    let address = capture
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(ToString::to_string);

    Some(PlaceResult {
        rank,
        name,
        place_id,
        rating,
        review_count,
        address,
        url,
    })
}

fn absolutize(href: &str) -> String {
    if href.starts_with('/') {
        format!("https://www.google.com{href}")
    } else {
        href.to_string()
    }
}

/// Scans collected rows in rendered order for the target.
///
/// An exact place-identifier match is authoritative and wins immediately.
/// A row whose identifier is missing or different falls through to the
/// fuzzy name comparison (case-insensitive, whitespace-stripped, substring
/// in either direction) when a target name was supplied. The first match
/// fixes the rank and scanning stops.
pub(crate) fn match_target(
    results: &[PlaceResult],
    target_place_id: Option<&str>,
    target_name: Option<&str>,
) -> Option<u32> {
    for place in results {
        if let Some(target_id) = target_place_id {
            if place.place_id.as_deref() == Some(target_id) {
                return Some(place.rank);
            }
        }
        if let Some(name) = target_name {
            if names_match(&place.name, name) {
                return Some(place.rank);
            }
        }
    }
    None
}

/// Case-insensitive, whitespace-stripped bidirectional substring match.
fn names_match(a: &str, b: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    };
    let a = normalize(a);
    let b = normalize(b);
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

#[cfg(test)]
#[path = "ranking_test.rs"]
mod ranking_test;
