//! Map-UI extraction: keyword ranking scans and review harvesting through
//! a pooled headless browser, plus address geocoding for the search-origin
//! bias.
//!
//! The extraction entry points ([`check_maps_ranking`], [`fetch_reviews`])
//! never return `Err`: engine and navigation failures are folded into the
//! result's `error` field so batch callers always get a well-formed value.

mod dom;
mod error;
mod geocode;
mod maps_url;
mod parse;
mod pool;
mod ranking;
mod reviews;
mod selector;

pub use error::ScraperError;
pub use geocode::Geocoder;
pub use maps_url::{extract_place_id_from_url, place_url, search_url};
pub use parse::{
    generate_review_id, parse_rating_label, parse_relative_time, parse_review_count,
    parse_star_rating,
};
pub use pool::{BrowserPool, ContextOptions};
pub use ranking::{
    check_maps_ranking, check_multiple_keywords, RankingOptions, RankingRequest,
    DEFAULT_MAX_RESULTS,
};
pub use reviews::{detect_new_reviews, fetch_reviews, ReviewsRequest, DEFAULT_MAX_REVIEWS};
pub use selector::{resolve_attribute, resolve_selector, resolve_text, try_selectors};
