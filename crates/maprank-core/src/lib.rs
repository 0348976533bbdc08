use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod app_config;
mod config;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};

/// Fallback search origin when no location is supplied and geocoding fails:
/// Tokyo Station. Map results are geolocation-biased, so *some* fixed origin
/// is always applied to keep runs comparable over time.
pub const DEFAULT_LATITUDE: f64 = 35.6812;
pub const DEFAULT_LONGITUDE: f64 = 139.7671;

/// A search-origin bias point for geolocation-sensitive map results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for GeoLocation {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// One row from a ranking scan of the map search feed.
///
/// Invariant: within a [`RankingResult`], ranks are contiguous integers
/// starting at 1 and equal to array position + 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    pub rank: u32,
    pub name: String,
    /// Opaque place identifier decoded from the row's URL, if present.
    pub place_id: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub address: Option<String>,
    pub url: Option<String>,
}

/// Outcome of one keyword ranking scan.
///
/// `rank` is `None` iff the target was not found among the scanned window —
/// that is a normal outcome, not an error. `error` is set only when
/// navigation or the browser engine itself failed; the rest of the fields
/// are then defaulted so the result stays inspectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResult {
    pub keyword: String,
    pub target_place_id: Option<String>,
    pub rank: Option<u32>,
    pub total_results: u32,
    pub top_results: Vec<PlaceResult>,
    pub checked_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl RankingResult {
    /// An all-defaulted result for `keyword`, used both for the graceful
    /// empty outcome (feed never resolved) and as the base that an engine
    /// failure message is attached to.
    #[must_use]
    pub fn empty(keyword: &str, target_place_id: Option<&str>) -> Self {
        Self {
            keyword: keyword.to_string(),
            target_place_id: target_place_id.map(ToString::to_string),
            rank: None,
            total_results: 0,
            top_results: Vec::new(),
            checked_at: Utc::now(),
            error: None,
        }
    }
}

/// One normalized review.
///
/// `id` is a deterministic content hash of `(author, relative_time, rating)`,
/// not a platform-native identifier. Review text is deliberately excluded
/// from the hash, so an edited review with unchanged author/time/rating is
/// treated as already seen. Distinct reviews are not guaranteed distinct ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    /// Star rating, 1–5.
    pub rating: u8,
    pub text: String,
    pub author_name: String,
    /// Absolute timestamp derived from `relative_time`; `None` when the
    /// relative-time text did not match any known pattern.
    pub published_at: Option<DateTime<Utc>>,
    /// The human-readable elapsed-time string as rendered by the UI.
    pub relative_time: String,
}

/// Outcome of one review harvest. Same never-throw / `error`-field
/// convention as [`RankingResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResult {
    pub place_id: Option<String>,
    pub place_name: String,
    pub total_reviews: u32,
    pub average_rating: f64,
    pub reviews: Vec<Review>,
    pub checked_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl ReviewsResult {
    #[must_use]
    pub fn empty(place_id: Option<&str>, place_name: Option<&str>) -> Self {
        Self {
            place_id: place_id.map(ToString::to_string),
            place_name: place_name.unwrap_or_default().to_string(),
            total_reviews: 0,
            average_rating: 0.0,
            reviews: Vec::new(),
            checked_at: Utc::now(),
            error: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
