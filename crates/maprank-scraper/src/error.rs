use thiserror::Error;

/// Errors surfaced by the browser pool and the navigation layer.
///
/// These never escape the public extractor entry points: `check_maps_ranking`
/// and `fetch_reviews` catch them at their boundary and fold the message into
/// the result object's `error` field.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("browser command failed: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
