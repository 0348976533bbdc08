use crate::GeoLocation;

/// Application configuration for the extraction subsystem.
///
/// Loaded once at startup from environment variables (see
/// [`crate::load_app_config`]); the headless toggle becomes the browser
/// pool's default launch mode.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Run the browser engine without a visible window.
    pub headless: bool,
    /// Browser engine relaunch threshold: contexts issued before the
    /// underlying process is recycled to bound memory growth.
    pub browser_recycle_threshold: u32,
    pub navigation_timeout_secs: u64,
    /// Bounded wait for a single selector-candidate probe sweep.
    pub selector_timeout_secs: u64,
    /// Settle delay between scroll passes over an infinite-scroll feed.
    pub scroll_settle_ms: u64,
    /// Upper bound on scroll-and-reread passes per extraction.
    pub max_scroll_passes: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Accept-Language / `--lang` value for browsing contexts.
    pub locale: String,
    pub user_agent: String,
    /// Courtesy delay between sequential keyword scans.
    pub inter_keyword_delay_ms: u64,
    /// Base URL of the address-geocoding endpoint (Nominatim-shaped).
    pub geocoder_endpoint: String,
    pub geocoder_timeout_secs: u64,
    /// Search-origin bias applied when neither the caller nor geocoding
    /// supplies a location.
    pub default_location: GeoLocation,
}
