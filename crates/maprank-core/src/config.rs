use crate::app_config::AppConfig;
use crate::{ConfigError, GeoLocation, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparsable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparsable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed. Every variable has a default; a minimal
/// deployment needs no env vars at all.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{other}\""),
            }),
        }
    };

    let headless = parse_bool("MAPRANK_HEADLESS", "true")?;
    let browser_recycle_threshold = parse_u32("MAPRANK_BROWSER_RECYCLE_THRESHOLD", "10")?;
    let navigation_timeout_secs = parse_u64("MAPRANK_NAVIGATION_TIMEOUT_SECS", "30")?;
    let selector_timeout_secs = parse_u64("MAPRANK_SELECTOR_TIMEOUT_SECS", "5")?;
    let scroll_settle_ms = parse_u64("MAPRANK_SCROLL_SETTLE_MS", "1500")?;
    let max_scroll_passes = parse_u32("MAPRANK_MAX_SCROLL_PASSES", "5")?;
    let viewport_width = parse_u32("MAPRANK_VIEWPORT_WIDTH", "1280")?;
    let viewport_height = parse_u32("MAPRANK_VIEWPORT_HEIGHT", "900")?;
    let locale = or_default("MAPRANK_LOCALE", "ja-JP");
    let user_agent = or_default(
        "MAPRANK_USER_AGENT",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/124.0.0.0 Safari/537.36",
    );
    let inter_keyword_delay_ms = parse_u64("MAPRANK_INTER_KEYWORD_DELAY_MS", "2000")?;
    let geocoder_endpoint = or_default(
        "MAPRANK_GEOCODER_ENDPOINT",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_timeout_secs = parse_u64("MAPRANK_GEOCODER_TIMEOUT_SECS", "10")?;

    let default_location = GeoLocation {
        latitude: parse_f64("MAPRANK_DEFAULT_LATITUDE", &DEFAULT_LATITUDE.to_string())?,
        longitude: parse_f64("MAPRANK_DEFAULT_LONGITUDE", &DEFAULT_LONGITUDE.to_string())?,
    };

    Ok(AppConfig {
        headless,
        browser_recycle_threshold,
        navigation_timeout_secs,
        selector_timeout_secs,
        scroll_settle_ms,
        max_scroll_passes,
        viewport_width,
        viewport_height,
        locale,
        user_agent,
        inter_keyword_delay_ms,
        geocoder_endpoint,
        geocoder_timeout_secs,
        default_location,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
