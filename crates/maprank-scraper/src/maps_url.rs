//! Map URL construction and place-identifier extraction.

use maprank_core::GeoLocation;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;

/// Zoom level used when biasing a search toward a location. Roughly a
/// city-district view, matching what the UI picks for local queries.
const SEARCH_ZOOM: u32 = 14;

/// Builds a keyword search URL, optionally biased toward `location` via the
/// `@lat,lng,zoom` viewport segment.
pub fn search_url(keyword: &str, location: Option<&GeoLocation>, locale: &str) -> String {
    let encoded = utf8_percent_encode(keyword, NON_ALPHANUMERIC).to_string();
    let lang = language_tag(locale);
    match location {
        Some(loc) => format!(
            "https://www.google.com/maps/search/{encoded}/@{lat},{lng},{SEARCH_ZOOM}z?hl={lang}",
            lat = loc.latitude,
            lng = loc.longitude,
        ),
        None => format!("https://www.google.com/maps/search/{encoded}?hl={lang}"),
    }
}

/// Builds a detail-page URL that resolves a place identifier directly,
/// skipping the search feed.
pub fn place_url(place_id: &str, locale: &str) -> String {
    let lang = language_tag(locale);
    format!("https://www.google.com/maps/place/?q=place_id:{place_id}&hl={lang}")
}

/// Primary language subtag of a BCP 47 locale: `"ja-JP"` → `"ja"`.
fn language_tag(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

/// Extracts the opaque place identifier from a map URL.
///
/// Three patterns are attempted in order:
/// 1. the `!1s<id>` segment of the encoded data blob,
/// 2. an explicit `place_id` query parameter (`place_id=` or `q=place_id:`),
/// 3. the `!19s<id>` alternate blob segment, which is percent-encoded and
///    needs decoding.
///
/// Pure and idempotent: the same URL always yields the same output.
#[must_use]
pub fn extract_place_id_from_url(url: &str) -> Option<String> {
    let data_blob = Regex::new(r"!1s([^!]+)").expect("valid regex");
    if let Some(caps) = data_blob.captures(url) {
        let id = caps.get(1)?.as_str();
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    let query_param = Regex::new(r"place_id[=:]([A-Za-z0-9_-]+)").expect("valid regex");
    if let Some(caps) = query_param.captures(url) {
        return Some(caps.get(1)?.as_str().to_string());
    }

    let alternate_blob = Regex::new(r"!19s([^!?&]+)").expect("valid regex");
    if let Some(caps) = alternate_blob.captures(url) {
        let raw = caps.get(1)?.as_str();
        let decoded = percent_decode_str(raw).decode_utf8().ok()?;
        if !decoded.is_empty() {
            return Some(decoded.into_owned());
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
