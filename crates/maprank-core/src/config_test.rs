use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn empty_environment_yields_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let config = build_app_config(lookup_from_map(&map)).unwrap();

    assert!(config.headless);
    assert_eq!(config.browser_recycle_threshold, 10);
    assert_eq!(config.navigation_timeout_secs, 30);
    assert_eq!(config.selector_timeout_secs, 5);
    assert_eq!(config.max_scroll_passes, 5);
    assert_eq!(config.locale, "ja-JP");
    assert!((config.default_location.latitude - 35.6812).abs() < 1e-9);
}

#[test]
fn headless_toggle_accepts_false() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("MAPRANK_HEADLESS", "false");
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!config.headless);
}

#[test]
fn headless_toggle_accepts_numeric_forms() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("MAPRANK_HEADLESS", "0");
    assert!(!build_app_config(lookup_from_map(&map)).unwrap().headless);

    map.insert("MAPRANK_HEADLESS", "1");
    assert!(build_app_config(lookup_from_map(&map)).unwrap().headless);
}

#[test]
fn invalid_headless_value_fails() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("MAPRANK_HEADLESS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAPRANK_HEADLESS"),
        "expected InvalidEnvVar(MAPRANK_HEADLESS), got: {result:?}"
    );
}

#[test]
fn invalid_numeric_value_fails_with_var_name() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("MAPRANK_MAX_SCROLL_PASSES", "five");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAPRANK_MAX_SCROLL_PASSES"),
        "expected InvalidEnvVar(MAPRANK_MAX_SCROLL_PASSES), got: {result:?}"
    );
}

#[test]
fn default_location_can_be_overridden() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("MAPRANK_DEFAULT_LATITUDE", "34.7025");
    map.insert("MAPRANK_DEFAULT_LONGITUDE", "135.4959");
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((config.default_location.latitude - 34.7025).abs() < 1e-9);
    assert!((config.default_location.longitude - 135.4959).abs() < 1e-9);
}

#[test]
fn geocoder_endpoint_default_points_at_nominatim() {
    let map: HashMap<&str, &str> = HashMap::new();
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(config.geocoder_endpoint, "https://nominatim.openstreetmap.org");
}
