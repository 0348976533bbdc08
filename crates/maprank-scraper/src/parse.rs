//! Numeric and relative-time parsing for accessible labels and review text.
//!
//! All functions here are pure and total: malformed input yields `None`
//! (or a documented default), never an error. They operate on whatever
//! string the UI happened to render, which varies with locale and drifts
//! over time, so each parser keys on the loosest pattern that is still
//! unambiguous.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
/// Months and years are approximated the way the UI's own relative
/// formatter rounds them: 30 and 365 days.
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// Localized relative-time patterns, probed in order. Each captures an
/// optional count; `a`/`an`/missing count means 1.
const RELATIVE_TIME_PATTERNS: [(&str, i64); 12] = [
    (r"(\d+)\s*分前", MINUTE_MS),
    (r"(\d+)\s*時間前", HOUR_MS),
    (r"(\d+)\s*日前", DAY_MS),
    (r"(\d+)\s*週間前", WEEK_MS),
    (r"(\d+)\s*[かヶヵカ]月前", MONTH_MS),
    (r"(\d+)\s*年前", YEAR_MS),
    (r"(\d+|a|an)\s+minutes?\s+ago", MINUTE_MS),
    (r"(\d+|an)\s+hours?\s+ago", HOUR_MS),
    (r"(\d+|a)\s+days?\s+ago", DAY_MS),
    (r"(\d+|a)\s+weeks?\s+ago", WEEK_MS),
    (r"(\d+|a)\s+months?\s+ago", MONTH_MS),
    (r"(\d+|a)\s+years?\s+ago", YEAR_MS),
];

/// Converts a human-readable elapsed-time string ("3日前", "2 weeks ago")
/// into an absolute timestamp relative to `now`.
///
/// Returns `None` for text that matches no known pattern — a normal outcome
/// for drifting localized strings, not an error.
#[must_use]
pub fn parse_relative_time(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lowered = text.trim().to_lowercase();
    for (pattern, unit_ms) in RELATIVE_TIME_PATTERNS {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(caps) = re.captures(&lowered) {
            let raw = caps.get(1).map_or("1", |m| m.as_str());
            let count: i64 = match raw {
                "a" | "an" => 1,
                digits => digits.parse().ok()?,
            };
            return Some(now - Duration::milliseconds(count * unit_ms));
        }
    }
    None
}

/// First numeric token of an accessible rating label: `"4.3 つ星"` → `4.3`,
/// `"Rated 4.5 out of 5"` → `4.5`.
#[must_use]
pub fn parse_rating_label(label: &str) -> Option<f64> {
    let re = Regex::new(r"(\d+(?:\.\d+)?)").expect("valid regex");
    re.captures(label)?.get(1)?.as_str().parse().ok()
}

/// First count pattern of a review-count rendering, comma-stripped:
/// `"(1,234)"` → `1234`, `"1,234 件のクチコミ"` → `1234`, `"56 reviews"` → `56`.
#[must_use]
pub fn parse_review_count(text: &str) -> Option<u32> {
    let patterns = [
        r"\(([\d,]+)\)",
        r"([\d,]+)\s*件",
        r"([\d,]+)\s*(?:reviews?|Reviews?|クチコミ|レビュー)",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(caps) = re.captures(text) {
            let digits = caps.get(1)?.as_str().replace(',', "");
            if let Ok(count) = digits.parse() {
                return Some(count);
            }
        }
    }
    None
}

/// Star rating digit from a per-review accessible label: `"星 5 つ"`,
/// `"5 stars"` and `"5 つ星"` all yield `5`. Only 1–5 are accepted.
#[must_use]
pub fn parse_star_rating(label: &str) -> Option<u8> {
    let digit = label.chars().find_map(|c| c.to_digit(10))?;
    u8::try_from(digit).ok().filter(|d| (1..=5).contains(d))
}

/// Deterministic review identifier: a 32-bit rolling polynomial hash
/// (`h = h*31 + code_unit`, wrapping) over the UTF-16 code units of
/// `author + relative_time + rating`, emitted as lowercase hex of the
/// absolute value.
///
/// Review text is deliberately excluded, so two reviews sharing author,
/// relative time and rating collide — documented behavior, not a defect.
#[must_use]
pub fn generate_review_id(author: &str, relative_time: &str, rating: u8) -> String {
    let seed = format!("{author}{relative_time}{rating}");
    let mut hash: i32 = 0;
    for unit in seed.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    format!("{:x}", hash.unsigned_abs())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod parse_test;
