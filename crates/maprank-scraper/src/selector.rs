//! Selector fallback: the resilience primitive against markup drift.
//!
//! The map UI ships no public API and renames its CSS classes without
//! notice, so every extraction step that depends on page structure goes
//! through this resolver: an ordered list of candidate query patterns is
//! probed first-match-wins within a bounded wait. A miss degrades the
//! specific field being extracted, never the whole call — these functions
//! return `None` instead of erroring.

use std::time::Duration;

use chromiumoxide::{Element, Page};
use tokio::time::Instant;

/// Delay between probe sweeps over the candidate list.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Probes `candidates` in priority order until one matches or `timeout`
/// elapses. Returns the first element found, or `None` when no candidate
/// resolves in time. Never errors.
pub async fn try_selectors(page: &Page, candidates: &[&str], timeout: Duration) -> Option<Element> {
    let deadline = Instant::now() + timeout;
    loop {
        for selector in candidates {
            if let Ok(element) = page.find_element(*selector).await {
                tracing::debug!(selector, "selector resolved");
                return Some(element);
            }
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    tracing::warn!(?candidates, "no selector candidate resolved within timeout");
    None
}

/// Like [`try_selectors`], but returns the *pattern* that matched rather
/// than the element. Used for repeating row queries: the caller re-runs the
/// winning pattern on every scroll pass instead of re-probing the whole
/// candidate list.
pub async fn resolve_selector<'a>(
    page: &Page,
    candidates: &'a [&'a str],
    timeout: Duration,
) -> Option<&'a str> {
    let deadline = Instant::now() + timeout;
    loop {
        for selector in candidates {
            if page.find_element(*selector).await.is_ok() {
                tracing::debug!(selector, "selector pattern resolved");
                return Some(selector);
            }
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    tracing::warn!(?candidates, "no selector pattern resolved within timeout");
    None
}

/// Resolves the first matching candidate and reads its inner text.
/// `None` when nothing matches or the element has no text.
pub async fn resolve_text(page: &Page, candidates: &[&str], timeout: Duration) -> Option<String> {
    let element = try_selectors(page, candidates, timeout).await?;
    element
        .inner_text()
        .await
        .ok()
        .flatten()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolves the first matching candidate and reads one of its attributes.
pub async fn resolve_attribute(
    page: &Page,
    candidates: &[&str],
    attribute: &str,
    timeout: Duration,
) -> Option<String> {
    let element = try_selectors(page, candidates, timeout).await?;
    element.attribute(attribute).await.ok().flatten()
}
