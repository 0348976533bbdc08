//! Tolerant in-page evaluation helpers.
//!
//! Extraction reads batches of rendered rows through one `JSON.stringify`
//! round-trip per scroll pass instead of element-by-element CDP calls; the
//! string comes back here and is deserialized on the Rust side, where the
//! field parsers live and are unit-tested. Every helper degrades to
//! `None`/`false` on failure.

use chromiumoxide::Page;
use serde::de::DeserializeOwned;

/// Runs `script` (an expression returning a `JSON.stringify` result) and
/// deserializes the payload. `None` on evaluation or parse failure.
pub(crate) async fn evaluate_json<T: DeserializeOwned>(page: &Page, script: &str) -> Option<T> {
    let evaluation = match page.evaluate(script).await {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(error = %e, "in-page evaluation failed");
            return None;
        }
    };
    let payload: String = match evaluation.into_value() {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "evaluation returned non-string payload");
            return None;
        }
    };
    match serde_json::from_str(&payload) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(error = %e, "evaluation payload did not deserialize");
            None
        }
    }
}

/// Scrolls the first container matching one of `selectors` down by `delta`
/// pixels. Returns whether a container was found and scrolled.
pub(crate) async fn scroll_container(page: &Page, selectors: &[&str], delta: u32) -> bool {
    let candidates = match serde_json::to_string(selectors) {
        Ok(json) => json,
        Err(_) => return false,
    };
    let script = format!(
        r"(() => {{
            const candidates = {candidates};
            for (const sel of candidates) {{
                const el = document.querySelector(sel);
                if (el) {{
                    el.scrollBy(0, {delta});
                    return true;
                }}
            }}
            window.scrollBy(0, {delta});
            return false;
        }})()"
    );
    match page.evaluate(script).await {
        Ok(result) => result.into_value::<bool>().unwrap_or(false),
        Err(e) => {
            tracing::debug!(error = %e, "scroll evaluation failed");
            false
        }
    }
}
