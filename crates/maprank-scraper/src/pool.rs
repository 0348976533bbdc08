//! Browser engine pool.
//!
//! Owns one Chromium process and issues isolated, configured browsing
//! contexts one at a time. The engine is relaunched when a reuse threshold
//! is exceeded (bounding the memory growth of a long-lived renderer) or
//! when the requested headless mode differs from the last launch.
//!
//! Access is serialized at compile time: every operation takes `&mut self`,
//! so two callers cannot race context creation against each other. Callers
//! that need to share a pool across tasks wrap it in a `tokio::sync::Mutex`.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    BrowserContextId, GrantPermissionsParams, PermissionType,
};
use chromiumoxide::cdp::browser_protocol::emulation::SetGeolocationOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use maprank_core::{AppConfig, GeoLocation};
use tokio::task::JoinHandle;

use crate::error::ScraperError;

/// Reported GPS accuracy for the geolocation override, in meters.
const GEOLOCATION_ACCURACY_M: f64 = 100.0;

/// Per-call overrides for context creation. Unset fields fall back to the
/// pool's configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextOptions {
    pub headless: Option<bool>,
    pub geolocation: Option<GeoLocation>,
}

struct Engine {
    browser: Browser,
    handler_task: JoinHandle<()>,
    headless: bool,
    /// Contexts issued since this engine was launched.
    contexts_issued: u32,
}

struct ActiveContext {
    id: BrowserContextId,
    page: Page,
}

/// One browser process, one live context at a time.
pub struct BrowserPool {
    config: AppConfig,
    engine: Option<Engine>,
    current: Option<ActiveContext>,
}

impl BrowserPool {
    /// Creates a pool. The engine process is launched lazily on the first
    /// [`Self::context`] call.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            engine: None,
            current: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns a freshly created, isolated browsing context as a ready page:
    /// fixed window size, locale, user agent, geolocation override with the
    /// matching permission granted.
    ///
    /// Relaunches the engine first iff no engine exists, the reuse threshold
    /// has been exceeded, or the requested headless mode differs from the
    /// last launch. The previous context is always closed before the new one
    /// is created — there are never two live contexts, which is what isolates
    /// cookies and session state between calls.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] or [`ScraperError::Cdp`] when the
    /// engine cannot be launched or the context cannot be configured.
    pub async fn context(&mut self, options: &ContextOptions) -> Result<Page, ScraperError> {
        let headless = options.headless.unwrap_or(self.config.headless);

        if needs_relaunch(
            self.engine
                .as_ref()
                .map(|e| (e.headless, e.contexts_issued)),
            headless,
            self.config.browser_recycle_threshold,
        ) {
            self.teardown_engine().await;
            let engine = launch_engine(&self.config, headless).await?;
            tracing::info!(headless, "browser engine launched");
            self.engine = Some(engine);
        }

        self.dispose_current_context().await;

        let Some(engine) = self.engine.as_mut() else {
            return Err(ScraperError::Launch(
                "engine unavailable after relaunch".to_string(),
            ));
        };

        let context_id = engine
            .browser
            .execute(CreateBrowserContextParams::default())
            .await?
            .result
            .browser_context_id;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(ScraperError::Launch)?;
        let page = engine.browser.new_page(target).await?;

        let mut ua_override = SetUserAgentOverrideParams::new(self.config.user_agent.clone());
        ua_override.accept_language = Some(self.config.locale.clone());
        page.execute(ua_override).await?;

        let geolocation = options
            .geolocation
            .unwrap_or(self.config.default_location);
        engine
            .browser
            .execute(GrantPermissionsParams {
                permissions: vec![PermissionType::Geolocation],
                origin: None,
                browser_context_id: Some(context_id.clone()),
            })
            .await?;
        page.execute(SetGeolocationOverrideParams {
            latitude: Some(geolocation.latitude),
            longitude: Some(geolocation.longitude),
            accuracy: Some(GEOLOCATION_ACCURACY_M),
            ..SetGeolocationOverrideParams::default()
        })
        .await?;

        engine.contexts_issued += 1;
        tracing::debug!(
            contexts_issued = engine.contexts_issued,
            latitude = geolocation.latitude,
            longitude = geolocation.longitude,
            "browsing context created"
        );

        self.current = Some(ActiveContext {
            id: context_id,
            page: page.clone(),
        });
        Ok(page)
    }

    /// Best-effort teardown of context then engine. Close-time errors are
    /// swallowed; counters reset with the engine.
    pub async fn close(&mut self) {
        self.dispose_current_context().await;
        self.teardown_engine().await;
    }

    async fn dispose_current_context(&mut self) {
        let Some(context) = self.current.take() else {
            return;
        };
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let _ = context.page.close().await;
        let _ = engine
            .browser
            .execute(DisposeBrowserContextParams::new(context.id))
            .await;
    }

    async fn teardown_engine(&mut self) {
        // Any live page dies with the engine process.
        self.current = None;
        let Some(mut engine) = self.engine.take() else {
            return;
        };
        let _ = engine.browser.close().await;
        let _ = engine.browser.wait().await;
        engine.handler_task.abort();
        tracing::debug!("browser engine shut down");
    }
}

/// Relaunch decision: no engine, reuse threshold exceeded, or headless mode
/// changed since the last launch.
fn needs_relaunch(
    engine: Option<(bool, u32)>,
    requested_headless: bool,
    recycle_threshold: u32,
) -> bool {
    match engine {
        None => true,
        Some((headless, contexts_issued)) => {
            contexts_issued >= recycle_threshold || headless != requested_headless
        }
    }
}

async fn launch_engine(config: &AppConfig, headless: bool) -> Result<Engine, ScraperError> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .window_size(config.viewport_width, config.viewport_height)
        .arg(format!("--lang={}", config.locale))
        .args(vec![
            "--disable-blink-features=AutomationControlled",
            "--disable-dev-shm-usage",
            "--no-first-run",
            "--no-default-browser-check",
        ]);
    if !headless {
        builder = builder.with_head();
    }
    let browser_config = builder.build().map_err(ScraperError::Launch)?;

    let (browser, mut handler) = Browser::launch(browser_config).await?;
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!(error = %e, "browser event error");
            }
        }
    });

    Ok(Engine {
        browser,
        handler_task,
        headless,
        contexts_issued: 0,
    })
}

/// Navigates `page` to `url` and waits for the load to settle, bounded by
/// `timeout_secs`.
pub(crate) async fn navigate(
    page: &Page,
    url: &str,
    timeout_secs: u64,
) -> Result<(), ScraperError> {
    let navigation = async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<(), chromiumoxide::error::CdpError>(())
    };
    match tokio::time::timeout(Duration::from_secs(timeout_secs), navigation).await {
        Ok(result) => result.map_err(ScraperError::from),
        Err(_) => Err(ScraperError::NavigationTimeout {
            url: url.to_string(),
            timeout_secs,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaunches_when_no_engine_exists() {
        assert!(needs_relaunch(None, true, 10));
    }

    #[test]
    fn relaunches_when_threshold_reached() {
        assert!(needs_relaunch(Some((true, 10)), true, 10));
        assert!(needs_relaunch(Some((true, 11)), true, 10));
    }

    #[test]
    fn relaunches_when_headless_mode_changes() {
        assert!(needs_relaunch(Some((true, 0)), false, 10));
        assert!(needs_relaunch(Some((false, 3)), true, 10));
    }

    #[test]
    fn reuses_engine_below_threshold_with_same_mode() {
        assert!(!needs_relaunch(Some((true, 9)), true, 10));
        assert!(!needs_relaunch(Some((false, 0)), false, 10));
    }
}
