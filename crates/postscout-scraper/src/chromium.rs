//! [`FeedPage`] implementation over a real Chrome/Chromium via `chromiumoxide`.
//!
//! One browser process per run, launched against a persistent profile
//! directory so cookies survive between runs. The CDP event handler is driven
//! on its own task for as long as the browser is open.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use postscout_core::AppConfig;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::driver::{FeedPage, PostElement, WaitState};
use crate::error::DriverError;

/// How often `wait_for_selector` re-queries the DOM.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const TEXT_CONTENT_JS: &str = "function() { return this.textContent; }";
const CLEAR_VALUE_JS: &str = "function() { \
    this.value = ''; \
    this.dispatchEvent(new Event('input', { bubbles: true })); \
}";
const IS_VISIBLE_JS: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    const s = window.getComputedStyle(this); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; \
}";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub user_data_dir: PathBuf,
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
}

impl LaunchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            user_data_dir: config.user_data_dir.clone(),
            chrome_path: config.chrome_path.clone(),
            headless: config.headless,
        }
    }
}

/// Subset of a CDP cookie written to the session file.
#[derive(Debug, Serialize)]
struct StoredCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    expires: f64,
    http_only: bool,
    secure: bool,
}

struct Running {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// A single tab in a browser this process launched.
pub struct ChromiumPage {
    page: Page,
    running: Mutex<Option<Running>>,
}

impl ChromiumPage {
    /// Launches the browser and opens a blank tab.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Launch`] if the browser configuration is invalid
    /// or the profile directory cannot be created, and [`DriverError::Cdp`] if
    /// the process fails to start or the tab cannot be opened.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, DriverError> {
        std::fs::create_dir_all(&options.user_data_dir).map_err(|e| {
            DriverError::Launch(format!(
                "cannot create profile directory {}: {e}",
                options.user_data_dir.display()
            ))
        })?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(&options.user_data_dir)
            .viewport(None);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut events) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(err) = event {
                    tracing::debug!(error = %err, "browser event handler error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                shutdown(Running { browser, handler }).await;
                return Err(err.into());
            }
        };
        tracing::debug!(headless = options.headless, "browser launched");

        Ok(Self {
            page,
            running: Mutex::new(Some(Running { browser, handler })),
        })
    }

    /// First match for `selector` once it is visible. Pages render controls
    /// after the load event, so acting on an immediate lookup races them.
    async fn find_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element, DriverError> {
        self.wait_for_selector(selector, timeout, WaitState::Visible).await?;
        self.find(selector).await
    }

    async fn find(&self, selector: &str) -> Result<Element, DriverError> {
        self.page
            .find_elements(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound {
                selector: selector.to_owned(),
            })
    }
}

#[async_trait]
impl FeedPage for ChromiumPage {
    type Element = ChromiumElement;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        bounded(format!("navigation to {url}"), timeout, async {
            self.page.goto(url).await?;
            Ok::<(), DriverError>(())
        })
        .await
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
        state: WaitState,
    ) -> Result<(), DriverError> {
        bounded(format!("selector \"{selector}\""), timeout, async {
            loop {
                if let Ok(element) = self.find(selector).await {
                    let ready = match state {
                        WaitState::Attached => true,
                        WaitState::Visible => is_visible(&element).await?,
                    };
                    if ready {
                        return Ok::<(), DriverError>(());
                    }
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<ChromiumElement>, DriverError> {
        let elements = self.page.find_elements(selector).await?;
        Ok(elements.into_iter().map(ChromiumElement).collect())
    }

    async fn fill(
        &self,
        selector: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let element = self.find_visible(selector, timeout).await?;
        element.call_js_fn(CLEAR_VALUE_JS, false).await?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.find_visible(selector, timeout).await?.click().await?;
        Ok(())
    }

    async fn persist_session_state(&self, path: &Path) -> Result<(), DriverError> {
        let cookies: Vec<StoredCookie> = self
            .page
            .get_cookies()
            .await?
            .into_iter()
            .map(|c| StoredCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                expires: c.expires,
                http_only: c.http_only,
                secure: c.secure,
            })
            .collect();
        let body = serde_json::to_vec_pretty(&cookies)?;

        let io_err = |source| DriverError::SessionIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, body).map_err(io_err)
    }

    async fn close(&self) -> Result<(), DriverError> {
        if let Some(running) = self.running.lock().await.take() {
            shutdown(running).await;
        }
        Ok(())
    }
}

/// A DOM element inside a [`ChromiumPage`].
pub struct ChromiumElement(Element);

#[async_trait]
impl PostElement for ChromiumElement {
    async fn query_selector(&self, selector: &str) -> Result<Option<Self>, DriverError> {
        let found = self.0.find_elements(selector).await?;
        Ok(found.into_iter().next().map(ChromiumElement))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.0.attribute(name).await?)
    }

    async fn text_content(&self) -> Result<String, DriverError> {
        let returns = self.0.call_js_fn(TEXT_CONTENT_JS, false).await?;
        match returns.result.value {
            Some(serde_json::Value::String(text)) => Ok(text),
            Some(serde_json::Value::Null) | None => Ok(String::new()),
            Some(other) => Err(DriverError::Script(format!(
                "textContent returned {other}"
            ))),
        }
    }

    async fn inner_text(&self) -> Result<String, DriverError> {
        Ok(self.0.inner_text().await?.unwrap_or_default())
    }

    async fn scroll_into_view(&self, timeout: Duration) -> Result<(), DriverError> {
        bounded("scroll into view", timeout, async {
            self.0.scroll_into_view().await?;
            Ok::<(), DriverError>(())
        })
        .await
    }
}

async fn is_visible(element: &Element) -> Result<bool, DriverError> {
    let returns = element.call_js_fn(IS_VISIBLE_JS, false).await?;
    Ok(returns
        .result
        .value
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}

/// Runs `operation`, failing with [`DriverError::Timeout`] after `timeout`.
async fn bounded<T, Fut>(
    what: impl Into<String>,
    timeout: Duration,
    operation: Fut,
) -> Result<T, DriverError>
where
    Fut: Future<Output = Result<T, DriverError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::timeout(what, timeout)),
    }
}

async fn shutdown(mut running: Running) {
    if let Err(err) = running.browser.close().await {
        tracing::warn!(error = %err, "browser did not acknowledge close");
    }
    if let Err(err) = running.browser.wait().await {
        tracing::warn!(error = %err, "failed waiting for browser process to exit");
    }
    running.handler.abort();
    tracing::debug!("browser closed");
}
