//! Scripted in-memory `FeedPage` shared by the integration tests.
//!
//! `FakePage` records every driver call it receives so tests can assert on the
//! exact interaction sequence. The rendered post list grows by one queued
//! batch after each enumeration, which stands in for the feed lazy-loading
//! more posts once the last one is scrolled into view.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use postscout_core::{AppConfig, Credentials};
use postscout_scraper::{selectors, DriverError, FeedPage, PostElement, WaitState};

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub attributes: HashMap<String, String>,
    /// Returned by `text_content`.
    pub text: String,
    /// Returned by `inner_text`.
    pub inner: String,
    /// Keyed by the exact selector string a caller passes.
    pub children: HashMap<String, FakeElement>,
    /// Every call fails, as if the node had been detached.
    pub detached: bool,
}

impl FakeElement {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            inner: text.to_string(),
            ..Self::default()
        }
    }

    pub fn detached() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, child: FakeElement) -> Self {
        self.children.insert(selector.to_string(), child);
        self
    }

    fn check(&self) -> Result<(), DriverError> {
        if self.detached {
            return Err(DriverError::Script("node is detached".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostElement for FakeElement {
    async fn query_selector(&self, selector: &str) -> Result<Option<Self>, DriverError> {
        self.check()?;
        Ok(self.children.get(selector).cloned())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.check()?;
        Ok(self.attributes.get(name).cloned())
    }

    async fn text_content(&self) -> Result<String, DriverError> {
        self.check()?;
        Ok(self.text.clone())
    }

    async fn inner_text(&self) -> Result<String, DriverError> {
        self.check()?;
        Ok(self.inner.clone())
    }

    async fn scroll_into_view(&self, _timeout: Duration) -> Result<(), DriverError> {
        self.check()
    }
}

/// A fully populated post with URN `urn:li:activity:{n}`.
pub fn post(n: usize) -> FakeElement {
    let body = format!("Post number {n} #rust https://example.com/{n}");
    FakeElement {
        inner: body.clone(),
        ..FakeElement::default()
    }
    .attr(selectors::POST_URN_ATTRIBUTE, &format!("urn:li:activity:{n}"))
    .child(
        selectors::AUTHOR_LINK,
        FakeElement::default().attr("href", "https://www.linkedin.com/in/someone"),
    )
    .child(selectors::POST_TIME, FakeElement::with_text("  2d  "))
    .child(selectors::POST_BODY, FakeElement::with_text(&body))
    .child(selectors::REACTIONS_COUNT, FakeElement::with_text("1\u{a0}234"))
    .child(selectors::COMMENTS_COUNT, FakeElement::with_text("17 comments"))
}

/// Posts `from..to`, built with [`post`].
pub fn posts(from: usize, to: usize) -> Vec<FakeElement> {
    (from..to).map(post).collect()
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Wait(String, WaitState),
    QueryAll(String),
    Fill(String, String),
    Click(String),
    Persist(PathBuf),
    Close,
}

#[derive(Debug, Default)]
struct State {
    rendered: Vec<FakeElement>,
    batches: VecDeque<Vec<FakeElement>>,
    calls: Vec<Call>,
    list_wait_failures: usize,
    landmark_missing: bool,
    navigation_fails: bool,
    enumeration_fails: bool,
    /// Polls remaining before a control becomes visible, by selector.
    hidden_for: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct FakePage {
    state: Mutex<State>,
}

impl FakePage {
    pub fn new(rendered: Vec<FakeElement>) -> Self {
        let page = Self::default();
        page.state().rendered = rendered;
        page
    }

    /// Appended to the rendered list one per enumeration, after it returns.
    pub fn with_batches(self, batches: Vec<Vec<FakeElement>>) -> Self {
        self.state().batches = batches.into();
        self
    }

    /// The first `n` waits for the post list time out.
    pub fn failing_list_waits(self, n: usize) -> Self {
        self.state().list_wait_failures = n;
        self
    }

    /// The post-login feed never appears.
    pub fn without_landmark(self) -> Self {
        self.state().landmark_missing = true;
        self
    }

    /// `selector` only becomes visible after `polls` checks, like a control
    /// the page builds after its load event.
    pub fn appearing_after(self, selector: &str, polls: usize) -> Self {
        self.state().hidden_for.insert(selector.to_string(), polls);
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.state().navigation_fails = true;
        self
    }

    pub fn failing_enumeration(self) -> Self {
        self.state().enumeration_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| **c == Call::Close)
            .count()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake page state poisoned")
    }

    fn record(&self, call: Call) {
        self.state().calls.push(call);
    }

    /// Polls until `selector` is visible or `timeout` elapses.
    async fn await_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let started = std::time::Instant::now();
        loop {
            let visible = {
                let mut st = self.state();
                match st.hidden_for.get_mut(selector) {
                    Some(remaining) if *remaining > 0 => {
                        *remaining -= 1;
                        false
                    }
                    _ => true,
                }
            };
            if visible {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(DriverError::timeout(selector, timeout));
            }
            tokio::time::sleep(POLL).await;
        }
    }
}

const POLL: Duration = Duration::from_millis(2);

fn timeout(what: &str) -> DriverError {
    DriverError::timeout(what, Duration::from_millis(10))
}

#[async_trait]
impl FeedPage for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.record(Call::Navigate(url.to_string()));
        if self.state().navigation_fails {
            return Err(timeout(url));
        }
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _timeout: Duration,
        state: WaitState,
    ) -> Result<(), DriverError> {
        self.record(Call::Wait(selector.to_string(), state));
        let mut st = self.state();
        if selector == selectors::POST_LIST_ITEM && st.list_wait_failures > 0 {
            st.list_wait_failures -= 1;
            return Err(timeout(selector));
        }
        if selector == selectors::FEED_LANDMARK && st.landmark_missing {
            return Err(timeout(selector));
        }
        Ok(())
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<FakeElement>, DriverError> {
        self.record(Call::QueryAll(selector.to_string()));
        let mut st = self.state();
        if st.enumeration_fails {
            return Err(DriverError::Script("execution context destroyed".to_string()));
        }
        let snapshot = st.rendered.clone();
        if let Some(batch) = st.batches.pop_front() {
            st.rendered.extend(batch);
        }
        Ok(snapshot)
    }

    async fn fill(
        &self,
        selector: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.await_visible(selector, timeout).await?;
        self.record(Call::Fill(selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.await_visible(selector, timeout).await?;
        self.record(Call::Click(selector.to_string()));
        Ok(())
    }

    async fn persist_session_state(&self, path: &Path) -> Result<(), DriverError> {
        self.record(Call::Persist(path.to_path_buf()));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DriverError::SessionIo {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, "[]").map_err(|source| DriverError::SessionIo {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.record(Call::Close);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub const PROFILE_URL: &str = "https://www.linkedin.com/in/someone/";
pub const LOGIN_URL: &str = "https://www.linkedin.com/login";

/// Config rooted in `dir` with short timeouts and test credentials.
pub fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        profile_url: PROFILE_URL.to_string(),
        login_url: LOGIN_URL.to_string(),
        credentials: Some(Credentials::new("me@example.com", "hunter2")),
        min_posts: 3,
        deadline_secs: 5,
        timeout_ms: 50,
        scroll_timeout_ms: 50,
        out_dir: dir.join("out"),
        output_file: "li_posts.json".to_string(),
        user_data_dir: dir.join("_user_data"),
        chrome_path: None,
        headless: true,
        log_level: "debug".to_string(),
    }
}

/// Marks `config` as already signed in.
pub fn seed_session(config: &AppConfig) {
    let path = config.session_state_path();
    std::fs::create_dir_all(path.parent().expect("session path has a parent"))
        .expect("create user data dir");
    std::fs::write(path, "[]").expect("write session file");
}
