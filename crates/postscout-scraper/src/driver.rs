//! Browser-automation seam.
//!
//! The collection loop, session gate and field extractors are written against
//! these traits rather than a concrete CDP client. [`crate::chromium`]
//! provides the production implementation; the integration tests drive the
//! same code with a scripted in-memory page.
//!
//! Every method is a suspension point. Callers never issue two of them
//! concurrently against the same page.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;

/// Condition a [`FeedPage::wait_for_selector`] call waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// The element exists in the DOM.
    Attached,
    /// The element exists and has a non-empty rendered box.
    Visible,
}

/// One element of a rendered page, typically a feed post or one of its
/// descendants.
#[async_trait]
pub trait PostElement: Send + Sync + Sized {
    /// First descendant matching `selector`, or `None` when nothing matches.
    async fn query_selector(&self, selector: &str) -> Result<Option<Self>, DriverError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;

    /// Raw `textContent` (includes text of hidden nodes).
    async fn text_content(&self) -> Result<String, DriverError>;

    /// Rendered `innerText`.
    async fn inner_text(&self) -> Result<String, DriverError>;

    async fn scroll_into_view(&self, timeout: Duration) -> Result<(), DriverError>;
}

/// A browser tab showing the feed, plus the browsing context it lives in.
#[async_trait]
pub trait FeedPage: Send + Sync {
    type Element: PostElement;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Resolves once `selector` reaches `state`, or fails with
    /// [`DriverError::Timeout`].
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
        state: WaitState,
    ) -> Result<(), DriverError>;

    /// All elements matching `selector`, in document order.
    async fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;

    /// Waits up to `timeout` for `selector` to become visible, clears the
    /// field, then types `value` into it.
    async fn fill(
        &self,
        selector: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Waits up to `timeout` for `selector` to become visible, then clicks it.
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Writes the authenticated context state to `path`.
    async fn persist_session_state(&self, path: &Path) -> Result<(), DriverError>;

    /// Releases the page and its browser. Safe to call more than once.
    async fn close(&self) -> Result<(), DriverError>;
}
