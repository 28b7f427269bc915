//! Scroll-driven collection of posts from a profile's activity feed.
//!
//! The feed lazy-loads: scrolling the last rendered post into view makes the
//! page append more. Each iteration enumerates the rendered posts, scrolls to
//! the last one, then extracts every post past the cursor.
//!
//! ## Cursor
//!
//! `cursor` is the number of posts already extracted, and therefore the index
//! of the first unprocessed element. It only moves forward. This relies on the
//! feed rendering append-only and order-stable; a virtualized list that drops
//! or reorders earlier nodes would make the cursor skip or repeat posts, and
//! nothing here re-validates identity against what was already collected.

use std::time::Duration;

use postscout_core::{AppConfig, PostRecord};
use tokio::time::Instant;
use tracing::{Instrument, Span};

use crate::driver::{FeedPage, PostElement, WaitState};
use crate::error::ScraperError;
use crate::extract::extract_post;
use crate::pacing::Pacing;
use crate::selectors;

#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Stop once at least this many posts are collected.
    pub min_posts: usize,
    /// Wall-clock budget for the loop, measured from its first iteration.
    pub deadline: Duration,
    /// Bound on navigation and on the per-iteration wait for the post list.
    pub timeout: Duration,
    /// Bound on scrolling the last post into view.
    pub scroll_timeout: Duration,
    pub pacing: Pacing,
}

impl CollectOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig, pacing: Pacing) -> Self {
        Self {
            min_posts: config.min_posts,
            deadline: config.deadline(),
            timeout: config.timeout(),
            scroll_timeout: config.scroll_timeout(),
            pacing,
        }
    }
}

/// Outcome of a single [`CollectionLoop::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The post list never became visible; nothing was read.
    NotReady,
    /// The list was read. `rendered` elements were on the page, `collected`
    /// of them were new.
    Scanned { rendered: usize, collected: usize },
}

pub struct CollectionLoop<'p, P: FeedPage> {
    page: &'p P,
    options: CollectOptions,
    span: Span,
    posts: Vec<PostRecord>,
    cursor: usize,
}

impl<'p, P: FeedPage> CollectionLoop<'p, P> {
    /// `span` is the run's logging context; every event this loop emits is
    /// recorded inside it.
    #[must_use]
    pub fn new(page: &'p P, options: CollectOptions, span: Span) -> Self {
        Self {
            page,
            options,
            span,
            posts: Vec::new(),
            cursor: 0,
        }
    }

    /// Opens the profile and follows its link to the recent-activity feed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Driver`] if navigation fails or the activity
    /// link does not become clickable within the operation timeout.
    pub async fn open_activity_feed(&self, profile_url: &str) -> Result<(), ScraperError> {
        let span = self.span.clone();
        self.follow_activity_link(profile_url).instrument(span).await
    }

    async fn follow_activity_link(&self, profile_url: &str) -> Result<(), ScraperError> {
        tracing::info!(profile_url, "opening activity feed");
        self.page.navigate(profile_url, self.options.timeout).await?;
        self.options.pacing.settle().await;

        self.page
            .click(selectors::RECENT_ACTIVITY_LINK, self.options.timeout)
            .await?;
        self.options.pacing.settle().await;
        Ok(())
    }

    /// Collects until `min_posts` is reached or the deadline passes.
    ///
    /// Reaching the deadline with fewer posts is not an error; whatever was
    /// collected is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Driver`] on any non-transient browser failure
    /// (enumerating posts, scrolling). Posts collected so far are dropped.
    pub async fn run(mut self) -> Result<Vec<PostRecord>, ScraperError> {
        let span = self.span.clone();
        self.run_until_done().instrument(span).await?;
        Ok(self.posts)
    }

    async fn run_until_done(&mut self) -> Result<(), ScraperError> {
        let started = Instant::now();
        let deadline = self.options.deadline;

        while self.cursor < self.options.min_posts && started.elapsed() < deadline {
            self.step_once().await?;
            let remaining = deadline.saturating_sub(started.elapsed());
            self.options.pacing.between_iterations(remaining).await;
        }

        if self.cursor < self.options.min_posts {
            tracing::warn!(
                collected = self.cursor,
                min_posts = self.options.min_posts,
                deadline_secs = deadline.as_secs(),
                "deadline reached before post threshold"
            );
        }
        Ok(())
    }

    /// Performs one wait → enumerate → scroll → extract pass.
    ///
    /// Elements at indices below the cursor are never re-extracted, so a step
    /// that finds no newly rendered posts leaves the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Driver`] if enumerating posts or scrolling fails.
    /// A post list that does not become visible is reported as
    /// [`Step::NotReady`], not as an error.
    pub async fn step(&mut self) -> Result<Step, ScraperError> {
        let span = self.span.clone();
        self.step_once().instrument(span).await
    }

    async fn step_once(&mut self) -> Result<Step, ScraperError> {
        if let Err(err) = self
            .page
            .wait_for_selector(
                selectors::POST_LIST_ITEM,
                self.options.timeout,
                WaitState::Visible,
            )
            .await
        {
            tracing::warn!(error = %err, "post list not visible yet; retrying");
            return Ok(Step::NotReady);
        }

        let elements = self.page.query_selector_all(selectors::POST).await?;
        tracing::info!(
            total_found = elements.len(),
            "scrolling to last visible post"
        );

        if let Some(last) = elements.last() {
            last.scroll_into_view(self.options.scroll_timeout).await?;
        }
        self.options.pacing.settle().await;

        let rendered = elements.len();
        let before = self.cursor;
        for element in elements.iter().skip(self.cursor) {
            let post = extract_post(element).await;
            tracing::info!(
                index = self.cursor + 1,
                id = %post.id,
                chars = post.text.chars().count(),
                "collected post"
            );
            self.posts.push(post);
            self.cursor += 1;
        }

        Ok(Step::Scanned {
            rendered,
            collected: self.cursor - before,
        })
    }

    /// Posts collected so far, in collection order.
    #[must_use]
    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    /// Index of the first element not yet extracted.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
