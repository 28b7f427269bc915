//! Ensures the browser is signed in before collection starts.
//!
//! A session file on disk means an earlier run already signed in; the browser
//! profile directory holds the actual cookies, so the gate skips the login
//! form entirely. The file's contents are never inspected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use postscout_core::{AppConfig, Credentials};
use tracing::{Instrument, Span};

use crate::driver::{FeedPage, WaitState};
use crate::error::{millis, ScraperError};
use crate::pacing::Pacing;
use crate::selectors;

/// Whether a persisted session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Authenticated,
}

/// How [`SessionGate::ensure`] reached the authenticated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    /// A persisted session was found; no login was performed.
    Reused,
    /// The login form was submitted and the new session persisted.
    LoggedIn,
}

#[derive(Debug)]
pub struct SessionGate {
    state_path: PathBuf,
    login_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
    pacing: Pacing,
    span: Span,
}

impl SessionGate {
    #[must_use]
    pub fn new(
        state_path: impl Into<PathBuf>,
        login_url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
        pacing: Pacing,
        span: Span,
    ) -> Self {
        Self {
            state_path: state_path.into(),
            login_url: login_url.into(),
            credentials,
            timeout,
            pacing,
            span,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig, pacing: Pacing, span: Span) -> Self {
        Self::new(
            config.session_state_path(),
            config.login_url.clone(),
            config.credentials.clone(),
            config.timeout(),
            pacing,
            span,
        )
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        session_state_at(&self.state_path)
    }

    /// Signs in unless a persisted session already exists.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingCredentials`] if no session exists and no
    ///   credentials were supplied.
    /// - [`ScraperError::LoginFailed`] if the post-login feed never appears
    ///   within the timeout. Not retried.
    /// - [`ScraperError::Driver`] if navigation, form input or persisting the
    ///   session fails.
    pub async fn ensure<P: FeedPage>(&self, page: &P) -> Result<Authentication, ScraperError> {
        let span = self.span.clone();
        self.authenticate(page).instrument(span).await
    }

    async fn authenticate<P: FeedPage>(&self, page: &P) -> Result<Authentication, ScraperError> {
        if self.state() == SessionState::Authenticated {
            tracing::info!(path = %self.state_path.display(), "existing session found; skipping login");
            return Ok(Authentication::Reused);
        }

        let Some(credentials) = &self.credentials else {
            return Err(ScraperError::MissingCredentials {
                path: self.state_path.clone(),
            });
        };

        tracing::info!("no existing session found; logging in");
        page.navigate(&self.login_url, self.timeout).await?;
        self.pacing.settle().await;

        page.fill(selectors::LOGIN_FIELD, &credentials.login, self.timeout)
            .await?;
        page.fill(selectors::PASSWORD_FIELD, &credentials.password, self.timeout)
            .await?;
        page.click(selectors::LOGIN_SUBMIT, self.timeout).await?;

        if let Err(source) = page
            .wait_for_selector(selectors::FEED_LANDMARK, self.timeout, WaitState::Attached)
            .await
        {
            tracing::error!("login failed; check credentials or connectivity");
            return Err(ScraperError::LoginFailed {
                selector: selectors::FEED_LANDMARK.to_owned(),
                timeout_ms: millis(self.timeout),
                source,
            });
        }

        page.persist_session_state(&self.state_path).await?;
        tracing::info!(path = %self.state_path.display(), "login successful; session saved");
        Ok(Authentication::LoggedIn)
    }
}

/// Session state implied by the file at `path`. Presence is all that counts.
#[must_use]
pub fn session_state_at(path: &Path) -> SessionState {
    if path.exists() {
        SessionState::Authenticated
    } else {
        SessionState::NoSession
    }
}
