use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures reported by the browser-automation surface.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("no element matches selector \"{selector}\"")]
    NotFound { selector: String },

    #[error("element \"{selector}\" has no \"{attribute}\" attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("unexpected script result: {0}")]
    Script(String),

    #[error("session state I/O error at {path}: {source}")]
    SessionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session state serialization error: {0}")]
    SessionSerialize(#[from] serde_json::Error),
}

impl DriverError {
    /// Builds a [`DriverError::Timeout`] from a `Duration`.
    #[must_use]
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout_ms: millis(timeout),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("no saved session at {path} and no credentials were supplied")]
    MissingCredentials { path: PathBuf },

    #[error("login failed: \"{selector}\" did not appear within {timeout_ms}ms")]
    LoginFailed {
        selector: String,
        timeout_ms: u64,
        #[source]
        source: DriverError,
    },

    #[error("failed to write report to {path}: {source}")]
    ReportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
