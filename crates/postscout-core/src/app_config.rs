use std::path::PathBuf;
use std::time::Duration;

/// Minimum post count used when the operator gives nothing usable.
pub const DEFAULT_MIN_POSTS: usize = 10;

/// Login identifier and secret for the feed's sign-in form.
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Runtime settings for one collection run.
///
/// `Debug` is safe to log: [`Credentials`] redacts the password.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub profile_url: String,
    pub login_url: String,
    pub credentials: Option<Credentials>,
    pub min_posts: usize,
    pub deadline_secs: u64,
    pub timeout_ms: u64,
    pub scroll_timeout_ms: u64,
    pub out_dir: PathBuf,
    pub output_file: String,
    pub user_data_dir: PathBuf,
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub log_level: String,
}

impl AppConfig {
    /// Where the JSON report is written.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join(&self.output_file)
    }

    /// Where the run log is mirrored.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.out_dir.join("run.log")
    }

    /// Marker file whose presence means a login has already succeeded.
    #[must_use]
    pub fn session_state_path(&self) -> PathBuf {
        self.user_data_dir.join("_ctx.json")
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn scroll_timeout(&self) -> Duration {
        Duration::from_millis(self.scroll_timeout_ms)
    }
}
