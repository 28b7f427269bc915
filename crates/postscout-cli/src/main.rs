mod logging;
mod prompt;

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use postscout_scraper::session::session_state_at;
use postscout_scraper::SessionState;

#[derive(Debug, Parser)]
#[command(name = "postscout")]
#[command(about = "Collect recent posts from a profile's activity feed into a JSON report")]
struct Cli {
    /// Profile whose activity feed is collected.
    #[arg(long)]
    profile_url: Option<String>,

    /// Stop once at least this many posts are collected. Non-numeric means 10.
    #[arg(long, env = "POSTSCOUT_MIN_POSTS")]
    min_posts: Option<String>,

    /// Login identifier. The password is read from `POSTSCOUT_PASSWORD` or
    /// prompted for.
    #[arg(long, env = "POSTSCOUT_LOGIN")]
    login: Option<String>,

    /// Run the browser without a window.
    #[arg(long)]
    headless: bool,

    /// Directory for the report and the run log.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Give up collecting after this many seconds.
    #[arg(long)]
    deadline_secs: Option<u64>,
}

impl Cli {
    /// Flag values keyed by the env var each one overrides.
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        let mut set = |var: &str, value: String| {
            overrides.insert(var.to_string(), value);
        };

        if let Some(url) = &self.profile_url {
            set("POSTSCOUT_PROFILE_URL", url.clone());
        }
        if let Some(min_posts) = &self.min_posts {
            set("POSTSCOUT_MIN_POSTS", min_posts.clone());
        }
        if let Some(login) = &self.login {
            set("POSTSCOUT_LOGIN", login.clone());
        }
        if self.headless {
            set("POSTSCOUT_HEADLESS", "true".to_string());
        }
        if let Some(dir) = &self.out_dir {
            set("POSTSCOUT_OUT_DIR", dir.to_string_lossy().into_owned());
        }
        if let Some(secs) = self.deadline_secs {
            set("POSTSCOUT_DEADLINE_SECS", secs.to_string());
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = postscout_core::load_app_config_with_overrides(&cli.overrides())?;
    logging::init(&config)?;

    if cli.min_posts.is_none() {
        if let Some(min_posts) = prompt::min_posts()? {
            config.min_posts = min_posts;
        }
    }

    if config.credentials.is_none()
        && session_state_at(&config.session_state_path()) == SessionState::NoSession
    {
        if let Some(credentials) = prompt::credentials(cli.login.as_deref())? {
            config.credentials = Some(credentials);
        }
    }

    tracing::info!(
        profile_url = %config.profile_url,
        min_posts = config.min_posts,
        deadline_secs = config.deadline_secs,
        "starting run"
    );

    if let Err(err) = postscout_scraper::run(&config).await {
        let err = anyhow::Error::from(err);
        tracing::error!(error = %format_args!("{err:#}"), "run failed");
        std::process::exit(1);
    }

    Ok(())
}
