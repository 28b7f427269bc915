pub mod app_config;
pub mod config;
pub mod error;
pub mod posts;

pub use app_config::{AppConfig, Credentials, DEFAULT_MIN_POSTS};
pub use config::{
    load_app_config, load_app_config_from_env, load_app_config_with_overrides, parse_min_posts,
};
pub use error::ConfigError;
pub use posts::{PostRecord, RunReport, TIME_FALLBACK};
