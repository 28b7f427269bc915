use std::collections::HashMap;
use std::env::VarError;

use crate::app_config::{AppConfig, Credentials, DEFAULT_MIN_POSTS};
use crate::ConfigError;

/// Load run configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load run configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load run configuration, letting `overrides` (keyed by env var name) win
/// over the process environment and `.env`.
///
/// The CLI uses this to apply command-line flags before validation, so a
/// `--profile-url` flag satisfies the required `POSTSCOUT_PROFILE_URL`.
///
/// # Errors
///
/// Returns `ConfigError` if required values are missing or values are invalid.
pub fn load_app_config_with_overrides(
    overrides: &HashMap<String, String>,
) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(overlay(overrides, |key| std::env::var(key)))
}

/// Lookup that consults `overrides` first and `fallback` second.
fn overlay<'a, F>(
    overrides: &'a HashMap<String, String>,
    fallback: F,
) -> impl Fn(&str) -> Result<String, VarError> + 'a
where
    F: Fn(&str) -> Result<String, VarError> + 'a,
{
    move |key| match overrides.get(key) {
        Some(value) => Ok(value.clone()),
        None => fallback(key),
    }
}

/// Parse an operator-supplied minimum post count.
///
/// Anything that is not a plain run of ASCII digits (including an empty
/// string) falls back to [`DEFAULT_MIN_POSTS`] rather than failing.
#[must_use]
pub fn parse_min_posts(raw: &str) -> usize {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_MIN_POSTS;
    }
    trimmed.parse().unwrap_or(DEFAULT_MIN_POSTS)
}

/// Build run configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{raw}\""),
            }),
        }
    };

    let profile_url = require("POSTSCOUT_PROFILE_URL")?;
    let login_url = or_default("POSTSCOUT_LOGIN_URL", "https://www.linkedin.com/login");

    let credentials = match (optional("POSTSCOUT_LOGIN"), optional("POSTSCOUT_PASSWORD")) {
        (Some(login), Some(password)) => Some(Credentials::new(login, password)),
        _ => None,
    };

    let min_posts = lookup("POSTSCOUT_MIN_POSTS").map_or(DEFAULT_MIN_POSTS, |raw| parse_min_posts(&raw));
    let deadline_secs = parse_u64("POSTSCOUT_DEADLINE_SECS", "60")?;
    let timeout_ms = parse_u64("POSTSCOUT_TIMEOUT_MS", "5000")?;
    let scroll_timeout_ms = parse_u64("POSTSCOUT_SCROLL_TIMEOUT_MS", "1000")?;

    let out_dir = PathBuf::from(or_default("POSTSCOUT_OUT_DIR", "./out"));
    let output_file = or_default("POSTSCOUT_OUTPUT_FILE", "li_posts.json");
    let user_data_dir = PathBuf::from(or_default("POSTSCOUT_USER_DATA_DIR", "./_user_data"));
    let chrome_path = optional("POSTSCOUT_CHROME_PATH").map(PathBuf::from);
    let headless = parse_bool("POSTSCOUT_HEADLESS", false)?;
    let log_level = or_default("POSTSCOUT_LOG_LEVEL", "info");

    Ok(AppConfig {
        profile_url,
        login_url,
        credentials,
        min_posts,
        deadline_secs,
        timeout_ms,
        scroll_timeout_ms,
        out_dir,
        output_file,
        user_data_dir,
        chrome_path,
        headless,
        log_level,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
