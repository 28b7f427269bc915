//! Interactive fallbacks for values the environment did not provide.
//!
//! Every prompt is skipped when stdin is not a terminal, so scripted runs
//! never block.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Context;
use postscout_core::{parse_min_posts, Credentials, DEFAULT_MIN_POSTS};

pub fn min_posts() -> anyhow::Result<Option<usize>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }
    let raw = read_line(&format!("Minimum number of posts [{DEFAULT_MIN_POSTS}]: "))?;
    Ok(Some(parse_min_posts(&raw)))
}

/// Asks for whatever part of the credentials is missing. The password is
/// never echoed.
pub fn credentials(known_login: Option<&str>) -> anyhow::Result<Option<Credentials>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }
    let login = match known_login.map(str::trim).filter(|l| !l.is_empty()) {
        Some(login) => login.to_string(),
        None => read_line("Login: ")?,
    };
    let password = rpassword::prompt_password("Password: ").context("failed to read password")?;
    Ok(Some(Credentials::new(login, password)))
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}
