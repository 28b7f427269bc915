//! Run boundary: one browser, one sign-in check, one collection pass, one report.

use postscout_core::{AppConfig, RunReport};
use tracing::Span;

use crate::chromium::{ChromiumPage, LaunchOptions};
use crate::collect::{CollectOptions, CollectionLoop};
use crate::driver::FeedPage;
use crate::error::ScraperError;
use crate::pacing::Pacing;
use crate::report::write_report;
use crate::session::SessionGate;

/// Launches Chrome and performs a full run against it.
///
/// # Errors
///
/// Returns [`ScraperError::Driver`] if the browser cannot be launched, and
/// otherwise whatever [`execute`] returns.
pub async fn run(config: &AppConfig) -> Result<RunReport, ScraperError> {
    let page = ChromiumPage::launch(&LaunchOptions::from_config(config)).await?;
    execute(&page, config, Pacing::default()).await
}

/// Signs in, collects posts and writes the report using an already-open page.
///
/// The page is closed before returning on every path. The report file is only
/// written when collection completes; a fatal fault leaves any previous
/// report untouched.
///
/// # Errors
///
/// Returns [`ScraperError::MissingCredentials`] or
/// [`ScraperError::LoginFailed`] from the session gate,
/// [`ScraperError::Driver`] on a fatal browser fault, and
/// [`ScraperError::ReportIo`] / [`ScraperError::ReportSerialize`] if the
/// report cannot be written.
pub async fn execute<P: FeedPage>(
    page: &P,
    config: &AppConfig,
    pacing: Pacing,
) -> Result<RunReport, ScraperError> {
    let span = tracing::info_span!("run", profile = %config.profile_url);

    let outcome = harvest(page, config, pacing, span.clone()).await;

    if let Err(err) = page.close().await {
        let _entered = span.enter();
        tracing::warn!(error = %err, "failed to close browser cleanly");
    }

    let report = outcome?;
    write_report(&config.report_path(), &report)?;

    let _entered = span.enter();
    tracing::info!(
        total = report.total_posts,
        path = %config.report_path().display(),
        "extraction finished"
    );
    Ok(report)
}

async fn harvest<P: FeedPage>(
    page: &P,
    config: &AppConfig,
    pacing: Pacing,
    span: Span,
) -> Result<RunReport, ScraperError> {
    let gate = SessionGate::from_config(config, pacing.clone(), span.clone());
    gate.ensure(page).await?;
    pacing.settle().await;

    let feed = CollectionLoop::new(page, CollectOptions::from_config(config, pacing), span);
    feed.open_activity_feed(&config.profile_url).await?;
    let posts = feed.run().await?;

    Ok(RunReport::new(config.profile_url.clone(), posts))
}
