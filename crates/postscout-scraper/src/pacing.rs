//! Randomized pauses between page interactions.
//!
//! Two kinds of pause are used: a short sub-second "settle" after navigation,
//! clicks and scrolls so new content can render, and a longer whole-second
//! pause between collection iterations.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone)]
pub struct Pacing {
    /// Settle pause bounds, in milliseconds.
    pub settle_ms: RangeInclusive<u64>,
    /// Inter-iteration pause bounds, in whole seconds.
    pub iteration_secs: RangeInclusive<u64>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle_ms: 100..=400,
            iteration_secs: 1..=3,
        }
    }
}

impl Pacing {
    /// No pauses at all. Used by tests and dry runs.
    #[must_use]
    pub fn none() -> Self {
        Self {
            settle_ms: 0..=0,
            iteration_secs: 0..=0,
        }
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(pick(&self.settle_ms))
    }

    #[must_use]
    pub fn iteration_delay(&self) -> Duration {
        Duration::from_secs(pick(&self.iteration_secs))
    }

    pub async fn settle(&self) {
        pause(self.settle_delay()).await;
    }

    /// Inter-iteration pause, cut short so it never runs past `remaining`.
    pub async fn between_iterations(&self, remaining: Duration) {
        pause(self.iteration_delay().min(remaining)).await;
    }
}

fn pick(range: &RangeInclusive<u64>) -> u64 {
    if range.start() >= range.end() {
        return *range.start();
    }
    rand::rng().random_range(range.clone())
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
