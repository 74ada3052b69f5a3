//! Request pacing between paginated fetches.
//!
//! Every issued request is followed by a short randomized delay drawn
//! from a configurable budget, and every [`LONG_PAUSE_EVERY`]-th
//! request adds a one-to-three second breather on top. The same
//! modulus drives checkpoint flushes in the ingest loop, so a long
//! pause always coincides with durable progress.

use std::time::Duration;

use rand::Rng;

/// Every this-many issued requests, take a longer pause.
pub const LONG_PAUSE_EVERY: u64 = 30;

/// How long to back off after the venue signals a rate limit.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(10);

/// Environment variable read by [`RatePacer::from_env`], in seconds.
pub const API_DELAY_ENV: &str = "API_DELAY";

const MIN_DELAY: Duration = Duration::from_millis(100);

/// Produces the inter-request delays used by the ingest loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePacer {
    delay_budget: Duration,
}

impl RatePacer {
    /// Budget used when `API_DELAY` is unset or unparseable.
    pub const DEFAULT_DELAY_BUDGET: Duration = Duration::from_millis(300);

    /// Pacer with an explicit per-request delay budget.
    #[must_use]
    pub const fn new(delay_budget: Duration) -> Self {
        Self { delay_budget }
    }

    /// Pacer configured from the `API_DELAY` environment variable.
    ///
    /// The value is a fractional number of seconds. Missing, malformed,
    /// or negative values fall back to [`Self::DEFAULT_DELAY_BUDGET`].
    #[must_use]
    pub fn from_env() -> Self {
        let budget = std::env::var(API_DELAY_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map_or(Self::DEFAULT_DELAY_BUDGET, Duration::from_secs_f64);
        Self::new(budget)
    }

    /// The configured per-request delay budget.
    #[must_use]
    pub const fn delay_budget(&self) -> Duration {
        self.delay_budget
    }

    /// Delay to apply after the request numbered `calls_issued`.
    ///
    /// The base component is uniform over `[0, budget)` with a 100ms
    /// floor; every [`LONG_PAUSE_EVERY`]-th call adds a whole-second
    /// pause of one to three seconds.
    #[must_use]
    pub fn request_delay(&self, calls_issued: u64) -> Duration {
        let mut rng = rand::rng();
        let base = if self.delay_budget.is_zero() {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(rng.random_range(0.0..self.delay_budget.as_secs_f64()))
        };
        let mut delay = base.max(MIN_DELAY);
        if calls_issued > 0 && calls_issued % LONG_PAUSE_EVERY == 0 {
            delay += Duration::from_secs(rng.random_range(1..=3));
        }
        delay
    }
}

impl Default for RatePacer {
    fn default() -> Self {
        Self::from_env()
    }
}
