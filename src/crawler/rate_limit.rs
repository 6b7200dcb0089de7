//! Process-wide outbound request limiter
//!
//! One `RateLimiter` is built per process and shared by reference with the
//! fetcher, so every request (landing pages, pagination walk, listing pages,
//! profile pages) draws from the same budget.
//!
//! The budget is "at most `calls` requests per `period`" over any rolling
//! window. It is enforced with a `governor` quota that replenishes one cell
//! every `period / calls` with a burst of one, which spaces requests evenly.

use crate::config::CrawlerConfig;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use std::num::NonZeroU32;
use std::time::Duration;

type DirectLimiter<C> =
    governor::RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Shared request budget
pub struct RateLimiter<C: Clock = DefaultClock> {
    limiter: DirectLimiter<C>,
    clock: C,
    calls: u32,
    period: Duration,
}

impl RateLimiter<DefaultClock> {
    /// Creates a limiter allowing `calls` requests per `period`
    pub fn new(calls: u32, period: Duration) -> Self {
        Self::with_clock(calls, period, DefaultClock::default())
    }

    /// Creates a limiter from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.rate_limit_calls,
            Duration::from_millis(config.rate_limit_period_ms),
        )
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Creates a limiter driven by an explicit clock
    pub fn with_clock(calls: u32, period: Duration, clock: C) -> Self {
        let calls = calls.max(1);
        let interval = (period / calls).max(Duration::from_nanos(1));
        let quota = Quota::with_period(interval).unwrap_or(Quota::per_second(NonZeroU32::MIN));

        Self {
            limiter: governor::RateLimiter::direct_with_clock(quota, &clock),
            clock,
            calls,
            period,
        }
    }

    /// Requests allowed per period
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// Length of the rolling window
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Takes one request slot if available right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Waits until a request slot is available and takes it
    ///
    /// Callers are served in the order they ask; in this crawler there is
    /// only ever one caller at a time.
    pub async fn acquire(&self) {
        loop {
            match self.limiter.check() {
                Ok(()) => return,
                Err(not_until) => {
                    let wait = not_until.wait_time_from(self.clock.now());
                    tracing::trace!("Rate limit reached, waiting {:?}", wait);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
