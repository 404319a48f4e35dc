//! Per-client limiter for `incrementVisitorCount`
//!
//! GCRA via `governor`, keyed by client IP. State is in-process only.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::debug;

use crate::config::RateLimitConfig;

pub struct VisitorRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl VisitorRateLimiter {
    /// `burst` calls per client, one more every `period`
    pub fn new(period: Duration, burst: u32) -> Self {
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_minute(NonZeroU32::MIN))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            Duration::from_secs(config.visitor_period_secs),
            config.visitor_burst,
        )
    }

    /// `Err(wait)` when the client must wait before its next call
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&client.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// 清理已恢复满额的 key，防止内存无限增长
    pub fn retain_recent(&self) {
        let before = self.tracked_clients();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(
            "Visitor rate limiter cleanup: {} -> {} keys",
            before,
            self.tracked_clients()
        );
    }

    fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// 向上取整到秒，至少 1 秒
pub fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
