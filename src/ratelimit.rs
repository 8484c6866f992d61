//! Per-identity daily search quota.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::debug;

/// Daily quota check consulted before every search.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one search for `phone`. Returns `false` once today's quota is
    /// used up.
    async fn check_daily_limit(&self, phone: &str) -> bool;

    /// The configured searches per day, for user-facing copy.
    fn daily_limit(&self) -> u32;
}

/// In-process counter that resets at UTC midnight.
pub struct DailyRateLimiter {
    limit: u32,
    counts: Mutex<HashMap<String, (NaiveDate, u32)>>,
}

impl DailyRateLimiter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            counts: Mutex::new(HashMap::new()),
        }
    }

    async fn check_on(&self, phone: &str, today: NaiveDate) -> bool {
        let mut counts = self.counts.lock().await;
        let entry = counts.entry(phone.to_string()).or_insert((today, 0));

        // New day
        if entry.0 != today {
            *entry = (today, 0);
        }

        if entry.1 >= self.limit {
            debug!(phone, limit = self.limit, "Daily search limit reached");
            return false;
        }
        entry.1 += 1;
        true
    }
}

#[async_trait]
impl RateLimiter for DailyRateLimiter {
    async fn check_daily_limit(&self, phone: &str) -> bool {
        self.check_on(phone, Utc::now().date_naive()).await
    }

    fn daily_limit(&self) -> u32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn allows_up_to_limit_per_identity() {
        let limiter = DailyRateLimiter::new(2);
        assert!(limiter.check_on("a", day(1)).await);
        assert!(limiter.check_on("a", day(1)).await);
        assert!(!limiter.check_on("a", day(1)).await);
        assert!(limiter.check_on("b", day(1)).await);
    }

    #[tokio::test]
    async fn resets_on_new_day() {
        let limiter = DailyRateLimiter::new(1);
        assert!(limiter.check_on("a", day(1)).await);
        assert!(!limiter.check_on("a", day(1)).await);
        assert!(limiter.check_on("a", day(2)).await);
    }

    #[tokio::test]
    async fn zero_limit_blocks_everything() {
        let limiter = DailyRateLimiter::new(0);
        assert!(!limiter.check_daily_limit("a").await);
        assert_eq!(limiter.daily_limit(), 0);
    }
}
