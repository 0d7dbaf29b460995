use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::types::price::{mul_div_floor, Price};
use crate::types::timestamp::Timestamp;

/// Default cap on share-price growth: 1% per minute, as an 18-decimal rate per second.
pub const DEFAULT_MAX_SPEED_PER_SECOND: u128 = 10_000_000_000_000_000 / 60;

/// Last share price accepted on the write path and when it was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCache {
    pub price_per_share: Price,
    pub updated_at: Timestamp,
}

/// Caps how fast a vault's reported share price may rise between write-path updates.
/// Drops are taken as reported.
#[derive(Clone, Copy, Debug)]
pub struct SharePriceLimiter {
    max_speed_per_second: u128,
}

impl SharePriceLimiter {
    pub fn new(max_speed_per_second: u128) -> Self {
        SharePriceLimiter { max_speed_per_second }
    }

    pub fn max_speed_per_second(&self) -> u128 {
        self.max_speed_per_second
    }

    /// Highest share price reachable from `cache` at `now`.
    pub fn ceiling(&self, cache: &ShareCache, now: Timestamp) -> Result<Price> {
        let elapsed = now.secs_since(cache.updated_at) as u128;
        let growth = self
            .max_speed_per_second
            .saturating_mul(elapsed)
            .saturating_add(Price::WAD);
        mul_div_floor(cache.price_per_share.raw_value(), growth, Price::WAD, "share price ceiling")
    }

    pub fn limit(&self, reported: Price, cache: &ShareCache, now: Timestamp) -> Result<Price> {
        Ok(reported.min(self.ceiling(cache, now)?))
    }
}

impl Default for SharePriceLimiter {
    fn default() -> Self {
        SharePriceLimiter::new(DEFAULT_MAX_SPEED_PER_SECOND)
    }
}
