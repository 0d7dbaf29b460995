use std::sync::{Arc, Mutex};
use crate::error::{Error, Result, UpstreamSource};
use crate::interfaces::clock::Clock;
use crate::interfaces::price_oracle::PriceOracle;
use crate::interfaces::upstream::{AggregatorSource, VaultSource};
use crate::observability::metrics::UPSTREAM_FAILURES;
use crate::price_infra::PoolLeg;
use crate::price_infra::share_price::{ShareCache, SharePriceLimiter};
use crate::types::address::Address;
use crate::types::price::Price;
use crate::types::timestamp::Timestamp;

pub const MAX_POOLS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Price of the last leg's collateral in the first leg's borrowed asset, times the vault
/// share price, times the aggregator's unit price.
pub struct CompositePriceSource {
    address: Address,
    legs: Vec<PoolLeg>,
    vault: Arc<dyn VaultSource>,
    aggregator: Arc<dyn AggregatorSource>,
    clock: Arc<dyn Clock>,
    limiter: SharePriceLimiter,
    cache: Mutex<ShareCache>,
}

impl CompositePriceSource {
    pub fn new(
        address: Address,
        legs: Vec<PoolLeg>,
        vault: Arc<dyn VaultSource>,
        aggregator: Arc<dyn AggregatorSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Self::with_limiter(address, legs, vault, aggregator, clock, SharePriceLimiter::default())
    }

    pub fn with_limiter(
        address: Address,
        legs: Vec<PoolLeg>,
        vault: Arc<dyn VaultSource>,
        aggregator: Arc<dyn AggregatorSource>,
        clock: Arc<dyn Clock>,
        limiter: SharePriceLimiter,
    ) -> Result<Self> {
        validate_chain(&legs)?;

        let initial_share_price = checked_upstream(
            UpstreamSource::Vault(vault.address()),
            vault.price_per_share(),
        )?;
        let cache = ShareCache {
            price_per_share: initial_share_price,
            updated_at: clock.now(),
        };

        tracing::info!(
            address = %address,
            legs = legs.len(),
            vault = %vault.address(),
            aggregator = %aggregator.address(),
            share_price = %initial_share_price,
            "Composite price source deployed"
        );

        Ok(CompositePriceSource {
            address,
            legs,
            vault,
            aggregator,
            clock,
            limiter,
            cache: Mutex::new(cache),
        })
    }

    pub fn legs(&self) -> &[PoolLeg] {
        &self.legs
    }

    pub fn vault(&self) -> Address {
        self.vault.address()
    }

    pub fn aggregator(&self) -> Address {
        self.aggregator.address()
    }

    pub fn cached_share_price(&self) -> Result<ShareCache> {
        self.cache.lock().map(|cache| *cache).map_err(|_| Error::StatePoisoned)
    }

    /// Rate of one leg: collateral coin priced in the borrowed coin. Coin 0 is the
    /// pool's numeraire and has an implicit price of one.
    fn leg_rate(&self, index: usize, leg: &PoolLeg, access: Access) -> Result<Price> {
        let origin = || UpstreamSource::Pool { leg: index, pool: leg.pool.address() };
        let coin_price = |ix: usize| -> Result<Price> {
            if ix == 0 {
                return Ok(Price::one());
            }
            let reported = match access {
                Access::Read => leg.pool.price_oracle(ix - 1),
                Access::Write => leg.pool.price_oracle_w(ix - 1),
            };
            checked_upstream(origin(), reported)
        };

        let p_borrowed = coin_price(leg.borrowed_ix)?;
        let p_collateral = coin_price(leg.collateral_ix)?;
        let rate = p_collateral.checked_div(p_borrowed)?;

        tracing::debug!(leg = index, pool = %leg.pool.address(), %p_borrowed, %p_collateral, %rate, "leg rate");
        Ok(rate)
    }

    fn chain_rate(&self, access: Access) -> Result<Price> {
        self.legs
            .iter()
            .enumerate()
            .try_fold(Price::one(), |acc, (index, leg)| {
                acc.checked_mul(self.leg_rate(index, leg, access)?)
            })
    }

    fn share_price(&self, cache: &ShareCache, now: Timestamp) -> Result<Price> {
        let reported = checked_upstream(
            UpstreamSource::Vault(self.vault.address()),
            self.vault.price_per_share(),
        )?;
        self.limiter.limit(reported, cache, now)
    }

    fn compose(&self, chain_rate: Price, share_price: Price, unit_price: Price) -> Result<Price> {
        let price = chain_rate.checked_mul(share_price)?.checked_mul(unit_price)?;
        if price.is_zero() {
            return Err(Error::UpstreamPriceUnavailable {
                origin: UpstreamSource::Composite(self.address),
                reason: "composite price rounded to zero".to_string(),
            });
        }
        Ok(price)
    }
}

impl PriceOracle for CompositePriceSource {
    fn address(&self) -> Address {
        self.address
    }

    fn price(&self) -> Result<Price> {
        let cache = self.cached_share_price()?;
        let chain_rate = self.chain_rate(Access::Read)?;
        let share_price = self.share_price(&cache, self.clock.now())?;
        let unit_price = checked_upstream(
            UpstreamSource::Aggregator(self.aggregator.address()),
            self.aggregator.price(),
        )?;
        self.compose(chain_rate, share_price, unit_price)
    }

    fn price_w(&self) -> Result<Price> {
        // Held for the whole computation; the cache is only written once every
        // upstream call has succeeded.
        let mut cache = self.cache.lock().map_err(|_| Error::StatePoisoned)?;
        let now = self.clock.now();

        let chain_rate = self.chain_rate(Access::Write)?;
        let share_price = self.share_price(&cache, now)?;
        let unit_price = checked_upstream(
            UpstreamSource::Aggregator(self.aggregator.address()),
            self.aggregator.price_w(),
        )?;
        let price = self.compose(chain_rate, share_price, unit_price)?;

        *cache = ShareCache { price_per_share: share_price, updated_at: now };
        Ok(price)
    }
}

fn validate_chain(legs: &[PoolLeg]) -> Result<()> {
    if legs.is_empty() {
        return Err(Error::InvalidChain("no pool legs configured".to_string()));
    }
    if legs.len() > MAX_POOLS {
        return Err(Error::InvalidChain(format!(
            "{} pool legs exceed the maximum of {}",
            legs.len(),
            MAX_POOLS
        )));
    }

    for (index, leg) in legs.iter().enumerate() {
        if leg.borrowed_ix == leg.collateral_ix {
            return Err(Error::InvalidChain(format!(
                "leg {} uses coin {} as both borrowed and collateral",
                index, leg.borrowed_ix
            )));
        }
        for ix in [leg.borrowed_ix, leg.collateral_ix] {
            if leg.pool.coin(ix).is_none() {
                return Err(Error::InvalidChain(format!(
                    "leg {} references coin {} missing from pool {}",
                    index, ix, leg.pool.address()
                )));
            }
        }
    }

    for (index, pair) in legs.windows(2).enumerate() {
        let collateral = pair[0].collateral_asset();
        let next_borrowed = pair[1].borrowed_asset();
        if collateral != next_borrowed {
            return Err(Error::InvalidChain(format!(
                "leg {} collateral {:?} does not match leg {} borrowed {:?}",
                index,
                collateral,
                index + 1,
                next_borrowed
            )));
        }
    }
    Ok(())
}

/// Maps an upstream read to a usable price: errors and zero values both mean the
/// upstream cannot price right now.
fn checked_upstream(origin: UpstreamSource, reported: Result<Price>) -> Result<Price> {
    let reason = match reported {
        Ok(price) if !price.is_zero() => return Ok(price),
        Ok(_) => "zero price".to_string(),
        Err(e) => e.to_string(),
    };

    UPSTREAM_FAILURES.with_label_values(&[origin.label()]).inc();
    tracing::warn!(origin = %origin, reason = %reason, "Upstream price unavailable");

    Err(Error::UpstreamPriceUnavailable { origin, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_infra::connectors::static_feed::{ManualClock, StaticAggregator, StaticPool, StaticVault};

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn two_coin_pool(id: u64, coin0: u64, coin1: u64, price: Price) -> Arc<StaticPool> {
        Arc::new(StaticPool::new(addr(id), vec![addr(coin0), addr(coin1)], vec![price]))
    }

    #[test]
    fn coin_zero_as_collateral_inverts_the_pool_price() {
        let pool = two_coin_pool(10, 1, 2, Price::from_bps(20_000));
        let source = CompositePriceSource::new(
            addr(100),
            vec![PoolLeg::new(pool, 1, 0)],
            Arc::new(StaticVault::new(addr(20), Price::one())),
            Arc::new(StaticAggregator::new(addr(30), Price::one())),
            Arc::new(ManualClock::new(Timestamp::from_secs(0))),
        )
        .unwrap();
        assert_eq!(source.price().unwrap(), Price::from_bps(5_000));
    }

    #[test]
    fn same_borrowed_and_collateral_index_is_rejected() {
        let pool = two_coin_pool(10, 1, 2, Price::one());
        let result = CompositePriceSource::new(
            addr(100),
            vec![PoolLeg::new(pool, 1, 1)],
            Arc::new(StaticVault::new(addr(20), Price::one())),
            Arc::new(StaticAggregator::new(addr(30), Price::one())),
            Arc::new(ManualClock::new(Timestamp::from_secs(0))),
        );
        assert!(matches!(result, Err(Error::InvalidChain(_))));
    }

    #[test]
    fn zero_vault_share_price_blocks_deployment() {
        let pool = two_coin_pool(10, 1, 2, Price::one());
        let result = CompositePriceSource::new(
            addr(100),
            vec![PoolLeg::new(pool, 1, 0)],
            Arc::new(StaticVault::new(addr(20), Price::zero())),
            Arc::new(StaticAggregator::new(addr(30), Price::one())),
            Arc::new(ManualClock::new(Timestamp::from_secs(0))),
        );
        assert!(matches!(
            result,
            Err(Error::UpstreamPriceUnavailable { origin: UpstreamSource::Vault(_), .. })
        ));
    }
}
