use std::collections::HashMap;
use std::sync::Arc;
use crate::config::loader::AppConfig;
use crate::config::oracle::CompositeConfig;
use crate::error::{Error, Result};
use crate::interfaces::clock::Clock;
use crate::interfaces::event_sink::EventSink;
use crate::price_infra::PoolLeg;
use crate::price_infra::composite::CompositePriceSource;
use crate::price_infra::connectors::static_feed::{StaticAggregator, StaticFactory, StaticPool, StaticVault};
use crate::price_infra::proxy::OracleProxy;
use crate::price_infra::share_price::SharePriceLimiter;
use crate::types::address::Address;

/// Everything a configured market oracle needs, backed by in-memory feeds.
pub struct Deployment {
    pub factory: Arc<StaticFactory>,
    pub pools: HashMap<Address, Arc<StaticPool>>,
    pub vaults: HashMap<Address, Arc<StaticVault>>,
    pub aggregators: HashMap<Address, Arc<StaticAggregator>>,
    /// Composite sources in configuration order.
    pub composites: Vec<Arc<CompositePriceSource>>,
    pub proxy: OracleProxy,
}

impl Deployment {
    pub fn from_config(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        events: Option<Arc<dyn EventSink>>,
    ) -> Result<Self> {
        config.validate()?;

        let factory = Arc::new(StaticFactory::new(config.factory.address, config.factory.admin));

        let pools: HashMap<_, _> = config.feeds.pools.iter()
            .map(|p| (p.address, Arc::new(StaticPool::new(p.address, p.coins.clone(), p.prices.clone()))))
            .collect();
        let vaults: HashMap<_, _> = config.feeds.vaults.iter()
            .map(|v| (v.address, Arc::new(StaticVault::new(v.address, v.price_per_share))))
            .collect();
        let aggregators: HashMap<_, _> = config.feeds.aggregators.iter()
            .map(|a| (a.address, Arc::new(StaticAggregator::new(a.address, a.price))))
            .collect();

        let composites = config.composites.iter()
            .map(|c| build_composite(c, &pools, &vaults, &aggregators, Arc::clone(&clock)).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        let initial = composites
            .first()
            .cloned()
            .ok_or_else(|| Error::ConfigError("no composite price source configured".to_string()))?;

        let proxy = OracleProxy::new(
            config.proxy.address,
            initial,
            factory.clone(),
            config.proxy.max_deviation_bps,
            events,
        )?;

        Ok(Deployment { factory, pools, vaults, aggregators, composites, proxy })
    }
}

fn build_composite(
    config: &CompositeConfig,
    pools: &HashMap<Address, Arc<StaticPool>>,
    vaults: &HashMap<Address, Arc<StaticVault>>,
    aggregators: &HashMap<Address, Arc<StaticAggregator>>,
    clock: Arc<dyn Clock>,
) -> Result<CompositePriceSource> {
    let missing = |kind: &str, address: Address| {
        Error::ConfigError(format!("composite {} references unknown {} {}", config.address, kind, address))
    };

    let legs = config.legs.iter()
        .map(|leg| -> Result<PoolLeg> {
            let pool = pools.get(&leg.pool).ok_or_else(|| missing("pool", leg.pool))?;
            Ok(PoolLeg::new(pool.clone(), leg.borrowed_ix, leg.collateral_ix))
        })
        .collect::<Result<Vec<_>>>()?;
    let vault = vaults.get(&config.vault).ok_or_else(|| missing("vault", config.vault))?;
    let aggregator = aggregators.get(&config.aggregator).ok_or_else(|| missing("aggregator", config.aggregator))?;

    CompositePriceSource::with_limiter(
        config.address,
        legs,
        vault.clone(),
        aggregator.clone(),
        clock,
        SharePriceLimiter::new(config.share_price_max_speed as u128),
    )
}
