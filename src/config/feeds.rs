use serde::{Deserialize, Serialize};
use crate::types::address::Address;
use crate::types::price::Price;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FactoryConfig {
    pub address: Address,
    pub admin: Address,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PoolConfig {
    pub address: Address,
    pub coins: Vec<Address>,
    /// `prices[k]` is coin `k + 1` priced in coin 0.
    pub prices: Vec<Price>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VaultConfig {
    pub address: Address,
    pub price_per_share: Price,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AggregatorConfig {
    pub address: Address,
    pub price: Price,
}

/// Upstream values for running the oracle against in-memory feeds.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FeedsConfig {
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
    #[serde(default)]
    pub vaults: Vec<VaultConfig>,
    #[serde(default)]
    pub aggregators: Vec<AggregatorConfig>,
}
