use serde::{Deserialize, Serialize};
use crate::price_infra::share_price::DEFAULT_MAX_SPEED_PER_SECOND;
use crate::types::address::Address;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LegConfig {
    pub pool: Address,
    pub borrowed_ix: usize,
    pub collateral_ix: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CompositeConfig {
    pub address: Address,
    pub legs: Vec<LegConfig>,
    pub vault: Address,
    pub aggregator: Address,
    /// 18-decimal share-price growth allowed per second.
    #[serde(default = "default_max_speed")]
    pub share_price_max_speed: u64,
}

fn default_max_speed() -> u64 {
    DEFAULT_MAX_SPEED_PER_SECOND as u64
}
