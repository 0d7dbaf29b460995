use crate::error::Result;
use crate::types::address::Address;
use crate::types::price::Price;

/// A liquidity pool exposing per-coin oracle prices.
///
/// `price_oracle(k)` is the price of coin `k + 1` expressed in coin 0, so a pool with
/// `n` coins answers for `k` in `0..n - 1`.
pub trait PoolSource: Send + Sync {
    fn address(&self) -> Address;

    /// Asset held at coin index `i`, or `None` past the last coin.
    fn coin(&self, i: usize) -> Option<Address>;

    fn price_oracle(&self, k: usize) -> Result<Price>;

    /// Write-coupled variant used on the exchange path; pools without separate
    /// state-updating accessors answer with the read value.
    fn price_oracle_w(&self, k: usize) -> Result<Price> {
        self.price_oracle(k)
    }
}

/// A yield-bearing vault; the share price is underlying assets per share.
pub trait VaultSource: Send + Sync {
    fn address(&self) -> Address;
    fn price_per_share(&self) -> Result<Price>;
}

/// An external aggregator reporting the reference unit price of the quote asset.
pub trait AggregatorSource: Send + Sync {
    fn address(&self) -> Address;
    fn price(&self) -> Result<Price>;

    fn price_w(&self) -> Result<Price> {
        self.price()
    }
}
