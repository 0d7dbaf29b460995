use crate::error::Result;
use crate::types::address::Address;
use crate::types::price::Price;

/// The interface a lending-market AMM prices against.
pub trait PriceOracle: Send + Sync {
    fn address(&self) -> Address;

    /// Pure read; never mutates oracle state.
    fn price(&self) -> Result<Price>;

    /// Read-write used from the exchange path. Leaves the oracle in a state where
    /// an immediate `price()` returns the same value.
    fn price_w(&self) -> Result<Price>;
}
