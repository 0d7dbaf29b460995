pub mod config;
pub mod deployment;
pub mod error;
pub mod events;
pub mod interfaces;
pub mod observability;
pub mod price_infra;
pub mod types;

pub use error::{Error, Result};
pub use interfaces::price_oracle::PriceOracle;
pub use price_infra::PoolLeg;
pub use price_infra::composite::CompositePriceSource;
pub use price_infra::deviation::DeviationGuard;
pub use price_infra::proxy::OracleProxy;
pub use types::address::Address;
pub use types::bps::BasisPoints;
pub use types::price::Price;
