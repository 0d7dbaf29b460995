use thiserror::Error;
use crate::types::address::Address;
use crate::types::bps::BasisPoints;
use crate::types::price::Price;

#[derive(Error, Debug)]
pub enum Error {
    // Proxy Errors
    #[error("Not authorized: caller={caller}, admin={admin}")]
    NotAuthorized {
        caller: Address,
        admin: Address,
    },

    #[error("Price deviation too big: old={old_price}, new={new_price}, deviation={deviation_bps}bps, max={max_bps}")]
    DeviationExceeded {
        old_price: Price,
        new_price: Price,
        deviation_bps: u128,
        max_bps: BasisPoints,
    },

    #[error("Cannot compare against a zero baseline price")]
    InvalidComparison,

    #[error("Invalid max deviation: {0}bps")]
    InvalidMaxDeviation(u64),

    // Price Source Errors
    #[error("Invalid pool chain: {0}")]
    InvalidChain(String),

    #[error("Upstream price unavailable from {origin}: {reason}")]
    UpstreamPriceUnavailable {
        origin: UpstreamSource,
        reason: String,
    },

    // Parsing Errors
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    // Arithmetic Errors
    #[error("Overflow in {operation}")]
    Overflow { operation: String },

    #[error("Division by zero")]
    DivisionByZero,

    // System Errors
    #[error("Oracle state lock poisoned")]
    StatePoisoned,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Which upstream collaborator failed to produce a usable price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamSource {
    Pool { leg: usize, pool: Address },
    /// A pool's own oracle accessor, outside any composite chain.
    PoolOracle { pool: Address, index: usize },
    Vault(Address),
    Aggregator(Address),
    Implementation(Address),
    Composite(Address),
}

impl std::fmt::Display for UpstreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamSource::Pool { leg, pool } => write!(f, "pool leg {} ({})", leg, pool),
            UpstreamSource::PoolOracle { pool, index } => write!(f, "pool {} oracle {}", pool, index),
            UpstreamSource::Vault(address) => write!(f, "vault {}", address),
            UpstreamSource::Aggregator(address) => write!(f, "aggregator {}", address),
            UpstreamSource::Implementation(address) => write!(f, "implementation {}", address),
            UpstreamSource::Composite(address) => write!(f, "composite {}", address),
        }
    }
}

impl UpstreamSource {
    pub fn label(&self) -> &'static str {
        match self {
            UpstreamSource::Pool { .. } | UpstreamSource::PoolOracle { .. } => "pool",
            UpstreamSource::Vault(_) => "vault",
            UpstreamSource::Aggregator(_) => "aggregator",
            UpstreamSource::Implementation(_) => "implementation",
            UpstreamSource::Composite(_) => "composite",
        }
    }
}

impl Error {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotAuthorized { .. } => "not_authorized",
            Error::DeviationExceeded { .. } => "deviation_exceeded",
            Error::InvalidComparison => "invalid_comparison",
            Error::InvalidMaxDeviation(_) => "invalid_max_deviation",
            Error::InvalidChain(_) => "invalid_chain",
            Error::UpstreamPriceUnavailable { .. } => "upstream_price_unavailable",
            Error::InvalidPrice(_) => "invalid_price",
            Error::InvalidAddress(_) => "invalid_address",
            Error::Overflow { .. } => "overflow",
            Error::DivisionByZero => "division_by_zero",
            Error::StatePoisoned => "state_poisoned",
            Error::ConfigError(_) => "config_error",
        }
    }
}
