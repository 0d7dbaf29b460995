use serde::{Deserialize, Serialize};
use crate::types::address::Address;
use crate::types::bps::BasisPoints;

pub mod feeds;
pub mod loader;
pub mod oracle;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProxyConfig {
    pub address: Address,
    #[serde(default = "default_max_deviation")]
    pub max_deviation_bps: BasisPoints,
}

fn default_max_deviation() -> BasisPoints {
    BasisPoints::new(500)  // 5%
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
            json: false,
        }
    }
}
