use std::collections::HashSet;
use crate::config::feeds::{FactoryConfig, FeedsConfig};
use crate::config::oracle::CompositeConfig;
use crate::config::{LoggingConfig, ProxyConfig};
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
    pub proxy: ProxyConfig,
    pub factory: FactoryConfig,
    /// The first entry is the proxy's initial implementation; the rest are rotation
    /// candidates, tried in order.
    pub composites: Vec<CompositeConfig>,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LEND_ORACLE").separator("__").try_parsing(true))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let app: AppConfig = toml::from_str(raw)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        if self.composites.is_empty() {
            return Err(Error::ConfigError("at least one composite price source is required".to_string()));
        }

        let mut seen = HashSet::new();
        for composite in &self.composites {
            if !seen.insert(composite.address) {
                return Err(Error::ConfigError(format!(
                    "duplicate composite address {}",
                    composite.address
                )));
            }
        }

        for pool in &self.feeds.pools {
            if pool.coins.len() < 2 || pool.prices.len() + 1 != pool.coins.len() {
                return Err(Error::ConfigError(format!(
                    "pool {} needs at least two coins and one price per non-zero coin",
                    pool.address
                )));
            }
        }
        Ok(())
    }
}
