use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use crate::error::{Error, Result, UpstreamSource};
use crate::interfaces::admin_resolver::AdminResolver;
use crate::interfaces::clock::Clock;
use crate::interfaces::upstream::{AggregatorSource, PoolSource, VaultSource};
use crate::types::address::Address;
use crate::types::price::Price;
use crate::types::timestamp::Timestamp;

fn offline(origin: UpstreamSource) -> Error {
    Error::UpstreamPriceUnavailable { origin, reason: "feed offline".to_string() }
}

/// Pool with operator-set oracle prices. `prices[k]` is coin `k + 1` in coin 0.
pub struct StaticPool {
    address: Address,
    coins: Vec<Address>,
    prices: Mutex<Vec<Price>>,
    offline: AtomicBool,
    write_reads: AtomicUsize,
}

impl StaticPool {
    pub fn new(address: Address, coins: Vec<Address>, prices: Vec<Price>) -> Self {
        StaticPool {
            address,
            coins,
            prices: Mutex::new(prices),
            offline: AtomicBool::new(false),
            write_reads: AtomicUsize::new(0),
        }
    }

    pub fn set_price(&self, k: usize, price: Price) -> Result<()> {
        let mut prices = self.prices.lock().map_err(|_| Error::StatePoisoned)?;
        match prices.get_mut(k) {
            Some(slot) => {
                *slot = price;
                Ok(())
            }
            None => Err(Error::InvalidPrice(format!("pool {} has no oracle index {}", self.address, k))),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of write-path reads served so far.
    pub fn write_reads(&self) -> usize {
        self.write_reads.load(Ordering::SeqCst)
    }
}

impl PoolSource for StaticPool {
    fn address(&self) -> Address {
        self.address
    }

    fn coin(&self, i: usize) -> Option<Address> {
        self.coins.get(i).copied()
    }

    fn price_oracle(&self, k: usize) -> Result<Price> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline(UpstreamSource::PoolOracle { pool: self.address, index: k }));
        }
        let prices = self.prices.lock().map_err(|_| Error::StatePoisoned)?;
        prices
            .get(k)
            .copied()
            .ok_or_else(|| Error::InvalidPrice(format!("pool {} has no oracle index {}", self.address, k)))
    }

    fn price_oracle_w(&self, k: usize) -> Result<Price> {
        self.write_reads.fetch_add(1, Ordering::SeqCst);
        self.price_oracle(k)
    }
}

pub struct StaticVault {
    address: Address,
    price_per_share: Mutex<Price>,
}

impl StaticVault {
    pub fn new(address: Address, price_per_share: Price) -> Self {
        StaticVault { address, price_per_share: Mutex::new(price_per_share) }
    }

    pub fn set_price_per_share(&self, price: Price) -> Result<()> {
        *self.price_per_share.lock().map_err(|_| Error::StatePoisoned)? = price;
        Ok(())
    }
}

impl VaultSource for StaticVault {
    fn address(&self) -> Address {
        self.address
    }

    fn price_per_share(&self) -> Result<Price> {
        self.price_per_share.lock().map(|p| *p).map_err(|_| Error::StatePoisoned)
    }
}

pub struct StaticAggregator {
    address: Address,
    price: Mutex<Price>,
    offline: AtomicBool,
}

impl StaticAggregator {
    pub fn new(address: Address, price: Price) -> Self {
        StaticAggregator { address, price: Mutex::new(price), offline: AtomicBool::new(false) }
    }

    pub fn set_price(&self, price: Price) -> Result<()> {
        *self.price.lock().map_err(|_| Error::StatePoisoned)? = price;
        Ok(())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl AggregatorSource for StaticAggregator {
    fn address(&self) -> Address {
        self.address
    }

    fn price(&self) -> Result<Price> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline(UpstreamSource::Aggregator(self.address)));
        }
        self.price.lock().map(|p| *p).map_err(|_| Error::StatePoisoned)
    }
}

/// Factory stand-in whose admin can be rotated.
pub struct StaticFactory {
    address: Address,
    admin: Mutex<Address>,
}

impl StaticFactory {
    pub fn new(address: Address, admin: Address) -> Self {
        StaticFactory { address, admin: Mutex::new(admin) }
    }

    pub fn set_admin(&self, admin: Address) -> Result<()> {
        *self.admin.lock().map_err(|_| Error::StatePoisoned)? = admin;
        Ok(())
    }
}

impl AdminResolver for StaticFactory {
    fn address(&self) -> Address {
        self.address
    }

    fn admin(&self) -> Result<Address> {
        self.admin.lock().map(|a| *a).map_err(|_| Error::StatePoisoned)
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock { secs: AtomicU64::new(start.as_secs()) }
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.secs.load(Ordering::SeqCst))
    }
}
