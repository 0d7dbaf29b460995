pub mod composite;
pub mod connectors;
pub mod deviation;
pub mod proxy;
pub mod share_price;

use std::fmt;
use std::sync::Arc;
use crate::interfaces::upstream::PoolSource;
use crate::types::address::Address;

/// One hop of a composite chain: the pool and which of its coins are borrowed and
/// collateral for this hop.
#[derive(Clone)]
pub struct PoolLeg {
    pub pool: Arc<dyn PoolSource>,
    pub borrowed_ix: usize,
    pub collateral_ix: usize,
}

impl PoolLeg {
    pub fn new(pool: Arc<dyn PoolSource>, borrowed_ix: usize, collateral_ix: usize) -> Self {
        PoolLeg { pool, borrowed_ix, collateral_ix }
    }

    pub fn borrowed_asset(&self) -> Option<Address> {
        self.pool.coin(self.borrowed_ix)
    }

    pub fn collateral_asset(&self) -> Option<Address> {
        self.pool.coin(self.collateral_ix)
    }
}

impl fmt::Debug for PoolLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolLeg")
            .field("pool", &self.pool.address())
            .field("borrowed_ix", &self.borrowed_ix)
            .field("collateral_ix", &self.collateral_ix)
            .finish()
    }
}
