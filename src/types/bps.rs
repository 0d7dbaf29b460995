use serde::{Deserialize, Serialize};
use std::fmt;

pub const BPS_DENOMINATOR: u64 = 10_000;  // 100%

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(u64);

impl BasisPoints {
    pub const fn new(value: u64) -> Self {
        BasisPoints(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for BasisPoints {
    fn from(value: u64) -> Self {
        BasisPoints(value)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
