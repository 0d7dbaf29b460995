use crate::error::Result;
use crate::types::address::Address;

/// The market factory, queried for whoever currently holds the admin role.
#[cfg_attr(test, mockall::automock)]
pub trait AdminResolver: Send + Sync {
    fn address(&self) -> Address;
    fn admin(&self) -> Result<Address>;
}
