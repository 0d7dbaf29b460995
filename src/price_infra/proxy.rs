use std::sync::{Arc, RwLock};
use crate::error::{Error, Result};
use crate::events::base::BaseEvent;
use crate::events::oracle::OracleEvent;
use crate::interfaces::admin_resolver::AdminResolver;
use crate::interfaces::event_sink::EventSink;
use crate::interfaces::price_oracle::PriceOracle;
use crate::observability::metrics::{
    LAST_PRICE, ORACLE_SWAPS, ORACLE_SWAPS_REJECTED, PRICE_READS, PRICE_WRITES,
};
use crate::observability::tracing::{trace_oracle_swap, trace_price_query};
use crate::price_infra::composite::CompositePriceSource;
use crate::price_infra::deviation::DeviationGuard;
use crate::types::address::Address;
use crate::types::bps::BasisPoints;
use crate::types::price::Price;

/// Forwards price queries to a swappable implementation.
///
/// The active implementation is replaced only through [`OracleProxy::set_price_oracle`],
/// which requires the factory's current admin and a candidate priced within
/// `max_deviation` of the implementation it replaces.
pub struct OracleProxy<S: PriceOracle = CompositePriceSource> {
    address: Address,
    implementation: RwLock<Arc<S>>,
    factory: Arc<dyn AdminResolver>,
    guard: DeviationGuard,
    events: Option<Arc<dyn EventSink>>,
}

impl<S: PriceOracle> OracleProxy<S> {
    pub fn new(
        address: Address,
        implementation: Arc<S>,
        factory: Arc<dyn AdminResolver>,
        max_deviation: BasisPoints,
        events: Option<Arc<dyn EventSink>>,
    ) -> Result<Self> {
        let guard = DeviationGuard::new(max_deviation)?;

        let proxy = OracleProxy {
            address,
            implementation: RwLock::new(implementation),
            factory,
            guard,
            events,
        };

        let implementation = proxy.implementation()?;
        tracing::info!(
            proxy = %address,
            implementation = %implementation,
            factory = %proxy.factory.address(),
            max_deviation = %max_deviation,
            "Oracle proxy deployed"
        );
        proxy.emit(OracleEvent::ProxyDeployed {
            implementation,
            factory: proxy.factory.address(),
            max_deviation,
        });

        Ok(proxy)
    }

    pub fn implementation(&self) -> Result<Address> {
        Ok(self.active()?.address())
    }

    pub fn implementation_source(&self) -> Result<Arc<S>> {
        self.active()
    }

    pub fn factory(&self) -> Address {
        self.factory.address()
    }

    pub fn max_deviation(&self) -> BasisPoints {
        self.guard.max_deviation()
    }

    /// Replaces the active implementation with `new_implementation`.
    ///
    /// Fails with `NotAuthorized` unless `caller` is the factory's admin at the time of
    /// the call, and with `DeviationExceeded` when the candidate's price is too far from
    /// the current one. On any failure the active implementation is unchanged.
    pub fn set_price_oracle(&self, caller: Address, new_implementation: Arc<S>) -> Result<()> {
        let _span = trace_oracle_swap(&self.address, &new_implementation.address()).entered();

        match self.try_set_price_oracle(caller, new_implementation) {
            Ok((old, new)) => {
                ORACLE_SWAPS.inc();
                tracing::info!(
                    old_implementation = %old.0,
                    new_implementation = %new.0,
                    old_price = %old.1,
                    new_price = %new.1,
                    "Price oracle implementation set"
                );
                self.emit(OracleEvent::PriceOracleSet {
                    old_implementation: old.0,
                    new_implementation: new.0,
                    old_price: old.1,
                    new_price: new.1,
                });
                Ok(())
            }
            Err(e) => {
                ORACLE_SWAPS_REJECTED.with_label_values(&[e.kind()]).inc();
                tracing::warn!(caller = %caller, error = %e, "Price oracle swap rejected");
                Err(e)
            }
        }
    }

    fn try_set_price_oracle(
        &self,
        caller: Address,
        new_implementation: Arc<S>,
    ) -> Result<((Address, Price), (Address, Price))> {
        let admin = self.factory.admin()?;
        if caller != admin {
            return Err(Error::NotAuthorized { caller, admin });
        }

        // Write lock spans read, compare and replace.
        let mut active = self.implementation.write().map_err(|_| Error::StatePoisoned)?;
        let old_price = active.price()?;
        let new_price = new_implementation.price()?;
        self.guard.check(old_price, new_price)?;

        let old_address = active.address();
        let new_address = new_implementation.address();
        *active = new_implementation;

        Ok(((old_address, old_price), (new_address, new_price)))
    }

    fn active(&self) -> Result<Arc<S>> {
        self.implementation
            .read()
            .map(|active| Arc::clone(&active))
            .map_err(|_| Error::StatePoisoned)
    }

    fn emit(&self, payload: OracleEvent) {
        if let Some(sink) = &self.events {
            sink.emit(BaseEvent::new(self.address, payload));
        }
    }
}

impl<S: PriceOracle> PriceOracle for OracleProxy<S> {
    fn address(&self) -> Address {
        self.address
    }

    fn price(&self) -> Result<Price> {
        let _span = trace_price_query(&self.address, false).entered();
        PRICE_READS.inc();
        let price = self.active()?.price()?;
        LAST_PRICE.set(price.to_f64());
        Ok(price)
    }

    fn price_w(&self) -> Result<Price> {
        let _span = trace_price_query(&self.address, true).entered();
        PRICE_WRITES.inc();
        let price = self.active()?.price_w()?;
        LAST_PRICE.set(price.to_f64());
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::error::UpstreamSource;
    use crate::events::oracle::InMemoryEventLog;
    use crate::interfaces::admin_resolver::MockAdminResolver;

    struct FixedOracle {
        address: Address,
        price: Mutex<Price>,
        writes: AtomicUsize,
    }

    impl FixedOracle {
        fn new(n: u64, price: Price) -> Arc<Self> {
            Arc::new(FixedOracle {
                address: Address::from_low_u64(n),
                price: Mutex::new(price),
                writes: AtomicUsize::new(0),
            })
        }
    }

    impl PriceOracle for FixedOracle {
        fn address(&self) -> Address {
            self.address
        }

        fn price(&self) -> Result<Price> {
            let price = *self.price.lock().unwrap();
            if price.is_zero() {
                return Err(Error::UpstreamPriceUnavailable {
                    origin: UpstreamSource::Implementation(self.address),
                    reason: "zero price".to_string(),
                });
            }
            Ok(price)
        }

        fn price_w(&self) -> Result<Price> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.price()
        }
    }

    const ADMIN: u64 = 0xA;
    const PROXY: u64 = 0xF;

    fn factory_with_admin(admin: Address) -> Arc<MockAdminResolver> {
        let mut factory = MockAdminResolver::new();
        factory.expect_address().return_const(Address::from_low_u64(0xFAC));
        factory.expect_admin().returning(move || Ok(admin));
        Arc::new(factory)
    }

    fn proxy_over(initial: Arc<FixedOracle>, factory: Arc<MockAdminResolver>) -> OracleProxy<FixedOracle> {
        OracleProxy::new(Address::from_low_u64(PROXY), initial, factory, BasisPoints::new(500), None).unwrap()
    }

    #[test]
    fn forwards_reads_and_writes_to_the_active_implementation() {
        let initial = FixedOracle::new(1, Price::from_bps(10_200));
        let proxy = proxy_over(initial.clone(), factory_with_admin(Address::from_low_u64(ADMIN)));

        assert_eq!(proxy.price().unwrap(), Price::from_bps(10_200));
        assert_eq!(initial.writes.load(Ordering::SeqCst), 0);
        assert_eq!(proxy.price_w().unwrap(), Price::from_bps(10_200));
        assert_eq!(initial.writes.load(Ordering::SeqCst), 1);
        assert_eq!(proxy.implementation().unwrap(), Address::from_low_u64(1));
    }

    #[test]
    fn non_admin_cannot_swap() {
        let proxy = proxy_over(FixedOracle::new(1, Price::one()), factory_with_admin(Address::from_low_u64(ADMIN)));

        let result = proxy.set_price_oracle(Address::from_low_u64(0xBAD), FixedOracle::new(2, Price::one()));
        assert!(matches!(result, Err(Error::NotAuthorized { .. })));
        assert_eq!(proxy.implementation().unwrap(), Address::from_low_u64(1));
    }

    #[test]
    fn admin_is_resolved_on_every_call() {
        let first_admin = Address::from_low_u64(ADMIN);
        let second_admin = Address::from_low_u64(ADMIN + 1);
        let mut factory = MockAdminResolver::new();
        factory.expect_address().return_const(Address::from_low_u64(0xFAC));
        let mut seq = mockall::Sequence::new();
        factory.expect_admin().times(1).in_sequence(&mut seq).returning(move || Ok(first_admin));
        factory.expect_admin().times(1).in_sequence(&mut seq).returning(move || Ok(second_admin));

        let proxy = OracleProxy::new(
            Address::from_low_u64(PROXY),
            FixedOracle::new(1, Price::one()),
            Arc::new(factory),
            BasisPoints::new(500),
            None,
        )
        .unwrap();

        proxy.set_price_oracle(first_admin, FixedOracle::new(2, Price::one())).unwrap();
        // Admin rotated at the factory: the previous admin is no longer accepted.
        let result = proxy.set_price_oracle(first_admin, FixedOracle::new(3, Price::one()));
        assert!(matches!(result, Err(Error::NotAuthorized { .. })));
        assert_eq!(proxy.implementation().unwrap(), Address::from_low_u64(2));
    }

    #[test]
    fn deviation_gate_scenario() {
        let admin = Address::from_low_u64(ADMIN);
        let proxy = proxy_over(FixedOracle::new(1, Price::one()), factory_with_admin(admin));

        let too_far = proxy.set_price_oracle(admin, FixedOracle::new(3, Price::from_bps(10_600)));
        assert!(matches!(too_far, Err(Error::DeviationExceeded { .. })));
        assert_eq!(proxy.implementation().unwrap(), Address::from_low_u64(1));

        proxy.set_price_oracle(admin, FixedOracle::new(2, Price::from_bps(10_400))).unwrap();
        assert_eq!(proxy.implementation().unwrap(), Address::from_low_u64(2));
    }

    #[test]
    fn unavailable_candidate_is_rejected() {
        let admin = Address::from_low_u64(ADMIN);
        let proxy = proxy_over(FixedOracle::new(1, Price::one()), factory_with_admin(admin));

        let result = proxy.set_price_oracle(admin, FixedOracle::new(2, Price::zero()));
        assert!(matches!(result, Err(Error::UpstreamPriceUnavailable { .. })));
        assert_eq!(proxy.implementation().unwrap(), Address::from_low_u64(1));
    }

    #[test]
    fn invalid_max_deviation_is_rejected_at_construction() {
        let result = OracleProxy::new(
            Address::from_low_u64(PROXY),
            FixedOracle::new(1, Price::one()),
            factory_with_admin(Address::from_low_u64(ADMIN)),
            BasisPoints::new(0),
            None,
        );
        assert!(matches!(result, Err(Error::InvalidMaxDeviation(0))));
    }

    #[test]
    fn emits_deployment_and_swap_events() {
        let admin = Address::from_low_u64(ADMIN);
        let log = Arc::new(InMemoryEventLog::new());
        let proxy = OracleProxy::new(
            Address::from_low_u64(PROXY),
            FixedOracle::new(1, Price::one()),
            factory_with_admin(admin),
            BasisPoints::new(500),
            Some(log.clone() as Arc<dyn EventSink>),
        )
        .unwrap();

        let _ = proxy.set_price_oracle(admin, FixedOracle::new(3, Price::from_bps(20_000)));
        proxy.set_price_oracle(admin, FixedOracle::new(2, Price::from_bps(10_100))).unwrap();

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.verify_checksum()));
        assert_eq!(
            events[1].payload,
            OracleEvent::PriceOracleSet {
                old_implementation: Address::from_low_u64(1),
                new_implementation: Address::from_low_u64(2),
                old_price: Price::one(),
                new_price: Price::from_bps(10_100),
            }
        );
    }
}
