use num_bigint::BigUint;
use num_traits::ToPrimitive;
use crate::error::{Error, Result};
use crate::types::bps::{BasisPoints, BPS_DENOMINATOR};
use crate::types::price::Price;

/// Upper bound accepted for a proxy's max deviation (50%).
pub const MAX_DEVIATION_BPS: u64 = 5_000;

/// Relative distance between two prices in basis points, rounded down. Saturates at
/// `u128::MAX`.
pub fn deviation_bps(old_price: Price, new_price: Price) -> Result<u128> {
    if old_price.is_zero() {
        return Err(Error::InvalidComparison);
    }
    let scaled = BigUint::from(old_price.abs_diff(new_price)) * BigUint::from(BPS_DENOMINATOR);
    Ok((scaled / BigUint::from(old_price.raw_value()))
        .to_u128()
        .unwrap_or(u128::MAX))
}

/// Whether `new_price` lies strictly further than `max_bps` from `old_price`.
///
/// The comparison is exact: `|new - old| * 10_000 > max_bps * old`, so a candidate sitting
/// precisely on the bound is accepted. Both products are carried in a `BigUint`.
pub fn exceeds(old_price: Price, new_price: Price, max_bps: BasisPoints) -> Result<bool> {
    if old_price.is_zero() {
        return Err(Error::InvalidComparison);
    }
    let lhs = BigUint::from(old_price.abs_diff(new_price)) * BigUint::from(BPS_DENOMINATOR);
    let rhs = BigUint::from(old_price.raw_value()) * BigUint::from(max_bps.value());
    Ok(lhs > rhs)
}

#[derive(Clone, Copy, Debug)]
pub struct DeviationGuard {
    max_deviation: BasisPoints,
}

impl DeviationGuard {
    pub fn new(max_deviation: BasisPoints) -> Result<Self> {
        let bps = max_deviation.value();
        if bps == 0 || bps > MAX_DEVIATION_BPS {
            return Err(Error::InvalidMaxDeviation(bps));
        }
        Ok(DeviationGuard { max_deviation })
    }

    pub fn max_deviation(&self) -> BasisPoints {
        self.max_deviation
    }

    pub fn check(&self, old_price: Price, new_price: Price) -> Result<()> {
        if exceeds(old_price, new_price, self.max_deviation)? {
            return Err(Error::DeviationExceeded {
                old_price,
                new_price,
                deviation_bps: deviation_bps(old_price, new_price)?,
                max_bps: self.max_deviation,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bps(v: u64) -> BasisPoints {
        BasisPoints::new(v)
    }

    #[test]
    fn within_and_outside_five_percent() {
        let old = Price::one();
        assert!(!exceeds(old, Price::from_bps(10_400), bps(500)).unwrap());
        assert!(exceeds(old, Price::from_bps(10_600), bps(500)).unwrap());
    }

    #[test]
    fn symmetric_for_drops_and_rises() {
        let old = Price::one();
        assert!(exceeds(old, Price::from_bps(9_400), bps(500)).unwrap());
        assert!(!exceeds(old, Price::from_bps(9_600), bps(500)).unwrap());
    }

    #[test]
    fn boundary_is_accepted_and_one_wei_past_it_is_not() {
        let old = Price::one();
        let at_bound = Price::from_bps(10_500);
        assert!(!exceeds(old, at_bound, bps(500)).unwrap());
        let past_bound = Price::from_raw(at_bound.raw_value() + 1);
        assert!(exceeds(old, past_bound, bps(500)).unwrap());
        // Floor would report 500bps here; the exact comparison still rejects.
        assert_eq!(deviation_bps(old, past_bound).unwrap(), 500);
    }

    #[test]
    fn zero_baseline_is_invalid() {
        assert!(matches!(exceeds(Price::zero(), Price::one(), bps(500)), Err(Error::InvalidComparison)));
        assert!(matches!(deviation_bps(Price::zero(), Price::one()), Err(Error::InvalidComparison)));
    }

    #[test]
    fn prices_near_the_top_of_the_range_compare_without_overflow() {
        let old = Price::from_raw(u128::MAX / 2);
        assert!(!exceeds(old, old, bps(5_000)).unwrap());
        assert!(exceeds(old, Price::from_raw(u128::MAX), bps(5_000)).unwrap());
        assert_eq!(deviation_bps(old, Price::from_raw(u128::MAX)).unwrap(), 10_000);

        let large = Price::from_raw(100_000_000_000_000_000 * Price::WAD);
        assert!(!exceeds(large, large, bps(5_000)).unwrap());
        assert!(DeviationGuard::new(bps(5_000)).unwrap().check(large, large).is_ok());
    }

    #[test]
    fn deviation_saturates_instead_of_failing() {
        let tiny = Price::from_raw(1);
        assert_eq!(deviation_bps(tiny, Price::from_raw(u128::MAX)).unwrap(), u128::MAX);

        let guard = DeviationGuard::new(bps(5_000)).unwrap();
        match guard.check(tiny, Price::from_raw(u128::MAX)) {
            Err(Error::DeviationExceeded { deviation_bps, .. }) => assert_eq!(deviation_bps, u128::MAX),
            other => panic!("expected DeviationExceeded, got {:?}", other),
        }
    }

    #[test]
    fn guard_rejects_out_of_range_bounds() {
        assert!(matches!(DeviationGuard::new(bps(0)), Err(Error::InvalidMaxDeviation(0))));
        assert!(matches!(DeviationGuard::new(bps(5_001)), Err(Error::InvalidMaxDeviation(5_001))));
        assert!(DeviationGuard::new(bps(5_000)).is_ok());
    }

    #[test]
    fn guard_reports_deviation_details() {
        let guard = DeviationGuard::new(bps(500)).unwrap();
        match guard.check(Price::one(), Price::from_bps(10_600)) {
            Err(Error::DeviationExceeded { deviation_bps, max_bps, .. }) => {
                assert_eq!(deviation_bps, 600);
                assert_eq!(max_bps, bps(500));
            }
            other => panic!("expected DeviationExceeded, got {:?}", other),
        }
    }
}
