use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use crate::error::{Error, Result};

pub const PRICE_DECIMALS: u32 = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(u128);  // Fixed-point with 18 decimal places

impl Price {
    pub const WAD: u128 = 1_000_000_000_000_000_000;  // 10^18

    pub const fn from_raw(value: u128) -> Self {
        Price(value)
    }

    pub const fn raw_value(&self) -> u128 {
        self.0
    }

    pub const fn one() -> Self {
        Price(Self::WAD)
    }

    pub const fn zero() -> Self {
        Price(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whole units plus a fraction given in basis points, e.g. `from_bps(10_500)` is 1.05.
    pub const fn from_bps(bps: u128) -> Self {
        Price(bps * (Self::WAD / 10_000))
    }

    /// Convert to f64 for display purposes only
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Self::WAD as f64
    }

    /// `self * other / 10^18`, rounded toward zero.
    pub fn checked_mul(self, other: Price) -> Result<Price> {
        mul_div_floor(self.0, other.0, Self::WAD, "price multiplication")
    }

    /// `self * 10^18 / other`, rounded toward zero.
    pub fn checked_div(self, other: Price) -> Result<Price> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        mul_div_floor(self.0, Self::WAD, other.0, "price division")
    }

    pub fn abs_diff(self, other: Price) -> u128 {
        self.0.abs_diff(other.0)
    }
}

/// `a * b / denominator` rounded toward zero. The intermediate product is carried in a
/// `BigUint` so that only the final result has to fit into 128 bits.
pub fn mul_div_floor(a: u128, b: u128, denominator: u128, operation: &str) -> Result<Price> {
    if denominator == 0 {
        return Err(Error::DivisionByZero);
    }
    let product = BigUint::from(a) * BigUint::from(b);
    if product.is_zero() {
        return Ok(Price::zero());
    }
    (product / BigUint::from(denominator))
        .to_u128()
        .map(Price)
        .ok_or_else(|| Error::Overflow { operation: operation.to_string() })
}

impl FromStr for Price {
    type Err = Error;

    /// Parses a decimal string such as `"1.05"` or `"2500"` without going through floats.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPrice(s.to_string());
        let s_trimmed = s.trim();
        let (whole, fraction) = match s_trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s_trimmed, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > PRICE_DECIMALS as usize {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction_value: u128 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", fraction, width = PRICE_DECIMALS as usize);
            padded.parse().map_err(|_| invalid())?
        };

        whole_value
            .checked_mul(Self::WAD)
            .and_then(|w| w.checked_add(fraction_value))
            .map(Price)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for Price {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> String {
        price.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::WAD;
        let fraction = self.0 % Self::WAD;
        if fraction == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", fraction);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}
