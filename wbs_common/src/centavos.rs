use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const PESO_CURRENCY_CODE: &str = "PHP";
pub const PESO_CURRENCY_CODE_LOWER: &str = "php";

//--------------------------------------     Centavos       ----------------------------------------------------------
/// A monetary amount in Philippine centavos. All billing arithmetic happens in integer centavos; pesos only exist
/// at display boundaries.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Centavos(i64);

op!(binary Centavos, Add, add);
op!(binary Centavos, Sub, sub);
op!(inplace Centavos, SubAssign, sub_assign);
op!(unary Centavos, Neg, neg);

impl Mul<i64> for Centavos {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Centavos {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in centavos: {0}")]
pub struct CentavosConversionError(String);

impl From<i64> for Centavos {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Centavos {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Centavos {}

impl TryFrom<u64> for Centavos {
    type Error = CentavosConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(CentavosConversionError(format!("Value {} is too large to convert to Centavos", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Centavos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}₱{}.{:02}", cents / 100, cents % 100)
    }
}

impl Centavos {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_pesos(pesos: i64) -> Self {
        Self(pesos * 100)
    }

    /// Rounds a fractional peso amount to the nearest centavo. Used when a rate is applied to a metered
    /// consumption, which is a real-valued quantity.
    pub fn from_pesos_f64(pesos: f64) -> Self {
        Self((pesos * 100.0).round() as i64)
    }

    /// Applies this amount as a per-unit rate to a real-valued quantity, rounding to the nearest centavo.
    pub fn scale_by(&self, qty: f64) -> Self {
        Self((self.0 as f64 * qty).round() as i64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_formats_pesos() {
        assert_eq!(Centavos::from(0).to_string(), "₱0.00");
        assert_eq!(Centavos::from(5).to_string(), "₱0.05");
        assert_eq!(Centavos::from(45_000).to_string(), "₱450.00");
        assert_eq!(Centavos::from(123_456).to_string(), "₱1234.56");
        assert_eq!(Centavos::from(-1_050).to_string(), "-₱10.50");
    }

    #[test]
    fn arithmetic() {
        let a = Centavos::from_pesos(10);
        let b = Centavos::from(250);
        assert_eq!(a + b, Centavos::from(1250));
        assert_eq!(a - b, Centavos::from(750));
        assert_eq!(a * 3, Centavos::from(3000));
        assert_eq!(-b, Centavos::from(-250));
        let mut c = a;
        c -= b;
        assert_eq!(c, Centavos::from(750));
        let total: Centavos = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Centavos::from(1500));
    }

    #[test]
    fn rate_scaling_rounds_to_nearest_centavo() {
        let rate = Centavos::from_pesos(10);
        assert_eq!(rate.scale_by(40.0), Centavos::from(40_000));
        assert_eq!(rate.scale_by(2.505), Centavos::from(2505));
        assert_eq!(rate.scale_by(0.0004), Centavos::from(0));
    }
}
