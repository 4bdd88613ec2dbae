use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

const MINOR_PER_UNIT: u64 = 100;

/// A non-negative monetary amount held exactly in minor units (satang).
///
/// Prices in the catalog and tariffs are whole units, so sums and the
/// 10% doctor share never accumulate floating point error.
///
/// On the wire an amount is written in whole units, e.g. `3600`. Fractional
/// amounts only arise from shares and are written as decimals, but never read back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates an amount from whole currency units.
    pub const fn from_whole(units: u64) -> Self {
        Self(units.saturating_mul(MINOR_PER_UNIT))
    }

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `percent`% of this amount, rounding half up to the nearest minor unit.
    pub fn percent(self, percent: u64) -> Money {
        let scaled = u128::from(self.0) * u128::from(percent) + 50;
        Money(u64::try_from(scaled / 100).unwrap_or(u64::MAX))
    }

    /// The amount in whole units as a float, for display and JSON output only.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / MINOR_PER_UNIT as f64
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Mul<u64> for Money {
    type Output = Money;

    fn mul(self, rhs: u64) -> Money {
        Money(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / MINOR_PER_UNIT,
            self.0 % MINOR_PER_UNIT
        )
    }
}

impl serde::Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.0 % MINOR_PER_UNIT == 0 {
            serializer.serialize_u64(self.0 / MINOR_PER_UNIT)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

impl<'de> serde::Deserialize<'de> for Money {
    /// Accepts whole units only, so every amount read from configuration is a multiple of
    /// 100 minor units and a 10% share of any sum of them is exact.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(WholeUnitsVisitor)
    }
}

struct WholeUnitsVisitor;

impl serde::de::Visitor<'_> for WholeUnitsVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative whole amount")
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Money, E> {
        value
            .checked_mul(MINOR_PER_UNIT)
            .map(Money)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Money, E> {
        let value = u64::try_from(value)
            .map_err(|_| E::custom(format!("amount must not be negative, got {value}")))?;
        self.visit_u64(value)
    }

    fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Money, E> {
        if !value.is_finite() || value < 0.0 {
            return Err(E::custom(format!(
                "amount must be a non-negative number, got {value}"
            )));
        }
        if value.fract() != 0.0 {
            return Err(E::custom(format!(
                "amount must be in whole units, got {value}"
            )));
        }
        if value >= u64::MAX as f64 {
            return Err(E::custom("amount is too large"));
        }
        self.visit_u64(value as u64)
    }
}
