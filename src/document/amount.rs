//! Monetary amounts, coins and conversion rates.
//!
//! Amounts in exported genesis documents are arbitrary-precision integers
//! encoded as decimal strings. They are parsed into [`Amount`] for every
//! arithmetic operation and rendered back canonically (no sign, no leading
//! zeros, no decimal point).

use crate::errors::{MigrationError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Non-negative arbitrary-precision integer amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Self(BigUint::default())
    }

    /// Parse a decimal digit string. `location` names the value in errors.
    pub fn parse(location: &str, text: &str) -> Result<Self> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MigrationError::invalid_amount(location, text));
        }
        BigUint::parse_bytes(text.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| MigrationError::invalid_amount(location, text))
    }

    /// Read an amount stored either as a digit string or a JSON integer.
    pub fn from_value(location: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Self::parse(location, text),
            Value::Number(n) => match n.as_u64() {
                Some(v) => Ok(Self::from(v)),
                None => Err(MigrationError::invalid_amount(location, n.to_string())),
            },
            _ => Err(MigrationError::shape(location, "amount string")),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }

    /// Subtract, or `None` when the result would be negative.
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if other.0 > self.0 {
            None
        } else {
            Some(Self(&self.0 - &other.0))
        }
    }

    /// Multiply by `rate`, truncating toward zero.
    pub fn scale(&self, rate: &Rate) -> Amount {
        Self(&self.0 * &rate.numerator / &rate.denominator)
    }

    pub fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Self(self.0 + rhs.0)
    }
}

impl<'a> AddAssign<&'a Amount> for Amount {
    fn add_assign(&mut self, rhs: &'a Amount) {
        self.0 += &rhs.0;
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), Add::add)
    }
}

/// An amount tagged with its denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    /// Decode a `{ "amount": "...", "denom": "..." }` object.
    pub fn from_value(location: &str, value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| MigrationError::shape(location, "coin object"))?;
        let amount = object
            .get("amount")
            .ok_or_else(|| MigrationError::missing_field(location, "amount"))?;
        let denom = object
            .get("denom")
            .ok_or_else(|| MigrationError::missing_field(location, "denom"))?
            .as_str()
            .ok_or_else(|| MigrationError::shape(format!("{location}.denom"), "string"))?;
        Ok(Self {
            denom: denom.to_string(),
            amount: Amount::from_value(&format!("{location}.amount"), amount)?,
        })
    }

    pub fn to_value(&self) -> Value {
        json!({ "amount": self.amount.to_string(), "denom": self.denom })
    }
}

/// A non-negative decimal ratio such as `0.025`, applied with truncation.
///
/// Held as an exact fraction so that `amount * rate` never goes through
/// floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rate {
    text: String,
    numerator: BigUint,
    denominator: BigUint,
}

impl Rate {
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || MigrationError::config(format!("invalid decimal rate `{text}`"));
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let digits = format!("{whole}{fraction}");
        let numerator = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let denominator = BigUint::from(10u32).pow(fraction.len() as u32);
        Ok(Self {
            text: text.to_string(),
            numerator,
            denominator,
        })
    }

    /// `units * 10^-scale`, e.g. `decimal(25, 3)` is `0.025`.
    pub fn decimal(units: u64, scale: u32) -> Self {
        let digits = format!("{:0width$}", units, width = scale as usize + 1);
        let split = digits.len() - scale as usize;
        let text = if scale == 0 {
            digits
        } else {
            format!("{}.{}", &digits[..split], &digits[split..])
        };
        Self {
            text,
            numerator: BigUint::from(units),
            denominator: BigUint::from(10u32).pow(scale),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl TryFrom<String> for Rate {
    type Error = MigrationError;

    fn try_from(value: String) -> Result<Self> {
        Rate::parse(&value)
    }
}

impl From<Rate> for String {
    fn from(rate: Rate) -> Self {
        rate.text
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
