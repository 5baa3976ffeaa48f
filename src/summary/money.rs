//! Money as integer cents.
//!
//! Amounts arrive as currency-formatted strings, plain numbers or nothing at
//! all. They are normalized to cents and only turned back into a decimal
//! value when a response is built.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::store::cell_text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Two-decimal value, rounded half away from zero.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        *self = *self + rhs;
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

/// Cents for a raw `Amount` cell. Null and empty cells are worth nothing.
pub fn to_cents(value: &Value) -> Cents {
    cell_text(value).map(|text| parse_cents(&text)).unwrap_or_default()
}

/// Cents for a currency-formatted amount such as `$1,234.5`.
///
/// `$` and `,` are dropped, the text is split at the first `.`, and each side
/// is read as a leading integer (anything unreadable counts as 0). The
/// fraction is padded and cut to exactly two digits, then added to
/// `whole * 100` as is, whatever the sign of the whole part.
pub fn parse_cents(text: &str) -> Cents {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();

    let mut parts = cleaned.split('.');
    let whole_text = parts.next().unwrap_or_default();
    let fraction_text = parts.next().unwrap_or_default();

    let whole = leading_int(whole_text).unwrap_or(0);
    let padded: String = fraction_text.chars().chain("00".chars()).take(2).collect();
    let fraction = leading_int(&padded).unwrap_or(0);

    Cents(whole.saturating_mul(100).saturating_add(fraction))
}

/// Base-10 integer at the start of `text`, ignoring anything after it.
/// Runs of digits too long for `i64` saturate.
fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.chars().next() {
        Some('-') => (true, &trimmed[1..]),
        Some('+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Only ASCII digits remain, so parsing can fail on overflow alone
    let magnitude: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
