//! Core domain primitives shared by contracts, positions and curves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a contract. Positive counts in the text form are long.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Cash-flow sign of the entry: a long leg pays a debit, a short leg receives a credit.
    pub fn price_sign(self) -> f64 {
        match self {
            Side::Long => -1.0,
            Side::Short => 1.0,
        }
    }

    pub(crate) fn from_signed_count(count: i64) -> Self {
        if count > 0 {
            Side::Long
        } else {
            Side::Short
        }
    }

    fn symbol(self) -> char {
        match self {
            Side::Long => '+',
            Side::Short => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One breakpoint of a payoff curve: P&L at a given underlying price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlPoint {
    pub price: f64,
    pub pl: f64,
}

impl PlPoint {
    pub fn new(price: f64, pl: f64) -> Self {
        Self { price, pl }
    }
}

impl From<(f64, f64)> for PlPoint {
    fn from((price, pl): (f64, f64)) -> Self {
        Self { price, pl }
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Renders a price the way the text format expects it: `95.0`, `6.25`.
pub(crate) fn fmt_price(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

pub(crate) fn fmt_count(side: Side, count: u32) -> String {
    format!("{}{}", side.symbol(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_sign_is_debit_for_long() {
        assert_eq!(Side::Long.price_sign(), -1.0);
        assert_eq!(Side::Short.price_sign(), 1.0);
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(-15.850000000000001), -15.85);
        assert_eq!(round2(1.199999999), 1.2);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn prices_render_like_the_text_format() {
        assert_eq!(fmt_price(95.0), "95.0");
        assert_eq!(fmt_price(6.25), "6.25");
        assert_eq!(fmt_price(9.3), "9.3");
        assert_eq!(fmt_count(Side::Short, 2), "-2");
    }
}
