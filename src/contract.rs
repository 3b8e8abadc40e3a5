//! Stock and option contracts and their P&L at expiration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::{fmt_count, fmt_price, OptionKind, Side};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockContract {
    pub count: u32,
    pub side: Side,
    pub reference_price: f64,
}

impl StockContract {
    pub fn new(count: u32, side: Side, reference_price: f64) -> Self {
        Self {
            count,
            side,
            reference_price,
        }
    }

    /// Stock is "in the money" for any positive underlying price.
    pub fn is_in_money(&self, price: f64) -> bool {
        price > 0.0
    }

    pub fn in_money_slope(&self) -> i32 {
        match self.side {
            Side::Long => 1,
            Side::Short => -1,
        }
    }

    /// `count × (reference − price)`; the side does not enter this formula.
    pub fn pl(&self, current_price: f64) -> f64 {
        self.count as f64 * (self.reference_price - current_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub count: u32,
    pub side: Side,
    pub kind: OptionKind,
    pub strike: f64,
    pub premium: f64,
    pub expiration: Option<NaiveDate>,
}

impl OptionContract {
    pub fn new(count: u32, side: Side, kind: OptionKind, strike: f64, premium: f64) -> Self {
        Self {
            count,
            side,
            kind,
            strike,
            premium,
            expiration: None,
        }
    }

    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration = Some(date);
        self
    }

    pub fn is_in_money(&self, price: f64) -> bool {
        match self.kind {
            OptionKind::Call => price > self.strike,
            OptionKind::Put => price < self.strike,
        }
    }

    pub fn is_at_money(&self, price: f64) -> bool {
        self.strike == price
    }

    pub fn in_money_slope(&self) -> i32 {
        match (self.side, self.kind) {
            (Side::Long, OptionKind::Call) => 1,
            (Side::Short, OptionKind::Call) => -1,
            (Side::Long, OptionKind::Put) => -1,
            (Side::Short, OptionKind::Put) => 1,
        }
    }

    pub fn pl(&self, current_price: f64) -> f64 {
        let count = self.count as f64;
        if !self.is_in_money(current_price) {
            return count * self.side.price_sign() * self.premium;
        }
        let sign = match (self.side, self.kind) {
            (Side::Long, OptionKind::Call) => 1.0,
            _ => -(self.in_money_slope() as f64),
        };
        let intrinsic = (self.strike - current_price).abs() - self.premium;
        count * sign * intrinsic
    }
}

/// A single payoff unit of a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "asset", rename_all = "lowercase")]
pub enum Contract {
    Stock(StockContract),
    Option(OptionContract),
}

/// Canonical identity of a contract, used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractKey {
    side: Side,
    count: u32,
    kind: Option<OptionKind>,
    price: u64,
    premium: Option<u64>,
    expiration: Option<NaiveDate>,
}

fn float_bits(x: f64) -> u64 {
    // -0.0 and 0.0 are the same price
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl Contract {
    pub fn count(&self) -> u32 {
        match self {
            Contract::Stock(s) => s.count,
            Contract::Option(o) => o.count,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Contract::Stock(s) => s.side,
            Contract::Option(o) => o.side,
        }
    }

    /// Reference price of the leg: strike for options, entry price for stock.
    pub fn price(&self) -> f64 {
        match self {
            Contract::Stock(s) => s.reference_price,
            Contract::Option(o) => o.strike,
        }
    }

    /// Per-unit amount paid or received when entering the leg.
    pub fn value(&self) -> f64 {
        match self {
            Contract::Stock(s) => s.reference_price,
            Contract::Option(o) => o.premium,
        }
    }

    pub fn price_sign(&self) -> f64 {
        self.side().price_sign()
    }

    pub fn subtype(&self) -> Option<OptionKind> {
        match self {
            Contract::Stock(_) => None,
            Contract::Option(o) => Some(o.kind),
        }
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        match self {
            Contract::Stock(_) => None,
            Contract::Option(o) => o.expiration,
        }
    }

    pub fn is_in_money(&self, price: f64) -> bool {
        match self {
            Contract::Stock(s) => s.is_in_money(price),
            Contract::Option(o) => o.is_in_money(price),
        }
    }

    /// True if the leg is in the money at either end of `[lo, hi]`.
    pub fn is_in_money_between(&self, lo: f64, hi: f64) -> bool {
        self.is_in_money(lo) || self.is_in_money(hi)
    }

    pub fn in_money_slope(&self) -> i32 {
        match self {
            Contract::Stock(s) => s.in_money_slope(),
            Contract::Option(o) => o.in_money_slope(),
        }
    }

    pub fn pl(&self, current_price: f64) -> f64 {
        match self {
            Contract::Stock(s) => s.pl(current_price),
            Contract::Option(o) => o.pl(current_price),
        }
    }

    pub fn key(&self) -> ContractKey {
        match self {
            Contract::Stock(s) => ContractKey {
                side: s.side,
                count: s.count,
                kind: None,
                price: float_bits(s.reference_price),
                premium: None,
                expiration: None,
            },
            Contract::Option(o) => ContractKey {
                side: o.side,
                count: o.count,
                kind: Some(o.kind),
                price: float_bits(o.strike),
                premium: Some(float_bits(o.premium)),
                expiration: o.expiration,
            },
        }
    }
}

impl From<StockContract> for Contract {
    fn from(s: StockContract) -> Self {
        Contract::Stock(s)
    }
}

impl From<OptionContract> for Contract {
    fn from(o: OptionContract) -> Self {
        Contract::Option(o)
    }
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Contract {}

impl Hash for Contract {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Stock(s) => write!(
                f,
                "{} stock {}",
                fmt_count(s.side, s.count),
                fmt_price(s.reference_price)
            ),
            Contract::Option(o) => {
                write!(
                    f,
                    "{} {} {} {}",
                    fmt_count(o.side, o.count),
                    fmt_price(o.strike),
                    o.kind,
                    fmt_price(o.premium)
                )?;
                if let Some(date) = o.expiration {
                    write!(f, " {}", date.format("%Y-%m-%d"))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_call(strike: f64, premium: f64) -> OptionContract {
        OptionContract::new(1, Side::Long, OptionKind::Call, strike, premium)
    }

    #[test]
    fn call_is_at_money_only_on_strike() {
        let call = long_call(95.0, 1.25);
        assert!(!call.is_at_money(100.0));
        assert!(call.is_at_money(95.0));
        assert!(!call.is_at_money(90.0));
    }

    #[test]
    fn option_in_money_is_strict() {
        let put = OptionContract::new(1, Side::Long, OptionKind::Put, 95.0, 6.25);
        assert!(put.is_in_money(90.0));
        assert!(!put.is_in_money(95.0));

        let call = long_call(95.0, 6.25);
        assert!(!call.is_in_money(95.0));
        assert!(call.is_in_money(100.0));
        assert!(!call.is_in_money(80.0));
    }

    #[test]
    fn stock_in_money_for_positive_prices() {
        let short = StockContract::new(1, Side::Short, 95.0);
        assert!(short.is_in_money(95.0));
        assert!(short.is_in_money(90.0));
        assert!(!short.is_in_money(0.0));
    }

    #[test]
    fn in_money_slope_table() {
        let slope = |side, kind| OptionContract::new(1, side, kind, 100.0, 1.0).in_money_slope();
        assert_eq!(slope(Side::Long, OptionKind::Call), 1);
        assert_eq!(slope(Side::Short, OptionKind::Call), -1);
        assert_eq!(slope(Side::Long, OptionKind::Put), -1);
        assert_eq!(slope(Side::Short, OptionKind::Put), 1);
        assert_eq!(StockContract::new(1, Side::Long, 1.0).in_money_slope(), 1);
        assert_eq!(StockContract::new(1, Side::Short, 1.0).in_money_slope(), -1);
    }

    #[test]
    fn long_call_pl_is_continuous_at_strike() {
        let call = long_call(95.0, 6.25);
        assert_eq!(call.pl(90.0), -6.25);
        assert_eq!(call.pl(95.0), -6.25);
        assert_eq!(call.pl(98.0), -3.25);
        assert_eq!(call.pl(101.25), 0.0);
        assert_eq!(call.pl(105.0), 3.75);
    }

    #[test]
    fn short_put_pl_below_strike() {
        let put = |count| OptionContract::new(count, Side::Short, OptionKind::Put, 105.0, 7.75);
        assert_eq!(put(1).pl(140.5), 7.75);
        assert_eq!(put(1).pl(95.0), -2.25);
        assert_eq!(put(2).pl(95.0), -4.5);
        let cheap = OptionContract::new(1, Side::Short, OptionKind::Put, 105.0, 5.0);
        assert_eq!(cheap.pl(80.0), -20.0);
    }

    #[test]
    fn stock_pl_ignores_side() {
        assert_eq!(StockContract::new(1, Side::Long, 95.0).pl(90.0), 5.0);
        assert_eq!(StockContract::new(1, Side::Long, 90.0).pl(95.0), -5.0);
        assert_eq!(StockContract::new(2, Side::Short, 90.0).pl(95.0), -10.0);
    }

    #[test]
    fn equality_follows_canonical_key() {
        let a: Contract = long_call(95.0, 6.25).into();
        let b: Contract = long_call(95.0, 6.25).into();
        let dated: Contract = long_call(95.0, 6.25)
            .with_expiration(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())
            .into();
        assert_eq!(a, b);
        assert_ne!(a, dated);
        assert_ne!(a.key(), dated.key());
    }

    #[test]
    fn display_is_canonical_text_form() {
        let call: Contract = long_call(95.0, 6.25).into();
        assert_eq!(call.to_string(), "+1 95.0 call 6.25");

        let stock: Contract = StockContract::new(2, Side::Short, 98.0).into();
        assert_eq!(stock.to_string(), "-2 stock 98.0");

        let dated: Contract = OptionContract::new(3, Side::Short, OptionKind::Put, 97.5, 1.1)
            .with_expiration(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())
            .into();
        assert_eq!(dated.to_string(), "-3 97.5 put 1.1 2023-05-01");
    }
}
