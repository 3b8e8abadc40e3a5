//! A deduplicated, strike-sorted set of contracts and the values derived from it.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::calendar::WorkdayCalendar;
use crate::contract::Contract;
use crate::error::{Error, Result};
use crate::parser::parse_contracts;
use crate::pricing::option_value;
use crate::types::round2;

/// Immutable position. Every derived field is computed in [`Position::new`].
#[derive(Debug, Clone)]
pub struct Position {
    contracts: Vec<Contract>,
    strikes: Vec<f64>,
    pl_at_strike: Vec<(f64, f64)>,
    min_expiration: Option<NaiveDate>,
    max_expiration: Option<NaiveDate>,
}

impl Position {
    pub fn new(contracts: Vec<Contract>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut contracts: Vec<Contract> = contracts
            .into_iter()
            .filter(|c| seen.insert(c.key()))
            .collect();
        if contracts.is_empty() {
            return Err(Error::EmptyPosition);
        }
        contracts.sort_by(|a, b| a.price().total_cmp(&b.price()));

        let mut strikes: Vec<f64> = contracts.iter().map(Contract::price).collect();
        strikes.dedup();

        let pl_at_strike = strikes
            .iter()
            .map(|&strike| (strike, pl_of(&contracts, strike)))
            .collect();

        let dates = contracts.iter().filter_map(Contract::expiration_date);
        let min_expiration = dates.clone().min();
        let max_expiration = dates.max();

        Ok(Self {
            contracts,
            strikes,
            pl_at_strike,
            min_expiration,
            max_expiration,
        })
    }

    pub fn from_str_list<S: AsRef<str>>(texts: &[S]) -> Result<Self> {
        Self::new(parse_contracts(texts)?)
    }

    pub fn to_str_list(&self) -> Vec<String> {
        self.contracts.iter().map(ToString::to_string).collect()
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    /// Distinct reference prices in ascending order.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    pub fn min_strike(&self) -> f64 {
        self.strikes[0]
    }

    pub fn max_strike(&self) -> f64 {
        self.strikes[self.strikes.len() - 1]
    }

    /// `(strike, pl)` pairs, one per distinct strike.
    pub fn pl_at_strikes(&self) -> &[(f64, f64)] {
        &self.pl_at_strike
    }

    pub fn pl_at_strike(&self, strike: f64) -> Option<f64> {
        self.pl_at_strike
            .iter()
            .find(|(s, _)| *s == strike)
            .map(|(_, pl)| *pl)
    }

    /// Earliest expiration among dated option legs; `None` when there are none.
    pub fn min_expiration_date(&self) -> Option<NaiveDate> {
        self.min_expiration
    }

    pub fn max_expiration_date(&self) -> Option<NaiveDate> {
        self.max_expiration
    }

    pub fn pl_at_expiration(&self, price: f64) -> f64 {
        pl_of(&self.contracts, price)
    }

    /// Net cash flow of entering the position; credits are positive.
    pub fn entry_cost(&self) -> f64 {
        self.contracts
            .iter()
            .map(|c| c.price_sign() * c.count() as f64 * c.value())
            .sum()
    }

    /// Theoretical value at `price`, counting work days from the local date.
    pub fn theoretical_value(
        &self,
        price: f64,
        volatility: f64,
        rate: f64,
        days_override: Option<i64>,
    ) -> f64 {
        self.theoretical_value_with(&WorkdayCalendar::system(), price, volatility, rate, days_override)
    }

    pub fn theoretical_value_with(
        &self,
        calendar: &WorkdayCalendar,
        price: f64,
        volatility: f64,
        rate: f64,
        days_override: Option<i64>,
    ) -> f64 {
        self.contracts
            .iter()
            .map(|c| {
                let estimate = match c {
                    Contract::Stock(_) => price,
                    Contract::Option(o) => {
                        let days = match o.expiration {
                            None => 0,
                            Some(exp) => days_override
                                .unwrap_or_else(|| calendar.workdays_until(exp) as i64),
                        };
                        option_value(price, o.strike, rate, volatility, days, o.kind)
                    }
                };
                c.count() as f64 * estimate
            })
            .sum()
    }
}

fn pl_of(contracts: &[Contract], price: f64) -> f64 {
    round2(contracts.iter().map(|c| c.pl(price)).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{OptionContract, StockContract};
    use crate::types::{OptionKind, Side};

    fn position(texts: &[&str]) -> Position {
        Position::from_str_list(texts).unwrap()
    }

    #[test]
    fn pl_at_strikes_for_mixed_position() {
        let p = position(&["+1 95 call 6.25", "-1 105 call 1.75", "-2 105 put 7.75", "-2 stock 98"]);
        assert_eq!(p.pl_at_strikes(), &[(95.0, -3.0), (98.0, 0.0), (105.0, 7.0)]);
        assert_eq!(p.pl_at_strike(98.0), Some(0.0));
        assert_eq!(p.pl_at_strike(99.0), None);
    }

    #[test]
    fn pl_at_strike_single_short_call() {
        let p = position(&["-1 95 call 6.25"]);
        assert_eq!(p.pl_at_strikes(), &[(95.0, 6.25)]);
    }

    #[test]
    fn pl_at_strikes_call_ladder() {
        let p = position(&["+1 95 call 6.25", "+1 100 call 4.5", "+1 105 call 2.5", "+1 102 call 3.5"]);
        assert_eq!(
            p.pl_at_strikes(),
            &[(95.0, -16.75), (100.0, -11.75), (102.0, -7.75), (105.0, 1.25)]
        );
        assert_eq!(p.min_strike(), 95.0);
        assert_eq!(p.max_strike(), 105.0);
    }

    #[test]
    fn to_str_list_keeps_every_distinct_leg() {
        let contracts: Vec<Contract> = vec![
            OptionContract::new(1, Side::Long, OptionKind::Call, 95.0, 6.25).into(),
            OptionContract::new(1, Side::Short, OptionKind::Call, 105.0, 1.75).into(),
            OptionContract::new(2, Side::Long, OptionKind::Put, 90.0, 2.25).into(),
            OptionContract::new(2, Side::Short, OptionKind::Put, 90.0, 7.25).into(),
            StockContract::new(1, Side::Short, 95.0).into(),
        ];
        let p = Position::new(contracts).unwrap();
        let mut actual = p.to_str_list();
        actual.sort();
        let mut expected = vec![
            "+2 90.0 put 2.25",
            "-2 90.0 put 7.25",
            "+1 95.0 call 6.25",
            "-1 stock 95.0",
            "-1 105.0 call 1.75",
        ];
        expected.sort();
        assert_eq!(actual, expected);
        assert_eq!(p.strikes(), &[90.0, 95.0, 105.0]);
    }

    #[test]
    fn contracts_are_sorted_by_price() {
        let p = position(&["+1 90 call 9.5", "+1 85 call 5.5", "+1 80 call 3.5"]);
        assert_eq!(
            p.to_str_list(),
            vec!["+1 80.0 call 3.5", "+1 85.0 call 5.5", "+1 90.0 call 9.5"]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let p = position(&["+1 95 call 6.25", "+1 95.0 call 6.25"]);
        assert_eq!(p.contracts().len(), 1);
    }

    #[test]
    fn empty_position_is_rejected() {
        assert_eq!(Position::new(Vec::new()).unwrap_err(), Error::EmptyPosition);
    }

    #[test]
    fn expiration_bounds_skip_undated_legs() {
        let p = position(&["+1 95 call 5.0 2023-05-01", "-1 100 call 2.0 2023-06-16", "+1 stock 97"]);
        assert_eq!(p.min_expiration_date(), NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(p.max_expiration_date(), NaiveDate::from_ymd_opt(2023, 6, 16));

        let stock_only = position(&["+1 stock 97"]);
        assert_eq!(stock_only.min_expiration_date(), None);
        assert_eq!(stock_only.max_expiration_date(), None);
    }

    #[test]
    fn entry_cost_credits_are_positive() {
        let p = position(&["+1 50 call 9.30", "-1 55 call 5.5"]);
        assert!((p.entry_cost() - (-3.8)).abs() < 1e-9);

        let p = position(&["-1 100 put 5.20", "-1 100 call 4.70"]);
        assert!((p.entry_cost() - 9.9).abs() < 1e-9);
    }

    #[test]
    fn theoretical_value_of_undated_legs_is_intrinsic() {
        let p = position(&["+1 95 call 6.25", "+2 stock 90"]);
        // call intrinsic 5 plus two shares at 100
        assert!((p.theoretical_value(100.0, 0.4, 0.0, None) - 205.0).abs() < 1e-9);
    }

    #[test]
    fn theoretical_value_of_dated_legs_uses_calendar() {
        let p = position(&["+1 100 call 5.0 2023-03-17"]);
        let cal = WorkdayCalendar::fixed(NaiveDate::from_ymd_opt(2023, 2, 14).unwrap());
        let from_calendar = p.theoretical_value_with(&cal, 100.0, 0.4, 0.05, None);
        let explicit = option_value(100.0, 100.0, 0.05, 0.4, 24, OptionKind::Call);
        assert!((from_calendar - explicit).abs() < 1e-12);

        let expired = p.theoretical_value_with(&cal, 104.0, 0.4, 0.05, Some(0));
        assert!((expired - 4.0).abs() < 1e-12);
    }
}
