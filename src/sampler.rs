//! Expected-returns surface over a price × days-to-expiration grid.

use std::cmp::Ordering;
use tracing::debug;

use crate::calendar::WorkdayCalendar;
use crate::error::{Error, Result};
use crate::position::Position;

/// What the sampler needs from a position.
pub trait Valuation {
    fn entry_cost(&self) -> f64;

    fn theoretical_value(&self, price: f64, volatility: f64, rate: f64, days: Option<i64>) -> f64;
}

/// A position valued against a fixed calendar.
#[derive(Debug, Clone)]
pub struct CalendarValuation<'a> {
    pub position: &'a Position,
    pub calendar: WorkdayCalendar,
}

impl Valuation for CalendarValuation<'_> {
    fn entry_cost(&self) -> f64 {
        self.position.entry_cost()
    }

    fn theoretical_value(&self, price: f64, volatility: f64, rate: f64, days: Option<i64>) -> f64 {
        self.position
            .theoretical_value_with(&self.calendar, price, volatility, rate, days)
    }
}

impl Valuation for Position {
    fn entry_cost(&self) -> f64 {
        Position::entry_cost(self)
    }

    fn theoretical_value(&self, price: f64, volatility: f64, rate: f64, days: Option<i64>) -> f64 {
        Position::theoretical_value(self, price, volatility, rate, days)
    }
}

#[derive(Debug, Clone)]
pub struct PlCalendar<V> {
    valuation: V,
    days_until_expiration: Vec<u32>,
}

impl<'a> PlCalendar<CalendarValuation<'a>> {
    pub fn for_position(position: &'a Position, calendar: WorkdayCalendar) -> Self {
        let workdays = position
            .max_expiration_date()
            .map(|date| calendar.workdays_until(date))
            .unwrap_or(0);
        Self::new(CalendarValuation { position, calendar }, workdays)
    }
}

impl<V: Valuation> PlCalendar<V> {
    pub const MAX_DATE_SAMPLE_NUMBER: usize = 15;
    pub const MAX_PRICE_SAMPLE_NUMBER: usize = 10;

    /// `workdays` is the number of work days until the last expiration.
    pub fn new(valuation: V, workdays: u32) -> Self {
        Self {
            valuation,
            days_until_expiration: days_until_expiration_interval(
                workdays,
                Self::MAX_DATE_SAMPLE_NUMBER,
            ),
        }
    }

    pub fn days_until_expiration_interval(&self) -> &[u32] {
        &self.days_until_expiration
    }

    pub fn generate_stock_price_interval(&self, price_range: &[f64]) -> Result<Vec<f64>> {
        let &[lo, hi, ..] = price_range else {
            return Err(Error::InvalidPriceRange(format!(
                "expected a low and a high price, got {price_range:?}"
            )));
        };
        if lo.partial_cmp(&hi) != Some(Ordering::Less) {
            return Err(Error::InvalidPriceRange(format!("{lo} is not below {hi}")));
        }
        Ok(linspace(lo, hi, Self::MAX_PRICE_SAMPLE_NUMBER))
    }

    /// Rows are prices, columns are days until expiration. Each cell is the
    /// theoretical value less the absolute entry cost.
    pub fn expected_returns_simulation(
        &self,
        price_range: &[f64],
        sigma: f64,
        r: f64,
    ) -> Result<Vec<Vec<f64>>> {
        let prices = self.generate_stock_price_interval(price_range)?;
        Ok(self.expected_returns_over(&prices, sigma, r))
    }

    pub fn expected_returns_over(&self, prices: &[f64], sigma: f64, r: f64) -> Vec<Vec<f64>> {
        let entry_cost = self.valuation.entry_cost().abs();
        debug!(
            prices = prices.len(),
            days = self.days_until_expiration.len(),
            entry_cost,
            "simulating expected returns"
        );
        prices
            .iter()
            .map(|&price| {
                self.days_until_expiration
                    .iter()
                    .map(|&t| {
                        self.valuation.theoretical_value(price, sigma, r, Some(t as i64))
                            - entry_cost
                    })
                    .collect()
            })
            .collect()
    }
}

fn days_until_expiration_interval(workdays: u32, max_samples: usize) -> Vec<u32> {
    let days = workdays as usize + 1;
    let samples = days.min(max_samples);
    if samples < 10 {
        return (0..samples as u32).collect();
    }
    linspace(0.0, days as f64, samples)
        .into_iter()
        .map(|d| d as u32)
        .collect()
}

/// `num` evenly spaced values over `[start, stop]`, both ends included.
fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}
