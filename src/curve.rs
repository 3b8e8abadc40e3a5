//! P&L at expiration as a minimal piecewise-linear curve.
//!
//! The builder splits the price axis at every distinct strike, computes the net
//! slope on each interval, merges neighbours whose slope has the same sign and
//! walks the merged intervals to emit breakpoints, synthesizing breakeven points
//! where the curve crosses zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::contract::Contract;
use crate::error::{Error, Result};
use crate::position::Position;
use crate::types::{fmt_price, round2, OptionKind, PlPoint};

/// The last interval reaches this far past the highest strike.
pub const LAST_PRICE_INTERVAL_MULTIPLIER: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceInterval {
    pub lo: f64,
    pub hi: f64,
}

impl PriceInterval {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

impl fmt::Display for PriceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", fmt_price(self.lo), fmt_price(self.hi))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoffCurve {
    price_intervals: Vec<PriceInterval>,
    slopes: Vec<i32>,
    adjusted_intervals: Vec<PriceInterval>,
    adjusted_slopes: Vec<i32>,
    points: Vec<PlPoint>,
}

impl PayoffCurve {
    pub fn build(position: &Position) -> Result<Self> {
        let contracts = position.contracts();
        let price_intervals = price_intervals(position.strikes());
        let slopes = slopes_of(contracts, &price_intervals)?;
        let adjusted_intervals = merge_by_slope_sign(&price_intervals, &slopes);
        let adjusted_slopes = slopes_of(contracts, &adjusted_intervals)?;
        debug!(
            raw = price_intervals.len(),
            merged = adjusted_intervals.len(),
            "price intervals built"
        );
        let points = breakpoints(position, &adjusted_intervals, &adjusted_slopes)?;

        Ok(Self {
            price_intervals,
            slopes,
            adjusted_intervals,
            adjusted_slopes,
            points,
        })
    }

    /// Intervals bounded by consecutive distinct strikes.
    pub fn price_intervals(&self) -> &[PriceInterval] {
        &self.price_intervals
    }

    pub fn slopes(&self) -> &[i32] {
        &self.slopes
    }

    /// Intervals after merging neighbours with the same slope sign.
    pub fn adjusted_intervals(&self) -> &[PriceInterval] {
        &self.adjusted_intervals
    }

    pub fn adjusted_slopes(&self) -> &[i32] {
        &self.adjusted_slopes
    }

    /// Merged intervals paired with their net slope.
    pub fn adjusted_slope_map(&self) -> Vec<(PriceInterval, i32)> {
        self.adjusted_intervals
            .iter()
            .copied()
            .zip(self.adjusted_slopes.iter().copied())
            .collect()
    }

    /// Breakpoints in emission order; not necessarily sorted by price.
    pub fn points(&self) -> &[PlPoint] {
        &self.points
    }

    pub fn sorted_points(&self) -> Vec<PlPoint> {
        let mut points = self.points.clone();
        points.sort_by(|a, b| a.price.total_cmp(&b.price).then(a.pl.total_cmp(&b.pl)));
        points
    }

    /// Linear interpolation between breakpoints. `None` outside the covered range.
    pub fn pl_at(&self, price: f64) -> Option<f64> {
        let points = self.sorted_points();
        if let Some(p) = points.iter().find(|p| p.price == price) {
            return Some(p.pl);
        }
        points.windows(2).find_map(|w| {
            let (a, b) = (w[0], w[1]);
            if a.price < price && price < b.price {
                Some(a.pl + (b.pl - a.pl) * (price - a.price) / (b.price - a.price))
            } else {
                None
            }
        })
    }
}

fn price_intervals(strikes: &[f64]) -> Vec<PriceInterval> {
    let Some((&first, rest)) = strikes.split_first() else {
        return Vec::new();
    };
    let mut prev = round2(first);
    let mut intervals = vec![PriceInterval::new(0.0, prev)];
    for &strike in rest {
        let price = round2(strike);
        if price == prev {
            continue;
        }
        intervals.push(PriceInterval::new(prev, price));
        prev = price;
    }
    intervals.push(PriceInterval::new(
        prev,
        round2(prev * LAST_PRICE_INTERVAL_MULTIPLIER),
    ));
    intervals
}

/// Net slope on `interval`: legs in the money at either end contribute.
fn slope_between(contracts: &[Contract], interval: &PriceInterval) -> Result<i32> {
    let overflow = || Error::InvalidSlope(format!("slope on {interval} overflows"));
    contracts
        .iter()
        .filter(|c| c.is_in_money_between(interval.lo, interval.hi))
        .try_fold(0i32, |acc, c| {
            let count = i32::try_from(c.count()).map_err(|_| overflow())?;
            c.in_money_slope()
                .checked_mul(count)
                .and_then(|leg| acc.checked_add(leg))
                .ok_or_else(overflow)
        })
}

fn slopes_of(contracts: &[Contract], intervals: &[PriceInterval]) -> Result<Vec<i32>> {
    intervals
        .iter()
        .map(|interval| slope_between(contracts, interval))
        .collect()
}

fn merge_by_slope_sign(intervals: &[PriceInterval], slopes: &[i32]) -> Vec<PriceInterval> {
    let last = intervals.len().saturating_sub(1);
    let mut merged: Vec<PriceInterval> = Vec::with_capacity(intervals.len());
    let mut prev_sign = 0;

    for (i, (interval, slope)) in intervals.iter().zip(slopes).enumerate() {
        let sign = slope.signum();
        if i == 0 {
            merged.push(*interval);
        } else if i == last && merged.len() == 2 {
            // keep at least three segments unless it is a straddle or strangle
            merged.push(*interval);
        } else if sign == prev_sign {
            if let Some(run) = merged.last_mut() {
                run.hi = interval.hi;
            }
        } else {
            merged.push(*interval);
        }
        prev_sign = sign;
    }
    merged
}

/// Zero is a sign of its own.
fn slope_changed(a: i32, b: i32) -> bool {
    a.signum() != b.signum()
}

fn breakpoints(
    position: &Position,
    intervals: &[PriceInterval],
    slopes: &[i32],
) -> Result<Vec<PlPoint>> {
    let (Some(&first_slope), Some(&(_, seed))) = (slopes.first(), position.pl_at_strikes().first())
    else {
        return Err(Error::InvalidSlope(
            "position has no price intervals".to_string(),
        ));
    };
    if intervals.len() != slopes.len() {
        return Err(Error::InvalidSlope(format!(
            "{} intervals but {} slopes",
            intervals.len(),
            slopes.len()
        )));
    }

    let contracts = position.contracts();
    let single_contract = contracts.len() == 1;
    let count = intervals.len();
    let mut pl = seed;
    let mut points: Vec<PlPoint> = Vec::new();
    let mut prev_slope = -first_slope;

    for (i, (interval, &slope)) in intervals.iter().zip(slopes).enumerate() {
        let PriceInterval { lo, hi } = *interval;

        if slope == 0 {
            match points.last() {
                Some(last) => points.push(PlPoint::new(hi, last.pl)),
                None => {
                    points.push(PlPoint::new(lo, pl));
                    points.push(PlPoint::new(hi, pl));
                }
            }
            prev_slope = slope;
            continue;
        }

        if i == 0 {
            points.push(PlPoint::new(hi, pl));
        }

        let s = slope as f64;
        let mut breakeven = 0.0;
        if slope_changed(slope, prev_slope) {
            if single_contract {
                let anchor = if lo > 0.0 { lo } else { hi };
                let offset = (pl / s).abs();
                breakeven = match contracts[0].subtype() {
                    Some(OptionKind::Put) => anchor - offset,
                    _ => anchor + offset,
                };
                points.insert(0, PlPoint::new(breakeven, 0.0));
            } else if slope < 0 && count == 2 {
                let anchor = if i != count - 1 { hi } else { lo };
                breakeven = anchor + pl.abs() / s;
                points.push(PlPoint::new(breakeven, 0.0));
            } else {
                let anchor = if lo > 0.0 { lo } else { hi };
                breakeven = anchor + (pl / s).abs();
                points.push(PlPoint::new(breakeven, 0.0));
            }
            debug!(%interval, slope, breakeven, "breakeven");
        }

        if 0 < i && i < count - 1 {
            pl = round2((hi - breakeven) / s);
            points.push(PlPoint::new(hi, pl));
        }

        prev_slope = slope;
    }

    Ok(points)
}
