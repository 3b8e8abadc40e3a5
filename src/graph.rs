//! Chart-ready polyline for a payoff curve. Drawing is left to the caller.

use serde::{Deserialize, Serialize};

use crate::types::PlPoint;

/// Ray length as a fraction of the first non-zero price.
pub const HEAD_TAIL_MULT: f64 = 0.15;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    /// Breakpoints sorted by price, with rays added past sloped ends.
    pub points: Vec<PlPoint>,
    pub x_range: (f64, f64),
    /// The y axis spans `[-y_limit, y_limit]`.
    pub y_limit: f64,
}

fn line_slope(a: PlPoint, b: PlPoint) -> f64 {
    let dx = b.price - a.price;
    if dx == 0.0 {
        0.0
    } else {
        (b.pl - a.pl) / dx
    }
}

impl ChartData {
    /// `None` when fewer than two points are given.
    pub fn from_points(points: &[PlPoint]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

        let (tail, tail_next) = (sorted[0], sorted[1]);
        let (head, head_prev) = (sorted[sorted.len() - 1], sorted[sorted.len() - 2]);
        let ray = if tail.price > 0.0 {
            tail.price * HEAD_TAIL_MULT
        } else {
            tail_next.price * HEAD_TAIL_MULT
        };

        let tail_slope = line_slope(tail, tail_next);
        if tail_slope != 0.0 {
            sorted.insert(
                0,
                PlPoint::new(tail.price - ray, tail.pl - tail_slope * ray),
            );
        }
        let head_slope = line_slope(head_prev, head);
        if head_slope != 0.0 {
            sorted.push(PlPoint::new(head.price + ray, head.pl + head_slope * ray));
        }

        let min_price = if sorted[0].price == 0.0 {
            sorted[1].price
        } else {
            sorted[0].price
        };
        let max_price = sorted[sorted.len() - 1].price;
        let (lowest, highest) = sorted
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.pl), hi.max(p.pl))
            });

        Some(Self {
            points: sorted,
            x_range: (min_price, max_price),
            y_limit: lowest.abs().max(highest.abs()) + 2.0,
        })
    }
}
