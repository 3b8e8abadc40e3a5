//! Analysis results for configured positions, persisted as JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::calendar::WorkdayCalendar;
use crate::config::{PositionCfg, SimulationCfg};
use crate::curve::{PayoffCurve, PriceInterval};
use crate::graph::ChartData;
use crate::position::Position;
use crate::sampler::PlCalendar;
use crate::types::PlPoint;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnSurface {
    pub prices: Vec<f64>,
    pub days: Vec<u32>,
    /// `returns[i][j]` is the expected return at `prices[i]` with `days[j]` left.
    pub returns: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionReport {
    pub name: String,
    /// Canonical text form of the deduplicated legs.
    pub contracts: Vec<String>,
    pub entry_cost: f64,
    pub min_expiration: Option<NaiveDate>,
    pub max_expiration: Option<NaiveDate>,
    pub slopes: Vec<(PriceInterval, i32)>,
    /// Curve breakpoints sorted by price.
    pub points: Vec<PlPoint>,
    pub chart: Option<ChartData>,
    pub expected_returns: Option<ReturnSurface>,
}

impl PositionReport {
    pub fn analyse(cfg: &PositionCfg, simulation: Option<&SimulationCfg>) -> crate::Result<Self> {
        let position = Position::from_str_list(&cfg.contracts)?;
        let curve = PayoffCurve::build(&position)?;
        let points = curve.sorted_points();
        info!(
            "Position {:?}: {} leg(s), {} breakpoint(s)",
            cfg.name,
            position.contracts().len(),
            points.len()
        );

        let expected_returns = simulation
            .map(|sim| simulate(&position, sim))
            .transpose()?;

        Ok(Self {
            name: cfg.name.clone(),
            contracts: position.to_str_list(),
            entry_cost: position.entry_cost(),
            min_expiration: position.min_expiration_date(),
            max_expiration: position.max_expiration_date(),
            slopes: curve.adjusted_slope_map(),
            chart: ChartData::from_points(&points),
            points,
            expected_returns,
        })
    }
}

fn simulate(position: &Position, sim: &SimulationCfg) -> crate::Result<ReturnSurface> {
    let calendar = sim
        .today
        .map(WorkdayCalendar::fixed)
        .unwrap_or_else(WorkdayCalendar::system);
    let sampler = PlCalendar::for_position(position, calendar);
    let prices = sampler.generate_stock_price_interval(&sim.price_range)?;
    let returns = sampler.expected_returns_over(&prices, sim.volatility, sim.risk_free_rate);
    Ok(ReturnSurface {
        prices,
        days: sampler.days_until_expiration_interval().to_vec(),
        returns,
    })
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub positions: Vec<PositionReport>,
}

impl Report {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
