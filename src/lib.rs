//! P&L at expiration of option and stock positions as a minimal
//! piecewise-linear curve, plus a theoretical-value surface over time.

pub mod calendar;
pub mod config;
pub mod contract;
pub mod curve;
pub mod error;
pub mod graph;
pub mod parser;
pub mod position;
pub mod pricing;
pub mod report;
pub mod sampler;
pub mod types;

pub use calendar::WorkdayCalendar;
pub use config::AppConfig;
pub use contract::{Contract, ContractKey, OptionContract, StockContract};
pub use curve::{PayoffCurve, PriceInterval};
pub use error::{Error, Result};
pub use graph::ChartData;
pub use position::Position;
pub use report::{PositionReport, Report};
pub use sampler::{PlCalendar, Valuation};
pub use types::{OptionKind, PlPoint, Side};
