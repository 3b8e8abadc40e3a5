//! Load and validate the run configuration.

use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV: &str = "OPTIONS_PL_CONFIG";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Deserialize, Clone)]
pub struct PositionCfg {
    pub name: String,
    /// Contracts in text form, e.g. "+1 95 call 6.25".
    pub contracts: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationCfg {
    /// Low and high underlying price.
    pub price_range: Vec<f64>,
    pub volatility: f64,
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Pins "today" for work-day counting; the local date otherwise.
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputCfg {
    /// Report file; stdout when absent.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub positions: Vec<PositionCfg>,
    pub simulation: Option<SimulationCfg>,
    #[serde(default)]
    pub output: OutputCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_yaml(&s)
    }

    pub fn from_yaml(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.positions.is_empty() {
            anyhow::bail!("configuration lists no positions");
        }
        if let Some(p) = self.positions.iter().find(|p| p.contracts.is_empty()) {
            anyhow::bail!("position {:?} has no contracts", p.name);
        }
        if let Some(sim) = &self.simulation {
            if sim.volatility <= 0.0 {
                anyhow::bail!("volatility must be positive, got {}", sim.volatility);
            }
        }
        Ok(())
    }

    /// `$OPTIONS_PL_CONFIG`, then `./config.yaml`, then the platform config dir.
    pub fn locate() -> Option<PathBuf> {
        Self::locate_from(std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    fn locate_from(explicit: Option<PathBuf>) -> Option<PathBuf> {
        if explicit.is_some() {
            return explicit;
        }
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        ProjectDirs::from("", "", "options-pl")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .filter(|p| p.exists())
    }
}
