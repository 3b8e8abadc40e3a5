//! Entry point. Wires config -> Position -> PayoffCurve -> report.

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use options_pl::{config::CONFIG_ENV, AppConfig, PositionReport, Report};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let path = AppConfig::locate().with_context(|| {
        format!("no configuration found: set {CONFIG_ENV} or create ./config.yaml")
    })?;
    let cfg = AppConfig::load(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    info!(
        "Loaded {} position(s) from {}",
        cfg.positions.len(),
        path.display()
    );

    let mut report = Report::default();
    for position in &cfg.positions {
        let r = PositionReport::analyse(position, cfg.simulation.as_ref())
            .with_context(|| format!("analysing {:?}", position.name))?;
        report.positions.push(r);
    }

    match &cfg.output.path {
        Some(out) => {
            report.save(out)?;
            info!("Wrote {}", out);
        }
        None => println!("{}", report.to_json()?),
    }
    Ok(())
}
