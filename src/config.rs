// src/config.rs

use crate::error::{InsightsError, Result};
use crate::io::demand::ProfileDefaults;
use crate::model::product::ServiceLevel;
use crate::model::supplier::{Criterion, CriterionSpec};
use crate::simulation::config::SimulationConfig;
use crate::strategy::portfolio::Thresholds;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything the command line can be tuned with, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_level: f64,
    /// Relative importance per criterion. Criteria absent here are not ranked on.
    pub weights: BTreeMap<Criterion, f64>,
    /// Criteria where a lower raw score is better.
    pub cost_criteria: Vec<Criterion>,
    pub thresholds: Thresholds,
    pub inventory: ProfileDefaults,
    pub simulation: SimulationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_level: 0.95,
            weights: default_weights(),
            cost_criteria: Vec::new(),
            thresholds: Thresholds::default(),
            inventory: ProfileDefaults::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

fn default_weights() -> BTreeMap<Criterion, f64> {
    BTreeMap::from([
        (Criterion::Price, 0.20),
        (Criterion::Quality, 0.25),
        (Criterion::Delivery, 0.20),
        (Criterion::Service, 0.15),
        (Criterion::Reputation, 0.15),
        (Criterion::Capacity, 0.05),
    ])
}

impl AppConfig {
    /// Reads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_write(path: &Path) -> Result<Self> {
        if !path.exists() {
            let defaults = Self::default();
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, serde_json::to_string_pretty(&defaults)?)?;
            info!(path = %path.display(), "wrote default configuration");
            return Ok(defaults);
        }
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ServiceLevel::new(self.service_level)?;
        if self.weights.is_empty() {
            return Err(InsightsError::invalid("config: at least one criterion weight is required"));
        }
        for (criterion, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(InsightsError::invalid(format!(
                    "config: weight {weight} for {criterion} must be a non-negative number"
                )));
            }
        }
        let t = &self.thresholds;
        if !(t.overstock_ratio.is_finite() && t.overstock_ratio >= 1.0) {
            return Err(InsightsError::invalid("config: overstock_ratio must be at least 1"));
        }
        if !(0.0..=1.0).contains(&t.high_risk) {
            return Err(InsightsError::invalid("config: high_risk must lie in [0, 1]"));
        }
        if self.simulation.days == 0 {
            return Err(InsightsError::invalid("config: simulation days must be positive"));
        }
        Ok(())
    }

    pub fn service_level(&self) -> Result<ServiceLevel> {
        ServiceLevel::new(self.service_level)
    }

    /// Criteria to rank on, in canonical order, with their orientation and weight.
    pub fn ranking_criteria(&self) -> (Vec<CriterionSpec>, Vec<f64>) {
        self.weights
            .iter()
            .map(|(&criterion, &weight)| {
                let spec = if self.cost_criteria.contains(&criterion) {
                    CriterionSpec::cost(criterion)
                } else {
                    CriterionSpec::benefit(criterion)
                };
                (spec, weight)
            })
            .unzip()
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides `level`.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("supply_insights={level}");
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(filter_directive)
            .with_writer(std::io::stderr)
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter_directive)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
