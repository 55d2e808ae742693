// src/simulation/config.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub days: usize,
    pub seed: u64,
    /// Days between stock reviews for the periodic policy.
    pub review_period_days: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 90,
            seed: 42,
            review_period_days: 7,
        }
    }
}
