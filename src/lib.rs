// src/lib.rs

//! Supplier ranking and inventory planning for a cross-border e-commerce
//! catalogue.
//!
//! The two analytical cores are [`strategy::topsis`] (multi-criteria
//! supplier ranking) and [`strategy::optimization`] (safety stock, reorder
//! point and EOQ under normally distributed demand). Both are pure functions
//! of their inputs. Everything else loads, generates, aggregates, simulates
//! or exports around them.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

#[cfg(test)]
mod test_util;

pub use config::AppConfig;
pub use error::{InsightsError, Result};
pub use model::product::{DemandProfile, InventoryPolicy, ServiceLevel};
pub use model::supplier::{Criterion, CriterionSpec, Orientation, SupplierFilter, SupplierRecord};
pub use strategy::optimization::compute_policy;
pub use strategy::topsis::{rank, rank_with_orientation, RankingResult};
