// src/io/reporting.rs

use crate::error::{InsightsError, Result};
use crate::model::order::OrderLine;
use crate::model::product::DemandProfile;
use crate::model::supplier::SupplierRecord;
use crate::simulation::engine::DailyRecord;
use crate::strategy::portfolio::{ProductAnalysis, ReplenishmentSuggestion, StockStatus};
use crate::strategy::topsis::RankingResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Serializes `rows` to a CSV file with a header line.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    info!(path = %path.display(), rows = rows.len(), "exported csv");
    Ok(())
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    info!(path = %path.display(), rows = rows.len(), "loaded csv");
    Ok(rows)
}

pub fn read_orders(path: &Path) -> Result<Vec<OrderLine>> {
    read_csv(path)
}

pub fn write_orders(path: &Path, orders: &[OrderLine]) -> Result<()> {
    write_csv(path, orders)
}

/// Loads demand profiles and validates every row.
pub fn read_profiles(path: &Path) -> Result<Vec<DemandProfile>> {
    let profiles: Vec<DemandProfile> = read_csv(path)?;
    for (line, profile) in profiles.iter().enumerate() {
        profile.validate().map_err(|e| match e {
            InsightsError::InvalidInput(msg) => {
                InsightsError::invalid(format!("{}, row {}: {msg}", path.display(), line + 1))
            }
            other => other,
        })?;
    }
    Ok(profiles)
}

pub fn write_profiles(path: &Path, profiles: &[DemandProfile]) -> Result<()> {
    write_csv(path, profiles)
}

// ==========================================
// Ranking export
// ==========================================

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    rank: usize,
    supplier_id: &'a str,
    name: &'a str,
    category: &'a str,
    region: &'a str,
    closeness: f64,
}

/// Writes ranking results joined with the supplier names they refer to.
pub fn write_rankings(
    path: &Path,
    results: &[RankingResult],
    suppliers: &[SupplierRecord],
) -> Result<()> {
    let by_id: HashMap<&str, &SupplierRecord> = suppliers.iter().map(|s| (s.id(), s)).collect();
    let rows: Vec<RankingRow> = results
        .iter()
        .map(|r| {
            let supplier = by_id.get(r.supplier_id.as_str());
            RankingRow {
                rank: r.rank,
                supplier_id: &r.supplier_id,
                name: supplier.map_or("", |s| s.name()),
                category: supplier.map_or("", |s| s.category()),
                region: supplier.map_or("", |s| s.region()),
                closeness: r.closeness,
            }
        })
        .collect();
    write_csv(path, &rows)
}

// ==========================================
// Inventory export
// ==========================================

/// Flat view of a product analysis; csv cannot serialize nested structs.
#[derive(Debug, Serialize)]
struct PolicyRow<'a> {
    product: &'a str,
    category: &'a str,
    status: StockStatus,
    current_stock: Option<f64>,
    safety_stock: f64,
    reorder_point: f64,
    eoq: f64,
    turnover_rate: f64,
    shortage_risk: Option<f64>,
    annual_demand: f64,
    annual_holding_cost: f64,
    annual_ordering_cost: f64,
    total_annual_cost: f64,
}

impl<'a> From<&'a ProductAnalysis> for PolicyRow<'a> {
    fn from(a: &'a ProductAnalysis) -> Self {
        Self {
            product: &a.policy.product,
            category: &a.category,
            status: a.status,
            current_stock: a.current_stock,
            safety_stock: a.policy.safety_stock,
            reorder_point: a.policy.reorder_point,
            eoq: a.policy.eoq,
            turnover_rate: a.policy.turnover_rate,
            shortage_risk: a.policy.shortage_risk,
            annual_demand: a.policy.annual_demand,
            annual_holding_cost: a.policy.cost.annual_holding,
            annual_ordering_cost: a.policy.cost.annual_ordering,
            total_annual_cost: a.policy.cost.total,
        }
    }
}

pub fn write_policy_report(path: &Path, analyses: &[ProductAnalysis]) -> Result<()> {
    let rows: Vec<PolicyRow> = analyses.iter().map(PolicyRow::from).collect();
    write_csv(path, &rows)
}

pub fn write_suggestions(path: &Path, suggestions: &[ReplenishmentSuggestion]) -> Result<()> {
    write_csv(path, suggestions)
}

/// Writes the day-by-day simulation log.
pub fn write_simulation_log(path: &Path, history: &[DailyRecord]) -> Result<()> {
    write_csv(path, history)
}
