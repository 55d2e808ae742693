// src/strategy/portfolio.rs

//! Batch inventory analysis over many products.

use crate::error::Result;
use crate::model::product::{DemandProfile, InventoryPolicy, ServiceLevel};
use crate::strategy::optimization::compute_policy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Cut-offs used to classify products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Stock above `overstock_ratio * ROP` counts as overstocked.
    pub overstock_ratio: f64,
    /// Shortage risk above this is flagged as high risk.
    pub high_risk: f64,
    /// Annual turnover below this is flagged as slow moving.
    pub low_turnover: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overstock_ratio: 1.5,
            high_risk: 0.1,
            low_turnover: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    NeedsReorder,
    Adequate,
    Overstocked,
    Unknown,
}

impl StockStatus {
    pub fn classify(current_stock: Option<f64>, reorder_point: f64, overstock_ratio: f64) -> Self {
        match current_stock {
            None => StockStatus::Unknown,
            Some(stock) if stock < reorder_point => StockStatus::NeedsReorder,
            Some(stock) if stock <= reorder_point * overstock_ratio => StockStatus::Adequate,
            Some(_) => StockStatus::Overstocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAnalysis {
    pub category: String,
    pub current_stock: Option<f64>,
    pub lead_time_days: f64,
    pub status: StockStatus,
    pub policy: InventoryPolicy,
}

/// An order that should be placed now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplenishmentSuggestion {
    pub product: String,
    pub category: String,
    pub current_stock: f64,
    pub reorder_point: f64,
    pub suggested_quantity: f64,
    pub expected_arrival_days: f64,
    pub shortage_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub products: usize,
    pub needs_reorder: usize,
    pub high_risk: usize,
    pub overstocked: usize,
    pub low_turnover: usize,
    pub mean_turnover: f64,
    pub total_annual_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub analyses: Vec<ProductAnalysis>,
    pub suggestions: Vec<ReplenishmentSuggestion>,
    pub summary: PortfolioSummary,
}

/// Computes every product's policy in parallel and derives status,
/// replenishment suggestions and a summary. Analyses keep input order.
///
/// Any invalid profile fails the whole batch.
pub fn analyze_portfolio(
    profiles: &[DemandProfile],
    service_level: ServiceLevel,
    thresholds: Thresholds,
) -> Result<PortfolioReport> {
    let analyses = profiles
        .par_iter()
        .map(|profile| -> Result<ProductAnalysis> {
            let policy = compute_policy(profile, service_level)?;
            let status = StockStatus::classify(
                profile.current_stock(),
                policy.reorder_point,
                thresholds.overstock_ratio,
            );
            Ok(ProductAnalysis {
                category: profile.category().to_string(),
                current_stock: profile.current_stock(),
                lead_time_days: profile.lead_time_days(),
                status,
                policy,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let suggestions = replenishment_suggestions(&analyses);
    let summary = summarize(&analyses, thresholds);
    info!(
        products = summary.products,
        needs_reorder = summary.needs_reorder,
        high_risk = summary.high_risk,
        "portfolio analysed"
    );
    Ok(PortfolioReport {
        analyses,
        suggestions,
        summary,
    })
}

/// Products below their reorder point, most at risk first.
pub fn replenishment_suggestions(analyses: &[ProductAnalysis]) -> Vec<ReplenishmentSuggestion> {
    let mut suggestions: Vec<ReplenishmentSuggestion> = analyses
        .iter()
        .filter(|a| a.status == StockStatus::NeedsReorder)
        .filter_map(|a| {
            Some(ReplenishmentSuggestion {
                product: a.policy.product.clone(),
                category: a.category.clone(),
                current_stock: a.current_stock?,
                reorder_point: a.policy.reorder_point,
                suggested_quantity: a.policy.eoq,
                expected_arrival_days: a.lead_time_days,
                shortage_risk: a.policy.shortage_risk.unwrap_or(0.0),
            })
        })
        .collect();
    suggestions.sort_by(|a, b| {
        b.shortage_risk
            .partial_cmp(&a.shortage_risk)
            .unwrap_or(Ordering::Equal)
    });
    debug!(count = suggestions.len(), "replenishment suggestions built");
    suggestions
}

fn summarize(analyses: &[ProductAnalysis], thresholds: Thresholds) -> PortfolioSummary {
    let count_status = |status: StockStatus| analyses.iter().filter(|a| a.status == status).count();
    let products = analyses.len();
    let mean_turnover = if products == 0 {
        0.0
    } else {
        analyses.iter().map(|a| a.policy.turnover_rate).sum::<f64>() / products as f64
    };
    PortfolioSummary {
        products,
        needs_reorder: count_status(StockStatus::NeedsReorder),
        high_risk: analyses
            .iter()
            .filter(|a| a.policy.shortage_risk.unwrap_or(0.0) > thresholds.high_risk)
            .count(),
        overstocked: count_status(StockStatus::Overstocked),
        low_turnover: analyses
            .iter()
            .filter(|a| a.policy.turnover_rate < thresholds.low_turnover)
            .count(),
        mean_turnover,
        total_annual_cost: analyses.iter().map(|a| a.policy.cost.total).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, stock: Option<f64>) -> DemandProfile {
        DemandProfile::new(name, "audio", 100.0, 20.0, 10.0, 50.0, 0.2, 50.0, stock).unwrap()
    }

    fn level() -> ServiceLevel {
        ServiceLevel::new(0.95).unwrap()
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(StockStatus::classify(None, 10.0, 1.5), StockStatus::Unknown);
        assert_eq!(StockStatus::classify(Some(9.9), 10.0, 1.5), StockStatus::NeedsReorder);
        assert_eq!(StockStatus::classify(Some(10.0), 10.0, 1.5), StockStatus::Adequate);
        assert_eq!(StockStatus::classify(Some(15.0), 10.0, 1.5), StockStatus::Adequate);
        assert_eq!(StockStatus::classify(Some(15.1), 10.0, 1.5), StockStatus::Overstocked);
    }

    #[test]
    fn report_keeps_input_order_and_counts() {
        // ROP for these parameters is roughly 1104.
        let profiles = vec![
            profile("short", Some(1050.0)),
            profile("critical", Some(500.0)),
            profile("fine", Some(1200.0)),
            profile("heavy", Some(5000.0)),
            profile("untracked", None),
        ];
        let report = analyze_portfolio(&profiles, level(), Thresholds::default()).unwrap();

        let names: Vec<_> = report.analyses.iter().map(|a| a.policy.product.as_str()).collect();
        assert_eq!(names, vec!["short", "critical", "fine", "heavy", "untracked"]);

        let statuses: Vec<_> = report.analyses.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                StockStatus::NeedsReorder,
                StockStatus::NeedsReorder,
                StockStatus::Adequate,
                StockStatus::Overstocked,
                StockStatus::Unknown,
            ]
        );

        let s = &report.summary;
        assert_eq!(s.products, 5);
        assert_eq!(s.needs_reorder, 2);
        assert_eq!(s.overstocked, 1);
        assert_eq!(s.high_risk, 2);
        assert_eq!(s.low_turnover, 0);
        assert!(s.total_annual_cost > 0.0);
    }

    #[test]
    fn suggestions_sorted_by_risk() {
        let profiles = vec![profile("short", Some(1050.0)), profile("critical", Some(500.0))];
        let report = analyze_portfolio(&profiles, level(), Thresholds::default()).unwrap();
        let order: Vec<_> = report.suggestions.iter().map(|s| s.product.as_str()).collect();
        assert_eq!(order, vec!["critical", "short"]);
        let first = &report.suggestions[0];
        assert_eq!(first.suggested_quantity, report.analyses[1].policy.eoq);
        assert_eq!(first.expected_arrival_days, 10.0);
    }

    #[test]
    fn invalid_profile_fails_batch() {
        // Deserialized rows skip the constructor's checks.
        let bad: DemandProfile = serde_json::from_str(
            r#"{"product": "bad", "category": "audio", "mean_daily_demand": 100.0,
                "demand_std": 20.0, "lead_time_days": 0.0, "unit_cost": 50.0,
                "holding_cost_rate": 0.2, "ordering_cost": 50.0, "current_stock": null}"#,
        )
        .unwrap();
        let result = analyze_portfolio(&[profile("ok", None), bad], level(), Thresholds::default());
        assert!(result.unwrap_err().is_invalid_input());
    }

    #[test]
    fn empty_portfolio_is_empty_report() {
        let report = analyze_portfolio(&[], level(), Thresholds::default()).unwrap();
        assert_eq!(report.summary.products, 0);
        assert_eq!(report.summary.mean_turnover, 0.0);
        assert!(report.suggestions.is_empty());
    }
}
