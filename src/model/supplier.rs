// src/model/supplier.rs

use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// The scoring dimensions a supplier is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Price,
    Quality,
    Delivery,
    Service,
    Reputation,
    Capacity,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Price,
        Criterion::Quality,
        Criterion::Delivery,
        Criterion::Service,
        Criterion::Reputation,
        Criterion::Capacity,
    ];

    /// Column / config key for this criterion.
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Price => "price",
            Criterion::Quality => "quality",
            Criterion::Delivery => "delivery",
            Criterion::Service => "service",
            Criterion::Reputation => "reputation",
            Criterion::Capacity => "capacity",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Criterion {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Criterion::ALL
            .into_iter()
            .find(|c| c.name() == needle)
            .ok_or_else(|| InsightsError::invalid(format!("unknown criterion '{s}'")))
    }
}

/// Whether a higher raw score is preferred (`Benefit`) or a lower one (`Cost`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Benefit,
    Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionSpec {
    pub criterion: Criterion,
    pub orientation: Orientation,
}

impl CriterionSpec {
    pub fn benefit(criterion: Criterion) -> Self {
        Self {
            criterion,
            orientation: Orientation::Benefit,
        }
    }

    pub fn cost(criterion: Criterion) -> Self {
        Self {
            criterion,
            orientation: Orientation::Cost,
        }
    }
}

/// One ranking subject. Built once from validated input and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierRecord {
    id: String,
    name: String,
    category: String,
    region: String,
    unit_price: f64,
    min_order_qty: u32,
    lead_time_days: u32,
    scores: BTreeMap<Criterion, f64>,
}

impl SupplierRecord {
    /// Rejects negative or non-finite scores and prices. Scores may cover only
    /// a subset of criteria; completeness is checked against the criteria of
    /// a ranking run.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        region: impl Into<String>,
        unit_price: f64,
        min_order_qty: u32,
        lead_time_days: u32,
        scores: BTreeMap<Criterion, f64>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(InsightsError::invalid("supplier id must not be empty"));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(InsightsError::invalid(format!(
                "supplier '{id}': unit price {unit_price} must be a non-negative number"
            )));
        }
        for (criterion, score) in &scores {
            if !score.is_finite() || *score < 0.0 {
                return Err(InsightsError::invalid(format!(
                    "supplier '{id}': score {score} for {criterion} must be a non-negative number"
                )));
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            category: category.into(),
            region: region.into(),
            unit_price,
            min_order_qty,
            lead_time_days,
            scores,
        })
    }

    /// Shorthand for ranking-only use where the descriptive fields do not matter.
    pub fn scored(id: impl Into<String>, scores: BTreeMap<Criterion, f64>) -> Result<Self> {
        let id = id.into();
        Self::new(id.clone(), id, "", "", 0.0, 0, 0, scores)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn min_order_qty(&self) -> u32 {
        self.min_order_qty
    }

    pub fn lead_time_days(&self) -> u32 {
        self.lead_time_days
    }

    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.scores.get(&criterion).copied()
    }

    pub fn scores(&self) -> &BTreeMap<Criterion, f64> {
        &self.scores
    }
}

/// Narrows a supplier table before ranking. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    pub category: Option<String>,
    pub region: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SupplierFilter {
    pub fn matches(&self, supplier: &SupplierRecord) -> bool {
        if let Some(category) = &self.category {
            if supplier.category() != category.as_str() {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if supplier.region() != region.as_str() {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if supplier.unit_price() < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if supplier.unit_price() > max {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, suppliers: &[SupplierRecord]) -> Vec<SupplierRecord> {
        suppliers
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect()
    }
}

/// Fails if two suppliers share an id.
pub fn ensure_unique_ids(suppliers: &[SupplierRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(suppliers.len());
    for supplier in suppliers {
        if !seen.insert(supplier.id()) {
            return Err(InsightsError::invalid(format!(
                "duplicate supplier id '{}'",
                supplier.id()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(id: &str, category: &str, region: &str, price: f64) -> SupplierRecord {
        SupplierRecord::new(id, id, category, region, price, 100, 10, BTreeMap::new()).unwrap()
    }

    #[test]
    fn criterion_names_round_trip() {
        for criterion in Criterion::ALL {
            assert_eq!(criterion.name().parse::<Criterion>().unwrap(), criterion);
        }
        assert_eq!(" Quality ".parse::<Criterion>().unwrap(), Criterion::Quality);
        assert!("speed".parse::<Criterion>().unwrap_err().is_invalid_input());
    }

    #[test]
    fn negative_score_rejected() {
        let scores = BTreeMap::from([(Criterion::Price, -1.0)]);
        let err = SupplierRecord::scored("S1", scores).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn nan_score_rejected() {
        let scores = BTreeMap::from([(Criterion::Quality, f64::NAN)]);
        assert!(SupplierRecord::scored("S1", scores).is_err());
    }

    #[test]
    fn filter_by_category_region_and_price() {
        let suppliers = vec![
            supplier("A", "electronics", "south", 20.0),
            supplier("B", "electronics", "east", 50.0),
            supplier("C", "home", "south", 30.0),
        ];
        let filter = SupplierFilter {
            category: Some("electronics".into()),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&suppliers).iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        let filter = SupplierFilter {
            region: Some("south".into()),
            min_price: Some(25.0),
            max_price: Some(40.0),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&suppliers).iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec!["C"]);
    }

    #[test]
    fn duplicate_ids_detected() {
        let suppliers = vec![supplier("A", "x", "y", 1.0), supplier("A", "x", "y", 2.0)];
        assert!(ensure_unique_ids(&suppliers).is_err());
        assert!(ensure_unique_ids(&suppliers[..1]).is_ok());
    }
}
