// src/model/product.rs

use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};

/// Target probability of not stocking out during a replenishment cycle.
/// Always strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ServiceLevel(f64);

impl ServiceLevel {
    pub fn new(value: f64) -> Result<Self> {
        // The normal quantile diverges at 0 and 1.
        if !(value > 0.0 && value < 1.0) {
            return Err(InsightsError::invalid(format!(
                "service level {value} must lie strictly between 0 and 1"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Consumption statistics and cost parameters for one SKU.
///
/// Fields are read-only. Rows deserialized from CSV bypass `new`, so loaders
/// must call [`DemandProfile::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    product: String,
    #[serde(default)]
    category: String,
    mean_daily_demand: f64,
    demand_std: f64,
    lead_time_days: f64,
    unit_cost: f64,
    holding_cost_rate: f64,
    ordering_cost: f64,
    current_stock: Option<f64>,
}

impl DemandProfile {
    /// Builds a profile, rejecting anything outside the model's domain.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        product: impl Into<String>,
        category: impl Into<String>,
        mean_daily_demand: f64,
        demand_std: f64,
        lead_time_days: f64,
        unit_cost: f64,
        holding_cost_rate: f64,
        ordering_cost: f64,
        current_stock: Option<f64>,
    ) -> Result<Self> {
        let profile = Self {
            product: product.into(),
            category: category.into(),
            mean_daily_demand,
            demand_std,
            lead_time_days,
            unit_cost,
            holding_cost_rate,
            ordering_cost,
            current_stock,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        let product = &self.product;
        let non_negative = [
            ("mean daily demand", self.mean_daily_demand),
            ("demand standard deviation", self.demand_std),
            ("ordering cost", self.ordering_cost),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(InsightsError::invalid(format!(
                    "product '{product}': {field} {value} must be a non-negative number"
                )));
            }
        }
        let positive = [
            ("lead time", self.lead_time_days),
            ("unit cost", self.unit_cost),
            ("holding cost rate", self.holding_cost_rate),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(InsightsError::invalid(format!(
                    "product '{product}': {field} {value} must be positive"
                )));
            }
        }
        if let Some(stock) = self.current_stock {
            if !stock.is_finite() || stock < 0.0 {
                return Err(InsightsError::invalid(format!(
                    "product '{product}': current stock {stock} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn mean_daily_demand(&self) -> f64 {
        self.mean_daily_demand
    }

    pub fn demand_std(&self) -> f64 {
        self.demand_std
    }

    pub fn lead_time_days(&self) -> f64 {
        self.lead_time_days
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn holding_cost_rate(&self) -> f64 {
        self.holding_cost_rate
    }

    pub fn ordering_cost(&self) -> f64 {
        self.ordering_cost
    }

    pub fn current_stock(&self) -> Option<f64> {
        self.current_stock
    }

    /// Expected demand over the replenishment lead time.
    pub fn lead_time_demand(&self) -> f64 {
        self.mean_daily_demand * self.lead_time_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub annual_holding: f64,
    pub annual_ordering: f64,
    pub total: f64,
}

/// Replenishment parameters derived for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryPolicy {
    pub product: String,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub eoq: f64,
    pub turnover_rate: f64,
    pub shortage_risk: Option<f64>,
    pub lead_time_demand_std: f64,
    pub annual_demand: f64,
    pub cost: CostBreakdown,
}
