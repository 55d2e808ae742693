// src/strategy/implementations.rs

use crate::model::product::InventoryPolicy;
use crate::strategy::traits::{InventoryState, ReplenishmentPolicy};

// =========================================================================
// 1. Continuous review (s, Q)
// =========================================================================

/// Orders a fixed quantity whenever the inventory position falls to or below
/// the reorder point and nothing is already on its way.
#[derive(Debug, Clone)]
pub struct ReorderPointPolicy {
    reorder_point: f64,
    order_quantity: f64,
}

impl ReorderPointPolicy {
    pub fn new(reorder_point: f64, order_quantity: f64) -> Self {
        Self {
            reorder_point,
            order_quantity,
        }
    }

    /// Uses the computed reorder point and EOQ.
    pub fn from_policy(policy: &InventoryPolicy) -> Self {
        Self::new(policy.reorder_point, policy.eoq)
    }
}

impl ReplenishmentPolicy for ReorderPointPolicy {
    fn order_quantity(&mut self, state: &InventoryState) -> f64 {
        if state.on_order > 0.0 || state.position() > self.reorder_point {
            return 0.0;
        }
        self.order_quantity
    }

    fn name(&self) -> &'static str {
        "continuous"
    }
}

// =========================================================================
// 2. Periodic review
// =========================================================================

/// Looks at stock only every `review_period` days and orders a fixed
/// quantity when on-hand stock is at or below the reorder point.
#[derive(Debug, Clone)]
pub struct PeriodicReviewPolicy {
    review_period: usize,
    reorder_point: f64,
    order_quantity: f64,
}

impl PeriodicReviewPolicy {
    pub fn new(review_period: usize, reorder_point: f64, order_quantity: f64) -> Self {
        Self {
            review_period: review_period.max(1),
            reorder_point,
            order_quantity,
        }
    }

    pub fn from_policy(review_period: usize, policy: &InventoryPolicy) -> Self {
        Self::new(review_period, policy.reorder_point, policy.eoq)
    }
}

impl ReplenishmentPolicy for PeriodicReviewPolicy {
    fn order_quantity(&mut self, state: &InventoryState) -> f64 {
        if state.day % self.review_period != 0 {
            return 0.0;
        }
        if state.on_hand <= self.reorder_point {
            self.order_quantity
        } else {
            0.0
        }
    }

    fn name(&self) -> &'static str {
        "periodic"
    }
}
