// src/strategy/traits.rs

use std::fmt::Debug;

/// What a replenishment policy can see when it makes its daily decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryState {
    /// Simulation day, starting at 1.
    pub day: usize,
    /// Stock physically available after today's demand was served.
    pub on_hand: f64,
    /// Quantity ordered but not yet received.
    pub on_order: f64,
}

impl InventoryState {
    /// On-hand plus on-order stock.
    pub fn position(&self) -> f64 {
        self.on_hand + self.on_order
    }
}

/// Decides how much to reorder at the end of each simulated day.
///
/// `Send + Sync` so independent product simulations can run on a thread pool.
pub trait ReplenishmentPolicy: Debug + Send + Sync {
    /// Returns the quantity to order today (0 for no order).
    fn order_quantity(&mut self, state: &InventoryState) -> f64;

    fn name(&self) -> &'static str;
}
