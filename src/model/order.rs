// src/model/order.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of historical customer order data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub product: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub region: String,
}

impl OrderLine {
    pub fn total_amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}
