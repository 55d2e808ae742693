// src/io/orders.rs

//! Sales analytics over raw order lines: headline totals, a daily series and
//! revenue-ranked breakdowns by category, region and product.

use crate::error::{InsightsError, Result};
use crate::model::order::OrderLine;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::info;

/// Narrows an order history before summarizing. Unset fields match everything;
/// the date range is inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
    pub region: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &OrderLine) -> bool {
        self.from.map_or(true, |from| order.order_date >= from)
            && self.to.map_or(true, |to| order.order_date <= to)
            && self.category.as_deref().map_or(true, |c| order.category == c)
            && self.region.as_deref().map_or(true, |r| order.region == r)
    }

    pub fn apply(&self, orders: &[OrderLine]) -> Vec<OrderLine> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// Order count, units and revenue for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTotals {
    pub key: String,
    pub orders: usize,
    pub quantity: u64,
    pub revenue: f64,
    /// Fraction of all revenue in the summary; 0 when there was none.
    pub revenue_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: usize,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub total_quantity: u64,
    pub total_revenue: f64,
    /// Mean revenue per order line; 0 for an empty history.
    pub average_order_value: f64,
    /// One entry per day that saw orders, in date order.
    pub daily: Vec<DailySales>,
    pub by_category: Vec<SalesTotals>,
    pub by_region: Vec<SalesTotals>,
    pub by_product: Vec<SalesTotals>,
}

impl OrderSummary {
    /// Best-selling products by revenue.
    pub fn top_products(&self, n: usize) -> &[SalesTotals] {
        &self.by_product[..n.min(self.by_product.len())]
    }
}

#[derive(Default)]
struct Tally {
    orders: usize,
    quantity: u64,
    revenue: f64,
}

impl Tally {
    fn add(&mut self, order: &OrderLine) {
        self.orders += 1;
        self.quantity += u64::from(order.quantity);
        self.revenue += order.total_amount();
    }
}

/// Summarizes an order history. Breakdowns are sorted by revenue, highest
/// first, with ties broken by key.
pub fn summarize_orders(orders: &[OrderLine]) -> Result<OrderSummary> {
    let mut total = Tally::default();
    let mut daily: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    let mut by_category: BTreeMap<&str, Tally> = BTreeMap::new();
    let mut by_region: BTreeMap<&str, Tally> = BTreeMap::new();
    let mut by_product: BTreeMap<&str, Tally> = BTreeMap::new();

    for order in orders {
        if !order.unit_price.is_finite() || order.unit_price < 0.0 {
            return Err(InsightsError::invalid(format!(
                "order '{}': unit price {} must be a non-negative number",
                order.order_id, order.unit_price
            )));
        }
        total.add(order);
        daily.entry(order.order_date).or_default().add(order);
        by_category.entry(order.category.as_str()).or_default().add(order);
        by_region.entry(order.region.as_str()).or_default().add(order);
        by_product.entry(order.product.as_str()).or_default().add(order);
    }

    let summary = OrderSummary {
        total_orders: total.orders,
        total_quantity: total.quantity,
        total_revenue: total.revenue,
        average_order_value: if total.orders == 0 {
            0.0
        } else {
            total.revenue / total.orders as f64
        },
        daily: daily
            .into_iter()
            .map(|(date, t)| DailySales {
                date,
                orders: t.orders,
                quantity: t.quantity,
                revenue: t.revenue,
            })
            .collect(),
        by_category: ranked(by_category, total.revenue),
        by_region: ranked(by_region, total.revenue),
        by_product: ranked(by_product, total.revenue),
    };
    info!(
        orders = summary.total_orders,
        revenue = summary.total_revenue,
        products = summary.by_product.len(),
        "summarized orders"
    );
    Ok(summary)
}

fn ranked(groups: BTreeMap<&str, Tally>, total_revenue: f64) -> Vec<SalesTotals> {
    let mut totals: Vec<SalesTotals> = groups
        .into_iter()
        .map(|(key, t)| SalesTotals {
            key: key.to_string(),
            orders: t.orders,
            quantity: t.quantity,
            revenue: t.revenue,
            revenue_share: if total_revenue > 0.0 {
                t.revenue / total_revenue
            } else {
                0.0
            },
        })
        .collect();
    // Stable sort over key order keeps ties alphabetical.
    totals.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal));
    totals
}
