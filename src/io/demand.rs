// src/io/demand.rs

//! Order-history fixtures and the reduction of raw orders into per-product
//! demand statistics.

use crate::error::{InsightsError, Result};
use crate::model::order::OrderLine;
use crate::model::product::DemandProfile;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Product catalog used by the order generator: (category, products, price range).
const CATALOG: &[(&str, &[&str], (f64, f64))] = &[
    (
        "womenswear",
        &["tee", "shorts", "dress", "jeans", "hoodie", "sweater", "coat", "skirt"],
        (15.0, 85.0),
    ),
    (
        "menswear",
        &["tee", "shorts", "shirt", "jeans", "coat", "sweater", "jacket"],
        (18.0, 90.0),
    ),
    (
        "kidswear",
        &["tee", "dress", "shorts", "coat", "shoes", "hat", "backpack"],
        (12.0, 55.0),
    ),
    (
        "electronics",
        &["phone case", "earbuds", "charger", "cable", "phone stand", "tablet sleeve", "smartwatch"],
        (8.0, 120.0),
    ),
    (
        "beauty",
        &["makeup kit", "skincare set", "perfume", "lipstick", "face mask", "cleanser", "serum"],
        (25.0, 180.0),
    ),
    (
        "home",
        &["storage box", "wall art", "cushion", "blanket", "desk lamp", "vase", "tableware"],
        (10.0, 75.0),
    ),
];

const REGIONS: [&str; 5] = ["north america", "europe", "asia", "oceania", "south america"];
const REGION_WEIGHTS: [f64; 5] = [0.35, 0.25, 0.25, 0.10, 0.05];

/// Seasonal uplift range for a category in a given month, if any.
fn seasonal_uplift(category: &str, month: u32) -> Option<(f64, f64)> {
    match (category, month) {
        ("womenswear" | "menswear", 6..=8) => Some((1.3, 2.2)),
        ("kidswear", 8 | 9) => Some((1.4, 2.0)),
        ("electronics", 11 | 12) => Some((1.6, 2.8)),
        ("beauty", 2 | 11 | 12) => Some((1.3, 2.1)),
        ("home", 3 | 4 | 10 | 11) => Some((1.2, 1.8)),
        _ => None,
    }
}

/// Generates a reproducible order history covering `days` days up to
/// `end_date`, with category seasonality and a weekend uplift.
pub fn generate_order_history(seed: u64, days: i64, end_date: NaiveDate) -> Vec<OrderLine> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = end_date - Duration::days(days.max(0));
    // Weights are constant and positive.
    let regions = WeightedIndex::new(REGION_WEIGHTS).ok();

    let mut orders = Vec::new();
    for (category, products, (min_price, max_price)) in CATALOG {
        for product in *products {
            let name = format!("{category} {product}");
            let num_orders = rng.gen_range(80..=300);
            for _ in 0..num_orders {
                let order_date = start + Duration::days(rng.gen_range(0..=days.max(0)));
                let mut quantity = rng.gen_range(1..=25) as f64;
                if let Some((lo, hi)) = seasonal_uplift(category, order_date.month()) {
                    quantity *= rng.gen_range(lo..hi);
                }
                if matches!(order_date.weekday(), Weekday::Sat | Weekday::Sun) {
                    quantity *= rng.gen_range(1.1..1.4);
                }
                let region = regions
                    .as_ref()
                    .map(|w| REGIONS[w.sample(&mut rng)])
                    .unwrap_or(REGIONS[0]);
                orders.push(OrderLine {
                    order_id: format!("ORD{:06}", orders.len() + 1),
                    order_date,
                    product: name.clone(),
                    category: category.to_string(),
                    quantity: (quantity as u32).max(1),
                    unit_price: rng.gen_range(*min_price..*max_price),
                    region: region.to_string(),
                });
            }
        }
    }
    orders.sort_by_key(|o| o.order_date);
    info!(orders = orders.len(), "generated order history");
    orders
}

/// Demand statistics for one product, from daily order totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandStats {
    pub product: String,
    pub category: String,
    pub mean_daily_demand: f64,
    /// Sample standard deviation (n - 1) of daily totals.
    pub demand_std: f64,
    /// Number of distinct days with at least one order.
    pub active_days: usize,
    pub total_quantity: u64,
    pub order_count: usize,
    pub avg_unit_price: f64,
}

/// Parameters the order history cannot supply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    pub lead_time_days: f64,
    pub holding_cost_rate: f64,
    pub ordering_cost: f64,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            lead_time_days: 15.0,
            holding_cost_rate: 0.25,
            ordering_cost: 50.0,
        }
    }
}

impl DemandStats {
    /// Builds a demand profile, taking the average selling price as unit cost.
    pub fn to_profile(&self, defaults: &ProfileDefaults, current_stock: Option<f64>) -> Result<DemandProfile> {
        DemandProfile::new(
            self.product.clone(),
            self.category.clone(),
            self.mean_daily_demand,
            self.demand_std,
            defaults.lead_time_days,
            self.avg_unit_price,
            defaults.holding_cost_rate,
            defaults.ordering_cost,
            current_stock,
        )
    }
}

#[derive(Default)]
struct Accumulator {
    category: String,
    daily: BTreeMap<NaiveDate, u64>,
    order_count: usize,
    price_sum: f64,
}

/// Reduces raw order lines into per-product demand statistics, sorted by
/// product name.
///
/// Quantities are summed per calendar day; only days that saw orders count
/// towards the mean and deviation.
pub fn aggregate_demand(orders: &[OrderLine]) -> Result<Vec<DemandStats>> {
    let mut by_product: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for order in orders {
        if !order.unit_price.is_finite() || order.unit_price < 0.0 {
            return Err(InsightsError::invalid(format!(
                "order '{}': unit price {} must be a non-negative number",
                order.order_id, order.unit_price
            )));
        }
        let acc = by_product.entry(order.product.as_str()).or_default();
        if acc.category.is_empty() {
            acc.category = order.category.clone();
        }
        *acc.daily.entry(order.order_date).or_insert(0) += u64::from(order.quantity);
        acc.order_count += 1;
        acc.price_sum += order.unit_price;
    }

    let stats: Vec<DemandStats> = by_product
        .into_iter()
        .map(|(product, acc)| {
            let totals: Vec<f64> = acc.daily.values().map(|&q| q as f64).collect();
            let (mean, std) = mean_and_sample_std(&totals);
            DemandStats {
                product: product.to_string(),
                category: acc.category,
                mean_daily_demand: mean,
                demand_std: std,
                active_days: totals.len(),
                total_quantity: acc.daily.values().sum(),
                order_count: acc.order_count,
                avg_unit_price: acc.price_sum / acc.order_count as f64,
            }
        })
        .collect();
    debug!(products = stats.len(), "aggregated demand");
    Ok(stats)
}

fn mean_and_sample_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Names of the products used by the inventory fixture, grouped five per category.
const INVENTORY_PRODUCTS: [(&str, [&str; 5]); 6] = [
    ("phones", ["Aster 14", "Borealis S23", "Cobalt M50", "Drift 13", "Ember X5"]),
    ("sneakers", ["Air Glide", "Ultra Bounce", "Trail 990", "Court Classic", "Old School"]),
    ("laptops", ["Pro 14", "Slim 13", "Carbon X1", "Studio 15", "Spectra 14"]),
    ("headphones", ["Quiet 1000", "Pods Pro", "Comfort 35", "Open 650", "Monitor 50"]),
    ("womenswear", ["Wrap Dress", "Pleated Skirt", "Silk Top", "Wool Coat", "Wide Trousers"]),
    ("accessories", ["Lingerie Set", "Scarf", "Loafers", "Tote Bag", "Pendant"]),
];

/// Generates a reproducible set of product demand profiles with current
/// stock between half and twice the lead-time demand.
pub fn generate_inventory_profiles(seed: u64) -> Result<Vec<DemandProfile>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut profiles = Vec::with_capacity(30);
    for (category, products) in INVENTORY_PRODUCTS {
        for product in products {
            let mean: f64 = rng.gen_range(50.0..200.0);
            let lead_time = rng.gen_range(7..30) as f64;
            let lead_demand = mean * lead_time;
            let stock = rng.gen_range((lead_demand * 0.5).floor()..(lead_demand * 2.0).floor());
            profiles.push(DemandProfile::new(
                product,
                category,
                mean,
                mean * 0.3,
                lead_time,
                rng.gen_range(100.0..2000.0),
                rng.gen_range(0.15..0.25),
                rng.gen_range(50.0..200.0),
                Some(stock.floor()),
            )?);
        }
    }
    info!(products = profiles.len(), "generated inventory profiles");
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_within;

    fn line(id: &str, date: (i32, u32, u32), product: &str, qty: u32, price: f64) -> OrderLine {
        OrderLine {
            order_id: id.into(),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            product: product.into(),
            category: "home".into(),
            quantity: qty,
            unit_price: price,
            region: String::new(),
        }
    }

    #[test]
    fn daily_totals_drive_mean_and_std() {
        let orders = vec![
            line("1", (2024, 1, 1), "lamp", 4, 10.0),
            line("2", (2024, 1, 1), "lamp", 6, 20.0),
            line("3", (2024, 1, 2), "lamp", 20, 30.0),
            line("4", (2024, 1, 5), "lamp", 30, 40.0),
            line("5", (2024, 1, 5), "vase", 3, 12.0),
        ];
        let stats = aggregate_demand(&orders).unwrap();
        assert_eq!(stats.len(), 2);

        let lamp = &stats[0];
        assert_eq!(lamp.product, "lamp");
        // Daily totals 10, 20, 30.
        assert_eq!(lamp.active_days, 3);
        assert_within(lamp.mean_daily_demand, 20.0, 1e-12);
        assert_within(lamp.demand_std, 10.0, 1e-12);
        assert_eq!(lamp.total_quantity, 60);
        assert_eq!(lamp.order_count, 4);
        assert_within(lamp.avg_unit_price, 25.0, 1e-12);

        let vase = &stats[1];
        assert_eq!(vase.active_days, 1);
        assert_eq!(vase.demand_std, 0.0);
        assert_eq!(vase.mean_daily_demand, 3.0);
    }

    #[test]
    fn empty_history_has_no_products() {
        assert!(aggregate_demand(&[]).unwrap().is_empty());
    }

    #[test]
    fn stats_convert_to_profile() {
        let orders = vec![line("1", (2024, 3, 1), "lamp", 5, 40.0)];
        let stats = aggregate_demand(&orders).unwrap();
        let profile = stats[0].to_profile(&ProfileDefaults::default(), Some(12.0)).unwrap();
        assert_eq!(profile.unit_cost(), 40.0);
        assert_eq!(profile.lead_time_days(), 15.0);
        assert_eq!(profile.current_stock(), Some(12.0));
    }

    #[test]
    fn free_items_cannot_become_profiles() {
        let orders = vec![line("1", (2024, 3, 1), "sample", 5, 0.0)];
        let stats = aggregate_demand(&orders).unwrap();
        assert!(stats[0].to_profile(&ProfileDefaults::default(), None).is_err());
    }

    #[test]
    fn generated_history_is_reproducible() {
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let a = generate_order_history(42, 730, end);
        let b = generate_order_history(42, 730, end);
        assert_eq!(a, b);
        assert!(a.iter().all(|o| o.quantity >= 1));
        assert!(a.iter().all(|o| o.order_date <= end));
        let products: std::collections::BTreeSet<_> = a.iter().map(|o| o.product.as_str()).collect();
        assert_eq!(products.len(), 43);
    }

    #[test]
    fn generated_profiles_are_valid() {
        let profiles = generate_inventory_profiles(42).unwrap();
        assert_eq!(profiles.len(), 30);
        for p in &profiles {
            let stock = p.current_stock().unwrap();
            assert!(stock >= (p.lead_time_demand() * 0.5).floor() - 1.0);
            assert!(stock <= p.lead_time_demand() * 2.0);
            assert_within(p.demand_std(), p.mean_daily_demand() * 0.3, 1e-9);
        }
    }
}
