// src/io/suppliers.rs

use crate::error::{InsightsError, Result};
use crate::model::supplier::{Criterion, SupplierRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

const COMPANIES: [&str; 20] = [
    "Shenzhen Tech Co.",
    "Guangzhou Manufacturing Group",
    "Dongguan Precision Industry",
    "Foshan Smart Technology",
    "Zhongshan Electronics",
    "Zhuhai Innovation Works",
    "Huizhou Fine Engineering",
    "Jiangmen Smart Manufacturing",
    "Zhaoqing Industrial Park",
    "Shantou Export Trading",
    "Chaozhou Ceramics",
    "Jieyang Hardware",
    "Meizhou Agri Processing",
    "Heyuan Minerals",
    "Yangjiang Cutlery",
    "Zhanjiang Seafood",
    "Maoming Petrochemical",
    "Qingyuan Green Materials",
    "Shaoguan Steel Group",
    "Yunfu Stone Works",
];

const CATEGORIES: [&str; 7] = [
    "electronics",
    "apparel accessories",
    "womenswear",
    "womenswear accessories",
    "home",
    "outdoor",
    "beauty",
];

const REGIONS: [&str; 5] = ["south", "east", "north", "southwest", "central"];

/// Score range (0-10 scale) each criterion is drawn from.
fn score_range(criterion: Criterion) -> (f64, f64) {
    match criterion {
        Criterion::Price => (6.0, 9.5),
        Criterion::Quality => (7.0, 9.8),
        Criterion::Delivery => (6.5, 9.5),
        Criterion::Service => (6.0, 9.0),
        Criterion::Reputation => (7.0, 9.5),
        Criterion::Capacity => (6.0, 9.0),
    }
}

/// Generates a reproducible table of twenty candidate suppliers.
pub fn generate_suppliers(seed: u64) -> Result<Vec<SupplierRecord>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut suppliers = Vec::with_capacity(COMPANIES.len());
    for (i, name) in COMPANIES.iter().enumerate() {
        let category = CATEGORIES.choose(&mut rng).copied().unwrap_or(CATEGORIES[0]);
        let scores: BTreeMap<Criterion, f64> = Criterion::ALL
            .into_iter()
            .map(|c| {
                let (lo, hi) = score_range(c);
                (c, rng.gen_range(lo..hi))
            })
            .collect();
        let region = REGIONS.choose(&mut rng).copied().unwrap_or(REGIONS[0]);
        suppliers.push(SupplierRecord::new(
            format!("SUP{:03}", i + 1),
            *name,
            category,
            region,
            rng.gen_range(10.0..100.0),
            rng.gen_range(100..5000),
            rng.gen_range(7..45),
            scores,
        )?);
    }
    info!(suppliers = suppliers.len(), "generated supplier table");
    Ok(suppliers)
}

/// Flat CSV shape of a supplier: one column per criterion.
#[derive(Debug, Serialize, Deserialize)]
struct SupplierRow {
    id: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    unit_price: f64,
    #[serde(default)]
    min_order_qty: u32,
    #[serde(default)]
    lead_time_days: u32,
    price: Option<f64>,
    quality: Option<f64>,
    delivery: Option<f64>,
    service: Option<f64>,
    reputation: Option<f64>,
    capacity: Option<f64>,
}

impl SupplierRow {
    fn score(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::Price => self.price,
            Criterion::Quality => self.quality,
            Criterion::Delivery => self.delivery,
            Criterion::Service => self.service,
            Criterion::Reputation => self.reputation,
            Criterion::Capacity => self.capacity,
        }
    }

    /// Keeps only the scores present; the ranking run decides which are required.
    fn into_record(self) -> Result<SupplierRecord> {
        let scores = Criterion::ALL
            .into_iter()
            .filter_map(|c| self.score(c).map(|v| (c, v)))
            .collect();
        SupplierRecord::new(
            self.id,
            self.name,
            self.category,
            self.region,
            self.unit_price,
            self.min_order_qty,
            self.lead_time_days,
            scores,
        )
    }

    fn from_record(s: &SupplierRecord) -> Self {
        Self {
            id: s.id().to_string(),
            name: s.name().to_string(),
            category: s.category().to_string(),
            region: s.region().to_string(),
            unit_price: s.unit_price(),
            min_order_qty: s.min_order_qty(),
            lead_time_days: s.lead_time_days(),
            price: s.score(Criterion::Price),
            quality: s.score(Criterion::Quality),
            delivery: s.score(Criterion::Delivery),
            service: s.score(Criterion::Service),
            reputation: s.score(Criterion::Reputation),
            capacity: s.score(Criterion::Capacity),
        }
    }
}

pub fn read_suppliers(path: &Path) -> Result<Vec<SupplierRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut suppliers = Vec::new();
    for (line, row) in reader.deserialize::<SupplierRow>().enumerate() {
        let record = row?.into_record().map_err(|e| match e {
            InsightsError::InvalidInput(msg) => {
                InsightsError::invalid(format!("{}, row {}: {msg}", path.display(), line + 1))
            }
            other => other,
        })?;
        suppliers.push(record);
    }
    if suppliers.is_empty() {
        warn!(path = %path.display(), "supplier file has no rows");
    }
    info!(path = %path.display(), suppliers = suppliers.len(), "loaded suppliers");
    Ok(suppliers)
}

pub fn write_suppliers(path: &Path, suppliers: &[SupplierRecord]) -> Result<()> {
    let rows: Vec<SupplierRow> = suppliers.iter().map(SupplierRow::from_record).collect();
    crate::io::reporting::write_csv(path, &rows)
}
