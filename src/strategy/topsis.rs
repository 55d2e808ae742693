// src/strategy/topsis.rs

//! Supplier ranking by TOPSIS (Technique for Order Preference by Similarity
//! to Ideal Solution).
//!
//! Every candidate is placed in a weighted, vector-normalized criteria space
//! and scored by how close it sits to the ideal-best point relative to the
//! ideal-worst point.

use crate::error::{InsightsError, Result};
use crate::model::supplier::{
    ensure_unique_ids, Criterion, CriterionSpec, Orientation, SupplierRecord,
};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingResult {
    pub supplier_id: String,
    /// Relative closeness to the ideal solution, in [0, 1].
    pub closeness: f64,
    /// 1 = best. Equal closeness shares the lowest rank number.
    pub rank: usize,
}

/// Scales non-negative weights so they sum to 1.
///
/// An all-zero vector falls back to uniform weights `1/n`.
pub fn normalize_weights(weights: &[f64]) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Err(InsightsError::invalid("weight vector is empty"));
    }
    for (i, w) in weights.iter().enumerate() {
        if !w.is_finite() || *w < 0.0 {
            return Err(InsightsError::invalid(format!(
                "weight #{i} ({w}) must be a non-negative number"
            )));
        }
    }
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max == 0.0 {
        let uniform = 1.0 / weights.len() as f64;
        return Ok(vec![uniform; weights.len()]);
    }
    // Scale into [0, 1] first so the sum cannot overflow.
    let scaled: Vec<f64> = weights.iter().map(|w| w / max).collect();
    let total: f64 = scaled.iter().sum();
    Ok(scaled.iter().map(|w| w / total).collect())
}

/// Ranks candidates treating every criterion as benefit-type (higher raw
/// score preferred).
pub fn rank(
    candidates: &[SupplierRecord],
    criteria: &[Criterion],
    weights: &[f64],
) -> Result<Vec<RankingResult>> {
    let specs: Vec<CriterionSpec> = criteria.iter().copied().map(CriterionSpec::benefit).collect();
    rank_with_orientation(candidates, &specs, weights)
}

/// Ranks candidates, honoring each criterion's orientation. For a
/// cost-type criterion the ideal-best value is the column minimum.
///
/// Returns one result per candidate ordered by rank ascending; candidates
/// with equal rank keep their input order.
pub fn rank_with_orientation(
    candidates: &[SupplierRecord],
    specs: &[CriterionSpec],
    weights: &[f64],
) -> Result<Vec<RankingResult>> {
    if candidates.is_empty() {
        return Err(InsightsError::invalid("cannot rank an empty candidate set"));
    }
    if specs.is_empty() {
        return Err(InsightsError::invalid("at least one criterion is required"));
    }
    if specs.len() != weights.len() {
        return Err(InsightsError::invalid(format!(
            "{} criteria but {} weights",
            specs.len(),
            weights.len()
        )));
    }
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.criterion) {
            return Err(InsightsError::invalid(format!(
                "criterion '{}' listed more than once",
                spec.criterion
            )));
        }
    }
    ensure_unique_ids(candidates)?;
    let weights = normalize_weights(weights)?;

    // 1. Decision matrix (rows = candidates, columns = criteria).
    let matrix = decision_matrix(candidates, specs)?;
    let cols = specs.len();

    // 2. Vector normalization per column. A zero column stays all zeros.
    // Each column is divided by its maximum before squaring so that large
    // finite scores cannot overflow the norm.
    let maxima: Vec<f64> = (0..cols).map(|j| column_bounds(&matrix, j).1).collect();
    let norms: Vec<f64> = (0..cols)
        .map(|j| {
            if maxima[j] == 0.0 {
                return 0.0;
            }
            matrix
                .iter()
                .map(|row| {
                    let v = row[j] / maxima[j];
                    v * v
                })
                .sum::<f64>()
                .sqrt()
        })
        .collect();

    // 3. Weighting.
    let weighted: Vec<Vec<f64>> = matrix
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, v)| {
                    if norms[j] == 0.0 {
                        0.0
                    } else {
                        v / maxima[j] / norms[j] * weights[j]
                    }
                })
                .collect()
        })
        .collect();

    // 4. Ideal points.
    let mut ideal_best = Vec::with_capacity(cols);
    let mut ideal_worst = Vec::with_capacity(cols);
    for (j, spec) in specs.iter().enumerate() {
        let (min, max) = column_bounds(&weighted, j);
        match spec.orientation {
            Orientation::Benefit => {
                ideal_best.push(max);
                ideal_worst.push(min);
            }
            Orientation::Cost => {
                ideal_best.push(min);
                ideal_worst.push(max);
            }
        }
    }

    // 5 & 6. Distances and relative closeness.
    let closeness: Vec<f64> = weighted
        .iter()
        .map(|row| {
            let d_best = euclidean(row, &ideal_best);
            let d_worst = euclidean(row, &ideal_worst);
            let denom = d_best + d_worst;
            if denom == 0.0 {
                0.5
            } else {
                (d_worst / denom).clamp(0.0, 1.0)
            }
        })
        .collect();

    // 7. Min-ranking by descending closeness.
    let mut results: Vec<RankingResult> = candidates
        .iter()
        .zip(&closeness)
        .map(|(candidate, &c)| RankingResult {
            supplier_id: candidate.id().to_string(),
            closeness: c,
            rank: 1 + closeness.iter().filter(|&&other| other > c).count(),
        })
        .collect();
    // sort_by_key is stable, so ties keep input order.
    results.sort_by_key(|r| r.rank);
    Ok(results)
}

fn decision_matrix(candidates: &[SupplierRecord], specs: &[CriterionSpec]) -> Result<Vec<Vec<f64>>> {
    candidates
        .iter()
        .map(|candidate| {
            specs
                .iter()
                .map(|spec| {
                    candidate.score(spec.criterion).ok_or_else(|| {
                        InsightsError::invalid(format!(
                            "supplier '{}' has no score for criterion '{}'",
                            candidate.id(),
                            spec.criterion
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

fn column_bounds(matrix: &[Vec<f64>], j: usize) -> (f64, f64) {
    matrix.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
        (lo.min(row[j]), hi.max(row[j]))
    })
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
