// src/strategy/optimization.rs

//! Closed-form inventory policy under stochastic daily demand.
//!
//! Demand is assumed i.i.d. from day to day and stationary over the lead
//! time, so lead-time variance grows linearly with the number of days.

use crate::error::{InsightsError, Result};
use crate::model::product::{CostBreakdown, DemandProfile, InventoryPolicy, ServiceLevel};

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Standard normal cumulative distribution function.
///
/// Uses the Chebyshev-fitted complementary error function from Numerical
/// Recipes (fractional error below 1.2e-7 everywhere).
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Inverse of the standard normal CDF (quantile function) for `0 < p < 1`.
///
/// Acklam's rational approximation, relative error below 1.15e-9.
pub fn inverse_normal_cdf(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(InsightsError::invalid(format!(
            "normal quantile undefined for probability {p}"
        )));
    }

    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_690e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    let x = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    };
    Ok(x)
}

/// Economic order quantity: `sqrt(2 * D * S / H)`.
///
/// A zero holding cost falls back to one month of demand.
pub fn economic_order_quantity(annual_demand: f64, ordering_cost: f64, holding_cost: f64) -> f64 {
    if holding_cost > 0.0 {
        (2.0 * annual_demand * ordering_cost / holding_cost).sqrt()
    } else {
        annual_demand / 12.0
    }
}

/// Probability that lead-time demand exceeds `stock` before replenishment
/// arrives, given a reorder point and lead-time demand deviation.
pub fn shortage_risk(stock: f64, reorder_point: f64, lead_time_demand_std: f64) -> f64 {
    if stock >= reorder_point {
        return 0.0;
    }
    if lead_time_demand_std == 0.0 {
        // Deterministic demand that the stock cannot cover.
        return 1.0;
    }
    let z = (stock - reorder_point) / lead_time_demand_std;
    (1.0 - normal_cdf(z)).clamp(0.0, 1.0)
}

/// Computes safety stock, reorder point, EOQ, turnover and (when on-hand
/// stock is known) shortage risk for one product.
///
/// # Formulas
/// - `sigma_LT = demand_std * sqrt(lead_time)`
/// - `SS = max(0, z * sigma_LT)` with `z = inverse_normal_cdf(service_level)`
/// - `ROP = mean * lead_time + SS`
/// - `EOQ = sqrt(2 * D * S / H)`, `D = mean * 365`, `H = unit_cost * holding_rate`
/// - `turnover = D / (EOQ / 2)` (average inventory ignores safety stock)
pub fn compute_policy(profile: &DemandProfile, service_level: ServiceLevel) -> Result<InventoryPolicy> {
    profile.validate()?;
    let z = inverse_normal_cdf(service_level.value())?;

    let lead_time_demand_std = profile.demand_std() * profile.lead_time_days().sqrt();
    // Below a 50% service level z turns negative; a buffer cannot.
    let safety_stock = (z * lead_time_demand_std).max(0.0);
    let reorder_point = profile.lead_time_demand() + safety_stock;

    let annual_demand = profile.mean_daily_demand() * DAYS_PER_YEAR;
    let holding_cost = profile.unit_cost() * profile.holding_cost_rate();
    let eoq = economic_order_quantity(annual_demand, profile.ordering_cost(), holding_cost);

    let turnover_rate = if eoq > 0.0 {
        annual_demand / (eoq / 2.0)
    } else {
        0.0
    };

    let shortage_risk = profile
        .current_stock()
        .map(|stock| shortage_risk(stock, reorder_point, lead_time_demand_std));

    let annual_holding = eoq / 2.0 * holding_cost;
    let annual_ordering = if eoq > 0.0 {
        annual_demand / eoq * profile.ordering_cost()
    } else {
        0.0
    };

    Ok(InventoryPolicy {
        product: profile.product().to_string(),
        safety_stock,
        reorder_point,
        eoq,
        turnover_rate,
        shortage_risk,
        lead_time_demand_std,
        annual_demand,
        cost: CostBreakdown {
            annual_holding,
            annual_ordering,
            total: annual_holding + annual_ordering,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_within;
    use proptest::prelude::*;

    fn profile(mean: f64, std: f64, lead: f64, stock: Option<f64>) -> DemandProfile {
        DemandProfile::new("SKU-1", "home", mean, std, lead, 50.0, 0.2, 50.0, stock).unwrap()
    }

    fn level(p: f64) -> ServiceLevel {
        ServiceLevel::new(p).unwrap()
    }

    #[test]
    fn quantiles_match_tables() {
        assert_within(inverse_normal_cdf(0.5).unwrap(), 0.0, 1e-9);
        assert_within(inverse_normal_cdf(0.95).unwrap(), 1.644_853_6, 1e-6);
        assert_within(inverse_normal_cdf(0.975).unwrap(), 1.959_964_0, 1e-6);
        assert_within(inverse_normal_cdf(0.01).unwrap(), -2.326_347_9, 1e-6);
        assert_within(inverse_normal_cdf(0.999).unwrap(), 3.090_232_3, 1e-6);
    }

    #[test]
    fn quantile_rejects_boundaries() {
        assert!(inverse_normal_cdf(0.0).is_err());
        assert!(inverse_normal_cdf(1.0).is_err());
        assert!(inverse_normal_cdf(f64::NAN).is_err());
    }

    #[test]
    fn cdf_inverts_quantile() {
        for p in [0.001, 0.02, 0.1, 0.3, 0.5, 0.8, 0.95, 0.99] {
            let z = inverse_normal_cdf(p).unwrap();
            assert_within(normal_cdf(z), p, 1e-6);
        }
        assert_within(normal_cdf(0.0), 0.5, 1e-7);
        assert_within(normal_cdf(1.96), 0.975, 1e-4);
    }

    #[test]
    fn reference_safety_stock_and_reorder_point() {
        let policy = compute_policy(&profile(100.0, 20.0, 10.0, None), level(0.95)).unwrap();
        assert_within(policy.lead_time_demand_std, 63.245_553, 1e-5);
        assert_within(policy.safety_stock, 104.05, 0.05);
        assert_within(policy.reorder_point, 1104.05, 0.05);
        assert_eq!(policy.shortage_risk, None);
    }

    #[test]
    fn reference_eoq() {
        let policy = compute_policy(&profile(100.0, 20.0, 10.0, None), level(0.95)).unwrap();
        assert_within(policy.annual_demand, 36_500.0, 1e-9);
        assert_within(policy.eoq, 365_000_f64.sqrt(), 1e-9);
        assert_within(policy.eoq, 604.15, 0.01);
        assert_within(policy.turnover_rate, 36_500.0 / (policy.eoq / 2.0), 1e-9);
    }

    #[test]
    fn stock_at_reorder_point_has_no_risk() {
        let base = compute_policy(&profile(100.0, 20.0, 10.0, None), level(0.95)).unwrap();
        let at_rop = profile(100.0, 20.0, 10.0, Some(base.reorder_point));
        let policy = compute_policy(&at_rop, level(0.95)).unwrap();
        assert_eq!(policy.shortage_risk, Some(0.0));
    }

    #[test]
    fn stock_below_reorder_point_is_risky() {
        let policy = compute_policy(&profile(100.0, 20.0, 10.0, Some(900.0)), level(0.95)).unwrap();
        let risk = policy.shortage_risk.unwrap();
        // (900 - 1104.03) / 63.25 ~ -3.23 standard deviations
        assert!(risk > 0.99 && risk <= 1.0, "risk was {risk}");

        let barely = profile(100.0, 20.0, 10.0, Some(policy.reorder_point - 1.0));
        let risk = compute_policy(&barely, level(0.95)).unwrap().shortage_risk.unwrap();
        assert!(risk > 0.5 && risk < 0.52, "risk was {risk}");
    }

    #[test]
    fn deterministic_demand_shortfall_is_certain() {
        let p = profile(10.0, 0.0, 5.0, Some(20.0));
        let policy = compute_policy(&p, level(0.9)).unwrap();
        assert_eq!(policy.safety_stock, 0.0);
        assert_eq!(policy.reorder_point, 50.0);
        assert_eq!(policy.shortage_risk, Some(1.0));
    }

    #[test]
    fn zero_demand_is_degenerate_not_an_error() {
        let policy = compute_policy(&profile(0.0, 0.0, 5.0, Some(0.0)), level(0.95)).unwrap();
        assert_eq!(policy.eoq, 0.0);
        assert_eq!(policy.turnover_rate, 0.0);
        assert_eq!(policy.cost.total, 0.0);
        assert_eq!(policy.shortage_risk, Some(0.0));
    }

    #[test]
    fn zero_holding_cost_falls_back_to_monthly_demand() {
        assert_within(economic_order_quantity(1200.0, 50.0, 0.0), 100.0, 1e-12);
    }

    #[test]
    fn eoq_costs_balance() {
        let policy = compute_policy(&profile(100.0, 20.0, 10.0, None), level(0.95)).unwrap();
        // At the EOQ holding and ordering costs are equal.
        assert_within(policy.cost.annual_holding, policy.cost.annual_ordering, 1e-6);
        assert_within(
            policy.cost.total,
            policy.cost.annual_holding + policy.cost.annual_ordering,
            1e-9,
        );
    }

    #[test]
    fn low_service_level_keeps_buffer_non_negative() {
        let policy = compute_policy(&profile(100.0, 20.0, 10.0, None), level(0.2)).unwrap();
        assert_eq!(policy.safety_stock, 0.0);
        assert_eq!(policy.reorder_point, 1000.0);
    }

    proptest! {
        #[test]
        fn eoq_decreases_with_holding_cost(
            demand in 1.0_f64..1e6,
            ordering in 1.0_f64..1e4,
            h1 in 0.01_f64..1e3,
            bump in 0.01_f64..1e3,
        ) {
            let low = economic_order_quantity(demand, ordering, h1);
            let high = economic_order_quantity(demand, ordering, h1 + bump);
            prop_assert!(high < low);
        }

        #[test]
        fn eoq_increases_with_ordering_cost(
            demand in 1.0_f64..1e6,
            holding in 0.01_f64..1e3,
            s1 in 0.01_f64..1e4,
            bump in 0.01_f64..1e4,
        ) {
            let low = economic_order_quantity(demand, s1, holding);
            let high = economic_order_quantity(demand, s1 + bump, holding);
            prop_assert!(high > low);
        }

        #[test]
        fn safety_stock_never_negative(
            p in 0.001_f64..0.999,
            mean in 0.0_f64..1e4,
            std in 0.0_f64..1e3,
            lead in 0.1_f64..120.0,
        ) {
            let policy = compute_policy(&profile(mean, std, lead, None), level(p)).unwrap();
            prop_assert!(policy.safety_stock >= 0.0);
            prop_assert!(policy.reorder_point >= policy.safety_stock);
        }

        #[test]
        fn buffer_grows_with_service_level(
            p1 in 0.001_f64..0.998,
            delta in 0.0_f64..0.5,
            mean in 0.0_f64..1e4,
            std in 0.0_f64..1e3,
            lead in 0.1_f64..120.0,
        ) {
            let p2 = (p1 + delta).min(0.999);
            let pr = profile(mean, std, lead, None);
            let a = compute_policy(&pr, level(p1)).unwrap();
            let b = compute_policy(&pr, level(p2)).unwrap();
            prop_assert!(b.safety_stock >= a.safety_stock);
            prop_assert!(b.reorder_point >= a.reorder_point);
        }

        #[test]
        fn shortage_risk_is_a_probability(
            stock in 0.0_f64..5e3,
            mean in 0.0_f64..500.0,
            std in 0.0_f64..100.0,
            lead in 0.5_f64..30.0,
        ) {
            let policy = compute_policy(&profile(mean, std, lead, Some(stock)), level(0.95)).unwrap();
            let risk = policy.shortage_risk.unwrap();
            prop_assert!((0.0..=1.0).contains(&risk));
        }
    }
}
