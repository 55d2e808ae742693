// src/simulation/engine.rs

use crate::error::{InsightsError, Result};
use crate::model::product::DemandProfile;
use crate::model::queues::TimeDelayQueue;
use crate::simulation::config::SimulationConfig;
use crate::strategy::optimization::DAYS_PER_YEAR;
use crate::strategy::traits::{InventoryState, ReplenishmentPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::{debug, info};

// Serialize so the history can go straight to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub day: usize,
    pub demand: f64,
    pub fulfilled: f64,
    pub lost_sales: f64,
    pub arrival: f64,
    pub order_placed: f64,
    pub on_hand: f64,
    pub on_order: f64,
    pub holding_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub product: String,
    pub policy: String,
    pub days: usize,
    pub total_demand: f64,
    pub total_fulfilled: f64,
    /// Share of demand served from stock; 1.0 when there was no demand.
    pub fill_rate: f64,
    pub stockout_days: usize,
    pub orders_placed: usize,
    pub holding_cost: f64,
    pub ordering_cost: f64,
    pub total_cost: f64,
    pub min_on_hand: f64,
    pub ending_on_hand: f64,
}

/// Day-by-day stock simulation for one product under a replenishment policy.
///
/// Daily demand is drawn from `Normal(mean, std)` and clamped at zero.
/// Unserved demand is lost, not backlogged. Orders arrive after the lead
/// time rounded up to whole days.
pub struct InventorySimulation {
    config: SimulationConfig,
    profile: DemandProfile,
    policy: Box<dyn ReplenishmentPolicy>,
    demand: Normal<f64>,
    rng: StdRng,

    pipeline: TimeDelayQueue,
    on_hand: f64,
    orders_placed: usize,

    pub current_day: usize,
    pub history: Vec<DailyRecord>,
}

impl InventorySimulation {
    pub fn new(
        config: SimulationConfig,
        profile: DemandProfile,
        policy: Box<dyn ReplenishmentPolicy>,
        initial_stock: f64,
    ) -> Result<Self> {
        profile.validate()?;
        if !initial_stock.is_finite() || initial_stock < 0.0 {
            return Err(InsightsError::invalid(format!(
                "initial stock {initial_stock} must be a non-negative number"
            )));
        }
        let demand = Normal::new(profile.mean_daily_demand(), profile.demand_std())
            .map_err(|e| InsightsError::invalid(format!("demand distribution: {e}")))?;
        // Orders landing after the horizon never arrive, so the pipeline
        // never needs more than `days + 1` slots.
        let horizon = config.days.saturating_add(1);
        let delay = if profile.lead_time_days() >= horizon as f64 {
            horizon
        } else {
            profile.lead_time_days().ceil() as usize
        };
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            history: Vec::with_capacity(config.days),
            config,
            profile,
            policy,
            demand,
            rng,
            pipeline: TimeDelayQueue::new(delay),
            on_hand: initial_stock,
            orders_placed: 0,
            current_day: 1,
        })
    }

    pub fn run(&mut self) -> SimulationSummary {
        info!(
            product = %self.profile.product(),
            policy = self.policy.name(),
            days = self.config.days,
            "starting inventory simulation"
        );
        while self.current_day <= self.config.days {
            self.step();
        }
        let summary = self.summary();
        info!(
            product = %summary.product,
            fill_rate = summary.fill_rate,
            stockout_days = summary.stockout_days,
            "simulation complete"
        );
        summary
    }

    fn step(&mut self) {
        let day = self.current_day;

        // Morning: receive whatever was ordered `lead time` days ago.
        let arrival = self.pipeline.pop_arrival();
        self.on_hand += arrival;

        // Day: serve demand from stock, lose the rest.
        let demand = self.demand.sample(&mut self.rng).max(0.0);
        let fulfilled = demand.min(self.on_hand);
        self.on_hand -= fulfilled;

        // Evening: review and reorder.
        let state = InventoryState {
            day,
            on_hand: self.on_hand,
            on_order: self.pipeline.in_transit(),
        };
        let order = self.policy.order_quantity(&state).max(0.0);
        if order > 0.0 {
            self.orders_placed += 1;
        }
        self.pipeline.push_departure(order);

        let holding_cost =
            self.on_hand * self.profile.unit_cost() * self.profile.holding_cost_rate() / DAYS_PER_YEAR;

        if day % 30 == 0 {
            debug!(day, on_hand = self.on_hand, "inventory checkpoint");
        }
        self.history.push(DailyRecord {
            day,
            demand,
            fulfilled,
            lost_sales: demand - fulfilled,
            arrival,
            order_placed: order,
            on_hand: self.on_hand,
            on_order: self.pipeline.in_transit(),
            holding_cost,
        });
        self.current_day += 1;
    }

    pub fn summary(&self) -> SimulationSummary {
        let total_demand: f64 = self.history.iter().map(|r| r.demand).sum();
        let total_fulfilled: f64 = self.history.iter().map(|r| r.fulfilled).sum();
        let holding_cost: f64 = self.history.iter().map(|r| r.holding_cost).sum();
        let ordering_cost = self.orders_placed as f64 * self.profile.ordering_cost();
        SimulationSummary {
            product: self.profile.product().to_string(),
            policy: self.policy.name().to_string(),
            days: self.history.len(),
            total_demand,
            total_fulfilled,
            fill_rate: if total_demand > 0.0 {
                total_fulfilled / total_demand
            } else {
                1.0
            },
            stockout_days: self.history.iter().filter(|r| r.lost_sales > 0.0).count(),
            orders_placed: self.orders_placed,
            holding_cost,
            ordering_cost,
            total_cost: holding_cost + ordering_cost,
            min_on_hand: self
                .history
                .iter()
                .map(|r| r.on_hand)
                .fold(f64::INFINITY, f64::min)
                .min(self.on_hand),
            ending_on_hand: self.on_hand,
        }
    }
}
