// src/cli.rs

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use supply_insights::config::AppConfig;
use supply_insights::io::demand::{aggregate_demand, generate_inventory_profiles, generate_order_history};
use supply_insights::io::orders::{summarize_orders, OrderFilter};
use supply_insights::io::reporting::{
    read_orders, read_profiles, write_orders, write_policy_report, write_profiles, write_rankings,
    write_csv, write_simulation_log, write_suggestions,
};
use supply_insights::io::suppliers::{generate_suppliers, read_suppliers, write_suppliers};
use supply_insights::model::product::{DemandProfile, ServiceLevel};
use supply_insights::model::supplier::{Criterion, SupplierFilter};
use supply_insights::simulation::engine::InventorySimulation;
use supply_insights::strategy::implementations::{PeriodicReviewPolicy, ReorderPointPolicy};
use supply_insights::strategy::optimization::compute_policy;
use supply_insights::strategy::portfolio::{analyze_portfolio, StockStatus};
use supply_insights::strategy::topsis::rank_with_orientation;
use supply_insights::strategy::traits::ReplenishmentPolicy;
use tracing::{info, warn};

/// Days of order history the generator produces.
const HISTORY_DAYS: i64 = 730;

#[derive(Parser, Debug)]
#[command(name = "supply-insights")]
#[command(about = "Supplier ranking and inventory planning")]
pub struct Cli {
    /// JSON configuration file; created with defaults if missing.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write synthetic suppliers, order history and inventory tables.
    Generate(GenerateArgs),
    /// Rank suppliers with TOPSIS.
    Rank(RankArgs),
    /// Compute safety stock, reorder points and EOQ for a product portfolio.
    Plan(PlanArgs),
    /// Simulate daily stock for one product under a replenishment policy.
    Simulate(SimulateArgs),
    /// Summarize sales by day, category, region and product.
    Orders(OrdersArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long)]
    pub out_dir: PathBuf,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Last day of the generated order history (defaults to today).
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    /// Supplier CSV; a generated table is used when omitted.
    #[arg(long)]
    pub suppliers: Option<PathBuf>,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    /// Override a weight, e.g. `--weight quality=0.4`. Repeatable.
    #[arg(long = "weight", value_parser = parse_weight)]
    pub weights: Vec<(Criterion, f64)>,
    /// Treat a criterion as cost-type (lower is better). Repeatable.
    #[arg(long = "cost")]
    pub cost: Vec<Criterion>,
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Inventory CSV with demand profiles and current stock.
    #[arg(long, conflicts_with = "orders")]
    pub inventory: Option<PathBuf>,
    /// Order history CSV; profiles are derived from it.
    #[arg(long)]
    pub orders: Option<PathBuf>,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    #[arg(long)]
    pub service_level: Option<f64>,
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub suggestions: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(long)]
    pub inventory: Option<PathBuf>,
    /// Product to simulate; the first one in the table by default.
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long)]
    pub days: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = PolicyKind::Continuous)]
    pub policy: PolicyKind,
    #[arg(long)]
    pub service_level: Option<f64>,
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OrdersArgs {
    /// Order history CSV; a generated history is used when omitted.
    #[arg(long)]
    pub orders: Option<PathBuf>,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// First day to include (inclusive).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day to include (inclusive).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long, default_value_t = 20)]
    pub top: usize,
    /// Product ranking CSV.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Daily sales series CSV.
    #[arg(long)]
    pub daily: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Continuous,
    Periodic,
}

fn parse_weight(s: &str) -> std::result::Result<(Criterion, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected criterion=value, got '{s}'"))?;
    let criterion = name.parse::<Criterion>().map_err(|e| e.to_string())?;
    let weight = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("weight '{value}': {e}"))?;
    Ok((criterion, weight))
}

impl Cli {
    pub fn load_config(&self) -> Result<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load_or_write(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(AppConfig::default()),
        }
    }
}

pub fn run(cli: Cli, cfg: &AppConfig) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => handle_generate(args),
        Commands::Rank(args) => handle_rank(args, cfg),
        Commands::Plan(args) => handle_plan(args, cfg),
        Commands::Simulate(args) => handle_simulate(args, cfg),
        Commands::Orders(args) => handle_orders(args),
    }
}

fn handle_generate(args: GenerateArgs) -> Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    let end = args.end_date.unwrap_or_else(|| Local::now().date_naive());

    let suppliers = generate_suppliers(args.seed)?;
    write_suppliers(&args.out_dir.join("suppliers.csv"), &suppliers)?;

    let orders = generate_order_history(args.seed, HISTORY_DAYS, end);
    write_orders(&args.out_dir.join("orders.csv"), &orders)?;

    let profiles = generate_inventory_profiles(args.seed)?;
    write_profiles(&args.out_dir.join("inventory.csv"), &profiles)?;

    println!(
        "Wrote {} suppliers, {} order lines and {} inventory profiles to {}",
        suppliers.len(),
        orders.len(),
        profiles.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn handle_rank(args: RankArgs, cfg: &AppConfig) -> Result<()> {
    let suppliers = match &args.suppliers {
        Some(path) => read_suppliers(path)
            .with_context(|| format!("Failed to read suppliers from {}", path.display()))?,
        None => generate_suppliers(args.seed)?,
    };

    let filter = SupplierFilter {
        category: args.category.clone(),
        region: args.region.clone(),
        min_price: args.min_price,
        max_price: args.max_price,
    };
    let candidates = filter.apply(&suppliers);
    if candidates.is_empty() {
        bail!("No suppliers match the filter ({} loaded)", suppliers.len());
    }
    info!(candidates = candidates.len(), total = suppliers.len(), "suppliers filtered");

    let mut ranking_cfg = cfg.clone();
    ranking_cfg.weights.extend(args.weights.iter().copied());
    ranking_cfg.cost_criteria.extend(args.cost.iter().copied());
    ranking_cfg.validate()?;
    let (specs, weights) = ranking_cfg.ranking_criteria();

    let results = rank_with_orientation(&candidates, &specs, &weights)?;

    println!("{}", "Supplier ranking".bold());
    for result in results.iter().take(args.top) {
        let supplier = candidates.iter().find(|s| s.id() == result.supplier_id);
        let name = supplier.map_or("", |s| s.name());
        let closeness = format!("{:.4}", result.closeness);
        let closeness = if result.rank == 1 {
            closeness.green().bold().to_string()
        } else if result.closeness < 0.4 {
            closeness.red().to_string()
        } else {
            closeness
        };
        println!("{:>3}. {:<8} {:<32} {}", result.rank, result.supplier_id, name, closeness);
    }

    if let Some(path) = &args.output {
        write_rankings(path, &results, &candidates)?;
        println!("Ranking written to {}", path.display());
    }
    Ok(())
}

fn load_profiles(
    inventory: Option<&Path>,
    orders: Option<&Path>,
    seed: u64,
    cfg: &AppConfig,
) -> Result<Vec<DemandProfile>> {
    if let Some(path) = inventory {
        return read_profiles(path)
            .with_context(|| format!("Failed to read inventory from {}", path.display()));
    }
    if let Some(path) = orders {
        let orders = read_orders(path)
            .with_context(|| format!("Failed to read orders from {}", path.display()))?;
        let stats = aggregate_demand(&orders)?;
        let mut profiles = Vec::with_capacity(stats.len());
        for s in &stats {
            match s.to_profile(&cfg.inventory, None) {
                Ok(profile) => profiles.push(profile),
                Err(e) => warn!(product = %s.product, error = %e, "skipping product"),
            }
        }
        return Ok(profiles);
    }
    Ok(generate_inventory_profiles(seed)?)
}

fn service_level(overridden: Option<f64>, cfg: &AppConfig) -> Result<ServiceLevel> {
    let level = match overridden {
        Some(value) => ServiceLevel::new(value)?,
        None => cfg.service_level()?,
    };
    Ok(level)
}

fn handle_plan(args: PlanArgs, cfg: &AppConfig) -> Result<()> {
    let profiles = load_profiles(args.inventory.as_deref(), args.orders.as_deref(), args.seed, cfg)?;
    let level = service_level(args.service_level, cfg)?;
    let report = analyze_portfolio(&profiles, level, cfg.thresholds)?;
    let s = &report.summary;

    println!("{}", format!("Inventory plan at {:.1}% service level", level.value() * 100.0).bold());
    println!("Products:        {}", s.products);
    println!("Needs reorder:   {}", s.needs_reorder.to_string().yellow());
    println!("High risk:       {}", s.high_risk.to_string().red());
    println!("Overstocked:     {}", s.overstocked);
    println!("Slow moving:     {}", s.low_turnover);
    println!("Mean turnover:   {:.2}", s.mean_turnover);
    println!("Annual cost:     {:.2}", s.total_annual_cost);

    if !report.suggestions.is_empty() {
        println!("\n{}", "Replenishment suggestions".bold());
        for suggestion in &report.suggestions {
            let risk = format!("{:.1}%", suggestion.shortage_risk * 100.0);
            let risk = if suggestion.shortage_risk > cfg.thresholds.high_risk {
                risk.red().to_string()
            } else {
                risk
            };
            println!(
                "{:<28} stock {:>9.1} | ROP {:>9.1} | order {:>9.1} | risk {}",
                suggestion.product,
                suggestion.current_stock,
                suggestion.reorder_point,
                suggestion.suggested_quantity,
                risk
            );
        }
    }
    let unknown = report
        .analyses
        .iter()
        .filter(|a| a.status == StockStatus::Unknown)
        .count();
    if unknown > 0 {
        println!("{unknown} products have no stock level; status unknown");
    }

    if let Some(path) = &args.output {
        write_policy_report(path, &report.analyses)?;
        println!("Policy report written to {}", path.display());
    }
    if let Some(path) = &args.suggestions {
        write_suggestions(path, &report.suggestions)?;
        println!("Suggestions written to {}", path.display());
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs, cfg: &AppConfig) -> Result<()> {
    let seed = args.seed.unwrap_or(cfg.simulation.seed);
    let profiles = load_profiles(args.inventory.as_deref(), None, seed, cfg)?;
    let profile = match &args.product {
        Some(name) => profiles
            .into_iter()
            .find(|p| p.product() == name)
            .ok_or_else(|| anyhow!("Product '{name}' not found"))?,
        None => profiles
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No products to simulate"))?,
    };

    let level = service_level(args.service_level, cfg)?;
    let policy = compute_policy(&profile, level)?;
    let replenishment: Box<dyn ReplenishmentPolicy> = match args.policy {
        PolicyKind::Continuous => Box::new(ReorderPointPolicy::from_policy(&policy)),
        PolicyKind::Periodic => Box::new(PeriodicReviewPolicy::from_policy(
            cfg.simulation.review_period_days,
            &policy,
        )),
    };

    let mut sim_cfg = cfg.simulation.clone();
    sim_cfg.seed = seed;
    if let Some(days) = args.days {
        sim_cfg.days = days;
    }
    let initial_stock = profile
        .current_stock()
        .unwrap_or(policy.reorder_point + policy.eoq);
    let mut sim = InventorySimulation::new(sim_cfg, profile, replenishment, initial_stock)?;
    let summary = sim.run();

    let fill = format!("{:.2}%", summary.fill_rate * 100.0);
    let fill = if summary.fill_rate >= level.value() {
        fill.green().to_string()
    } else {
        fill.red().to_string()
    };
    println!(
        "{}",
        format!("{} ({} policy, {} days)", summary.product, summary.policy, summary.days).bold()
    );
    println!("ROP {:.1} | EOQ {:.1} | safety stock {:.1}", policy.reorder_point, policy.eoq, policy.safety_stock);
    println!("Fill rate:      {fill}");
    println!("Stockout days:  {}", summary.stockout_days);
    println!("Orders placed:  {}", summary.orders_placed);
    println!("Holding cost:   {:.2}", summary.holding_cost);
    println!("Ordering cost:  {:.2}", summary.ordering_cost);
    println!("Ending stock:   {:.1} (min {:.1})", summary.ending_on_hand, summary.min_on_hand);

    if let Some(path) = &args.output {
        write_simulation_log(path, &sim.history)?;
        println!("Daily log written to {}", path.display());
    }
    Ok(())
}

fn handle_orders(args: OrdersArgs) -> Result<()> {
    let orders = match &args.orders {
        Some(path) => read_orders(path)
            .with_context(|| format!("Failed to read orders from {}", path.display()))?,
        None => generate_order_history(args.seed, HISTORY_DAYS, Local::now().date_naive()),
    };
    let filter = OrderFilter {
        from: args.from,
        to: args.to,
        category: args.category.clone(),
        region: args.region.clone(),
    };
    let selected = filter.apply(&orders);
    if selected.is_empty() {
        warn!(total = orders.len(), "no orders match the filter");
    }
    let summary = summarize_orders(&selected)?;

    println!("{}", "Sales summary".bold());
    println!("Orders:          {}", summary.total_orders);
    println!("Units:           {}", summary.total_quantity);
    println!("Revenue:         {:.2}", summary.total_revenue);
    println!("Avg order value: {:.2}", summary.average_order_value);

    println!("\n{}", "By category".bold());
    for t in &summary.by_category {
        println!("{:<28} {:>12.2} ({:>5.1}%) {:>7} orders", t.key, t.revenue, t.revenue_share * 100.0, t.orders);
    }
    println!("\n{}", "By region".bold());
    for t in &summary.by_region {
        println!("{:<28} {:>12.2} ({:>5.1}%) {:>7} orders", t.key, t.revenue, t.revenue_share * 100.0, t.orders);
    }
    println!("\n{}", format!("Top {} products", args.top).bold());
    for (i, t) in summary.top_products(args.top).iter().enumerate() {
        let revenue = format!("{:.2}", t.revenue);
        let revenue = if i == 0 { revenue.green().bold().to_string() } else { revenue };
        println!("{:>3}. {:<32} {:>12} {:>7} units", i + 1, t.key, revenue, t.quantity);
    }

    if let Some(path) = &args.output {
        write_csv(path, &summary.by_product)?;
        println!("Product ranking written to {}", path.display());
    }
    if let Some(path) = &args.daily {
        write_csv(path, &summary.daily)?;
        println!("Daily sales written to {}", path.display());
    }
    Ok(())
}
