//! shardcost CLI: size and cost estimates for a sharded document store.
//!
//! Every command prints JSON on stdout; logs go to stderr (`RUST_LOG`).

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use shardcost_core::config::CostConfig;
use shardcost_core::schema::Database;
use shardcost_core::stats::Statistics;
use shardcost_model::{
    estimate, parse_query_plan, parse_query_plans, parse_schema_json, parse_schema_yaml,
    shard_report, size_report, QueryPlan,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "shardcost")]
#[command(about = "Analytical cost model for queries on a sharded document store", long_about = None)]
struct Cli {
    /// Verbose logging (per-phase costs, shard routing)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Schema description (.json, .yaml or .yml)
    #[arg(short, long)]
    schema: PathBuf,

    /// Statistics document (JSON or YAML)
    #[arg(long)]
    stats: PathBuf,

    /// Cost configuration file (JSON or YAML); env and flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network throughput in bytes/s (overrides config)
    #[arg(long)]
    bandwidth_bps: Option<u64>,

    /// Price per network GB (overrides config)
    #[arg(long)]
    price_rate: Option<f64>,

    /// Shard count (overrides statistics)
    #[arg(long)]
    servers: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Document, collection and database sizes
    Sizes {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Per-collection spread over the shards
    Shards {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Cost one query plan, or compare a list of candidate plans
    Estimate {
        #[command(flatten)]
        inputs: Inputs,

        /// Query plan file (one plan, or a list of plans)
        #[arg(short, long)]
        query: PathBuf,
    },

    /// Check that schema, statistics and configuration load
    Validate {
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match &cli.command {
        Commands::Sizes { inputs } => run_sizes(inputs),
        Commands::Shards { inputs } => run_shards(inputs),
        Commands::Estimate { inputs, query } => run_estimate(inputs, query),
        Commands::Validate { inputs } => run_validate(inputs),
    };

    match outcome {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("shardcost_model=debug,shardcost=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(inputs: &Inputs) -> CliResult<CostConfig> {
    let file = match &inputs.config {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    layer_config(file.as_deref(), |name| std::env::var(name).ok(), inputs)
}

/// Defaults, then the config file, then `SHARDCOST_*` variables, then flags.
fn layer_config<F: Fn(&str) -> Option<String>>(
    file: Option<&str>,
    env: F,
    inputs: &Inputs,
) -> CliResult<CostConfig> {
    let mut cfg = match file {
        Some(src) => serde_yaml::from_str(src)?,
        None => CostConfig::default(),
    };
    cfg.apply_vars(env);
    apply_flag_overrides(&mut cfg, inputs);
    cfg.validate()?;
    Ok(cfg)
}

fn apply_flag_overrides(cfg: &mut CostConfig, inputs: &Inputs) {
    if let Some(bps) = inputs.bandwidth_bps {
        cfg.bandwidth_bps = bps;
    }
    if let Some(rate) = inputs.price_rate {
        cfg.price_rate = rate;
    }
}

fn load_stats(inputs: &Inputs) -> CliResult<Statistics> {
    let src = fs::read_to_string(&inputs.stats)?;
    let mut stats: Statistics = serde_yaml::from_str(&src)?;
    if let Some(servers) = inputs.servers {
        stats.servers = servers;
    }
    Ok(stats)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_database(inputs: &Inputs, stats: &Statistics, cfg: &CostConfig) -> CliResult<Database> {
    let src = fs::read_to_string(&inputs.schema)?;
    let db = if is_yaml(&inputs.schema) {
        parse_schema_yaml(&src, stats, cfg)?
    } else {
        parse_schema_json(&src, stats, cfg)?
    };
    tracing::info!(
        database = %db.name,
        collections = db.len(),
        "schema loaded"
    );
    Ok(db)
}

fn load_all(inputs: &Inputs) -> CliResult<(Database, Statistics, CostConfig)> {
    let cfg = load_config(inputs)?;
    let stats = load_stats(inputs)?;
    let db = load_database(inputs, &stats, &cfg)?;
    Ok((db, stats, cfg))
}

fn run_sizes(inputs: &Inputs) -> CliResult<String> {
    let (db, _, _) = load_all(inputs)?;
    Ok(serde_json::to_string_pretty(&size_report(&db))?)
}

fn run_shards(inputs: &Inputs) -> CliResult<String> {
    let (db, stats, _) = load_all(inputs)?;
    stats.require_servers()?;
    Ok(serde_json::to_string_pretty(&shard_report(&db, &stats)?)?)
}

/// A list is costed plan by plan; a single plan yields a single estimate.
fn load_plans(src: &str) -> CliResult<(Vec<QueryPlan>, bool)> {
    let doc: serde_yaml::Value = serde_yaml::from_str(src)?;
    if doc.is_sequence() {
        Ok((parse_query_plans(src)?, true))
    } else {
        Ok((vec![parse_query_plan(src)?], false))
    }
}

fn run_estimate(inputs: &Inputs, query: &Path) -> CliResult<String> {
    let (db, stats, cfg) = load_all(inputs)?;
    let (plans, is_list) = load_plans(&fs::read_to_string(query)?)?;

    let mut rows = Vec::with_capacity(plans.len());
    for plan in &plans {
        let est = estimate(plan, &db, &stats, &cfg)?;
        tracing::info!(
            op = plan.op_name(),
            time_total = est.time_total(),
            price = est.price(),
            "plan estimated"
        );
        rows.push(json!({ "op": plan.op_name(), "estimate": est }));
    }

    let out = if is_list {
        serde_json::Value::Array(rows)
    } else {
        rows.pop().unwrap_or(serde_json::Value::Null)
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

fn run_validate(inputs: &Inputs) -> CliResult<String> {
    let (db, stats, _) = load_all(inputs)?;
    stats.require_servers()?;
    Ok(serde_json::to_string_pretty(&json!({
        "valid": true,
        "database": db.name,
        "collections": db.collections().map(|c| c.name()).collect::<Vec<_>>(),
        "servers": stats.servers,
    }))?)
}
