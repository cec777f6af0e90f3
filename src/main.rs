//! plant-advisor - Plant Operations Estimator CLI
//!
//! # Usage
//!
//! ```bash
//! # One estimate with the form defaults
//! plant-advisor predict
//!
//! # Override inputs, print JSON, export the record
//! plant-advisor predict --plf 58 --fuel-cost 3.9 --json --export out/run.csv
//!
//! # Session: one JSON object per line on stdin
//! cat scenarios.jsonl | plant-advisor session --export out/session.csv
//!
//! # Batch: scenario CSV in, results CSV out (parallel)
//! plant-advisor batch --input scenarios.csv --output results.csv
//!
//! # Write / check a config file
//! plant-advisor config init --output plant_config.toml
//! plant-advisor config check plant_config.toml
//! ```
//!
//! # Environment Variables
//!
//! - `PLANT_ADVISOR_CONFIG`: Path to the plant config TOML
//! - `PLANT_ADVISOR_MODEL`: Path to the model artifact (overrides `[model].path`)
//! - `RUST_LOG`: Logging level (default: info)

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use plant_advisor::config::{self, PlantConfig};
use plant_advisor::{
    export, report, Estimator, LinearModel, NotificationPayload, Notifier, OperatingInputs,
    SessionHistory, TracingNotifier,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "plant-advisor")]
#[command(about = "Plant Operations Estimator - generation, emissions, financials and advisories")]
#[command(version)]
struct CliArgs {
    /// Plant config TOML (default: $PLANT_ADVISOR_CONFIG, then ./plant_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Estimate one set of operating inputs
    Predict {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// Print the full record as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Write the record to a CSV file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// Hand the record to the notifier
        #[arg(long)]
        notify: bool,
    },

    /// Read JSON-lines inputs from stdin into one session history
    Session {
        #[command(flatten)]
        model: ModelArgs,

        /// Export the session history to this CSV file at end of input
        /// (default: timestamped file in [export].output_dir)
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },

    /// Estimate every row of a scenario CSV in parallel
    Batch {
        #[command(flatten)]
        model: ModelArgs,

        /// Scenario CSV (snake_case or training column headers)
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        /// Results CSV
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },

    /// Plant config utilities
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write the built-in defaults as TOML
    Init {
        #[arg(long, default_value = "plant_config.toml")]
        output: PathBuf,
    },
    /// Parse and validate a config file
    Check { path: PathBuf },
}

#[derive(clap::Args, Debug)]
struct ModelArgs {
    /// Model artifact (overrides [model].path)
    #[arg(long, env = "PLANT_ADVISOR_MODEL", value_name = "PATH")]
    model: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Installed capacity (MW)
    #[arg(long, default_value_t = 60_000.0, allow_negative_numbers = true)]
    capacity: f64,
    /// Coal received (MTPA)
    #[arg(long, default_value_t = 18_500_000.0, allow_negative_numbers = true)]
    coal: f64,
    /// Gas received (MMSCM)
    #[arg(long, default_value_t = 3_000.0, allow_negative_numbers = true)]
    gas: f64,
    /// Plant load factor (%)
    #[arg(long, default_value_t = 72.0, allow_negative_numbers = true)]
    plf: f64,
    /// Fuel cost per unit (₹/kWh)
    #[arg(long, default_value_t = 3.2, allow_negative_numbers = true)]
    fuel_cost: f64,
    /// Average tariff / ECR (₹/kWh)
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    tariff: f64,
    /// Renewable share (%)
    #[arg(long, default_value_t = 28.0, allow_negative_numbers = true)]
    re_share: f64,
}

impl From<&InputArgs> for OperatingInputs {
    fn from(args: &InputArgs) -> Self {
        Self {
            installed_capacity_mw: args.capacity,
            coal_received_mtpa: args.coal,
            gas_received_mmscm: args.gas,
            plf_pct: args.plf,
            fuel_cost_per_unit: args.fuel_cost,
            avg_tariff: args.tariff,
            re_share_pct: args.re_share,
        }
    }
}

// ============================================================================
// Setup
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<PlantConfig> {
    match path {
        Some(p) => PlantConfig::load_from_file(p)
            .with_context(|| format!("Failed to load plant config {}", p.display())),
        None => Ok(PlantConfig::load()),
    }
}

fn build_estimator(args: &ModelArgs, cfg: &PlantConfig) -> Result<Estimator> {
    let path = args
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.model.path));
    let model = LinearModel::load(&path)
        .with_context(|| format!("Cannot start without a prediction model ({})", path.display()))?;
    Ok(Estimator::new(Arc::new(model), cfg))
}

// ============================================================================
// Commands
// ============================================================================

fn run_predict(
    estimator: &Estimator,
    cfg: &PlantConfig,
    inputs: OperatingInputs,
    json: bool,
    export_path: Option<&Path>,
    notify: bool,
) -> Result<()> {
    let mut history = SessionHistory::new();
    let record = estimator
        .submit(&mut history, &inputs)
        .context("Estimate failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}\n", cfg.plant.name);
        println!("{}", report::render_record(&record));
    }

    if let Some(path) = export_path {
        export::export_to_file(path, history.records(), cfg.export.include_advisories)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
    }

    if notify {
        let notifier = TracingNotifier;
        let payload = NotificationPayload::from_record(&cfg.plant.name, &record);
        notifier
            .send(&payload)
            .with_context(|| format!("Notifier '{}' failed", notifier.name()))?;
    }
    Ok(())
}

fn run_session(estimator: &Estimator, cfg: &PlantConfig, export_path: Option<&Path>) -> Result<()> {
    let mut history = SessionHistory::new();
    info!(session = history.session_id(), "Session started, reading JSON lines from stdin");

    let stdin = std::io::stdin();
    for (idx, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let inputs: OperatingInputs = match serde_json::from_str(line) {
            Ok(inputs) => inputs,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping unparseable input line");
                continue;
            }
        };

        match estimator.submit(&mut history, &inputs) {
            Ok(record) => {
                println!("--- #{} (line {line_no}) ---", history.len());
                println!("{}\n", report::render_record(&record));
            }
            Err(e) => warn!(line = line_no, error = %e, "Request failed, history unchanged"),
        }
    }

    let elapsed = chrono::Utc::now() - history.started_at();
    info!(
        records = history.len(),
        started_at = %history.started_at().to_rfc3339(),
        elapsed_secs = elapsed.num_seconds(),
        "Session input finished"
    );
    if history.is_empty() {
        return Ok(());
    }

    let path = match export_path {
        Some(path) => {
            export::export_to_file(path, &history.snapshot(), cfg.export.include_advisories)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            path.to_path_buf()
        }
        None => export::export_session(&history, &cfg.export)
            .context("Failed to export session history")?,
    };
    println!("Exported {} records to {}", history.len(), path.display());
    Ok(())
}

fn run_batch(estimator: &Estimator, cfg: &PlantConfig, input: &Path, output: &Path) -> Result<()> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open scenario CSV {}", input.display()))?;
    let scenarios = export::read_scenarios(file)
        .with_context(|| format!("Failed to parse scenario CSV {}", input.display()))?;

    let results = estimator.estimate_batch(&scenarios);
    let mut records = Vec::with_capacity(results.len());
    for (row, result) in results.into_iter().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!(row = row + 1, error = %e, "Scenario failed, omitted from output"),
        }
    }

    let written = export::export_to_file(output, &records, cfg.export.include_advisories)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;
    println!("{written}/{} scenarios estimated → {}", scenarios.len(), output.display());
    Ok(())
}

fn run_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { output } => {
            if output.exists() {
                bail!("{} already exists, refusing to overwrite", output.display());
            }
            PlantConfig::default()
                .save_to_file(output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote default plant config to {}", output.display());
        }
        ConfigAction::Check { path } => {
            let cfg = PlantConfig::load_from_file(path)
                .with_context(|| format!("{} is not a valid plant config", path.display()))?;
            println!("{}: OK (plant '{}')", path.display(), cfg.plant.name);
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable with --json
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    if let SubCommand::Config { action } = &args.command {
        return run_config(action);
    }

    config::init(load_config(args.config.as_deref())?);
    let cfg = config::get();

    match &args.command {
        SubCommand::Predict { inputs, model, json, export, notify } => {
            let estimator = build_estimator(model, cfg)?;
            run_predict(&estimator, cfg, inputs.into(), *json, export.as_deref(), *notify)
        }
        SubCommand::Session { model, export } => {
            let estimator = build_estimator(model, cfg)?;
            run_session(&estimator, cfg, export.as_deref())
        }
        SubCommand::Batch { model, input, output } => {
            let estimator = build_estimator(model, cfg)?;
            run_batch(&estimator, cfg, input, output)
        }
        SubCommand::Config { .. } => Ok(()),
    }
}
