//! `slots` CLI — rank open appointment slots from a JSON schedule request.
//!
//! ## Usage
//!
//! ```sh
//! # Rank slots (stdin → stdout)
//! echo '{"doctorId":"d1","existingAppointments":[]}' | slots optimize
//!
//! # From file to file, with a config file and pretty output
//! slots optimize -i request.json -o slots.json -c tuning.json --pretty
//!
//! # Show how each existing appointment is classified
//! slots classify -i request.json
//!
//! # Print the effective configuration (defaults + file + SLOT_ENGINE_* env)
//! slots config
//! ```
//!
//! Logs go to stderr and are controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::wire::{ClassificationEntry, ScheduleRequest, ScheduleResponse};
use slot_engine::{
    classify, optimize_with_estimator, resolve_appointments, HeuristicEstimator, OptimizerConfig,
};
use std::io::{self, Read};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Rank open appointment slots for a provider's working day"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the open slots for a schedule request
    Optimize {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// JSON config file overriding the defaults
        #[arg(short, long)]
        config: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show each existing appointment as blocking or reclaimable
    Classify {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON config file overriding the defaults
        #[arg(short, long)]
        config: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the effective configuration as JSON
    Config {
        /// JSON config file overriding the defaults
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize {
            input,
            output,
            config,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let request = read_request(input.as_deref())?;

            let window = request.window().context("Invalid working window")?;
            let pending = request
                .pending_appointments()
                .context("Invalid existing appointment")?;
            let slots = optimize_with_estimator(&window, &pending, &HeuristicEstimator, &config)
                .context("Failed to optimize schedule")?;
            info!(
                doctor = %request.doctor_id,
                slots = slots.len(),
                "schedule optimized"
            );

            let response = ScheduleResponse::new(request.doctor_id, &slots);
            let json = to_json(&response, pretty)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Classify {
            input,
            config,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let request = read_request(input.as_deref())?;

            let pending = request
                .pending_appointments()
                .context("Invalid existing appointment")?;
            let appointments =
                resolve_appointments(&pending, &HeuristicEstimator, config.fallback_risk)
                    .context("Invalid existing appointment")?;
            let classified = classify(&appointments, config.reclaim_threshold)
                .context("Failed to classify appointments")?;

            let entries: Vec<ClassificationEntry> =
                classified.iter().map(ClassificationEntry::from).collect();
            println!("{}", to_json(&entries, pretty)?);
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", to_json(&config, true)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Defaults, then the config file if given, then `SLOT_ENGINE_*` overrides.
fn load_config(path: Option<&str>) -> Result<OptimizerConfig> {
    let config = match path {
        Some(path) => OptimizerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => OptimizerConfig::default(),
    }
    .with_env_overrides();
    config
        .validate()
        .context("Invalid configuration after environment overrides")?;
    Ok(config)
}

fn read_request(path: Option<&str>) -> Result<ScheduleRequest> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse schedule request JSON")
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
