use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use screen_risk::config::{load_config, write_config, Config};
use screen_risk::patient::{MarkerReading, PatientContext, Trimester};
use screen_risk::scoring::{evaluate, validate_tables, Evaluation};
use screen_risk::tables::{Analyte, Condition, ReferenceTables};
use screen_risk::ErrorKind;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TrimesterArg {
    First,
    Second,
}

impl From<TrimesterArg> for Trimester {
    fn from(arg: TrimesterArg) -> Self {
        match arg {
            TrimesterArg::First => Trimester::First,
            TrimesterArg::Second => Trimester::Second,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Args, Debug, Default)]
struct MarkerArgs {
    /// Nuchal translucency (mm)
    #[arg(long)]
    nt: Option<f64>,

    /// PAPP-A (U/L)
    #[arg(long = "papp-a")]
    papp_a: Option<f64>,

    /// Free beta-hCG (ng/ml)
    #[arg(long = "free-hcg")]
    free_hcg: Option<f64>,

    /// AFP (ng/ml)
    #[arg(long)]
    afp: Option<f64>,

    /// Total hCG (IU/L)
    #[arg(long = "total-hcg")]
    total_hcg: Option<f64>,

    /// Unconjugated estriol (nmol/L)
    #[arg(long)]
    ue3: Option<f64>,
}

impl MarkerArgs {
    /// Readings for the flags that were given, in panel order
    fn readings(&self) -> Vec<MarkerReading> {
        [
            (Analyte::Nt, self.nt),
            (Analyte::PappA, self.papp_a),
            (Analyte::FreeBetaHcg, self.free_hcg),
            (Analyte::Afp, self.afp),
            (Analyte::TotalHcg, self.total_hcg),
            (Analyte::Ue3, self.ue3),
        ]
        .into_iter()
        .filter_map(|(analyte, value)| value.map(|v| MarkerReading::new(analyte, v)))
        .collect()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute risks for one patient
    Evaluate {
        #[arg(long, value_enum)]
        trimester: TrimesterArg,

        /// Maternal age in completed years
        #[arg(long)]
        age: u32,

        /// Completed gestational week
        #[arg(long)]
        week: u32,

        /// Maternal weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Maternal height in cm
        #[arg(long)]
        height: Option<f64>,

        #[command(flatten)]
        markers: MarkerArgs,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print age multipliers for each age-scaled condition
    Curve {
        #[arg(long, default_value_t = 20)]
        from: u32,

        #[arg(long, default_value_t = 45)]
        to: u32,

        #[arg(long, default_value_t = 5)]
        step: u32,
    },
    /// Print the effective reference tables as YAML
    Tables,
    /// Write the built-in tables to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "screen-risk")]
#[command(about = "Prenatal screening risk calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/screen-risk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init { force } = cli.command {
        let path = match cli.config.map_or_else(screen_risk::config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = write_config(&path, &Config::starter(), force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate tables at startup
    let tables = config.tables();
    if let Err(errors) = validate_tables(&tables) {
        eprintln!("Reference table errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Commands::Evaluate {
            trimester,
            age,
            week,
            weight,
            height,
            markers,
            format,
        } => {
            let trimester = Trimester::from(trimester);
            let mut patient = PatientContext::new(age, week, trimester);
            patient.maternal_weight_kg = weight;
            patient.maternal_height_cm = height;

            let readings = markers.readings();

            let evaluation = match evaluate(&tables, trimester, &patient, &readings) {
                Ok(e) => e,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(exit_code(e.kind()));
                }
            };

            if let Err(e) = print_evaluation(&evaluation, &patient, format) {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        Commands::Curve { from, to, step } => {
            let Some(ages) = curve_ages(from, to, step) else {
                eprintln!("Invalid age range: need from <= to and step > 0");
                std::process::exit(EXIT_INPUT);
            };
            let mut curves = Vec::new();
            for condition in Condition::AGE_SCALED {
                match tables.age_risk.curve(condition, ages.clone()) {
                    Ok(points) => curves.push((condition, points)),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            }
            println!("{}", screen_risk::output::format_curve(&curves));
        }
        Commands::Tables => {
            if let Err(e) = print_tables(&tables) {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        // Written before config load
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Configuration => EXIT_CONFIG,
        ErrorKind::InvalidInput => EXIT_INPUT,
    }
}

/// Ages sampled by `curve`; `None` for an empty or non-advancing range
fn curve_ages(from: u32, to: u32, step: u32) -> Option<Vec<u32>> {
    if step == 0 || from > to {
        return None;
    }
    Some((from..=to).step_by(step as usize).collect())
}

fn print_evaluation(
    evaluation: &Evaluation,
    patient: &PatientContext,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let use_colors = screen_risk::output::should_use_colors();
            println!(
                "{}",
                screen_risk::output::format_report(evaluation, patient, use_colors)
            );
        }
        OutputFormat::Tsv => {
            println!("{}", screen_risk::output::format_tsv(&evaluation.risks));
        }
        OutputFormat::Json => {
            let json = screen_risk::output::format_json(evaluation, patient, chrono::Utc::now())
                .context("Failed to serialize evaluation")?;
            println!("{}", json);
        }
    }

    if let Some(highest) = evaluation.highest_risk() {
        tracing::info!(
            condition = %highest.condition,
            probability = highest.probability,
            "highest risk"
        );
    }
    Ok(())
}

fn print_tables(tables: &ReferenceTables) -> anyhow::Result<()> {
    let yaml = serde_saphyr::to_string(tables)
        .map_err(|e| anyhow::anyhow!("Failed to serialize tables: {}", e))?;
    print!("{}", yaml);
    Ok(())
}
