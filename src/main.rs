use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use lasertime::{init_logging_with, Config, CuttingTimeOptions, JobReport, BUILD_DATE, VERSION};
use lasertime_core::units::format_feed_rate;
use lasertime_core::FeedRateUnits;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "lasertime")]
#[command(about = "Cutting-time estimation for 2D laser cutting jobs")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate cutting time for an SVG or DXF drawing
    Estimate {
        /// Drawing to estimate
        file: PathBuf,

        /// Material thickness in mm (falls back to estimate.thickness in the config)
        #[arg(short, long)]
        thickness: Option<f64>,

        /// Reorder the cutting path before estimating
        #[arg(short, long)]
        optimize: bool,

        /// Kerf override in mm
        #[arg(short, long)]
        kerf: Option<f64>,

        /// Multiplier applied to all times and distances
        #[arg(short, long)]
        scale: Option<f64>,

        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the calibrated parameters for material thicknesses
    Params {
        /// Thicknesses in mm (defaults to every calibrated thickness)
        thicknesses: Vec<f64>,

        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Units for cutting speed (mm/min, mm/s, m/min, in/min)
        #[arg(short, long, default_value = "mm/min")]
        units: FeedRateUnits,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Destination (defaults to the platform config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the path of the default configuration file
    Path,
}

/// Calibrated values for one thickness.
#[derive(Debug, Serialize)]
struct ParamRow {
    thickness: f64,
    /// mm/min
    cutting_speed: f64,
    pierce_time: f64,
    kerf: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with(cli.verbose, cli.log_json)?;
    debug!(version = VERSION, build_date = BUILD_DATE, "starting lasertime");

    match cli.command {
        Commands::Estimate {
            file,
            thickness,
            optimize,
            kerf,
            scale,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;

            let Some(thickness) = thickness.or(config.estimate.thickness) else {
                bail!("no material thickness given; pass --thickness or set estimate.thickness");
            };

            let mut options = config.estimate.options(thickness);
            options.optimize |= optimize;
            if let Some(kerf) = kerf {
                options = options.with_kerf(kerf);
            }
            if let Some(scale) = scale {
                options = options.with_scale_factor(scale);
            }
            options.validate()?;

            let report = estimate_file(&config, &file, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }

        Commands::Params {
            thicknesses,
            config,
            units,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let estimator = config.estimator();

            let thicknesses: Vec<f64> = if thicknesses.is_empty() {
                estimator.tables().cutting_speed.keys().collect()
            } else {
                thicknesses
            };

            let rows: Vec<ParamRow> = thicknesses
                .into_iter()
                .map(|t| ParamRow {
                    thickness: t,
                    cutting_speed: estimator.resolve_cutting_speed(t),
                    pierce_time: estimator.resolve_pierce_time(t),
                    kerf: estimator.resolve_kerf(&CuttingTimeOptions::new(t)),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("Machine: {}", config.machine.name);
                println!(
                    "{:>10} {:>18} {:>12} {:>10}",
                    "thickness", "cutting speed", "pierce", "kerf"
                );
                for row in &rows {
                    println!(
                        "{:>7.2} mm {:>18} {:>10.2} s {:>7.2} mm",
                        row.thickness,
                        format_feed_rate(row.cutting_speed, units),
                        row.pierce_time,
                        row.kerf
                    );
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = match path {
                    Some(p) => p,
                    None => Config::default_path()?,
                };
                if path.exists() && !force {
                    bail!(
                        "{} already exists; pass --force to overwrite",
                        path.display()
                    );
                }
                Config::default()
                    .save_to_file(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote default configuration to {}", path.display());
            }
            ConfigAction::Path => {
                println!("{}", Config::default_path()?.display());
            }
        },
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).with_context(|| match path {
        Some(p) => format!("Failed to load config from {}", p.display()),
        None => "Failed to load the default config".to_string(),
    })
}

fn estimate_file(
    config: &Config,
    file: &Path,
    options: &CuttingTimeOptions,
) -> anyhow::Result<JobReport> {
    let geometry = lasertime::import_file(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let result = config.estimator().estimate(&geometry.movements, options);
    info!(
        file = %file.display(),
        total_time_sec = result.total_time_sec,
        pierces = result.pierce_count,
        "estimated job"
    );

    Ok(JobReport::new(
        file.display().to_string(),
        &geometry,
        options,
        result,
    ))
}
