//! Meridian CLI - inspect CRSs and convert coordinates with PROJ.

mod config;
mod coords;
mod summary;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use meridian_proj::{Crs, MAX_DIMENSION, MIN_DIMENSION, proj_version};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::CliConfig;
use crate::summary::CrsSummary;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "meridian")]
#[command(author, version, about = "Coordinate reference system toolkit", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the crate and PROJ versions
    Version,
    /// Describe a CRS
    Info {
        /// CRS definition (PROJ string, AUTH:CODE, WKT or PROJJSON)
        definition: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the base geographic CRS of a CRS
    Geographic {
        /// CRS definition
        definition: String,
    },
    /// Convert coordinates read from stdin, one tuple per line
    Transform {
        /// Source CRS definition
        #[arg(long)]
        from: String,
        /// Target CRS definition
        #[arg(long)]
        to: String,
        /// Components per tuple [env: MERIDIAN_DIMENSION]
        #[arg(short, long)]
        dimension: Option<usize>,
        /// Decimals per printed component [env: MERIDIAN_PRECISION]
        #[arg(short, long)]
        precision: Option<usize>,
        /// Swap source and target
        #[arg(long)]
        inverse: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn load_crs(definition: &str) -> Result<Crs> {
    Crs::new(definition).with_context(|| format!("cannot load CRS `{definition}`"))
}

fn run_transform(from: &str, to: &str, inverse: bool, config: &CliConfig) -> Result<()> {
    ensure!(
        (MIN_DIMENSION..=MAX_DIMENSION).contains(&config.dimension),
        "dimension must be in [{MIN_DIMENSION}, {MAX_DIMENSION}], got {}",
        config.dimension
    );
    let (from, to) = if inverse { (to, from) } else { (from, to) };
    let source = load_crs(from)?;
    let target = load_crs(to)?;
    debug!("{source} -> {target}");

    let mut buffer = coords::read_tuples(io::stdin().lock(), config.dimension)?;
    let num_pts = buffer.len() / config.dimension;
    source
        .transform(&target, config.dimension, &mut buffer, 0, num_pts)
        .context("transform failed")?;
    info!("transformed {num_pts} points");

    let mut out = BufWriter::new(io::stdout().lock());
    for tuple in buffer.chunks_exact(config.dimension) {
        writeln!(out, "{}", coords::format_tuple(tuple, config.precision))?;
    }
    out.flush()?;
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Version => {
            println!("meridian {}", env!("CARGO_PKG_VERSION"));
            println!("PROJ {}", proj_version());
        }
        Commands::Info { definition, json } => {
            let crs = load_crs(&definition)?;
            let summary = CrsSummary::from_crs(&crs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Commands::Geographic { definition } => {
            let crs = load_crs(&definition)?;
            let base = crs.geographic()?;
            println!("{}", base.definition());
        }
        Commands::Transform {
            from,
            to,
            dimension,
            precision,
            inverse,
        } => {
            let config = CliConfig::default().with_overrides(dimension, precision);
            run_transform(&from, &to, inverse, &config)?;
        }
    }

    Ok(())
}
