//! stocklens CLI - per-instrument analysis from a data directory
//!
//! ## Example Usage
//!
//! ```bash
//! # Analyze one instrument and print the combined JSON report
//! stocklens analyze 0700.HK --data-dir ./data --pretty
//!
//! # Analyze several instruments in parallel, one JSON file each
//! stocklens batch 0700.HK 9988.HK AAPL --data-dir ./data --output-dir ./reports
//! ```
//!
//! Expected layout under the data directory:
//! `ohlcv/<TICKER>_daily.csv`, `financials/<TICKER>_annual_income.csv`,
//! `financials/<TICKER>_annual_balance.csv`, the quarterly pair, and
//! `financials/<TICKER>_info.json`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use stocklens::analysis::{analyze, InstrumentData, InstrumentReport};
use stocklens::data::{load_bars, load_profile, load_statements};
use stocklens::error::{Result, StockLensError};
use stocklens::fundamentals::StatementTable;

/// stocklens: multi-timeframe technical and fundamental analytics
#[derive(Parser)]
#[command(name = "stocklens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Technical and fundamental analytics engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one instrument and emit its JSON report
    Analyze {
        /// Ticker symbol (e.g. 0700.HK)
        #[arg(value_name = "TICKER")]
        ticker: String,

        /// Data directory (overrides the config file)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Analyze several instruments in parallel
    Batch {
        /// Ticker symbols
        #[arg(value_name = "TICKERS", required = true)]
        tickers: Vec<String>,

        /// Data directory (overrides the config file)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory for per-ticker JSON reports
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,
    },
}

/// TOML configuration file
#[derive(Debug, Default, Deserialize)]
struct Config {
    data_dir: Option<PathBuf>,
}

impl Config {
    fn load(explicit: Option<&Path>) -> Self {
        let path = explicit.map(PathBuf::from).or_else(|| {
            dirs::config_dir().map(|d| d.join("stocklens").join("config.toml"))
        });

        let Some(path) = path else {
            return Self::default();
        };
        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Load a statement table, treating a missing file as an empty table.
fn statements_or_empty(path: &Path) -> Result<StatementTable> {
    match load_statements(path) {
        Ok(table) => Ok(table),
        Err(e) if e.is_recoverable() => {
            log::warn!("{}", e);
            Ok(StatementTable::new())
        }
        Err(e) => Err(e),
    }
}

/// Gather one instrument's inputs from the conventional directory layout.
fn load_instrument(data_dir: &Path, ticker: &str) -> Result<InstrumentData> {
    let ohlcv = data_dir.join("ohlcv");
    let financials = data_dir.join("financials");

    let daily_bars = match load_bars(&ohlcv.join(format!("{}_daily.csv", ticker))) {
        Ok(bars) => bars,
        Err(e) if e.is_recoverable() => {
            log::warn!("{}: {}", ticker, e);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let profile = match load_profile(&financials.join(format!("{}_info.json", ticker))) {
        Ok(profile) => Some(profile),
        Err(e) if e.is_recoverable() => {
            log::warn!("{}: {}", ticker, e);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(InstrumentData {
        symbol: ticker.to_string(),
        daily_bars,
        annual_income: statements_or_empty(&financials.join(format!("{}_annual_income.csv", ticker)))?,
        annual_balance: statements_or_empty(&financials.join(format!("{}_annual_balance.csv", ticker)))?,
        quarterly_income: statements_or_empty(&financials.join(format!("{}_quarterly_income.csv", ticker)))?,
        quarterly_balance: statements_or_empty(&financials.join(format!("{}_quarterly_balance.csv", ticker)))?,
        profile,
    })
}

fn resolve_data_dir(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn run_analyze(
    ticker: &str,
    data_dir: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let data = load_instrument(data_dir, ticker)?;
    let report = analyze(&data)?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match output {
        Some(path) => {
            fs::write(path, &json)?;
            println!("{} report written to {}", "ok:".green().bold(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_batch(tickers: &[String], data_dir: &Path, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    let progress = ProgressBar::new(tickers.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<(String, Result<InstrumentReport>)> = tickers
        .par_iter()
        .map(|ticker| {
            let result = load_instrument(data_dir, ticker).and_then(|data| analyze(&data));
            progress.inc(1);
            (ticker.clone(), result)
        })
        .collect();

    progress.finish_and_clear();

    let mut failures = 0usize;
    for (ticker, result) in results {
        match result {
            Ok(report) => {
                let path = output_dir.join(format!("{}.json", ticker));
                fs::write(&path, serde_json::to_string_pretty(&report)?)?;
                println!("{} {}", "ok:".green().bold(), ticker);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "failed:".red().bold(), ticker, e);
            }
        }
    }

    if failures > 0 {
        return Err(StockLensError::InvalidData(format!(
            "{} of {} instruments failed",
            failures,
            tickers.len()
        )));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let config = Config::load(cli.config.as_deref());

    let result = match cli.command {
        Commands::Analyze {
            ticker,
            data_dir,
            output,
            pretty,
        } => {
            let dir = resolve_data_dir(data_dir, &config);
            run_analyze(&ticker, &dir, output.as_deref(), pretty)
        }
        Commands::Batch {
            tickers,
            data_dir,
            output_dir,
        } => {
            let dir = resolve_data_dir(data_dir, &config);
            run_batch(&tickers, &dir, &output_dir)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}
