//! fraud-eda CLI - exploratory summaries for transaction fraud datasets
//!
//! ## Example Usage
//!
//! ```bash
//! # Summaries in the original currencies
//! fraud-eda
//!
//! # Also convert every amount to USD and summarize the converted column
//! fraud-eda --usd --file data/transactions.parquet --fx data/rates.parquet
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use fraud_eda::prelude::*;
use std::path::PathBuf;
use std::process;

/// fraud-eda: exploratory data analysis for transaction fraud data
#[derive(Parser)]
#[command(name = "fraud-eda")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "EDA for transaction fraud data, with optional conversion to USD", long_about = None)]
struct Cli {
    /// Convert amounts to the reference currency and summarize the converted column
    #[arg(long)]
    usd: bool,

    /// Path to the transaction file
    #[arg(long, default_value = "transaction_fraud_data.parquet")]
    file: PathBuf,

    /// Path to the exchange-rate file
    #[arg(long, default_value = "historical_currency_exchange.parquet")]
    fx: PathBuf,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = EdaConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    if cli.verbose {
        println!(
            "{} v{}",
            "fraud-eda".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("  {} {}", "Reference currency:".bold(), config.reference_currency);
        println!("  {} {}", "Top-N:".bold(), config.top_n);
        println!();
    }

    // 1) Base summaries
    println!("Loading transactions from: {}", cli.file.display());
    let transactions = load_transactions(&cli.file)?;
    print!("{}", DescriptiveReport::build(&transactions, &config)?);

    // 2) Optional conversion and converted summaries
    if cli.usd {
        if !cli.fx.exists() {
            return Err(EdaError::FileNotFound(cli.fx).into());
        }

        println!();
        println!("Loading exchange rates from: {}", cli.fx.display());
        let rates = load_rate_table(&cli.fx, &config.rates)?;
        let (dates, currencies) = rates.shape();
        println!("Rates loaded in wide layout, shape: ({}, {})", dates, currencies);
        if let Some((first, last)) = rates.date_range() {
            println!("Rate dates: {} .. {}", first, last);
        }

        let conversion = convert_transactions(&transactions, &rates, &config)
            .context("currency conversion failed")?;
        println!();
        print!("{}", conversion);
        print!("{}", ConvertedReport::build(&conversion.frame, &config)?);
    }

    println!();
    println!("{}", "Done ✅".green().bold());
    Ok(())
}
