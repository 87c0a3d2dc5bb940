mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calculators::{AprArgs, PaymentArgs, ScheduleArgs, TaxArgs};
use commands::pipeline::{ApproveArgs, BaseRateArgs, RiskScoreArgs};

/// Mortgage approval pipeline calculations
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage approval pipeline calculations",
    long_about = "Runs the mortgage approval pipeline and its individual \
                  calculators with decimal precision: final APR derivation, \
                  fixed-rate amortization, payment schedules, and the state \
                  sales-tax table."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a Review -> Approved status transition end to end
    Approve(ApproveArgs),
    /// Derive a final APR from base rate, margin, tax and risk score
    Apr(AprArgs),
    /// Level monthly payment for a fixed-rate loan
    Payment(PaymentArgs),
    /// Materialize a dated payment schedule
    Schedule(ScheduleArgs),
    /// Look up a state's sales tax
    Tax(TaxArgs),
    /// Fetch the current base rate (fallback policy applies)
    BaseRate(BaseRateArgs),
    /// Fetch a risk score from the scoring provider (failures propagate)
    RiskScore(RiskScoreArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Approve(args) => commands::pipeline::run_approve(args),
        Commands::Apr(args) => commands::calculators::run_apr(args),
        Commands::Payment(args) => commands::calculators::run_payment(args),
        Commands::Schedule(args) => commands::calculators::run_schedule(args),
        Commands::Tax(args) => commands::calculators::run_tax(args),
        Commands::BaseRate(args) => commands::pipeline::run_base_rate(args),
        Commands::RiskScore(args) => commands::pipeline::run_risk_score(args),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
