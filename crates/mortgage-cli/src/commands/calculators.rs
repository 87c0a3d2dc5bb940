use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use mortgage_core::types::Region;
use mortgage_core::{amortization, apr, schedule, tax};

#[derive(Args)]
pub struct AprArgs {
    /// Base rate in whole percentage points
    #[arg(long)]
    pub base_rate: i64,

    /// Applicant risk score (strictly positive)
    #[arg(long)]
    pub risk_score: Decimal,

    /// State name for the sales-tax lookup
    #[arg(long)]
    pub state: Option<String>,

    /// Treat the mortgage as outside the domestic region
    #[arg(long)]
    pub foreign: bool,

    /// Margin in percentage points
    #[arg(long, default_value = "0.02")]
    pub margin: Decimal,
}

pub fn run_apr(args: AprArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let region = if args.foreign {
        Region::Foreign
    } else {
        Region::Domestic
    };
    let sales_tax = tax::resolve_sales_tax(region, args.state.as_deref());
    let final_apr = apr::final_apr(args.base_rate, args.margin, sales_tax, args.risk_score)?;

    Ok(json!({
        "result": {
            "base_rate": args.base_rate,
            "margin": args.margin,
            "sales_tax": sales_tax,
            "risk_score": args.risk_score,
            "final_apr": final_apr,
        },
    }))
}

#[derive(Args)]
pub struct PaymentArgs {
    /// Principal amount
    #[arg(long)]
    pub principal: Decimal,

    /// Annual rate in percentage points (6 = 6%)
    #[arg(long)]
    pub apr: Decimal,

    /// Term in months
    #[arg(long)]
    pub term: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let monthly_payment = amortization::monthly_payment(args.principal, args.apr, args.term)?;

    Ok(json!({
        "result": {
            "principal": args.principal,
            "apr_percent": args.apr,
            "term_months": args.term,
            "monthly_payment": monthly_payment,
        },
    }))
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Mortgage display name
    #[arg(long)]
    pub name: String,

    /// Mortgage number
    #[arg(long)]
    pub number: String,

    /// Term in months
    #[arg(long)]
    pub term: u32,

    /// Monthly payment amount
    #[arg(long)]
    pub payment: Decimal,

    /// First due date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = args.start_date.unwrap_or_else(|| Local::now().date_naive());
    let installment_name = format!("{} - {}", args.name, args.number);

    let installments = schedule::build_installments(
        &installment_name,
        Uuid::new_v4(),
        Uuid::new_v4(),
        args.payment,
        args.term,
        start,
    )?;

    Ok(serde_json::to_value(installments)?)
}

#[derive(Args)]
pub struct TaxArgs {
    /// State name, as it appears in the reference table
    #[arg(long)]
    pub state: String,
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // Both entry points reported side by side: the plain table rate
    // (unknown state -> 0.0) and the pipeline's resolution for a
    // domestic mortgage naming this state.
    Ok(json!({
        "result": {
            "state": args.state,
            "table_rate": tax::sales_tax(&args.state),
            "pipeline_rate": tax::resolve_sales_tax(Region::Domestic, Some(&args.state)),
        },
    }))
}
