use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};

use mortgage_core::pipeline;
use mortgage_core::rates::{
    resolve_base_rate, FixedRateSource, HttpRateSource, HttpRiskScoreProvider, RiskScoreProvider,
};
use mortgage_core::store::MemoryStore;
use mortgage_core::types::{Applicant, MortgageRecord, TransitionEvent};

use crate::input;

/// Default base URL for the rates/risk API.
pub const DEFAULT_API_URL: &str = "https://contosoapi-38bv.onrender.com";

#[derive(Args)]
pub struct ApproveArgs {
    /// Approval case JSON file (target, pre_image, applicant)
    #[arg(long)]
    pub input: Option<String>,

    /// Fixed base rate in percentage points; skips the network fetch
    #[arg(long)]
    pub base_rate: Option<i64>,

    /// Rates API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub rate_url: String,
}

/// One self-contained approval case: the status-changing event plus
/// the applicant the store would otherwise hold.
#[derive(Debug, Deserialize)]
struct ApprovalCase {
    target: MortgageRecord,
    pre_image: MortgageRecord,
    applicant: Applicant,
}

pub fn run_approve(args: ApproveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let case: ApprovalCase = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for approval processing".into());
    };

    let mut store = MemoryStore::new();
    store.insert_mortgage(case.pre_image.clone());
    store.insert_applicant(case.applicant);
    let event = TransitionEvent {
        target: case.target,
        pre_image: case.pre_image,
    };

    let output = match args.base_rate {
        Some(rate) => pipeline::process_transition(&event, &FixedRateSource(rate), &mut store)?,
        None => {
            let source = HttpRateSource::new(args.rate_url)?;
            pipeline::process_transition(&event, &source, &mut store)?
        }
    };

    Ok(serde_json::to_value(output)?)
}

#[derive(Args)]
pub struct BaseRateArgs {
    /// Rates API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub rate_url: String,
}

pub fn run_base_rate(args: BaseRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let source = HttpRateSource::new(args.rate_url)?;
    let (base_rate, warning) = resolve_base_rate(&source);

    Ok(json!({
        "result": {
            "base_rate": base_rate,
            "fallback_used": warning.is_some(),
        },
        "warnings": warning.into_iter().collect::<Vec<_>>(),
    }))
}

#[derive(Args)]
pub struct RiskScoreArgs {
    /// Applicant social security number
    #[arg(long)]
    pub ssn: String,

    /// Risk API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub risk_url: String,
}

pub fn run_risk_score(args: RiskScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let provider = HttpRiskScoreProvider::new(args.risk_url)?;
    let risk_score = provider.fetch_risk_score(&args.ssn)?;

    Ok(json!({
        "result": { "risk_score": risk_score },
    }))
}
