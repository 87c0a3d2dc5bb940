//! The approval pipeline.
//!
//! Ties the transition guard, base-rate resolution, APR derivation,
//! amortization and schedule generation together over the host's
//! record store. Each persistence step is a separate write: a failure
//! after the APR write leaves the record with an updated APR but no
//! payment or schedule. That gap is inherited behavior, not a
//! transactional guarantee.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::MortgageError;
use crate::rates::{resolve_base_rate, RateSource, RiskScoreProvider, FALLBACK_BASE_RATE};
use crate::store::RecordStore;
use crate::types::{
    with_metadata, ComputationOutput, Money, MortgageStatus, Rate, TransitionEvent,
};
use crate::{amortization, apr, risk, schedule, tax, MortgageResult};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Outcome of one triggering event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The transition was not Review -> Approved; nothing was written.
    Idle,
    /// The full approval computation ran to completion.
    Processed(ApprovalSummary),
}

/// What the approval run computed and persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalSummary {
    pub mortgage_id: Uuid,
    pub base_rate: i64,
    pub sales_tax: Rate,
    pub risk_score: i32,
    pub final_apr: Rate,
    pub monthly_payment: Money,
    pub installments_created: u32,
}

/// Outcome of a risk-refresh event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RiskRefreshOutcome {
    /// The transition did not enter Review; nothing was written.
    Idle,
    /// The applicant's score was refreshed from the provider.
    Updated { applicant_id: Uuid, risk_score: i32 },
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// True only for a Review -> Approved transition. Both images must
/// carry a status; absence is an error, not a skip.
pub fn crosses_approval_boundary(event: &TransitionEvent) -> MortgageResult<bool> {
    let previous = event
        .pre_image
        .status
        .ok_or_else(|| MortgageError::MissingData("status is missing from the pre-image".into()))?;
    let current = event.target.status.ok_or_else(|| {
        MortgageError::MissingData("status is missing from the incoming change".into())
    })?;

    Ok(previous == MortgageStatus::Review && current == MortgageStatus::Approved)
}

// ---------------------------------------------------------------------------
// Approval pipeline
// ---------------------------------------------------------------------------

/// Run the full approval computation for one status-changing event.
///
/// Skips cleanly (zero writes) unless the event crosses the
/// Review -> Approved boundary. Otherwise: resolve the base rate under
/// the fallback policy, derive the final APR and persist it with the
/// base rate, derive the monthly payment and persist it, then create
/// one installment per month of term.
pub fn process_transition<S: RecordStore>(
    event: &TransitionEvent,
    rates: &dyn RateSource,
    store: &mut S,
) -> MortgageResult<ComputationOutput<PipelineOutcome>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    info!(mortgage_id = %event.id(), "processing status transition");

    if !crosses_approval_boundary(event)? {
        debug!("transition does not cross Review -> Approved; exiting");
        return Ok(envelope(PipelineOutcome::Idle, warnings, start));
    }

    // Step 1: base rate, never blocked by the rates service.
    let (base_rate, rate_warning) = resolve_base_rate(rates);
    warnings.extend(rate_warning);

    // Step 2: final APR from the pre-transition snapshot, persisted
    // together with the base rate it was derived from.
    let region = event
        .pre_image
        .region
        .ok_or_else(|| MortgageError::MissingData("region is missing from the pre-image".into()))?;
    let sales_tax = tax::resolve_sales_tax(region, event.pre_image.state.as_deref());

    let applicant_id = event.pre_image.applicant_id.ok_or_else(|| {
        MortgageError::MissingData("applicant reference is missing from the pre-image".into())
    })?;
    let risk_score = risk::risk_score(store, applicant_id)?;

    let final_apr = apr::final_apr(base_rate, apr::MARGIN, sales_tax, Decimal::from(risk_score))?;
    store.set_rates(event.id(), base_rate, final_apr)?;
    info!(%final_apr, base_rate, "final APR persisted");

    // Step 3: monthly payment from the coalesced principal and term.
    let principal = event.principal()?;
    let term_months = event.term_months()?;
    let monthly_payment = amortization::monthly_payment(principal, final_apr, term_months)?;
    store.set_monthly_payment(event.id(), monthly_payment)?;
    info!(%monthly_payment, "monthly payment persisted");

    // Step 4: installment schedule, anchored to today, append-only.
    let installments = schedule::generate_schedule(event, monthly_payment)?;
    let installments_created = installments.len() as u32;
    for installment in installments {
        store.create_installment(installment)?;
    }
    info!(installments_created, "payment schedule persisted");

    let summary = ApprovalSummary {
        mortgage_id: event.id(),
        base_rate,
        sales_tax,
        risk_score,
        final_apr,
        monthly_payment,
        installments_created,
    };
    Ok(envelope(
        PipelineOutcome::Processed(summary),
        warnings,
        start,
    ))
}

// ---------------------------------------------------------------------------
// Review entry: risk refresh
// ---------------------------------------------------------------------------

/// Refresh the applicant's risk score when a mortgage enters Review.
///
/// Unlike the base-rate fetch, a scoring failure is fatal: the error
/// propagates and nothing is written.
pub fn refresh_risk_score<S: RecordStore>(
    event: &TransitionEvent,
    provider: &dyn RiskScoreProvider,
    store: &mut S,
) -> MortgageResult<ComputationOutput<RiskRefreshOutcome>> {
    let start = Instant::now();

    let current = event.target.status.ok_or_else(|| {
        MortgageError::MissingData("status is missing from the incoming change".into())
    })?;
    let entering_review = current == MortgageStatus::Review
        && event.pre_image.status != Some(MortgageStatus::Review);

    if !entering_review {
        debug!("transition does not enter Review; exiting");
        return Ok(envelope(RiskRefreshOutcome::Idle, Vec::new(), start));
    }

    let applicant_id = event.pre_image.applicant_id.ok_or_else(|| {
        MortgageError::MissingData("applicant reference is missing from the pre-image".into())
    })?;
    let applicant = store.applicant(applicant_id)?;
    let ssn = applicant.ssn.as_deref().ok_or_else(|| {
        MortgageError::MissingData(format!(
            "applicant {applicant_id} has no social security number"
        ))
    })?;

    let risk_score = provider.fetch_risk_score(ssn)?;
    store.set_risk_score(applicant_id, risk_score)?;
    info!(risk_score, %applicant_id, "risk score refreshed");

    Ok(envelope(
        RiskRefreshOutcome::Updated {
            applicant_id,
            risk_score,
        },
        Vec::new(),
        start,
    ))
}

// ---------------------------------------------------------------------------
// Create: base-rate stamp
// ---------------------------------------------------------------------------

/// Stamp a freshly created mortgage with the current base rate, under
/// the same fallback policy as the approval path.
pub fn assign_base_rate<S: RecordStore>(
    mortgage_id: Uuid,
    rates: &dyn RateSource,
    store: &mut S,
) -> MortgageResult<i64> {
    let (base_rate, _warning) = resolve_base_rate(rates);
    store.set_base_rate(mortgage_id, base_rate)?;
    info!(base_rate, %mortgage_id, "base rate assigned on create");
    Ok(base_rate)
}

fn envelope<T: Serialize>(
    result: T,
    warnings: Vec<String>,
    start: Instant,
) -> ComputationOutput<T> {
    with_metadata(
        "Mortgage Approval Pipeline",
        &json!({
            "margin": apr::MARGIN,
            "default_sales_tax": tax::DEFAULT_SALES_TAX,
            "fallback_base_rate": FALLBACK_BASE_RATE,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
