//! Applicant risk-score lookup.

use tracing::debug;
use uuid::Uuid;

use crate::error::MortgageError;
use crate::store::RecordStore;
use crate::MortgageResult;

/// Read the precomputed risk score for an applicant.
///
/// The score feeds a natural logarithm in the APR derivation, so a
/// non-positive value is rejected outright rather than clamped.
pub fn risk_score<S: RecordStore>(store: &S, applicant_id: Uuid) -> MortgageResult<i32> {
    let applicant = store.applicant(applicant_id)?;

    let score = applicant.risk_score.ok_or_else(|| {
        MortgageError::MissingData(format!("applicant {applicant_id} has no risk score"))
    })?;

    if score <= 0 {
        return Err(MortgageError::InvalidInput {
            field: "risk_score".into(),
            reason: "must be greater than zero for APR calculation".into(),
        });
    }

    debug!(score, %applicant_id, "risk score resolved");
    Ok(score)
}
