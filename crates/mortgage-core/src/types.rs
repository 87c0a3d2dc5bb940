use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MortgageError;
use crate::MortgageResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed in percentage points (5.6 = 5.6%), matching the
/// units the tax table and APR derivation work in.
pub type Rate = Decimal;

/// Lending region, for sales-tax resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Domestic,
    Foreign,
}

/// Business status of a mortgage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageStatus {
    New,
    Review,
    Approved,
    Rejected,
}

/// A mortgage record as delivered by the host.
///
/// Every business field is optional: status-change events carry only
/// the fields present on the triggering image, and typed accessors on
/// [`TransitionEvent`] fail with `MissingData` at the boundary instead
/// of deep inside a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MortgageRecord {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub mortgage_number: Option<String>,
    pub status: Option<MortgageStatus>,
    pub principal: Option<Money>,
    pub term_months: Option<u32>,
    pub region: Option<Region>,
    pub state: Option<String>,
    pub applicant_id: Option<Uuid>,
    pub base_rate: Option<i64>,
    pub final_apr: Option<Rate>,
    pub monthly_payment: Option<Money>,
}

/// Applicant record. Read-only to the pipeline except for the
/// risk-refresh path, which writes the score back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Applicant {
    pub id: Uuid,
    pub risk_score: Option<i32>,
    pub ssn: Option<String>,
}

/// One scheduled future monthly payment, created per month of term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstallment {
    pub name: String,
    pub mortgage_id: Uuid,
    pub applicant_id: Uuid,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// A status-changing event: the incoming changed fields (`target`)
/// plus the record image from before the change (`pre_image`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub target: MortgageRecord,
    pub pre_image: MortgageRecord,
}

impl TransitionEvent {
    pub fn id(&self) -> Uuid {
        self.target.id
    }

    /// Principal amount, read from the change first, then the pre-image.
    pub fn principal(&self) -> MortgageResult<Money> {
        self.target
            .principal
            .or(self.pre_image.principal)
            .ok_or_else(|| missing("principal"))
    }

    /// Term in months, read from the change first, then the pre-image.
    pub fn term_months(&self) -> MortgageResult<u32> {
        self.target
            .term_months
            .or(self.pre_image.term_months)
            .ok_or_else(|| missing("term_months"))
    }

    pub fn applicant_id(&self) -> MortgageResult<Uuid> {
        self.target
            .applicant_id
            .or(self.pre_image.applicant_id)
            .ok_or_else(|| missing("applicant_id"))
    }

    pub fn mortgage_number(&self) -> MortgageResult<&str> {
        self.target
            .mortgage_number
            .as_deref()
            .or(self.pre_image.mortgage_number.as_deref())
            .ok_or_else(|| missing("mortgage_number"))
    }

    pub fn display_name(&self) -> MortgageResult<&str> {
        self.target
            .display_name
            .as_deref()
            .or(self.pre_image.display_name.as_deref())
            .ok_or_else(|| missing("display_name"))
    }
}

fn missing(field: &str) -> MortgageError {
    MortgageError::MissingData(format!(
        "{field} is missing from both the change and the pre-image"
    ))
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn record_with(principal: Option<Money>, term: Option<u32>) -> MortgageRecord {
        MortgageRecord {
            principal,
            term_months: term,
            ..MortgageRecord::default()
        }
    }

    #[test]
    fn accessor_prefers_the_incoming_change() {
        let event = TransitionEvent {
            target: record_with(Some(dec!(250000)), None),
            pre_image: record_with(Some(dec!(100000)), Some(360)),
        };

        assert_eq!(event.principal().unwrap(), dec!(250000));
        assert_eq!(event.term_months().unwrap(), 360);
    }

    #[test]
    fn accessor_fails_when_absent_from_both_images() {
        let event = TransitionEvent {
            target: record_with(None, None),
            pre_image: record_with(None, None),
        };

        let err = event.principal().unwrap_err();
        assert!(matches!(err, MortgageError::MissingData(_)));
        assert!(err.to_string().contains("principal"));
    }

    #[test]
    fn name_accessors_coalesce() {
        let mut pre_image = MortgageRecord::default();
        pre_image.display_name = Some("Smith Family Home".into());
        pre_image.mortgage_number = Some("MG-1042".into());

        let event = TransitionEvent {
            target: MortgageRecord::default(),
            pre_image,
        };

        assert_eq!(event.display_name().unwrap(), "Smith Family Home");
        assert_eq!(event.mortgage_number().unwrap(), "MG-1042");
    }
}
