//! Record-store seam between the pipeline and the host's persistence.
//!
//! Each mutation is an independent write; the pipeline makes no
//! atomicity assumption across calls. The one deliberate pairing is
//! [`RecordStore::set_rates`], which persists the resolved base rate
//! and the derived APR together so they always come from the same
//! computation snapshot.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::MortgageError;
use crate::types::{Applicant, Money, MortgageRecord, PaymentInstallment, Rate};
use crate::MortgageResult;

/// Persistence operations the pipeline needs from its host.
pub trait RecordStore {
    fn applicant(&self, id: Uuid) -> MortgageResult<Applicant>;

    /// Stamp a freshly created mortgage with its base rate.
    fn set_base_rate(&mut self, mortgage_id: Uuid, base_rate: i64) -> MortgageResult<()>;

    /// Persist the resolved base rate and derived APR as one write.
    fn set_rates(&mut self, mortgage_id: Uuid, base_rate: i64, final_apr: Rate)
        -> MortgageResult<()>;

    fn set_monthly_payment(&mut self, mortgage_id: Uuid, payment: Money) -> MortgageResult<()>;

    fn set_risk_score(&mut self, applicant_id: Uuid, score: i32) -> MortgageResult<()>;

    fn create_installment(&mut self, installment: PaymentInstallment) -> MortgageResult<()>;
}

/// In-memory store used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub mortgages: HashMap<Uuid, MortgageRecord>,
    pub applicants: HashMap<Uuid, Applicant>,
    pub installments: Vec<PaymentInstallment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_mortgage(&mut self, mortgage: MortgageRecord) {
        self.mortgages.insert(mortgage.id, mortgage);
    }

    pub fn insert_applicant(&mut self, applicant: Applicant) {
        self.applicants.insert(applicant.id, applicant);
    }

    fn mortgage_mut(&mut self, id: Uuid) -> MortgageResult<&mut MortgageRecord> {
        self.mortgages
            .get_mut(&id)
            .ok_or_else(|| MortgageError::MissingData(format!("mortgage {id} not found")))
    }
}

impl RecordStore for MemoryStore {
    fn applicant(&self, id: Uuid) -> MortgageResult<Applicant> {
        self.applicants
            .get(&id)
            .cloned()
            .ok_or_else(|| MortgageError::MissingData(format!("applicant {id} not found")))
    }

    fn set_base_rate(&mut self, mortgage_id: Uuid, base_rate: i64) -> MortgageResult<()> {
        let mortgage = self.mortgage_mut(mortgage_id)?;
        mortgage.base_rate = Some(base_rate);
        Ok(())
    }

    fn set_rates(
        &mut self,
        mortgage_id: Uuid,
        base_rate: i64,
        final_apr: Rate,
    ) -> MortgageResult<()> {
        let mortgage = self.mortgage_mut(mortgage_id)?;
        mortgage.base_rate = Some(base_rate);
        mortgage.final_apr = Some(final_apr);
        Ok(())
    }

    fn set_monthly_payment(&mut self, mortgage_id: Uuid, payment: Money) -> MortgageResult<()> {
        let mortgage = self.mortgage_mut(mortgage_id)?;
        mortgage.monthly_payment = Some(payment);
        Ok(())
    }

    fn set_risk_score(&mut self, applicant_id: Uuid, score: i32) -> MortgageResult<()> {
        let applicant = self.applicants.get_mut(&applicant_id).ok_or_else(|| {
            MortgageError::MissingData(format!("applicant {applicant_id} not found"))
        })?;
        applicant.risk_score = Some(score);
        Ok(())
    }

    fn create_installment(&mut self, installment: PaymentInstallment) -> MortgageResult<()> {
        self.installments.push(installment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn set_rates_writes_base_rate_and_apr_together() {
        let mut store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.insert_mortgage(MortgageRecord {
            id,
            ..MortgageRecord::default()
        });

        store.set_rates(id, 5, dec!(6.07)).unwrap();

        let mortgage = &store.mortgages[&id];
        assert_eq!(mortgage.base_rate, Some(5));
        assert_eq!(mortgage.final_apr, Some(dec!(6.07)));
        assert_eq!(mortgage.monthly_payment, None);
    }

    #[test]
    fn writes_against_unknown_records_are_missing_data() {
        let mut store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.set_rates(id, 5, dec!(6.07)).unwrap_err(),
            MortgageError::MissingData(_)
        ));
        assert!(matches!(
            store.set_monthly_payment(id, dec!(1500)).unwrap_err(),
            MortgageError::MissingData(_)
        ));
        assert!(matches!(
            store.set_risk_score(id, 10).unwrap_err(),
            MortgageError::MissingData(_)
        ));
    }
}
