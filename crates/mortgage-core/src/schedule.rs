//! Payment schedule materialization.
//!
//! Expands a monthly payment into one installment record per month of
//! term. Schedules are anchored to the generation date, not to an
//! origination date, and are append-only: nothing here reads, matches
//! or removes existing installments.

use chrono::{Local, Months, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::error::MortgageError;
use crate::types::{Money, PaymentInstallment, TransitionEvent};
use crate::MortgageResult;

/// Materialize a schedule for an approved transition, anchored to
/// today's wall-clock date.
pub fn generate_schedule(
    event: &TransitionEvent,
    monthly_payment: Money,
) -> MortgageResult<Vec<PaymentInstallment>> {
    generate_schedule_from(event, monthly_payment, Local::now().date_naive())
}

/// Materialize a schedule anchored to an explicit start date.
///
/// Requires an applicant reference, mortgage number, display name and
/// term on the event (directly or via its pre-image); any absence fails
/// with `MissingData` before a single installment exists.
pub fn generate_schedule_from(
    event: &TransitionEvent,
    monthly_payment: Money,
    start_date: NaiveDate,
) -> MortgageResult<Vec<PaymentInstallment>> {
    let applicant_id = event.applicant_id()?;
    let mortgage_number = event.mortgage_number()?;
    let display_name = event.display_name()?;
    let term_months = event.term_months()?;

    let name = format!("{display_name} - {mortgage_number}");
    debug!(%name, term_months, "generating payment schedule");

    build_installments(
        &name,
        event.id(),
        applicant_id,
        monthly_payment,
        term_months,
        start_date,
    )
}

/// Build the installment records themselves: one per month, due dates
/// `start_date + i` months for `i` in `[0, term)`.
pub fn build_installments(
    name: &str,
    mortgage_id: Uuid,
    applicant_id: Uuid,
    amount: Money,
    term_months: u32,
    start_date: NaiveDate,
) -> MortgageResult<Vec<PaymentInstallment>> {
    let mut installments = Vec::with_capacity(term_months as usize);

    for i in 0..term_months {
        let due_date = start_date
            .checked_add_months(Months::new(i))
            .ok_or_else(|| MortgageError::InvalidInput {
                field: "term_months".into(),
                reason: format!("due date overflows the calendar at month {i}"),
            })?;

        installments.push(PaymentInstallment {
            name: name.to_string(),
            mortgage_id,
            applicant_id,
            amount,
            due_date,
        });
    }

    Ok(installments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MortgageRecord;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn approved_event() -> TransitionEvent {
        let mut pre_image = MortgageRecord::default();
        pre_image.display_name = Some("Smith Family Home".into());
        pre_image.mortgage_number = Some("MG-1042".into());
        pre_image.term_months = Some(12);
        pre_image.applicant_id = Some(Uuid::new_v4());

        TransitionEvent {
            target: MortgageRecord::default(),
            pre_image,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn produces_exactly_term_installments() {
        let event = approved_event();
        let schedule =
            generate_schedule_from(&event, dec!(1500), date(2024, 3, 15)).unwrap();
        assert_eq!(schedule.len(), 12);
    }

    #[test]
    fn first_due_date_is_start_date_and_gaps_are_monthly() {
        let event = approved_event();
        let schedule =
            generate_schedule_from(&event, dec!(1500), date(2024, 3, 15)).unwrap();

        assert_eq!(schedule[0].due_date, date(2024, 3, 15));
        assert_eq!(schedule[1].due_date, date(2024, 4, 15));
        assert_eq!(schedule[11].due_date, date(2025, 2, 15));
    }

    #[test]
    fn month_end_dates_clamp_instead_of_overflowing() {
        let event = approved_event();
        let schedule =
            generate_schedule_from(&event, dec!(1500), date(2024, 1, 31)).unwrap();

        // January 31 + 1 month lands on February 29 in a leap year.
        assert_eq!(schedule[1].due_date, date(2024, 2, 29));
        assert_eq!(schedule[2].due_date, date(2024, 3, 31));
    }

    #[test]
    fn installments_carry_the_display_name_and_number() {
        let event = approved_event();
        let schedule =
            generate_schedule_from(&event, dec!(1500), date(2024, 3, 15)).unwrap();

        for inst in &schedule {
            assert_eq!(inst.name, "Smith Family Home - MG-1042");
            assert_eq!(inst.amount, dec!(1500));
            assert_eq!(inst.mortgage_id, event.id());
        }
    }

    #[test]
    fn missing_naming_fields_abort_before_any_installment() {
        let mut event = approved_event();
        event.pre_image.mortgage_number = None;

        let err = generate_schedule_from(&event, dec!(1500), date(2024, 3, 15)).unwrap_err();
        assert!(matches!(err, MortgageError::MissingData(_)));
        assert!(err.to_string().contains("mortgage_number"));
    }

    #[test]
    fn missing_applicant_reference_aborts() {
        let mut event = approved_event();
        event.pre_image.applicant_id = None;

        let err = generate_schedule_from(&event, dec!(1500), date(2024, 3, 15)).unwrap_err();
        assert!(matches!(err, MortgageError::MissingData(_)));
    }
}
