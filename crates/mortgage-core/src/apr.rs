//! Final APR derivation.
//!
//! An additive risk premium, not a regulated underwriting formula:
//! `final_apr = base_rate + margin + ln(risk_score) + sales_tax`, with
//! every term in percentage points and the log natural. Reproduced
//! exactly for compatibility with the records this pipeline replaces.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::Rate;
use crate::MortgageResult;

/// Fixed margin added to every mortgage, in percentage points.
pub const MARGIN: Decimal = dec!(0.02);

/// Final annual percentage rate.
///
/// `risk_score` must be strictly positive; the natural log makes that a
/// hard precondition, not a clamp.
pub fn final_apr(
    base_rate: i64,
    margin: Rate,
    sales_tax: Rate,
    risk_score: Decimal,
) -> MortgageResult<Rate> {
    let risk_premium = risk_score.checked_ln().ok_or_else(|| {
        MortgageError::InvalidInput {
            field: "risk_score".into(),
            reason: "natural log requires a positive risk score".into(),
        }
    })?;

    Ok(Decimal::from(base_rate) + margin + risk_premium + sales_tax)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apr_for_risk_score_e_adds_one_point() {
        // ln(e) = 1, so 5 + 0.02 + 1 + 0.05 = 6.07.
        let apr = final_apr(5, MARGIN, dec!(0.05), dec!(2.718281828459045)).unwrap();
        assert!((apr - dec!(6.07)).abs() < dec!(0.0001), "apr = {apr}");
    }

    #[test]
    fn risk_score_one_contributes_no_premium() {
        let apr = final_apr(5, MARGIN, dec!(0.05), Decimal::ONE).unwrap();
        assert!((apr - dec!(5.07)).abs() < dec!(0.0000001), "apr = {apr}");
    }

    #[test]
    fn state_tax_lands_in_the_sum_unscaled() {
        // California at 7.5 percentage points.
        let apr = final_apr(5, MARGIN, dec!(7.5), Decimal::ONE).unwrap();
        assert!((apr - dec!(12.52)).abs() < dec!(0.0000001), "apr = {apr}");
    }

    #[test]
    fn non_positive_risk_score_is_rejected() {
        for bad in [Decimal::ZERO, dec!(-3)] {
            let err = final_apr(5, MARGIN, dec!(0.05), bad).unwrap_err();
            assert!(matches!(err, MortgageError::InvalidInput { .. }));
        }
    }
}
