//! Fixed-rate amortization.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Level monthly payment for a fixed-rate loan.
///
/// `apr_percent` is the annual rate in percentage points (6 = 6%);
/// `term_months` is the full term in months. With a zero rate the
/// payment degenerates to `principal / term_months` exactly.
pub fn monthly_payment(
    principal: Money,
    apr_percent: Rate,
    term_months: u32,
) -> MortgageResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(invalid("principal", "must be greater than zero"));
    }
    if term_months == 0 {
        return Err(invalid("term_months", "must be greater than zero"));
    }
    if apr_percent < Decimal::ZERO {
        return Err(invalid("apr_percent", "must not be negative"));
    }

    let n = Decimal::from(term_months);
    let r = apr_percent / dec!(12) / dec!(100);

    if r.is_zero() {
        return Ok(principal / n);
    }

    // payment = principal * r / (1 - (1 + r)^-n)
    let compound = (Decimal::ONE + r)
        .checked_powi(i64::from(term_months))
        .ok_or_else(|| invalid("term_months", "amortization factor overflowed"))?;
    let denominator = Decimal::ONE - Decimal::ONE / compound;
    if denominator.is_zero() {
        return Err(invalid("apr_percent", "degenerate amortization denominator"));
    }

    Ok(principal * r / denominator)
}

fn invalid(field: &str, reason: &str) -> MortgageError {
    MortgageError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn thirty_year_benchmark() {
        // 300k at 6% over 360 months is the classic 1798.65 check.
        let payment = monthly_payment(dec!(300000), dec!(6), 360).unwrap();
        assert!(
            (payment - dec!(1798.65)).abs() < dec!(0.01),
            "payment = {payment}"
        );
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let payment = monthly_payment(dec!(120000), Decimal::ZERO, 120).unwrap();
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn short_term_high_rate() {
        // 12 months at 12%: r = 0.01, well-known factor ~0.0888487887.
        let payment = monthly_payment(dec!(10000), dec!(12), 12).unwrap();
        assert!(
            (payment - dec!(888.49)).abs() < dec!(0.01),
            "payment = {payment}"
        );
    }

    #[test]
    fn non_positive_principal_is_rejected() {
        for bad in [Decimal::ZERO, dec!(-500)] {
            let err = monthly_payment(bad, dec!(6), 360).unwrap_err();
            assert!(matches!(err, MortgageError::InvalidInput { .. }));
        }
    }

    #[test]
    fn zero_term_is_rejected() {
        let err = monthly_payment(dec!(300000), dec!(6), 0).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { .. }));
    }

    #[test]
    fn negative_apr_is_rejected() {
        let err = monthly_payment(dec!(300000), dec!(-1), 360).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { .. }));
    }
}
