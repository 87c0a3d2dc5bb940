//! State sales-tax reference table.
//!
//! A single immutable copy loaded on first use and shared by every
//! caller. Rates are in percentage points, the same units the APR
//! derivation adds them in.

use std::collections::HashMap;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Rate, Region};

/// Sales tax applied when no state-level rate can be resolved on the
/// pipeline's default path.
pub const DEFAULT_SALES_TAX: Decimal = dec!(0.05);

static STATE_SALES_TAX: OnceLock<HashMap<&'static str, Decimal>> = OnceLock::new();

fn state_table() -> &'static HashMap<&'static str, Decimal> {
    STATE_SALES_TAX.get_or_init(|| {
        HashMap::from([
            ("Alabama", dec!(4.0)),
            ("Alaska", dec!(0.0)),
            ("Arizona", dec!(5.6)),
            ("Arkansas", dec!(6.5)),
            ("California", dec!(7.5)),
            ("Colorado", dec!(2.9)),
            ("Connecticut", dec!(6.35)),
            ("Delaware", dec!(0.0)),
            ("District Of Columbia", dec!(5.75)),
            ("Florida", dec!(6.0)),
            ("Georgia", dec!(4.0)),
            ("Hawaii", dec!(4.0)),
            ("Idaho", dec!(6.0)),
            ("Illinois", dec!(6.25)),
            ("Indiana", dec!(7.0)),
            ("Iowa", dec!(6.0)),
            ("Kansas", dec!(6.15)),
            ("Kentucky", dec!(6.0)),
            ("Louisiana", dec!(4.0)),
            ("Maine", dec!(5.5)),
            ("Maryland", dec!(6.0)),
            ("Massachusetts", dec!(6.25)),
            ("Michigan", dec!(6.0)),
            ("Minnesota", dec!(6.875)),
            ("Mississippi", dec!(7.0)),
            ("Missouri", dec!(4.225)),
            ("Montana", dec!(0.0)),
            ("Nebraska", dec!(5.5)),
            ("Nevada", dec!(6.85)),
            ("New Hampshire", dec!(0.0)),
            ("New Jersey", dec!(7.0)),
            ("New Mexico", dec!(5.125)),
            ("New York", dec!(4.0)),
            ("North Carolina", dec!(4.75)),
            ("North Dakota", dec!(5.0)),
            ("Ohio", dec!(5.75)),
            ("Oklahoma", dec!(4.5)),
            ("Oregon", dec!(0.0)),
            ("Pennsylvania", dec!(6.0)),
            ("Rhode Island", dec!(7.0)),
            ("South Carolina", dec!(6.0)),
            ("South Dakota", dec!(4.0)),
            ("Tennessee", dec!(7.0)),
            ("Texas", dec!(6.25)),
            ("Utah", dec!(5.95)),
            ("Vermont", dec!(6.0)),
            ("Virginia", dec!(5.3)),
            ("Washington", dec!(6.5)),
            ("West Virginia", dec!(6.0)),
            ("Wisconsin", dec!(5.0)),
            ("Wyoming", dec!(4.0)),
        ])
    })
}

/// Plain table lookup. An unknown state resolves to zero; this never
/// errors.
pub fn sales_tax(state: &str) -> Rate {
    state_table().get(state).copied().unwrap_or(Decimal::ZERO)
}

/// Sales tax as the approval pipeline resolves it: [`DEFAULT_SALES_TAX`]
/// unless the mortgage is domestic and names a state, in which case the
/// table is consulted. Note an unlisted domestic state still resolves
/// to zero via [`sales_tax`]; the two defaults are intentionally
/// distinct entry points.
pub fn resolve_sales_tax(region: Region, state: Option<&str>) -> Rate {
    match (region, state) {
        (Region::Domestic, Some(s)) if !s.is_empty() => sales_tax(s),
        _ => DEFAULT_SALES_TAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_states_resolve_from_the_table() {
        assert_eq!(sales_tax("California"), dec!(7.5));
        assert_eq!(sales_tax("Minnesota"), dec!(6.875));
        assert_eq!(sales_tax("Delaware"), dec!(0.0));
    }

    #[test]
    fn unknown_state_resolves_to_zero_on_plain_lookup() {
        assert_eq!(sales_tax("Atlantis"), Decimal::ZERO);
        assert_eq!(sales_tax(""), Decimal::ZERO);
    }

    #[test]
    fn table_has_fifty_states_plus_dc() {
        assert_eq!(state_table().len(), 51);
    }

    #[test]
    fn pipeline_default_applies_outside_the_domestic_region() {
        assert_eq!(
            resolve_sales_tax(Region::Foreign, Some("California")),
            DEFAULT_SALES_TAX
        );
    }

    #[test]
    fn pipeline_default_applies_when_state_is_absent_or_empty() {
        assert_eq!(resolve_sales_tax(Region::Domestic, None), DEFAULT_SALES_TAX);
        assert_eq!(
            resolve_sales_tax(Region::Domestic, Some("")),
            DEFAULT_SALES_TAX
        );
    }

    #[test]
    fn unknown_domestic_state_falls_through_to_the_table_zero() {
        assert_eq!(
            resolve_sales_tax(Region::Domestic, Some("Atlantis")),
            Decimal::ZERO
        );
    }

    #[test]
    fn domestic_state_uses_the_table_rate() {
        assert_eq!(
            resolve_sales_tax(Region::Domestic, Some("Texas")),
            dec!(6.25)
        );
    }
}
