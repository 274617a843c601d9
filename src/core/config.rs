//! Settlement configuration
//!
//! Tolerance and currency unit are explicit values carried by every run,
//! never hidden literals or process-wide state.

use rust_decimal::Decimal;

/// Largest scale a `Decimal` can represent
const MAX_SCALE: u32 = 28;

/// Order in which debtors and creditors are matched by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartyOrder {
    /// Roster order
    #[default]
    Roster,

    /// Largest magnitude first; ties keep roster order
    LargestFirst,
}

/// Configuration shared by the balance engine and the settlement planner
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementConfig {
    /// Largest imbalance between total debt and total credit that is absorbed
    /// instead of reported
    pub tolerance: Decimal,

    /// Decimal places of the smallest currency unit (2 → 0.01)
    pub scale: u32,

    /// Matching order used by the planner
    pub order: PartyOrder,

    /// Reject entries referencing members outside the roster instead of
    /// ignoring them
    pub strict_membership: bool,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            scale: 2,
            order: PartyOrder::Roster,
            strict_membership: false,
        }
    }
}

impl SettlementConfig {
    /// Create a new SettlementConfig, falling back to defaults for invalid values
    pub fn new(tolerance: Decimal, scale: u32, order: PartyOrder, strict_membership: bool) -> Self {
        let default = Self::default();

        let tolerance = if tolerance.is_sign_negative() {
            tracing::warn!(
                %tolerance,
                default = %default.tolerance,
                "Invalid tolerance, using default"
            );
            default.tolerance
        } else {
            tolerance
        };

        let scale = if scale > MAX_SCALE {
            tracing::warn!(scale, default = default.scale, "Invalid scale, using default");
            default.scale
        } else {
            scale
        };

        Self {
            tolerance,
            scale,
            order,
            strict_membership,
        }
    }

    /// The smallest currency unit, `10^-scale`
    pub fn unit(&self) -> Decimal {
        Decimal::new(1, self.scale)
    }

    /// Whether `value` is within tolerance of zero
    pub fn is_negligible(&self, value: Decimal) -> bool {
        value.abs() <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert_eq!(config.tolerance, Decimal::new(1, 2));
        assert_eq!(config.scale, 2);
        assert_eq!(config.order, PartyOrder::Roster);
        assert!(!config.strict_membership);
        assert_eq!(config.unit(), Decimal::new(1, 2));
    }

    #[rstest]
    #[case::negative_tolerance(Decimal::new(-1, 2), 2, Decimal::new(1, 2), 2)]
    #[case::scale_too_large(Decimal::new(5, 3), 29, Decimal::new(5, 3), 2)]
    #[case::valid(Decimal::ZERO, 0, Decimal::ZERO, 0)]
    fn test_new_falls_back_to_defaults(
        #[case] tolerance: Decimal,
        #[case] scale: u32,
        #[case] expected_tolerance: Decimal,
        #[case] expected_scale: u32,
    ) {
        let config = SettlementConfig::new(tolerance, scale, PartyOrder::LargestFirst, true);
        assert_eq!(config.tolerance, expected_tolerance);
        assert_eq!(config.scale, expected_scale);
        assert_eq!(config.order, PartyOrder::LargestFirst);
        assert!(config.strict_membership);
    }

    #[rstest]
    #[case(Decimal::new(1, 2), true)]
    #[case(Decimal::new(-1, 2), true)]
    #[case(Decimal::new(11, 3), false)]
    #[case(Decimal::ZERO, true)]
    fn test_is_negligible(#[case] value: Decimal, #[case] expected: bool) {
        assert_eq!(SettlementConfig::default().is_negligible(value), expected);
    }
}
