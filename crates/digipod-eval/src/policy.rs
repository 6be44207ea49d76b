//! Combine policies
//!
//! A policy names the combining function a combinator node applies per cut
//! and the number of operands it accepts.

use crate::merge::Slot;
use crate::operators::{counting, logical};
use digipod_diagnostics::{DGP0003, DGP0101, DGP0104, DigipodError, Result};
use digipod_types::{IntervalWithCount, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operand count a policy accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    /// Check an operand count against this arity
    pub fn check(&self, count: usize, policy: &str) -> Result<()> {
        if count == 0 {
            return Err(DigipodError::wiring(
                DGP0104,
                format!("{} has no operands", policy),
            ));
        }

        let ok = match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        };
        if ok {
            Ok(())
        } else {
            Err(DigipodError::wiring(
                DGP0101,
                format!("{} expects {} operands, got {}", policy, self, count),
            ))
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Combining policy of a combinator node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "policy")]
pub enum CombinePolicy {
    /// Screening + optimization, `[primary, secondary]`
    #[serde(rename = "combine-4-1")]
    WeightedPair,
    /// Highest-priority type, max count within it
    MaxCountOr,
    /// Mean of `arity` component counts
    #[serde(rename = "combine-4-3")]
    EqualWeightMean { arity: usize },
    And,
    Or,
    Not,
    /// `[population, intervention]`
    PopulationIntervention,
    /// 1 where the single operand is POSITIVE, 0 elsewhere
    Indicator,
}

impl CombinePolicy {
    /// Number of bundle components in the multicomponent recommendation
    pub const BUNDLE_COMPONENTS: usize = 4;

    /// Names accepted by [`FromStr`]
    pub const NAMES: [&'static str; 8] = [
        "combine-4-1",
        "combine-4-3",
        "max-count-or",
        "and",
        "or",
        "not",
        "population-intervention",
        "indicator",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CombinePolicy::WeightedPair => "combine-4-1",
            CombinePolicy::MaxCountOr => "max-count-or",
            CombinePolicy::EqualWeightMean { .. } => "combine-4-3",
            CombinePolicy::And => "and",
            CombinePolicy::Or => "or",
            CombinePolicy::Not => "not",
            CombinePolicy::PopulationIntervention => "population-intervention",
            CombinePolicy::Indicator => "indicator",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            CombinePolicy::WeightedPair | CombinePolicy::PopulationIntervention => Arity::Exact(2),
            CombinePolicy::EqualWeightMean { arity } => Arity::Exact(*arity),
            CombinePolicy::Not | CombinePolicy::Indicator => Arity::Exact(1),
            CombinePolicy::MaxCountOr | CombinePolicy::And | CombinePolicy::Or => {
                Arity::AtLeast(1)
            }
        }
    }

    /// Combine the slots active over `[start, end)`
    pub fn apply(&self, start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
        match self {
            CombinePolicy::WeightedPair => counting::combine_weighted_pair(start, end, slots),
            CombinePolicy::MaxCountOr => counting::combine_max_count_or(start, end, slots),
            CombinePolicy::EqualWeightMean { .. } => {
                counting::combine_equal_weight_mean(start, end, slots)
            }
            CombinePolicy::And => logical::combine_and(start, end, slots),
            CombinePolicy::Or => logical::combine_or(start, end, slots),
            CombinePolicy::Not => logical::combine_not(start, end, slots),
            CombinePolicy::PopulationIntervention => {
                logical::combine_population_intervention(start, end, slots)
            }
            CombinePolicy::Indicator => counting::combine_indicator(start, end, slots),
        }
    }
}

impl fmt::Display for CombinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CombinePolicy {
    type Err = DigipodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combine-4-1" | "weighted-pair" => Ok(CombinePolicy::WeightedPair),
            "combine-4-3" | "equal-weight-mean" => Ok(CombinePolicy::EqualWeightMean {
                arity: Self::BUNDLE_COMPONENTS,
            }),
            "max-count-or" => Ok(CombinePolicy::MaxCountOr),
            "and" => Ok(CombinePolicy::And),
            "or" => Ok(CombinePolicy::Or),
            "not" => Ok(CombinePolicy::Not),
            "population-intervention" => Ok(CombinePolicy::PopulationIntervention),
            "indicator" => Ok(CombinePolicy::Indicator),
            other => Err(DigipodError::input(
                DGP0003,
                format!("unknown combine policy '{}'", other),
            )
            .with_context(format!("expected one of: {}", Self::NAMES.join(", ")))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("combine-4-1", CombinePolicy::WeightedPair)]
    #[case("COMBINE-4-3", CombinePolicy::EqualWeightMean { arity: 4 })]
    #[case(" max-count-or ", CombinePolicy::MaxCountOr)]
    #[case("population-intervention", CombinePolicy::PopulationIntervention)]
    fn test_from_str(#[case] input: &str, #[case] expected: CombinePolicy) {
        assert_eq!(input.parse::<CombinePolicy>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "xor".parse::<CombinePolicy>().unwrap_err();
        assert_eq!(err.code(), DGP0003);
    }

    #[test]
    fn test_names_round_trip() {
        for name in CombinePolicy::NAMES {
            assert_eq!(name.parse::<CombinePolicy>().unwrap().name(), name);
        }
    }

    #[rstest]
    #[case(CombinePolicy::WeightedPair, 2, true)]
    #[case(CombinePolicy::WeightedPair, 3, false)]
    #[case(CombinePolicy::EqualWeightMean { arity: 4 }, 4, true)]
    #[case(CombinePolicy::EqualWeightMean { arity: 4 }, 3, false)]
    #[case(CombinePolicy::Not, 1, true)]
    #[case(CombinePolicy::MaxCountOr, 5, true)]
    fn test_arity(#[case] policy: CombinePolicy, #[case] n: usize, #[case] ok: bool) {
        let result = policy.arity().check(n, policy.name());
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(err.code(), DGP0101);
        }
    }

    #[test]
    fn test_zero_operands() {
        let err = CombinePolicy::Or.arity().check(0, "or").unwrap_err();
        assert_eq!(err.code(), DGP0104);
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&CombinePolicy::EqualWeightMean { arity: 4 }).unwrap();
        assert_eq!(json, r#"{"policy":"combine-4-3","arity":4}"#);
        let back: CombinePolicy = serde_json::from_str(r#"{"policy":"max-count-or"}"#).unwrap();
        assert_eq!(back, CombinePolicy::MaxCountOr);
    }
}
