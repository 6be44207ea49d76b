//! Interval classification lattice
//!
//! Every interval produced by a criterion carries one of four classifications.
//! Combining two classifications is defined by two priority orders:
//!
//! | operator | priority (highest first)                       |
//! |----------|------------------------------------------------|
//! | `a & b`  | NEGATIVE, POSITIVE, NO_DATA, NOT_APPLICABLE    |
//! | `a \| b` | POSITIVE, NO_DATA, NEGATIVE, NOT_APPLICABLE    |
//!
//! The result of either operator is whichever operand ranks higher in the
//! corresponding order. NOT_APPLICABLE ranks last in both, so it is the
//! identity of `&` and of `|`.

use digipod_diagnostics::{DGP0001, DigipodError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

/// Classification of a sub-interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalType {
    /// The criterion held
    Positive,
    /// The criterion did not hold
    Negative,
    /// The criterion could not be evaluated for lack of data
    NoData,
    /// The criterion is out of scope for the subject
    NotApplicable,
}

const INTERSECTION_PRIORITY: [IntervalType; 4] = [
    IntervalType::Negative,
    IntervalType::Positive,
    IntervalType::NoData,
    IntervalType::NotApplicable,
];

const UNION_PRIORITY: [IntervalType; 4] = [
    IntervalType::Positive,
    IntervalType::NoData,
    IntervalType::Negative,
    IntervalType::NotApplicable,
];

fn rank(order: &[IntervalType; 4], t: IntervalType) -> usize {
    // every variant appears exactly once in both orders
    order.iter().position(|o| *o == t).unwrap_or(order.len())
}

impl IntervalType {
    /// All variants, in declaration order
    pub const ALL: [IntervalType; 4] = [
        IntervalType::Positive,
        IntervalType::Negative,
        IntervalType::NoData,
        IntervalType::NotApplicable,
    ];

    /// Priority order used by [`IntervalType::meet`], highest first
    pub const fn intersection_priority() -> &'static [IntervalType; 4] {
        &INTERSECTION_PRIORITY
    }

    /// Priority order used by [`IntervalType::join`], highest first
    pub const fn union_priority() -> &'static [IntervalType; 4] {
        &UNION_PRIORITY
    }

    /// Intersection (logical AND) of two classifications
    pub fn meet(self, other: IntervalType) -> IntervalType {
        if rank(&INTERSECTION_PRIORITY, self) <= rank(&INTERSECTION_PRIORITY, other) {
            self
        } else {
            other
        }
    }

    /// Union (logical OR) of two classifications
    pub fn join(self, other: IntervalType) -> IntervalType {
        if rank(&UNION_PRIORITY, self) <= rank(&UNION_PRIORITY, other) {
            self
        } else {
            other
        }
    }

    /// Logical negation; NO_DATA and NOT_APPLICABLE are fixed points
    pub fn invert(self) -> IntervalType {
        match self {
            IntervalType::Positive => IntervalType::Negative,
            IntervalType::Negative => IntervalType::Positive,
            other => other,
        }
    }

    /// Upper-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalType::Positive => "POSITIVE",
            IntervalType::Negative => "NEGATIVE",
            IntervalType::NoData => "NO_DATA",
            IntervalType::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

impl BitAnd for IntervalType {
    type Output = IntervalType;

    fn bitand(self, rhs: IntervalType) -> IntervalType {
        self.meet(rhs)
    }
}

impl BitOr for IntervalType {
    type Output = IntervalType;

    fn bitor(self, rhs: IntervalType) -> IntervalType {
        self.join(rhs)
    }
}

impl Not for IntervalType {
    type Output = IntervalType;

    fn not(self) -> IntervalType {
        self.invert()
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalType {
    type Err = DigipodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(IntervalType::Positive),
            "NEGATIVE" => Ok(IntervalType::Negative),
            "NO_DATA" => Ok(IntervalType::NoData),
            "NOT_APPLICABLE" => Ok(IntervalType::NotApplicable),
            _ => Err(DigipodError::input(
                DGP0001,
                format!("unknown interval type '{}'", s),
            )),
        }
    }
}
