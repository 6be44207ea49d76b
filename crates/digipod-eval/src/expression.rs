//! Combinator trees
//!
//! Leaves name a criterion whose per-subject result comes from a
//! [`ResultProvider`](crate::ResultProvider); inner nodes combine their
//! operands with a [`CombinePolicy`]. Every operand carries a stable key so the
//! evaluator can hand inputs to the policy in the order it expects, whatever
//! order the operands were declared in.

use crate::policy::CombinePolicy;
use digipod_diagnostics::{DGP0102, DGP0103, DigipodError, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a criterion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionKey(String);

impl CriterionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriterionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CriterionKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CriterionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Stable identity of an operand within its combinator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperandKey(String);

impl OperandKey {
    pub const SCREENING: &'static str = "screening";
    pub const OPTIMIZATION: &'static str = "optimization";
    pub const POPULATION: &'static str = "population";
    pub const INTERVENTION: &'static str = "intervention";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key of the operand at `index` for order-insensitive policies
    pub fn positional(index: usize) -> Self {
        Self(index.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperandKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A node of a combinator tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Result of a single criterion
    Criterion(CriterionKey),
    /// Combination of operand results
    Combine(Combinator),
}

/// An inner node: a policy applied to keyed operands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combinator {
    #[serde(flatten)]
    pub policy: CombinePolicy,
    /// Operands in declaration order
    pub operands: Vec<Operand>,
}

/// A keyed child of a combinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operand {
    pub key: OperandKey,
    pub expression: Expression,
}

impl Operand {
    pub fn new(key: impl Into<OperandKey>, expression: Expression) -> Self {
        Self {
            key: key.into(),
            expression,
        }
    }
}

impl Combinator {
    pub fn new(policy: CombinePolicy, operands: Vec<Operand>) -> Self {
        Self { policy, operands }
    }

    /// Keys in the order the operands were declared
    pub fn declared_order(&self) -> Vec<OperandKey> {
        self.operands.iter().map(|op| op.key.clone()).collect()
    }

    /// Keys in the order the policy consumes its inputs
    pub fn canonical_order(&self) -> Vec<OperandKey> {
        match self.policy {
            CombinePolicy::WeightedPair => vec![
                OperandKey::from(OperandKey::SCREENING),
                OperandKey::from(OperandKey::OPTIMIZATION),
            ],
            CombinePolicy::PopulationIntervention => vec![
                OperandKey::from(OperandKey::POPULATION),
                OperandKey::from(OperandKey::INTERVENTION),
            ],
            _ => (0..self.operands.len()).map(OperandKey::positional).collect(),
        }
    }

    /// Check arity and operand keys of this node only
    pub fn validate(&self) -> Result<()> {
        self.policy
            .arity()
            .check(self.operands.len(), self.policy.name())?;

        let mut seen = IndexSet::with_capacity(self.operands.len());
        for operand in &self.operands {
            if !seen.insert(&operand.key) {
                return Err(DigipodError::wiring(
                    DGP0103,
                    format!(
                        "operand '{}' declared more than once in {}",
                        operand.key,
                        self.policy.name()
                    ),
                ));
            }
        }

        for key in self.canonical_order() {
            if !seen.contains(&key) {
                return Err(DigipodError::wiring(
                    DGP0102,
                    format!("{} expects an operand '{}'", self.policy.name(), key),
                ));
            }
        }

        Ok(())
    }
}

impl Expression {
    pub fn criterion(key: impl Into<CriterionKey>) -> Self {
        Expression::Criterion(key.into())
    }

    /// Combine operands with positional keys
    pub fn combine(policy: CombinePolicy, operands: impl IntoIterator<Item = Expression>) -> Self {
        let operands = operands
            .into_iter()
            .enumerate()
            .map(|(i, expr)| Operand {
                key: OperandKey::positional(i),
                expression: expr,
            })
            .collect();
        Expression::Combine(Combinator::new(policy, operands))
    }

    pub fn and(operands: impl IntoIterator<Item = Expression>) -> Self {
        Self::combine(CombinePolicy::And, operands)
    }

    pub fn or(operands: impl IntoIterator<Item = Expression>) -> Self {
        Self::combine(CombinePolicy::Or, operands)
    }

    pub fn not(operand: Expression) -> Self {
        Self::combine(CombinePolicy::Not, [operand])
    }

    /// Count the operand as 1 where it is POSITIVE
    pub fn indicator(operand: Expression) -> Self {
        Self::combine(CombinePolicy::Indicator, [operand])
    }

    pub fn max_count_or(operands: impl IntoIterator<Item = Expression>) -> Self {
        Self::combine(CombinePolicy::MaxCountOr, operands)
    }

    /// Equal-weighted mean over the four bundle components
    pub fn combine_4_3(components: [Expression; CombinePolicy::BUNDLE_COMPONENTS]) -> Self {
        Self::combine(
            CombinePolicy::EqualWeightMean {
                arity: CombinePolicy::BUNDLE_COMPONENTS,
            },
            components,
        )
    }

    /// Weighted screening + optimization pair
    pub fn combine_4_1(screening: Expression, optimization: Expression) -> Self {
        Expression::Combine(Combinator::new(
            CombinePolicy::WeightedPair,
            vec![
                Operand::new(OperandKey::SCREENING, screening),
                Operand::new(OperandKey::OPTIMIZATION, optimization),
            ],
        ))
    }

    pub fn population_intervention(population: Expression, intervention: Expression) -> Self {
        Expression::Combine(Combinator::new(
            CombinePolicy::PopulationIntervention,
            vec![
                Operand::new(OperandKey::POPULATION, population),
                Operand::new(OperandKey::INTERVENTION, intervention),
            ],
        ))
    }

    /// Validate every combinator in the tree
    pub fn validate(&self) -> Result<()> {
        match self {
            Expression::Criterion(_) => Ok(()),
            Expression::Combine(node) => {
                node.validate()?;
                node.operands
                    .iter()
                    .try_for_each(|op| op.expression.validate())
            }
        }
    }

    /// Distinct criteria referenced by the tree, in first-seen order
    pub fn criteria(&self) -> IndexSet<CriterionKey> {
        let mut keys = IndexSet::new();
        self.collect_criteria(&mut keys);
        keys
    }

    fn collect_criteria(&self, keys: &mut IndexSet<CriterionKey>) {
        match self {
            Expression::Criterion(key) => {
                keys.insert(key.clone());
            }
            Expression::Combine(node) => {
                for operand in &node.operands {
                    operand.expression.collect_criteria(keys);
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Criterion(_) => 1,
            Expression::Combine(node) => {
                1 + node
                    .operands
                    .iter()
                    .map(|op| op.expression.node_count())
                    .sum::<usize>()
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Criterion(key) => write!(f, "{}", key),
            Expression::Combine(node) => {
                write!(f, "{}(", node.policy.name())?;
                for (i, operand) in node.operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", operand.key, operand.expression)?;
                }
                f.write_str(")")
            }
        }
    }
}
