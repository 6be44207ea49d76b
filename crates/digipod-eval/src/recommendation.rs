//! Recommendations as sets of population/intervention pairs

use crate::expression::{CriterionKey, Expression};
use digipod_types::{IntervalWithCount, PersonIntervals};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One population/intervention pair of a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationInterventionPair {
    pub name: String,
    pub population: Expression,
    pub intervention: Expression,
}

impl PopulationInterventionPair {
    pub fn new(name: impl Into<String>, population: Expression, intervention: Expression) -> Self {
        Self {
            name: name.into(),
            population,
            intervention,
        }
    }

    /// The gated tree evaluated for this pair
    pub fn expression(&self) -> Expression {
        Expression::population_intervention(self.population.clone(), self.intervention.clone())
    }
}

/// A guideline recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Short identifier, e.g. `"4.1"`
    pub name: String,
    pub title: String,
    pub pairs: Vec<PopulationInterventionPair>,
}

impl Recommendation {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            pairs: Vec::new(),
        }
    }

    pub fn with_pair(mut self, pair: PopulationInterventionPair) -> Self {
        self.pairs.push(pair);
        self
    }

    /// Distinct criteria referenced by any pair, in first-seen order
    pub fn criteria(&self) -> IndexSet<CriterionKey> {
        self.pairs
            .iter()
            .flat_map(|pair| pair.expression().criteria())
            .collect()
    }
}

/// Outcome of evaluating a recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub name: String,
    /// Result per pair, by pair name
    pub pairs: IndexMap<String, PersonIntervals<IntervalWithCount>>,
    /// Best outcome over all pairs
    pub combined: PersonIntervals<IntervalWithCount>,
}
