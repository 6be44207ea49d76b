//! Evaluation context

use crate::expression::CriterionKey;
use digipod_types::{IntervalWithCount, ObservationWindow, PersonIntervals};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, immutable per-subject result of one node
pub type SharedResult = Arc<PersonIntervals<IntervalWithCount>>;

/// State of one evaluation run
///
/// Criterion results are fetched once per context and shared by every node
/// that reads them.
pub struct EvaluationContext {
    /// Observation window all partitions are aligned to
    pub window: ObservationWindow,
    /// Criterion results fetched so far
    criteria: HashMap<CriterionKey, SharedResult>,
}

impl EvaluationContext {
    pub fn new(window: ObservationWindow) -> Self {
        Self {
            window,
            criteria: HashMap::new(),
        }
    }

    /// Get a cached criterion result
    pub fn get_criterion(&self, key: &CriterionKey) -> Option<SharedResult> {
        self.criteria.get(key).cloned()
    }

    pub fn has_criterion(&self, key: &CriterionKey) -> bool {
        self.criteria.contains_key(key)
    }

    /// Cache a criterion result
    pub fn set_criterion(&mut self, key: CriterionKey, result: PersonIntervals<IntervalWithCount>) {
        self.criteria.insert(key, Arc::new(result));
    }

    /// Number of cached criterion results
    pub fn cached_criteria(&self) -> usize {
        self.criteria.len()
    }
}
