//! Criterion result providers

use crate::expression::CriterionKey;
use async_trait::async_trait;
use digipod_diagnostics::{DGP0301, DigipodError, Result};
use digipod_types::{Interval, ObservationWindow, PersonIntervals};
use std::collections::HashMap;

/// Source of per-subject criterion results
#[async_trait]
pub trait ResultProvider: Send + Sync {
    /// Fetch the partitions of `criterion` over `window`
    async fn fetch(
        &self,
        criterion: &CriterionKey,
        window: &ObservationWindow,
    ) -> Result<PersonIntervals<Interval>>;
}

/// Provider backed by results held in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryResultProvider {
    results: HashMap<CriterionKey, PersonIntervals<Interval>>,
}

impl InMemoryResultProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result (builder style)
    pub fn with_result(
        mut self,
        criterion: impl Into<CriterionKey>,
        data: PersonIntervals<Interval>,
    ) -> Self {
        self.insert(criterion, data);
        self
    }

    pub fn insert(&mut self, criterion: impl Into<CriterionKey>, data: PersonIntervals<Interval>) {
        self.results.insert(criterion.into(), data);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[async_trait]
impl ResultProvider for InMemoryResultProvider {
    async fn fetch(
        &self,
        criterion: &CriterionKey,
        _window: &ObservationWindow,
    ) -> Result<PersonIntervals<Interval>> {
        self.results.get(criterion).cloned().ok_or_else(|| {
            DigipodError::provider(DGP0301, "no result available").for_criterion(criterion.as_str())
        })
    }
}
