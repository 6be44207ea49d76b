//! Combinator tree evaluation
//!
//! Evaluation runs in two phases. All criteria the tree references are
//! fetched concurrently from the provider and cached in the context; the tree
//! is then folded bottom-up without further I/O. Each combinator reorders its
//! operand results into its policy's canonical order and merges them.

use crate::context::{EvaluationContext, SharedResult};
use crate::expression::{Combinator, CriterionKey, Expression};
use crate::merge::merge_person_intervals;
use crate::policy::CombinePolicy;
use crate::prepare::prepare_data;
use crate::provider::ResultProvider;
use crate::recommendation::{Recommendation, RecommendationResult};
use digipod_diagnostics::{DGP0301, DigipodError, Result};
use digipod_types::{IntervalWithCount, PersonIntervals, lift_counts};
use futures::future::try_join_all;
use indexmap::IndexMap;
use log::{debug, info};
use std::sync::Arc;

/// Evaluates combinator trees against a result provider
#[derive(Clone)]
pub struct Engine {
    provider: Arc<dyn ResultProvider>,
}

impl Engine {
    pub fn new(provider: Arc<dyn ResultProvider>) -> Self {
        Self { provider }
    }

    /// Evaluate a tree over the context's window
    pub async fn evaluate(
        &self,
        expr: &Expression,
        ctx: &mut EvaluationContext,
    ) -> Result<SharedResult> {
        expr.validate()?;
        self.prefetch(expr, ctx).await?;
        self.evaluate_node(expr, ctx)
    }

    /// Evaluate every population/intervention pair of a recommendation
    ///
    /// The combined result takes, per subject and cut, the best outcome over
    /// all pairs (priority-max combine).
    pub async fn evaluate_recommendation(
        &self,
        recommendation: &Recommendation,
        ctx: &mut EvaluationContext,
    ) -> Result<RecommendationResult> {
        info!(
            "evaluating recommendation '{}' ({} pairs)",
            recommendation.name,
            recommendation.pairs.len()
        );

        let mut pairs: IndexMap<String, SharedResult> = IndexMap::new();
        for pair in &recommendation.pairs {
            let result = self.evaluate(&pair.expression(), ctx).await?;
            pairs.insert(pair.name.clone(), result);
        }

        let inputs: Vec<&PersonIntervals<IntervalWithCount>> =
            pairs.values().map(|r| r.as_ref()).collect();
        let combined = merge_person_intervals(&ctx.window, &inputs, &CombinePolicy::MaxCountOr)?;

        Ok(RecommendationResult {
            name: recommendation.name.clone(),
            pairs: pairs
                .into_iter()
                .map(|(name, result)| (name, Arc::unwrap_or_clone(result)))
                .collect(),
            combined,
        })
    }

    async fn prefetch(&self, expr: &Expression, ctx: &mut EvaluationContext) -> Result<()> {
        let missing: Vec<CriterionKey> = expr
            .criteria()
            .into_iter()
            .filter(|key| !ctx.has_criterion(key))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        debug!("fetching {} criteria", missing.len());

        let window = &ctx.window;
        let fetched = try_join_all(missing.iter().map(|key| async move {
            self.provider
                .fetch(key, window)
                .await
                .map(|data| (key.clone(), data))
                .map_err(|e| e.for_criterion(key.as_str()))
        }))
        .await?;

        for (key, data) in fetched {
            debug!("criterion '{}': {} persons", key, data.len());
            ctx.set_criterion(key, lift_counts(&data));
        }
        Ok(())
    }

    fn evaluate_node(&self, expr: &Expression, ctx: &EvaluationContext) -> Result<SharedResult> {
        match expr {
            Expression::Criterion(key) => ctx.get_criterion(key).ok_or_else(|| {
                DigipodError::provider(DGP0301, "criterion was not fetched")
                    .for_criterion(key.as_str())
            }),
            Expression::Combine(node) => self.evaluate_combinator(node, ctx),
        }
    }

    fn evaluate_combinator(&self, node: &Combinator, ctx: &EvaluationContext) -> Result<SharedResult> {
        let inputs = node
            .operands
            .iter()
            .map(|op| self.evaluate_node(&op.expression, ctx))
            .collect::<Result<Vec<_>>>()?;

        let ordered = prepare_data(&node.declared_order(), inputs, &node.canonical_order())?;
        let refs: Vec<&PersonIntervals<IntervalWithCount>> =
            ordered.iter().map(|r| r.as_ref()).collect();

        let merged = merge_person_intervals(&ctx.window, &refs, &node.policy)?;
        Ok(Arc::new(merged))
    }
}
