//! Combinator Tree Evaluation Tests
//!
//! Tests for: criterion fetching, nested combinators, operand reordering by
//! key, recommendation evaluation, provider and wiring failures

use async_trait::async_trait;
use digipod_diagnostics::{DGP0101, DGP0301, Result};
use digipod_eval::{
    Combinator, CombinePolicy, CriterionKey, Engine, EvaluationContext, Expression,
    InMemoryResultProvider, Operand, OperandKey, PopulationInterventionPair, Recommendation,
    ResultProvider,
};
use digipod_types::{
    Interval, IntervalType, IntervalWithCount, ObservationWindow, PersonIntervals, Timestamp,
    parse_timestamp,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use IntervalType::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn day(d: u32) -> Timestamp {
    parse_timestamp(&format!("2024-05-{:02}T00:00:00Z", d)).unwrap()
}

fn window() -> ObservationWindow {
    ObservationWindow::new(day(1), day(9)).unwrap()
}

fn criterion(parts: &[(i64, &[(u32, u32, IntervalType)])]) -> PersonIntervals<Interval> {
    parts
        .iter()
        .map(|(person, spans)| {
            let intervals = spans
                .iter()
                .map(|(s, e, t)| Interval::new(day(*s), day(*e), *t).unwrap())
                .collect();
            (*person, intervals)
        })
        .collect()
}

fn counted(s: u32, e: u32, t: IntervalType, count: Option<f64>) -> IntervalWithCount {
    IntervalWithCount::new(day(s), day(e), t, count).unwrap()
}

fn provider() -> InMemoryResultProvider {
    InMemoryResultProvider::new()
        .with_result("adult", criterion(&[(1, &[(1, 9, Positive)]), (2, &[(1, 9, Negative)])]))
        .with_result(
            "screening",
            criterion(&[(1, &[(1, 3, Negative), (3, 9, Positive)])]),
        )
        .with_result(
            "optimization",
            criterion(&[(1, &[(1, 5, NotApplicable), (5, 9, Negative)])]),
        )
}

fn engine() -> Engine {
    Engine::new(Arc::new(provider()))
}

/// Counts provider calls
struct CountingProvider {
    inner: InMemoryResultProvider,
    calls: AtomicUsize,
}

#[async_trait]
impl ResultProvider for CountingProvider {
    async fn fetch(
        &self,
        criterion: &CriterionKey,
        window: &ObservationWindow,
    ) -> Result<PersonIntervals<Interval>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(criterion, window).await
    }
}

// ============================================================================
// Evaluation
// ============================================================================

#[tokio::test]
async fn test_evaluate_leaf_lifts_counts() {
    let mut ctx = EvaluationContext::new(window());
    let result = engine()
        .evaluate(&Expression::criterion("adult"), &mut ctx)
        .await
        .unwrap();

    assert_eq!(result[&1], vec![counted(1, 9, Positive, None)]);
    assert_eq!(ctx.cached_criteria(), 1);
}

#[tokio::test]
async fn test_evaluate_combine_4_1() {
    let expr = Expression::combine_4_1(
        Expression::criterion("screening"),
        Expression::criterion("optimization"),
    );
    let mut ctx = EvaluationContext::new(window());
    let result = engine().evaluate(&expr, &mut ctx).await.unwrap();

    assert_eq!(
        result[&1],
        vec![
            counted(1, 3, Negative, None),
            counted(3, 5, Positive, None),
            counted(5, 9, Negative, Some(0.5)),
        ]
    );
}

#[tokio::test]
async fn test_declared_order_does_not_matter() {
    let swapped = Expression::Combine(Combinator::new(
        CombinePolicy::WeightedPair,
        vec![
            Operand::new(OperandKey::OPTIMIZATION, Expression::criterion("optimization")),
            Operand::new(OperandKey::SCREENING, Expression::criterion("screening")),
        ],
    ));
    let canonical = Expression::combine_4_1(
        Expression::criterion("screening"),
        Expression::criterion("optimization"),
    );

    let engine = engine();
    let mut ctx = EvaluationContext::new(window());
    let a = engine.evaluate(&swapped, &mut ctx).await.unwrap();
    let b = engine.evaluate(&canonical, &mut ctx).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_population_gate_and_missing_persons() {
    let expr = Expression::population_intervention(
        Expression::criterion("adult"),
        Expression::criterion("screening"),
    );
    let mut ctx = EvaluationContext::new(window());
    let result = engine().evaluate(&expr, &mut ctx).await.unwrap();

    assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(
        result[&1],
        vec![counted(1, 3, Negative, None), counted(3, 9, Positive, None)]
    );
    assert_eq!(result[&2], vec![counted(1, 9, NotApplicable, None)]);
}

#[tokio::test]
async fn test_criteria_fetched_once_per_context() {
    let counting = Arc::new(CountingProvider {
        inner: provider(),
        calls: AtomicUsize::new(0),
    });
    let engine = Engine::new(counting.clone());

    let expr = Expression::and([
        Expression::criterion("adult"),
        Expression::not(Expression::criterion("adult")),
        Expression::or([Expression::criterion("screening"), Expression::criterion("adult")]),
    ]);
    let mut ctx = EvaluationContext::new(window());
    engine.evaluate(&expr, &mut ctx).await.unwrap();
    engine.evaluate(&expr, &mut ctx).await.unwrap();

    assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_evaluate_recommendation() {
    let recommendation = Recommendation::new("test", "Screening in adults")
        .with_pair(PopulationInterventionPair::new(
            "screening",
            Expression::criterion("adult"),
            Expression::criterion("screening"),
        ))
        .with_pair(PopulationInterventionPair::new(
            "optimization",
            Expression::criterion("adult"),
            Expression::criterion("optimization"),
        ));

    let mut ctx = EvaluationContext::new(window());
    let result = engine()
        .evaluate_recommendation(&recommendation, &mut ctx)
        .await
        .unwrap();

    assert_eq!(result.pairs.keys().collect::<Vec<_>>(), vec!["screening", "optimization"]);
    assert_eq!(
        result.combined[&1],
        vec![
            counted(1, 3, Negative, Some(0.0)),
            counted(3, 9, Positive, Some(0.0)),
        ]
    );
    assert_eq!(result.combined[&2], vec![counted(1, 9, NotApplicable, Some(0.0))]);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_unknown_criterion() {
    let mut ctx = EvaluationContext::new(window());
    let err = engine()
        .evaluate(
            &Expression::or([Expression::criterion("adult"), Expression::criterion("missing")]),
            &mut ctx,
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), DGP0301);
    assert!(err.to_diagnostic().message.contains("'missing'"));
}

#[tokio::test]
async fn test_wiring_checked_before_fetch() {
    let counting = Arc::new(CountingProvider {
        inner: provider(),
        calls: AtomicUsize::new(0),
    });
    let engine = Engine::new(counting.clone());
    let expr = Expression::combine(
        CombinePolicy::EqualWeightMean { arity: 4 },
        [Expression::criterion("adult"), Expression::criterion("screening")],
    );

    let mut ctx = EvaluationContext::new(window());
    let err = engine.evaluate(&expr, &mut ctx).await.unwrap_err();

    assert_eq!(err.code(), DGP0101);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}
