//! digipod evaluation engine
//!
//! This crate combines independently computed interval partitions into one.
//! It provides:
//!
//! - **Rectangle sweep** ([`merge`]): merges N aligned partitions over the union
//!   of their breakpoints and coalesces equal neighbours
//! - **Combine policies** ([`operators`], [`CombinePolicy`]): weighted two-way
//!   combine, priority-max combine, equal-weighted N-way mean, and the
//!   logical `and` / `or` / `not` / population-intervention policies
//! - **Operand ordering** ([`prepare`]): permutes predecessor data into the
//!   order a policy expects, by stable operand key
//! - **Combinator trees** ([`expression`]) and their evaluation ([`Engine`])
//!   against criterion results from a [`ResultProvider`]
//!
//! # Example
//!
//! ```ignore
//! use digipod_eval::{Engine, EvaluationContext, Expression, InMemoryResultProvider};
//!
//! let provider = InMemoryResultProvider::new()
//!     .with_result("screening", screening)
//!     .with_result("optimization", optimization);
//! let engine = Engine::new(std::sync::Arc::new(provider));
//! let mut ctx = EvaluationContext::new(window);
//!
//! let expr = Expression::combine_4_1(
//!     Expression::criterion("screening"),
//!     Expression::criterion("optimization"),
//! );
//! let merged = engine.evaluate(&expr, &mut ctx).await?;
//! ```
//!
//! All merge and combine functions are pure: inputs are borrowed, outputs are
//! freshly allocated, and nothing is shared between invocations.

pub mod context;
pub mod engine;
pub mod expression;
pub mod merge;
pub mod operators;
pub mod policy;
pub mod prepare;
pub mod provider;
pub mod recommendation;

pub use context::{EvaluationContext, SharedResult};
pub use engine::Engine;
pub use expression::{Combinator, CriterionKey, Expression, Operand, OperandKey};
pub use merge::{Slot, Slots, merge_partitions, merge_person_intervals};
pub use policy::{Arity, CombinePolicy};
pub use prepare::prepare_data;
pub use provider::{InMemoryResultProvider, ResultProvider};
pub use recommendation::{PopulationInterventionPair, Recommendation, RecommendationResult};
