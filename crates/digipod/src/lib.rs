//! Interval combination engine for delirium-prevention recommendations
//!
//! This crate ties the digipod workspace together:
//! - Per-subject interval types and the classification lattice ([`types`])
//! - The rectangle sweep, combine policies and combinator evaluation ([`eval`])
//! - The criterion catalogue ([`criteria`]) and the recommendation
//!   definitions built from it ([`recommendations`])
//!
//! # Example
//!
//! ```ignore
//! use digipod::{Engine, EvaluationContext, ObservationWindow, recommendations};
//!
//! let recommendation = recommendations::find("4.1")?;
//! let window = ObservationWindow::parse("2024-12-01T00:00:00Z", "2024-12-09T00:00:00Z")?;
//! let mut ctx = EvaluationContext::new(window);
//! let result = engine.evaluate_recommendation(&recommendation, &mut ctx).await?;
//! ```

// Re-export all public APIs from internal crates
pub use digipod_diagnostics as diagnostics;
pub use digipod_eval as eval;
pub use digipod_types as types;

// Convenience re-exports
pub use digipod_diagnostics::{DigipodError, Result};
pub use digipod_eval::{
    CombinePolicy, Engine, EvaluationContext, Expression, InMemoryResultProvider, Recommendation,
    RecommendationResult, ResultProvider,
};
pub use digipod_types::{Interval, IntervalType, IntervalWithCount, ObservationWindow, PersonIntervals};

pub mod criteria;
pub mod recommendations;

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
