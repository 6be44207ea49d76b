//! Recommendation definitions
//!
//! Each recommendation is a declarative set of population/intervention
//! pairs over the criteria in [`crate::criteria`].

mod bundle;
mod screening;

pub use bundle::recommendation_4_3;
pub use screening::recommendation_4_1;

use digipod_diagnostics::{DGP0004, DigipodError, Result};
use digipod_eval::Recommendation;

/// All known recommendations, in guideline order
pub fn all() -> Vec<Recommendation> {
    vec![recommendation_4_1(), recommendation_4_3()]
}

/// Look a recommendation up by name (`"4.1"`, `"rec-4.1"`, `"4_1"`)
pub fn find(name: &str) -> Result<Recommendation> {
    let normalized = name
        .trim()
        .trim_start_matches("rec-")
        .trim_start_matches("rec")
        .replace('_', ".");

    all()
        .into_iter()
        .find(|r| r.name == normalized)
        .ok_or_else(|| {
            let known: Vec<String> = all().into_iter().map(|r| r.name).collect();
            DigipodError::input(DGP0004, format!("unknown recommendation '{}'", name))
                .with_context(format!("known recommendations: {}", known.join(", ")))
        })
}
