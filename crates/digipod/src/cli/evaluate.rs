//! Evaluate command implementation

use super::output::{self, OutputFormat};
use super::resolver::FileResultProvider;
use crate::recommendations;
use anyhow::{Context, Result};
use digipod_eval::{Engine, EvaluationContext, RecommendationResult};
use digipod_types::ObservationWindow;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for evaluate command
pub struct EvaluateConfig {
    pub recommendation: String,
    pub start: String,
    pub end: String,
    pub results: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Evaluate a recommendation against criterion result files
pub async fn evaluate(config: EvaluateConfig) -> Result<()> {
    let result = run(&config).await?;

    output::print_output(
        &result,
        config.output_format,
        config.output_file.as_deref(),
        output::format_recommendation_table,
    )
}

/// Evaluate without printing
pub async fn run(config: &EvaluateConfig) -> Result<RecommendationResult> {
    let recommendation = recommendations::find(&config.recommendation)?;
    let window = ObservationWindow::parse(&config.start, &config.end)
        .context("Invalid observation window")?;

    let provider = FileResultProvider::new(config.results.clone());
    for path in provider.search_paths() {
        info!("result search path: {}", path.display());
    }

    let engine = Engine::new(Arc::new(provider));
    let mut ctx = EvaluationContext::new(window);

    let result = engine
        .evaluate_recommendation(&recommendation, &mut ctx)
        .await
        .with_context(|| format!("Failed to evaluate recommendation {}", recommendation.name))?;

    info!(
        "recommendation {}: {} persons, {} criteria read",
        recommendation.name,
        result.combined.len(),
        ctx.cached_criteria()
    );

    Ok(result)
}
