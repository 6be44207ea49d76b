//! List command implementation

use super::output::{self, OutputFormat};
use crate::criteria::{CriterionDeclaration, find_criterion};
use crate::recommendations;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};

/// Configuration for list command
pub struct ListConfig {
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationSummary {
    pub name: String,
    pub title: String,
    pub pairs: Vec<String>,
    pub criteria: Vec<CriterionDeclaration>,
}

#[derive(Tabled)]
struct CriterionRow {
    #[tabled(rename = "Recommendation")]
    recommendation: String,
    #[tabled(rename = "Criterion")]
    key: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Summaries of all recommendations with their criteria
pub fn summaries() -> Vec<RecommendationSummary> {
    recommendations::all()
        .into_iter()
        .map(|r| RecommendationSummary {
            criteria: r
                .criteria()
                .iter()
                .filter_map(|key| find_criterion(key.as_str()).copied())
                .collect(),
            pairs: r.pairs.iter().map(|p| p.name.clone()).collect(),
            name: r.name,
            title: r.title,
        })
        .collect()
}

fn to_table(summaries: &[RecommendationSummary]) -> String {
    let rows = summaries.iter().flat_map(|s| {
        s.criteria.iter().map(move |c| CriterionRow {
            recommendation: format!("{} {}", s.name, s.title),
            key: c.key.to_string(),
            category: c.category.to_string(),
            description: c.description.to_string(),
        })
    });
    Table::new(rows).with(Style::modern()).to_string()
}

/// List recommendations and the criteria they read
pub async fn list(config: ListConfig) -> Result<()> {
    output::print_output(
        &summaries(),
        config.output_format,
        config.output_file.as_deref(),
        |s| to_table(s),
    )
}
