//! Merge command implementation
//!
//! Merges result files directly with a named policy. Files are taken as
//! operands in the order given, which is the policy's canonical order.

use super::output::{self, OutputFormat};
use super::resolver::FileResultProvider;
use anyhow::{Context, Result};
use digipod_eval::{CombinePolicy, merge_person_intervals};
use digipod_types::{IntervalWithCount, ObservationWindow, PersonIntervals, lift_counts};
use log::info;
use std::path::PathBuf;

/// Configuration for merge command
pub struct MergeConfig {
    pub policy: String,
    pub start: String,
    pub end: String,
    pub files: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Merge result files with a policy
pub async fn merge(config: MergeConfig) -> Result<()> {
    let (policy, merged) = run(&config)?;

    output::print_output(
        &merged,
        config.output_format,
        config.output_file.as_deref(),
        |data| output::format_partitions_table(policy.name(), data),
    )
}

/// Resolve the named policy against the files given
///
/// For `combine-4-3` the number of files is the number of components.
pub fn resolve_policy(config: &MergeConfig) -> Result<CombinePolicy> {
    let mut policy: CombinePolicy = config.policy.parse()?;
    if let CombinePolicy::EqualWeightMean { arity } = &mut policy {
        *arity = config.files.len();
    }
    Ok(policy)
}

/// Merge without printing, returning the policy used alongside the result
pub fn run(config: &MergeConfig) -> Result<(CombinePolicy, PersonIntervals<IntervalWithCount>)> {
    let policy = resolve_policy(config)?;

    let window = ObservationWindow::parse(&config.start, &config.end)
        .context("Invalid observation window")?;

    let loader = FileResultProvider::new(Vec::new());
    let inputs = config
        .files
        .iter()
        .map(|path| {
            loader
                .load_file(path)
                .map(|data| lift_counts(&data))
                .with_context(|| format!("Failed to load {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let refs: Vec<&PersonIntervals<IntervalWithCount>> = inputs.iter().collect();
    let merged = merge_person_intervals(&window, &refs, &policy)
        .with_context(|| format!("Failed to merge with {}", policy))?;

    info!(
        "merged {} files with {}: {} persons",
        config.files.len(),
        policy,
        merged.len()
    );

    Ok((policy, merged))
}
