//! Output formatting utilities

use anyhow::{Context, Result, bail};
use colored::Colorize;
use digipod_diagnostics::DigipodError;
use digipod_eval::RecommendationResult;
use digipod_types::{IntervalWithCount, PersonIntervals};
use serde::Serialize;
use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::str::FromStr;
use tabled::{Table, Tabled, settings::Style};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    JsonPretty,
    Table,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "json-pretty" => Ok(Self::JsonPretty),
            "table" => Ok(Self::Table),
            other => bail!("Unknown output format '{}'. Expected json, pretty or table", other),
        }
    }
}

/// Parse an optional `--format` value, defaulting to pretty JSON
pub fn parse_format(format: Option<&str>) -> Result<OutputFormat> {
    format.map_or(Ok(OutputFormat::default()), OutputFormat::from_str)
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stderr().is_terminal()),
    }
}

/// Format an error for display, rendering digipod diagnostics with their code
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<DigipodError>() {
        Some(err) => {
            let rendered = err.to_diagnostic().render_colored();
            let outer: Vec<String> = error
                .chain()
                .take_while(|cause| cause.downcast_ref::<DigipodError>().is_none())
                .map(|cause| cause.to_string())
                .collect();
            if outer.is_empty() {
                rendered
            } else {
                format!("{} {}\n{}", "Error:".red().bold(), outer.join(": "), rendered)
            }
        }
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Serialize a value as JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

#[derive(Tabled)]
struct IntervalRow {
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Person")]
    person: i64,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Type")]
    interval_type: String,
    #[tabled(rename = "Count")]
    count: String,
}

fn rows<'a>(
    label: &'a str,
    data: &'a PersonIntervals<IntervalWithCount>,
) -> impl Iterator<Item = IntervalRow> + 'a {
    data.iter().flat_map(move |(person, intervals)| {
        intervals.iter().map(move |interval| IntervalRow {
            result: label.to_string(),
            person: *person,
            start: interval.start.to_rfc3339(),
            end: interval.end.to_rfc3339(),
            interval_type: interval.interval_type.to_string(),
            count: interval
                .count
                .map_or_else(|| "-".to_string(), |c| format!("{:.3}", c)),
        })
    })
}

/// Format merged partitions as a table, one row per person and interval
pub fn format_partitions_table(label: &str, data: &PersonIntervals<IntervalWithCount>) -> String {
    if data.is_empty() {
        return "(no persons)".to_string();
    }
    Table::new(rows(label, data)).with(Style::modern()).to_string()
}

/// Format a recommendation result as a table, pairs first then the combined result
pub fn format_recommendation_table(result: &RecommendationResult) -> String {
    let mut all: Vec<IntervalRow> = result
        .pairs
        .iter()
        .flat_map(|(name, data)| rows(name, data))
        .collect();
    all.extend(rows("combined", &result.combined));

    if all.is_empty() {
        return "(no persons)".to_string();
    }
    Table::new(all).with(Style::modern()).to_string()
}

/// Print a serializable result in the specified format
///
/// `table` renders through `to_table`.
pub fn print_output<T, F>(
    value: &T,
    format: OutputFormat,
    output_file: Option<&Path>,
    to_table: F,
) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let content = match format {
        OutputFormat::Json => format_json(value, false)?,
        OutputFormat::JsonPretty => format_json(value, true)?,
        OutputFormat::Table => to_table(value),
    };

    write_output(&content, output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use digipod_diagnostics::DGP0301;
    use digipod_types::{IntervalType, parse_timestamp};

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format(None).unwrap(), OutputFormat::JsonPretty);
        assert_eq!(parse_format(Some("TABLE")).unwrap(), OutputFormat::Table);
        assert!(parse_format(Some("xml")).is_err());
    }

    #[test]
    fn test_partitions_table() {
        let mut data = PersonIntervals::new();
        data.insert(
            42,
            vec![IntervalWithCount {
                start: parse_timestamp("2024-01-01T00:00:00Z").unwrap(),
                end: parse_timestamp("2024-01-02T00:00:00Z").unwrap(),
                interval_type: IntervalType::Positive,
                count: Some(0.5),
            }],
        );
        let table = format_partitions_table("merged", &data);
        assert!(table.contains("42"));
        assert!(table.contains("POSITIVE"));
        assert!(table.contains("0.500"));
    }

    #[test]
    fn test_format_error_keeps_code() {
        colored::control::set_override(false);
        let err = anyhow::Error::new(
            DigipodError::provider(DGP0301, "no result available").for_criterion("adult"),
        )
        .context("Failed to evaluate recommendation 4.1");
        let text = format_error(&err);
        assert!(text.contains("DGP0301"));
        assert!(text.contains("Failed to evaluate recommendation 4.1"));
        assert!(text.contains("criterion 'adult'"));
    }
}
