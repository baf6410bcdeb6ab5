//! Rendering composition results

use anyhow::{Context, Result};
use clap::ValueEnum;
use cluster_composition::{CompositionResult, FrequencyTable, COUNT_COLUMN, PERCENTAGE_COLUMN};
use std::fmt::Write as _;

const REGION_COLUMN: &str = "Region";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text tables, one per atlas
    #[default]
    Table,
    /// Pretty-printed JSON object keyed by `<atlas>.cluster.composition`
    Json,
}

pub fn render(result: &CompositionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_tables(result)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("Failed to serialize composition")
        }
    }
}

/// All tables separated by blank lines
pub fn render_tables(result: &CompositionResult) -> String {
    let mut out = String::new();
    for (i, entry) in result.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&entry.key());
        out.push('\n');
        out.push_str(&render_table(&entry.table));
    }
    out
}

/// One table: region column left-aligned, numeric columns right-aligned,
/// percentages with one decimal
pub fn render_table(table: &FrequencyTable) -> String {
    let region_width = table
        .iter()
        .map(|row| row.label.as_str().len())
        .chain(std::iter::once(REGION_COLUMN.len()))
        .max()
        .unwrap_or(REGION_COLUMN.len());
    let count_width = COUNT_COLUMN.len();
    let percentage_width = PERCENTAGE_COLUMN.len();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<region_width$}  {:>count_width$}  {:>percentage_width$}",
        REGION_COLUMN, COUNT_COLUMN, PERCENTAGE_COLUMN
    );
    for row in table {
        let _ = writeln!(
            out,
            "{:<region_width$}  {:>count_width$}  {:>percentage_width$.1}",
            row.label.as_str(),
            row.count,
            row.percentage
        );
    }
    out
}
