//! Per-atlas frequency tables

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::label::RegionLabel;

/// Column name for the coordinate count
pub const COUNT_COLUMN: &str = "Number of coordinates";

/// Column name for the percentage
pub const PERCENTAGE_COLUMN: &str = "Percentage (%)";

/// Share of `count` in `total`, as `round(count / total, 3) * 100`.
///
/// The fraction is rounded to three decimals first and only then scaled, so
/// percentages land on tenths of a percent with the usual floating point
/// residue (1 of 3 gives `0.333 * 100.0`, not `33.3`). Rounding is correctly
/// rounded on the exact binary value of the fraction with ties to even.
pub fn composition_percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let fraction = count as f64 / total as f64;
    round_thousandths(fraction) * 100.0
}

fn round_thousandths(value: f64) -> f64 {
    // Fixed precision formatting is exact (Dragon4 fallback), ties to even
    format!("{value:.3}").parse().unwrap_or(value)
}

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    pub label: RegionLabel,
    pub count: usize,
    pub percentage: f64,
}

/// Region counts for one atlas, sorted by count descending.
///
/// Equal counts are ordered by [`RegionLabel`]'s ordering: named regions by
/// name, then `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    rows: Vec<FrequencyRow>,
    total: usize,
}

impl FrequencyTable {
    /// Build from per-label counts. Labels must be distinct; `total` is the
    /// cluster size.
    pub fn from_counts(counts: impl IntoIterator<Item = (RegionLabel, usize)>, total: usize) -> Self {
        let mut counts: Vec<(RegionLabel, usize)> = counts.into_iter().collect();
        counts.sort_unstable_by(|(label_a, count_a), (label_b, count_b)| {
            count_b.cmp(count_a).then_with(|| label_a.cmp(label_b))
        });

        let rows = counts
            .into_iter()
            .map(|(label, count)| FrequencyRow {
                percentage: composition_percentage(count, total),
                label,
                count,
            })
            .collect();

        Self { rows, total }
    }

    pub fn rows(&self) -> &[FrequencyRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FrequencyRow> {
        self.rows
    }

    /// Cluster size the percentages are relative to
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyRow> {
        self.rows.iter()
    }

    pub fn get(&self, label: &RegionLabel) -> Option<&FrequencyRow> {
        self.rows.iter().find(|row| &row.label == label)
    }

    /// Count for `label`, zero when absent
    pub fn count_of(&self, label: &RegionLabel) -> usize {
        self.get(label).map_or(0, |row| row.count)
    }

    /// `(label, count, percentage)` triples in table order
    pub fn to_tuples(&self) -> Vec<(String, usize, f64)> {
        self.rows
            .iter()
            .map(|row| (row.label.to_string(), row.count, row.percentage))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FrequencyTable {
    type Item = &'a FrequencyRow;
    type IntoIter = std::slice::Iter<'a, FrequencyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[derive(Serialize)]
struct RowColumns {
    #[serde(rename = "Number of coordinates")]
    count: usize,
    #[serde(rename = "Percentage (%)")]
    percentage: f64,
}

/// Serialized as an ordered map `label -> {column: value}`
impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(
                &row.label,
                &RowColumns {
                    count: row.count,
                    percentage: row.percentage,
                },
            )?;
        }
        map.end()
    }
}
