//! Reading cluster coordinates

use anyhow::{bail, Context, Result};
use cluster_composition::Coordinate;
use std::io::Read;
use std::path::Path;

/// Parse `x,y,z` (commas or whitespace) into a coordinate.
///
/// Used as a clap value parser for `--coord`.
pub fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let parts: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() != 3 {
        return Err(format!(
            "expected three values x,y,z, got {} in '{}'",
            parts.len(),
            value
        ));
    }

    let mut xyz = [0.0; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", part, e))?;
    }
    Ok(Coordinate::from(xyz))
}

/// Field delimiter for a coordinate file: tab for `.tsv`, comma otherwise
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Read coordinates from delimited text with columns x, y, z.
///
/// A first row whose x field is not numeric is treated as a header. Lines
/// starting with `#` are comments. Extra columns are ignored.
pub fn parse_coordinates(reader: impl Read, delimiter: u8) -> Result<Vec<Coordinate>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .delimiter(delimiter)
        .from_reader(reader);

    let mut coordinates = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.context("Failed to read coordinate record")?;
        let line = record.position().map_or(index as u64 + 1, |pos| pos.line());

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 3 {
            bail!(
                "Line {}: expected at least 3 columns (x, y, z), got {}",
                line,
                record.len()
            );
        }

        if index == 0 && record[0].parse::<f64>().is_err() {
            continue;
        }

        let mut xyz = [0.0; 3];
        for (axis, slot) in xyz.iter_mut().enumerate() {
            *slot = record[axis].parse::<f64>().with_context(|| {
                format!("Line {}: invalid coordinate value '{}'", line, &record[axis])
            })?;
        }
        coordinates.push(Coordinate::from(xyz));
    }

    Ok(coordinates)
}

/// Read coordinates from a file, or from stdin when `path` is `-`
pub fn read_coordinates(path: &Path) -> Result<Vec<Coordinate>> {
    if path == Path::new("-") {
        return parse_coordinates(std::io::stdin().lock(), b',')
            .context("Failed to read coordinates from stdin");
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open coordinate file: {}", path.display()))?;
    parse_coordinates(file, delimiter_for(path))
        .with_context(|| format!("Failed to parse coordinate file: {}", path.display()))
}
