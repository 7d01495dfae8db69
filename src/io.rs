//! Reading point sets from whitespace separated text files.
//!
//! Each line holds one point `x y z`, or `x y` with `z = 0`.
//! Blank lines and lines starting with `#` are ignored. Malformed lines and points with a `nan` or `inf`
//! coordinate are skipped with a warning.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::Point3;

/// Parse the points of a point file's content.
pub fn parse_points(content: &str) -> Vec<Point3> {
    content
        .lines()
        .enumerate()
        .filter_map(|(line_idx, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            parse_line(line)
                .map_err(|err| log::warn!("Skipping line {}: {err}", line_idx + 1))
                .ok()
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Point3> {
    let coords = line
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Malformed point '{line}'"))?;

    if coords.iter().any(|c| !c.is_finite()) {
        bail!("Non-finite coordinate in '{line}'");
    }

    match coords[..] {
        [x, y] => Ok(Point3::new(x, y, 0.0)),
        [x, y, z] => Ok(Point3::new(x, y, z)),
        _ => bail!("Expected 2 or 3 coordinates, got {} in '{line}'", coords.len()),
    }
}

/// Read the points of a point file.
pub fn read_points(path: impl AsRef<Path>) -> Result<Vec<Point3>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read point file {}", path.display()))?;

    let points = parse_points(&content);
    log::debug!("Read {} points from {}", points.len(), path.display());

    Ok(points)
}
