//! Daily load series for the workload-ratio estimator.
//!
//! Reads a `Minutes` column (or the `Total` column of an exported plan sheet),
//! oldest row first.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;

const LOAD_COLUMNS: &[&str] = &["minutes", "total"];

pub fn parse_daily_minutes_csv<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading header row")?.clone();
    let Some(col) = LOAD_COLUMNS.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }) else {
        bail!("missing required column: Minutes (or Total)");
    };

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = record.get(col).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        let v: f64 = cell
            .replace(',', ".")
            .parse()
            .with_context(|| format!("row {}: invalid minutes {cell:?}", i + 2))?;
        out.push(v);
    }
    Ok(out)
}

pub fn load_daily_minutes_csv(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_daily_minutes_csv(file).with_context(|| format!("parsing {}", path.display()))
}
