//! Competition list loader (CSV with `date` and `type`/`kind` columns).

use anyhow::{bail, Context, Result};
use periodize_core::RawCompetition;
use std::io::Read;
use std::path::Path;

pub fn parse_competitions_csv<R: Read>(reader: R) -> Result<Vec<RawCompetition>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading header row")?.clone();
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
    };

    let Some(date_col) = find(&["date"]) else {
        bail!("missing required column: date");
    };
    let kind_col = find(&["type", "kind"]);

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let date = record.get(date_col).unwrap_or("").trim();
        if date.is_empty() {
            continue;
        }
        let kind = kind_col.and_then(|c| record.get(c)).unwrap_or("").trim();
        out.push(RawCompetition::new(date, kind));
    }

    Ok(out)
}

pub fn load_competitions_csv(path: impl AsRef<Path>) -> Result<Vec<RawCompetition>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_competitions_csv(file).with_context(|| format!("parsing {}", path.display()))
}
