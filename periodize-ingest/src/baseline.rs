//! Baseline calendar loader (CSV).
//!
//! Expected layout (header names are matched case-insensitively):
//!   Date,Zone 1,Zone 2,Zone 3,Zone 4,Zone 5,Strength,Type
//!   2025-11-03,60,20,10,0,0,30,
//!   2025-11-08,20,5,0,5,12,0,Control start
//!
//! Zone cells that are blank or non-numeric read as 0. A `Type` cell
//! containing "start" (or the Bulgarian "старт") marks a competition day;
//! a bare kind word such as "control" does not.

use anyhow::{anyhow, Context, Result};
use periodize_core::{parse_calendar_date, CalendarTable, CompetitionKind, Day, ZoneMinutes};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::BaselineColumns;

/// Competition marker for a baseline `Type` cell.
///
/// Returns `None` for ordinary training days, `Some(None)` for a competition
/// whose kind is not named, and `Some(Some(kind))` otherwise.
pub fn classify_type_cell(cell: &str) -> Option<Option<CompetitionKind>> {
    let t = cell.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }
    if t.contains("start") || t.contains("старт") {
        Some(CompetitionKind::detect(&t))
    } else {
        None
    }
}

fn parse_minutes(cell: &str) -> f64 {
    let s = cell.trim().replace(',', ".");
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a baseline calendar from CSV text.
pub fn parse_baseline_csv<R: Read>(reader: R) -> Result<CalendarTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading header row")?.clone();
    let columns = BaselineColumns::from_headers(headers.iter())?;
    debug!(?columns, "detected baseline columns");

    let mut days = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        // header is row 1
        let row = i + 2;
        let record = result.with_context(|| format!("reading row {row}"))?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let date_cell = record.get(columns.date).unwrap_or("");
        let date = parse_calendar_date(date_cell)
            .map_err(|e| anyhow!("row {row}: {e}"))?;

        let mut minutes = ZoneMinutes::zero();
        for (col, zone) in &columns.zones {
            minutes[*zone] = parse_minutes(record.get(*col).unwrap_or(""));
        }

        let mut day = Day::new(date, minutes);
        if let Some(marker) = columns
            .kind
            .and_then(|col| record.get(col))
            .and_then(classify_type_cell)
        {
            day = day.with_competition(marker);
        }
        days.push(day);
    }

    let calendar = CalendarTable::from_unsorted(days).context("building baseline calendar")?;
    debug!(
        days = calendar.len(),
        competitions = calendar.days().iter().filter(|d| d.is_competition).count(),
        "loaded baseline calendar"
    );
    Ok(calendar)
}

/// Load a baseline calendar from a CSV file.
pub fn load_baseline_csv(path: impl AsRef<Path>) -> Result<CalendarTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_baseline_csv(file).with_context(|| format!("parsing {}", path.display()))
}
