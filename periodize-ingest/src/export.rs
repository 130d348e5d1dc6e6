//! Plan export: a day-by-day plan sheet, a weekly summary sheet, and JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use periodize_core::pipeline::round_minutes;
use periodize_core::{CalendarTable, GeneratedPlan, Zone, ZoneMinutes};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const PLAN_SHEET: &str = "plan.csv";
pub const WEEKLY_SHEET: &str = "weekly_summary.csv";

fn fmt_minutes(v: f64) -> String {
    format!("{v:.1}")
}

/// Header of the plan sheet.
pub fn plan_headers() -> Vec<&'static str> {
    let mut h = vec!["Date", "Week", "Week_theme", "Phase"];
    h.extend(Zone::ALL.iter().map(|z| z.column_name()));
    h.extend(["Total", "Is_Start", "Start_type", "Type", "Days_to_next_start"]);
    h
}

/// Write the day-by-day plan sheet.
pub fn write_plan_csv<W: Write>(plan: &GeneratedPlan, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(plan_headers())?;

    let cal = &plan.calendar;
    for day in cal.days() {
        let mut row = vec![
            day.date.format("%Y-%m-%d").to_string(),
            (cal.week_index(day.date) + 1).to_string(),
            day.week_theme.map(|t| t.label()).unwrap_or("").to_string(),
            day.phase.map(|p| p.label()).unwrap_or("").to_string(),
        ];
        row.extend(day.zone_minutes.iter().map(|(_, v)| fmt_minutes(v)));
        row.push(fmt_minutes(day.total_minutes()));
        row.push(day.is_competition.to_string());
        row.push(day.competition_kind.map(|k| k.label()).unwrap_or("").to_string());
        row.push(day.display_label().to_string());
        row.push(
            day.days_to_next_competition
                .map(|d| d.to_string())
                .unwrap_or_default(),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row of the weekly summary sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    #[serde(rename = "Week")]
    pub week: i64,
    #[serde(rename = "Start")]
    pub start: NaiveDate,
    #[serde(rename = "Theme")]
    pub theme: String,
    #[serde(rename = "Zone 1")]
    pub z1: f64,
    #[serde(rename = "Zone 2")]
    pub z2: f64,
    #[serde(rename = "Zone 3")]
    pub z3: f64,
    #[serde(rename = "Zone 4")]
    pub z4: f64,
    #[serde(rename = "Zone 5")]
    pub z5: f64,
    #[serde(rename = "Strength")]
    pub strength: f64,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Starts")]
    pub starts: usize,
}

/// Aggregate the plan into calendar weeks (7-day blocks from the first day).
pub fn weekly_summary(calendar: &CalendarTable) -> Vec<WeekSummary> {
    let days = calendar.days();
    calendar
        .week_ranges()
        .into_iter()
        .map(|range| {
            let week = &days[range];
            let mut sums = ZoneMinutes::zero();
            for d in week {
                sums.add(&d.zone_minutes);
            }
            let first = &week[0];
            WeekSummary {
                week: calendar.week_index(first.date) + 1,
                start: first.date,
                theme: first.week_theme.map(|t| t.label()).unwrap_or("").to_string(),
                z1: round_minutes(sums[Zone::Z1]),
                z2: round_minutes(sums[Zone::Z2]),
                z3: round_minutes(sums[Zone::Z3]),
                z4: round_minutes(sums[Zone::Z4]),
                z5: round_minutes(sums[Zone::Z5]),
                strength: round_minutes(sums[Zone::Strength]),
                total: round_minutes(sums.total()),
                starts: week.iter().filter(|d| d.is_competition).count(),
            }
        })
        .collect()
}

pub fn write_weekly_summary_csv<W: Write>(plan: &GeneratedPlan, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in weekly_summary(&plan.calendar) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_plan_json<W: Write>(plan: &GeneratedPlan, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, plan).context("serializing plan")?;
    Ok(())
}

/// Paths written by [`export_workbook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookPaths {
    pub plan: PathBuf,
    pub weekly: PathBuf,
}

/// Write every sheet of the plan into `dir` (created if needed).
pub fn export_workbook(plan: &GeneratedPlan, dir: impl AsRef<Path>) -> Result<WorkbookPaths> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let paths = WorkbookPaths {
        plan: dir.join(PLAN_SHEET),
        weekly: dir.join(WEEKLY_SHEET),
    };

    let f = std::fs::File::create(&paths.plan)
        .with_context(|| format!("write {}", paths.plan.display()))?;
    write_plan_csv(plan, f)?;

    let f = std::fs::File::create(&paths.weekly)
        .with_context(|| format!("write {}", paths.weekly.display()))?;
    write_weekly_summary_csv(plan, f)?;

    Ok(paths)
}
