//! periodize-ingest: tabular I/O for baseline calendars, competition lists and generated plans.

pub mod baseline;
pub mod competitions;
pub mod export;
pub mod loads;
pub mod types;

pub use baseline::{load_baseline_csv, parse_baseline_csv};
pub use competitions::{load_competitions_csv, parse_competitions_csv};
pub use export::{
    export_workbook, weekly_summary, write_plan_csv, write_plan_json, write_weekly_summary_csv,
    WeekSummary, WorkbookPaths,
};
pub use loads::{load_daily_minutes_csv, parse_daily_minutes_csv};
pub use types::BaselineColumns;
