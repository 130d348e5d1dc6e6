//! periodize-core: calendar-transformation engine for periodized training plans

pub mod calendar;
pub mod competition;
pub mod config;
pub mod dates;
pub mod error;
pub mod estimators;
pub mod focus;
pub mod patterns;
pub mod phase;
pub mod pipeline;
pub mod start_day;
pub mod taper;
pub mod tercile;
pub mod theme;
pub mod zone;

pub use calendar::{split_thirds, CalendarTable, Day, Phase, WeekTheme};
pub use competition::{normalize_competitions, CompetitionEntry, CompetitionKind, RawCompetition};
pub use config::PlanConfig;
pub use dates::parse_calendar_date;
pub use error::PlanError;
pub use estimators::{acwr, critical_speed_kmh, target_speed_kmh, LoadFlag, TimeTrial};
pub use patterns::{
    derive_focus_pattern, derive_prep_tercile_multipliers, derive_taper_profile, DerivedPatterns,
    FocusPattern, TaperDay, TaperProfile, TercileMultipliers,
};
pub use pipeline::{generate, generate_with_rng, GeneratedPlan};
pub use zone::{Zone, ZoneMinutes};
