//! Competition entries: kind classification and normalization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_calendar_date;
use crate::error::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompetitionKind {
    /// Main race: bounds phases and trimming.
    Primary,
    /// Tune-up race.
    Control,
}

impl CompetitionKind {
    /// Legacy display label.
    pub fn label(&self) -> &'static str {
        match self {
            CompetitionKind::Primary => "Main start",
            CompetitionKind::Control => "Control start",
        }
    }

    /// Classify a free-text kind. Anything that does not name a main race is
    /// treated as a control race.
    pub fn classify(raw: &str) -> CompetitionKind {
        Self::detect(raw).unwrap_or(CompetitionKind::Control)
    }

    /// Strict keyword detection (English and Bulgarian).
    /// Returns `None` when the text names neither kind.
    pub fn detect(raw: &str) -> Option<CompetitionKind> {
        let t = raw.trim().to_lowercase();
        if t.contains("main") || t.contains("primary") || t.contains("основ") {
            return Some(CompetitionKind::Primary);
        }
        if t.contains("control") || t.contains("контрол") {
            return Some(CompetitionKind::Control);
        }
        None
    }
}

/// Competition as supplied by a caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompetition {
    pub date: String,
    #[serde(alias = "type")]
    pub kind: String,
}

impl RawCompetition {
    pub fn new(date: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
        }
    }

    pub fn on(date: NaiveDate, kind: CompetitionKind) -> Self {
        Self::new(date.format("%Y-%m-%d").to_string(), kind.label())
    }

    /// Parse `DATE:KIND` (kind optional, defaults to control).
    pub fn parse_pair(s: &str) -> Self {
        match s.split_once(':') {
            Some((date, kind)) => Self::new(date.trim(), kind.trim()),
            None => Self::new(s.trim(), ""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionEntry {
    pub date: NaiveDate,
    pub kind: CompetitionKind,
}

impl CompetitionEntry {
    pub fn new(date: NaiveDate, kind: CompetitionKind) -> Self {
        Self { date, kind }
    }
}

/// Parse, classify, dedupe (Primary wins on a shared date) and sort ascending.
pub fn normalize_competitions(raw: &[RawCompetition]) -> Result<Vec<CompetitionEntry>, PlanError> {
    let mut entries = raw
        .iter()
        .map(|c| {
            Ok(CompetitionEntry {
                date: parse_calendar_date(&c.date)?,
                kind: CompetitionKind::classify(&c.kind),
            })
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    // date asc, then Primary before Control; stable so input order breaks remaining ties
    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.kind.cmp(&b.kind)));
    entries.dedup_by_key(|e| e.date);

    Ok(entries)
}

/// Earliest and latest Primary competition dates.
pub fn primary_bounds(entries: &[CompetitionEntry]) -> Option<(NaiveDate, NaiveDate)> {
    let mut primaries = entries
        .iter()
        .filter(|e| e.kind == CompetitionKind::Primary)
        .map(|e| e.date);
    let first = primaries.next()?;
    let (min, max) = primaries.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some((min, max))
}
