//! Calendar model: a day-by-day training schedule.
//!
//! Days are kept in strictly increasing date order; every stage of the plan
//! pipeline relies on that to compute weeks, phases and taper windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::competition::CompetitionKind;
use crate::error::PlanError;
use crate::zone::ZoneMinutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Preparatory,
    Competition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekTheme {
    Endurance,
    Strength,
    Recovery,
}

impl WeekTheme {
    pub fn label(&self) -> &'static str {
        match self {
            WeekTheme::Endurance => "endurance",
            WeekTheme::Strength => "strength",
            WeekTheme::Recovery => "recovery",
        }
    }
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Preparatory => "Preparatory",
            Phase::Competition => "Competition",
        }
    }
}

/// One calendar day of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub zone_minutes: ZoneMinutes,
    pub is_competition: bool,
    pub competition_kind: Option<CompetitionKind>,
    /// Unset until phases are assigned.
    pub phase: Option<Phase>,
    pub week_theme: Option<WeekTheme>,
    pub days_to_next_competition: Option<u32>,
}

impl Day {
    pub fn new(date: NaiveDate, zone_minutes: ZoneMinutes) -> Self {
        Self {
            date,
            zone_minutes,
            is_competition: false,
            competition_kind: None,
            phase: None,
            week_theme: None,
            days_to_next_competition: None,
        }
    }

    pub fn with_competition(mut self, kind: Option<CompetitionKind>) -> Self {
        self.is_competition = true;
        self.competition_kind = kind;
        self
    }

    /// Legacy "Type" label: the competition kind on competition days, empty otherwise.
    pub fn display_label(&self) -> &'static str {
        match (self.is_competition, self.competition_kind) {
            (true, Some(kind)) => kind.label(),
            _ => "",
        }
    }

    pub fn total_minutes(&self) -> f64 {
        self.zone_minutes.total()
    }
}

/// Ordered sequence of days, dates strictly increasing.
///
/// Serialized as a plain list of days; deserialization goes through
/// [`CalendarTable::new`] and rejects unordered or duplicate dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Day>", into = "Vec<Day>")]
pub struct CalendarTable {
    days: Vec<Day>,
}

impl CalendarTable {
    /// Build a table from days already in chronological order.
    pub fn new(days: Vec<Day>) -> Result<Self, PlanError> {
        if days.is_empty() {
            return Err(PlanError::EmptyCalendar);
        }
        for (row, pair) in days.windows(2).enumerate() {
            let (prev, cur) = (pair[0].date, pair[1].date);
            if cur == prev {
                return Err(PlanError::DuplicateDate(cur));
            }
            if cur < prev {
                return Err(PlanError::UnorderedCalendar {
                    row: row + 1,
                    previous: prev,
                    date: cur,
                });
            }
        }
        Ok(Self { days })
    }

    /// Build a table from days in any order; duplicates are still rejected.
    pub fn from_unsorted(mut days: Vec<Day>) -> Result<Self, PlanError> {
        days.sort_by_key(|d| d.date);
        Self::new(days)
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn days_mut(&mut self) -> &mut [Day] {
        &mut self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.days.binary_search_by_key(&date, |d| d.date).ok()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Day> {
        self.position(date).map(|i| &self.days[i])
    }

    pub fn get_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        self.position(date).map(move |i| &mut self.days[i])
    }

    /// 0-based week index of `date`, counted in 7-day blocks from the first day.
    pub fn week_index(&self, date: NaiveDate) -> i64 {
        match self.first_date() {
            Some(start) => (date - start).num_days().div_euclid(7),
            None => 0,
        }
    }

    /// Index ranges of consecutive days sharing a week index.
    pub fn week_ranges(&self) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut start = 0;
        for i in 1..=self.days.len() {
            let boundary = i == self.days.len()
                || self.week_index(self.days[i].date) != self.week_index(self.days[start].date);
            if boundary {
                out.push(start..i);
                start = i;
            }
        }
        out
    }

    /// Keep only the days matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Day) -> bool) {
        self.days.retain(keep);
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }
}

impl TryFrom<Vec<Day>> for CalendarTable {
    type Error = PlanError;

    fn try_from(days: Vec<Day>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<CalendarTable> for Vec<Day> {
    fn from(table: CalendarTable) -> Self {
        table.days
    }
}

/// Split `len` items into three contiguous groups whose sizes differ by at
/// most one; the leading groups take the remainder.
pub fn split_thirds(len: usize) -> [Range<usize>; 3] {
    let base = len / 3;
    let extra = len % 3;
    let sizes = [
        base + usize::from(extra > 0),
        base + usize::from(extra > 1),
        base,
    ];
    let a = sizes[0];
    let b = a + sizes[1];
    [0..a, a..b, b..len]
}
