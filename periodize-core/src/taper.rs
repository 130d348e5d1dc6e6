//! Taper windows: overwrite the days before each competition.

use chrono::Days;

use crate::calendar::CalendarTable;
use crate::competition::CompetitionEntry;
use crate::patterns::TaperProfile;

/// For every competition and offset `k` in `1..=window`, replace the day at
/// `date - k` with the profile minutes for `k` scaled by `capacity_ratio`.
///
/// Days missing from the calendar (before its start or trimmed away) are skipped.
pub fn apply_taper(
    mut calendar: CalendarTable,
    competitions: &[CompetitionEntry],
    profile: &TaperProfile,
    capacity_ratio: f64,
) -> CalendarTable {
    for entry in competitions {
        for (k, shape) in profile.iter() {
            let Some(date) = entry.date.checked_sub_days(Days::new(u64::from(k))) else {
                break;
            };
            if let Some(day) = calendar.get_mut(date) {
                day.zone_minutes = shape.minutes(capacity_ratio);
            }
        }
    }

    calendar
}
