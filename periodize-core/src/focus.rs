//! Focus days: concentrate weekly Z4/Z5 work on two days.

use crate::calendar::{CalendarTable, WeekTheme};
use crate::patterns::FocusPattern;
use crate::zone::Zone;

/// Positions (within a week) of the two focus days: the middle day and the
/// second-to-last day. A single-day week focuses its only day.
pub fn focus_positions(week_len: usize) -> [usize; 2] {
    let middle = week_len / 2;
    let second = if week_len >= 2 { week_len - 2 } else { week_len.saturating_sub(1) };
    [middle, second]
}

/// Multiply Z4/Z5 by the high multiplier on focus days and by the low
/// multiplier on the rest of the week. Recovery weeks are left alone.
pub fn enforce_focus_days(mut calendar: CalendarTable, pattern: &FocusPattern) -> CalendarTable {
    for week in calendar.week_ranges() {
        let days = &mut calendar.days_mut()[week];
        if days.is_empty() {
            continue;
        }

        let recovery = days
            .iter()
            .filter(|d| d.week_theme == Some(WeekTheme::Recovery))
            .count();
        if recovery as f64 >= days.len() as f64 / 2.0 {
            continue;
        }

        let focus = focus_positions(days.len());
        for (i, day) in days.iter_mut().enumerate() {
            let factor = if focus.contains(&i) {
                pattern.high_multiplier
            } else {
                pattern.low_multiplier
            };
            for zone in Zone::HIGH_INTENSITY {
                day.zone_minutes[zone] *= factor;
            }
        }
    }

    calendar
}
