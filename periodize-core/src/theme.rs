//! Weekly training themes.

use crate::calendar::{CalendarTable, WeekTheme};
use crate::zone::Zone;

/// Theme for 0-based week `w`.
///
/// Recovery is checked before Strength, so a week matching both rules
/// (e.g. week 7) is a recovery week.
pub fn theme_for_week(w: i64) -> WeekTheme {
    if w.rem_euclid(4) == 3 {
        WeekTheme::Recovery
    } else if w.rem_euclid(3) == 1 {
        WeekTheme::Strength
    } else {
        WeekTheme::Endurance
    }
}

/// Label every day with its week theme and scale its zones accordingly.
pub fn assign_week_themes(mut calendar: CalendarTable) -> CalendarTable {
    let weeks: Vec<i64> = calendar
        .days()
        .iter()
        .map(|d| calendar.week_index(d.date))
        .collect();

    for (day, w) in calendar.days_mut().iter_mut().zip(weeks) {
        let theme = theme_for_week(w);
        let zones = &mut day.zone_minutes;
        match theme {
            WeekTheme::Endurance => {
                zones[Zone::Z1] *= 1.05;
                zones[Zone::Z2] *= 1.05;
            }
            WeekTheme::Strength => {
                zones[Zone::Strength] *= 1.2;
            }
            WeekTheme::Recovery => {
                zones.scale(0.5);
            }
        }
        day.week_theme = Some(theme);
    }

    calendar
}
