//! Competition-day minutes: short race-specific Z5 with warm-up and cool-down.

use rand::Rng;
use std::ops::RangeInclusive;

use crate::calendar::CalendarTable;
use crate::competition::CompetitionEntry;
use crate::zone::{Zone, ZoneMinutes};

/// Draw ranges in draw order. The order is part of the reproducibility contract.
pub const START_DAY_RANGES: [(Zone, RangeInclusive<f64>); 6] = [
    (Zone::Z5, 10.0..=15.0),
    (Zone::Z4, 3.0..=6.0),
    (Zone::Z1, 15.0..=30.0),
    (Zone::Z2, 0.0..=5.0),
    (Zone::Z3, 0.0..=5.0),
    (Zone::Strength, 0.0..=5.0),
];

/// Draw one competition day's minutes.
pub fn draw_start_day<R: Rng>(rng: &mut R) -> ZoneMinutes {
    let mut minutes = ZoneMinutes::zero();
    for (zone, range) in START_DAY_RANGES {
        minutes[zone] = rng.gen_range(range);
    }
    minutes
}

/// Overwrite every competition day present in the calendar, in the order of
/// `competitions`. Dates missing from the calendar consume no draws.
pub fn enforce_start_days<R: Rng>(
    mut calendar: CalendarTable,
    competitions: &[CompetitionEntry],
    rng: &mut R,
) -> CalendarTable {
    for entry in competitions {
        let Some(day) = calendar.get_mut(entry.date) else {
            continue;
        };
        day.zone_minutes = draw_start_day(rng);
        day.is_competition = true;
        day.competition_kind = Some(entry.kind);
    }

    calendar
}
