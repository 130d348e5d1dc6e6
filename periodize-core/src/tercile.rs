//! Preparatory-phase tercile emphasis.

use crate::calendar::{split_thirds, CalendarTable, Phase};
use crate::patterns::TercileMultipliers;

/// Scale the preparatory days, split into early/mid/late thirds in calendar
/// order, by the matching per-zone multipliers.
pub fn apply_tercile_multipliers(
    mut calendar: CalendarTable,
    multipliers: &TercileMultipliers,
) -> CalendarTable {
    let prep: Vec<usize> = calendar
        .days()
        .iter()
        .enumerate()
        .filter(|(_, d)| d.phase == Some(Phase::Preparatory))
        .map(|(i, _)| i)
        .collect();

    let days = calendar.days_mut();
    for (range, factors) in split_thirds(prep.len()).into_iter().zip(multipliers.as_array()) {
        for &i in &prep[range] {
            days[i].zone_minutes.scale_by(factors);
        }
    }

    calendar
}
