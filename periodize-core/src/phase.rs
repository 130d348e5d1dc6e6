//! Phase assignment and trimming around Primary competitions.

use tracing::debug;

use crate::calendar::{CalendarTable, Phase};
use crate::competition::{primary_bounds, CompetitionEntry};

/// Stamp competitions, classify phases and trim after the last Primary.
///
/// Any competition flags carried over from the baseline are cleared first;
/// only `competitions` (already normalized) mark competition days.
pub fn finalize_phases_and_trim(
    mut calendar: CalendarTable,
    competitions: &[CompetitionEntry],
) -> CalendarTable {
    for day in calendar.days_mut() {
        day.is_competition = false;
        day.competition_kind = None;
    }
    for entry in competitions {
        if let Some(day) = calendar.get_mut(entry.date) {
            day.is_competition = true;
            day.competition_kind = Some(entry.kind);
        }
    }

    let bounds = primary_bounds(competitions);
    for day in calendar.days_mut() {
        day.phase = Some(match bounds {
            Some((first, _)) if day.date >= first => Phase::Competition,
            _ => Phase::Preparatory,
        });
    }

    if let Some((_, last)) = bounds {
        let before = calendar.len();
        calendar.retain(|d| d.date <= last);
        debug!(
            last_primary = %last,
            dropped = before - calendar.len(),
            "trimmed calendar after last primary competition"
        );
    }

    calendar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::test_support::*;
    use crate::competition::CompetitionKind;
    use crate::zone::ZoneMinutes;

    #[test]
    fn test_no_primary_keeps_everything_preparatory() {
        let cal = uniform_calendar(20, ZoneMinutes::splat(1.0));
        let comps = vec![CompetitionEntry::new(nth_date(10), CompetitionKind::Control)];
        let out = finalize_phases_and_trim(cal, &comps);

        assert_eq!(out.len(), 20);
        assert!(out.days().iter().all(|d| d.phase == Some(Phase::Preparatory)));
        assert!(out.days()[9].is_competition);
        assert_eq!(out.days()[9].display_label(), "Control start");
    }

    #[test]
    fn test_phase_split_and_trim() {
        let cal = uniform_calendar(40, ZoneMinutes::splat(1.0));
        let comps = vec![
            CompetitionEntry::new(nth_date(12), CompetitionKind::Control),
            CompetitionEntry::new(nth_date(20), CompetitionKind::Primary),
            CompetitionEntry::new(nth_date(30), CompetitionKind::Primary),
            CompetitionEntry::new(nth_date(35), CompetitionKind::Control),
        ];
        let out = finalize_phases_and_trim(cal, &comps);

        // last primary day is kept, everything after dropped
        assert_eq!(out.len(), 30);
        assert_eq!(out.last_date(), Some(nth_date(30)));

        let days = out.days();
        assert!(days[..19].iter().all(|d| d.phase == Some(Phase::Preparatory)));
        assert!(days[19..].iter().all(|d| d.phase == Some(Phase::Competition)));
        assert_eq!(days[19].competition_kind, Some(CompetitionKind::Primary));
        assert_eq!(days.iter().filter(|d| d.is_competition).count(), 3);
    }

    #[test]
    fn test_baseline_flags_are_cleared() {
        let mut days = uniform_calendar(10, ZoneMinutes::zero()).into_days();
        days[4] = days[4].clone().with_competition(Some(CompetitionKind::Primary));
        let cal = CalendarTable::new(days).unwrap();

        let out = finalize_phases_and_trim(cal, &[]);
        assert!(out.days().iter().all(|d| !d.is_competition && d.competition_kind.is_none()));
        assert_eq!(out.len(), 10);
    }
}
