//! Plan pipeline: derive patterns from the baseline, then run every stage in
//! order over an independent working copy.
//!
//! Stage order:
//! 1. capacity scaling
//! 2. week themes
//! 3. focus days
//! 4. phases + trim
//! 5. preparatory terciles
//! 6. taper windows
//! 7. competition days (the only consumer of randomness)
//! 8. finalize: days-to-next, clip, round

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::CalendarTable;
use crate::competition::{normalize_competitions, CompetitionEntry, RawCompetition};
use crate::config::PlanConfig;
use crate::dates::days_between;
use crate::error::PlanError;
use crate::focus::enforce_focus_days;
use crate::patterns::DerivedPatterns;
use crate::phase::finalize_phases_and_trim;
use crate::start_day::enforce_start_days;
use crate::taper::apply_taper;
use crate::tercile::apply_tercile_multipliers;
use crate::theme::assign_week_themes;

/// Output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub calendar: CalendarTable,
    pub patterns: DerivedPatterns,
    pub competitions: Vec<CompetitionEntry>,
    pub capacity_ratio: f64,
}

pub fn capacity_ratio(capacity: f64, reference: f64) -> Result<f64, PlanError> {
    if !capacity.is_finite() || !reference.is_finite() || capacity <= 0.0 || reference <= 0.0 {
        return Err(PlanError::InvalidCapacity { capacity, reference });
    }
    Ok(capacity / reference)
}

/// Multiply every zone of every day by `ratio`.
pub fn scale_by_capacity(mut calendar: CalendarTable, ratio: f64) -> CalendarTable {
    for day in calendar.days_mut() {
        day.zone_minutes.scale(ratio);
    }
    calendar
}

/// Round to one decimal place, ties to even (0.25 -> 0.2, 0.75 -> 0.8).
pub fn round_minutes(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

/// Compute days to the next competition, then clip every zone to >= 0 and
/// round to one decimal.
pub fn finalize(mut calendar: CalendarTable, competitions: &[CompetitionEntry]) -> CalendarTable {
    for day in calendar.days_mut() {
        day.days_to_next_competition = competitions
            .iter()
            .map(|c| days_between(day.date, c.date))
            .filter(|delta| *delta >= 0)
            .min()
            .map(|delta| delta as u32);

        day.zone_minutes = day.zone_minutes.map(|_, v| round_minutes(v.max(0.0)));
    }
    calendar
}

/// Generate a plan with the run's RNG seeded from `config.seed`.
pub fn generate(
    baseline: &CalendarTable,
    capacity: f64,
    competitions: &[RawCompetition],
    config: &PlanConfig,
) -> Result<GeneratedPlan, PlanError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_with_rng(baseline, capacity, competitions, config, &mut rng)
}

/// Generate a plan drawing competition-day minutes from `rng`.
pub fn generate_with_rng<R: Rng>(
    baseline: &CalendarTable,
    capacity: f64,
    competitions: &[RawCompetition],
    config: &PlanConfig,
    rng: &mut R,
) -> Result<GeneratedPlan, PlanError> {
    let window = config.validate_taper_window()?;
    let ratio = capacity_ratio(capacity, config.reference_capacity)?;
    let normalized = normalize_competitions(competitions)?;

    // patterns come from the untouched baseline
    let patterns = DerivedPatterns::derive(baseline, window);
    debug!(
        focus_high = patterns.focus.high_multiplier,
        focus_low = patterns.focus.low_multiplier,
        "derived baseline patterns"
    );

    let calendar = scale_by_capacity(baseline.clone(), ratio);
    let calendar = assign_week_themes(calendar);
    let calendar = enforce_focus_days(calendar, &patterns.focus);
    let calendar = finalize_phases_and_trim(calendar, &normalized);
    let calendar = apply_tercile_multipliers(calendar, &patterns.terciles);
    let calendar = apply_taper(calendar, &normalized, &patterns.taper, ratio);
    let calendar = enforce_start_days(calendar, &normalized, rng);
    let calendar = finalize(calendar, &normalized);

    info!(
        days = calendar.len(),
        competitions = normalized.len(),
        capacity_ratio = ratio,
        "generated training plan"
    );

    Ok(GeneratedPlan {
        calendar,
        patterns,
        competitions: normalized,
        capacity_ratio: ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::test_support::*;
    use crate::calendar::{Day, Phase};
    use crate::competition::CompetitionKind;
    use crate::start_day::START_DAY_RANGES;
    use crate::zone::{Zone, ZoneMinutes};
    use chrono::Duration;

    /// Four weeks with some variety so every derivation has data.
    fn varied_baseline(n: usize) -> CalendarTable {
        let start = ymd(2026, 1, 5);
        let days = (0..n)
            .map(|i| {
                let hi = if i % 7 == 2 { 20.0 } else { 4.0 };
                Day::new(
                    start + Duration::days(i as i64),
                    ZoneMinutes::new(
                        50.0 + (i % 5) as f64,
                        20.0,
                        8.0 + (i % 3) as f64,
                        hi * 0.6,
                        hi * 0.4,
                        if i % 7 == 4 { 30.0 } else { 0.0 },
                    ),
                )
            })
            .collect();
        CalendarTable::new(days).unwrap()
    }

    fn has_one_decimal(v: f64) -> bool {
        ((v * 10.0).round() - v * 10.0).abs() < 1e-6
    }

    #[test]
    fn test_finalize_rounds_half_to_even() {
        let cal = uniform_calendar(1, ZoneMinutes::new(0.25, 2.25, 0.75, 10.25, -3.0, 0.35));
        let out = finalize(cal, &[]);
        let m = out.days()[0].zone_minutes;
        assert_eq!(m[Zone::Z1], 0.2);
        assert_eq!(m[Zone::Z2], 2.2);
        assert_eq!(m[Zone::Z3], 0.8);
        assert_eq!(m[Zone::Z4], 10.2);
        assert_eq!(m[Zone::Z5], 0.0);
        assert_eq!(out.days()[0].days_to_next_competition, None);
    }

    #[test]
    fn test_capacity_ratio_validation() {
        assert_eq!(capacity_ratio(97.5, 65.0).unwrap(), 1.5);
        assert!(capacity_ratio(0.0, 65.0).is_err());
        assert!(capacity_ratio(60.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_window() {
        let baseline = varied_baseline(14);
        for days in [0, 366, u32::MAX] {
            let cfg = PlanConfig::default().with_taper_window(days);
            let result = generate(&baseline, 65.0, &[], &cfg);
            assert_eq!(result, Err(PlanError::InvalidWindow { days, max: 365 }));
        }
    }

    #[test]
    fn test_determinism() {
        let baseline = varied_baseline(42);
        let comps = vec![
            RawCompetition::new("2026-01-25", "Control start"),
            RawCompetition::new("2026-02-14", "Main start"),
        ];
        let cfg = PlanConfig::default().with_seed(1234);
        let a = generate(&baseline, 70.0, &comps, &cfg).unwrap();
        let b = generate(&baseline, 70.0, &comps, &cfg).unwrap();
        assert_eq!(a, b);

        let c = generate(&baseline, 70.0, &comps, &cfg.clone().with_seed(1)).unwrap();
        assert_ne!(a.calendar, c.calendar);
    }

    #[test]
    fn test_baseline_is_not_mutated() {
        let baseline = varied_baseline(28);
        let before = baseline.clone();
        let comps = vec![RawCompetition::new("2026-02-01", "main")];
        generate(&baseline, 80.0, &comps, &PlanConfig::default()).unwrap();
        assert_eq!(baseline, before);
    }

    #[test]
    fn test_output_is_non_negative_and_rounded() {
        let baseline = varied_baseline(35);
        let comps = vec![
            RawCompetition::new("2026-01-20", "control"),
            RawCompetition::new("2026-02-07", "main"),
        ];
        let plan = generate(&baseline, 58.3, &comps, &PlanConfig::default()).unwrap();
        for day in plan.calendar.days() {
            for (_, v) in day.zone_minutes.iter() {
                assert!(v >= 0.0);
                assert!(has_one_decimal(v), "{v} has more than one decimal");
            }
        }
    }

    #[test]
    fn test_single_primary_scenario() {
        // 28 days, Primary on day 28, ratio 1.0
        let baseline = varied_baseline(28);
        let comps = vec![RawCompetition::on(nth_date(28), CompetitionKind::Primary)];
        let plan = generate(&baseline, 65.0, &comps, &PlanConfig::default()).unwrap();
        let cal = &plan.calendar;

        assert_eq!(cal.len(), 28);
        for k in 1..=7u32 {
            let day = cal.get(nth_date(28 - k as usize)).unwrap();
            let expected = plan.patterns.taper.get(k).unwrap().minutes(1.0);
            for zone in Zone::ALL {
                assert!(
                    (day.zone_minutes[zone] - round_minutes(expected[zone])).abs() < 1e-9,
                    "offset {k} {zone:?}"
                );
            }
            assert_eq!(day.days_to_next_competition, Some(k));
        }

        let race = cal.get(nth_date(28)).unwrap();
        assert!(race.is_competition);
        assert_eq!(race.competition_kind, Some(CompetitionKind::Primary));
        assert_eq!(race.days_to_next_competition, Some(0));
        for (zone, range) in START_DAY_RANGES {
            let v = race.zone_minutes[zone];
            // rounding can land exactly on a bound, never past it
            assert!(v >= *range.start() && v <= *range.end(), "{zone:?}={v}");
        }
    }

    #[test]
    fn test_trim_and_phase_partition() {
        let baseline = varied_baseline(60);
        let comps = vec![
            RawCompetition::new("2026-01-31", "Main start"),
            RawCompetition::new("2026-02-21", "Main start"),
            RawCompetition::new("2026-02-28", "Control start"),
        ];
        let plan = generate(&baseline, 65.0, &comps, &PlanConfig::default()).unwrap();
        let days = plan.calendar.days();

        assert_eq!(plan.calendar.last_date(), Some(ymd(2026, 2, 21)));
        let first_comp = days.iter().position(|d| d.phase == Some(Phase::Competition)).unwrap();
        assert!(days[..first_comp].iter().all(|d| d.phase == Some(Phase::Preparatory)));
        assert!(days[first_comp..].iter().all(|d| d.phase == Some(Phase::Competition)));
        assert_eq!(days[first_comp].date, ymd(2026, 1, 31));
        // the control race after the trim point still counts for days-to-next
        assert!(days.iter().all(|d| d.days_to_next_competition.is_some()));
    }

    #[test]
    fn test_no_primary_keeps_full_range() {
        let baseline = varied_baseline(30);
        let comps = vec![RawCompetition::new("2026-01-20", "control")];
        let plan = generate(&baseline, 65.0, &comps, &PlanConfig::default()).unwrap();
        assert_eq!(plan.calendar.len(), 30);
        assert!(plan
            .calendar
            .days()
            .iter()
            .all(|d| d.phase == Some(Phase::Preparatory)));
        assert_eq!(plan.calendar.days().last().unwrap().days_to_next_competition, None);
    }

    #[test]
    fn test_capacity_scaling_runs_first() {
        // capacity 97.5 vs reference 65 → every baseline zone ×1.5 before the
        // theme/focus/tercile stages are layered on
        let baseline = varied_baseline(21);
        let scaled = scale_by_capacity(baseline.clone(), 1.5);
        for (orig, s) in baseline.days().iter().zip(scaled.days()) {
            for zone in Zone::ALL {
                assert!((s.zone_minutes[zone] - orig.zone_minutes[zone] * 1.5).abs() < 1e-9);
            }
        }

        let plan = generate(&baseline, 97.5, &[], &PlanConfig::default()).unwrap();
        let patterns = &plan.patterns;
        let manual = assign_week_themes(scaled);
        let manual = enforce_focus_days(manual, &patterns.focus);
        let manual = finalize_phases_and_trim(manual, &[]);
        let manual = apply_tercile_multipliers(manual, &patterns.terciles);
        let manual = finalize(manual, &[]);
        assert_eq!(plan.calendar, manual);
        assert_eq!(plan.capacity_ratio, 1.5);
    }
}
