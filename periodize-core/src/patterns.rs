//! Pattern extraction: statistical profiles derived from the baseline calendar.
//!
//! All three derivations are pure functions of the untouched baseline. Each
//! one has a single insufficient-data branch that returns a named default.

use chrono::Days;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::calendar::{split_thirds, CalendarTable};
use crate::competition::CompetitionKind;
use crate::zone::{Zone, ZoneMinutes};

pub const DEFAULT_TAPER_WINDOW: u32 = 7;

/// Proportions used for an offset with no usable observations.
pub const DEFAULT_OFFSET_PROPORTIONS: ZoneMinutes =
    ZoneMinutes::new(0.60, 0.25, 0.10, 0.04, 0.01, 0.0);

/// Recovery-weighted proportions used when the baseline marks no competitions.
pub const CONSERVATIVE_TAPER_PROPORTIONS: ZoneMinutes =
    ZoneMinutes::new(0.55, 0.25, 0.12, 0.06, 0.02, 0.0);

pub const DEFAULT_FOCUS_PATTERN: FocusPattern = FocusPattern {
    high_multiplier: 1.5,
    low_multiplier: 0.7,
};

pub const DEFAULT_TERCILE_MULTIPLIERS: TercileMultipliers = TercileMultipliers {
    early: ZoneMinutes::new(1.05, 1.03, 0.95, 0.90, 0.85, 1.00),
    mid: ZoneMinutes::new(0.98, 1.02, 1.05, 1.08, 1.05, 1.05),
    late: ZoneMinutes::new(0.95, 1.00, 1.08, 1.12, 1.10, 1.05),
};

/// Linearly decreasing default total for taper offset `k` (1-based).
pub fn default_taper_total(k: u32) -> f64 {
    60.0 - (k as f64 - 1.0) * 5.0
}

/// Taper shape for one offset before a competition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaperDay {
    pub total_minutes: f64,
    /// Sums to 1.0.
    pub zone_proportions: ZoneMinutes,
}

impl TaperDay {
    /// Minutes per zone for this offset, scaled by `capacity_ratio`.
    pub fn minutes(&self, capacity_ratio: f64) -> ZoneMinutes {
        let target = self.total_minutes * capacity_ratio;
        self.zone_proportions.map(|_, p| target * p)
    }
}

/// Offset (days before a competition, 1..=window) → taper shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaperProfile {
    offsets: BTreeMap<u32, TaperDay>,
}

impl TaperProfile {
    /// Conservative decreasing profile used when nothing can be learned.
    pub fn conservative(window_size: u32) -> Self {
        let offsets = (1..=window_size)
            .map(|k| {
                (
                    k,
                    TaperDay {
                        total_minutes: default_taper_total(k),
                        zone_proportions: CONSERVATIVE_TAPER_PROPORTIONS,
                    },
                )
            })
            .collect();
        Self { offsets }
    }

    pub fn window_size(&self) -> u32 {
        self.offsets.keys().next_back().copied().unwrap_or(0)
    }

    pub fn get(&self, offset: u32) -> Option<&TaperDay> {
        self.offsets.get(&offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &TaperDay)> {
        self.offsets.iter().map(|(k, v)| (*k, v))
    }
}

/// How strongly Z4/Z5 minutes concentrate on focus days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusPattern {
    pub high_multiplier: f64,
    pub low_multiplier: f64,
}

impl FocusPattern {
    /// Map a peak-to-mean ratio onto bounded multipliers.
    pub fn from_ratio(ratio: f64) -> Self {
        let r = ratio.clamp(1.2, 2.0);
        let high = (1.2 + (r - 1.2) * 0.5).min(1.7);
        let low = (1.0 - (high - 1.0) * 0.6).max(0.6);
        Self {
            high_multiplier: high,
            low_multiplier: low,
        }
    }
}

impl Default for FocusPattern {
    fn default() -> Self {
        DEFAULT_FOCUS_PATTERN
    }
}

/// Per-zone multipliers for the early/mid/late preparatory terciles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TercileMultipliers {
    pub early: ZoneMinutes,
    pub mid: ZoneMinutes,
    pub late: ZoneMinutes,
}

impl TercileMultipliers {
    pub fn as_array(&self) -> [&ZoneMinutes; 3] {
        [&self.early, &self.mid, &self.late]
    }
}

impl Default for TercileMultipliers {
    fn default() -> Self {
        DEFAULT_TERCILE_MULTIPLIERS
    }
}

/// The three baseline profiles, derived once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPatterns {
    pub taper: TaperProfile,
    pub focus: FocusPattern,
    pub terciles: TercileMultipliers,
}

impl DerivedPatterns {
    pub fn derive(baseline: &CalendarTable, window_size: u32) -> Self {
        Self {
            taper: derive_taper_profile(baseline, window_size),
            focus: derive_focus_pattern(baseline),
            terciles: derive_prep_tercile_multipliers(baseline),
        }
    }
}

#[derive(Default)]
struct OffsetAccumulator {
    total_sum: f64,
    proportion_sum: ZoneMinutes,
    count: usize,
}

/// Average day total and zone proportions by offset before each baseline competition.
pub fn derive_taper_profile(baseline: &CalendarTable, window_size: u32) -> TaperProfile {
    let competition_dates: Vec<_> = baseline
        .days()
        .iter()
        .filter(|d| d.is_competition)
        .map(|d| d.date)
        .collect();

    let mut acc: BTreeMap<u32, OffsetAccumulator> = BTreeMap::new();
    for date in &competition_dates {
        for k in 1..=window_size {
            // past the earliest representable date every larger offset is too
            let Some(prior) = date.checked_sub_days(Days::new(u64::from(k))) else {
                break;
            };
            let Some(day) = baseline.get(prior) else {
                continue;
            };
            let total = day.total_minutes();
            let proportions = if total > 0.0 {
                day.zone_minutes.map(|_, v| v / total)
            } else {
                ZoneMinutes::zero()
            };
            let slot = acc.entry(k).or_default();
            slot.total_sum += total;
            slot.proportion_sum.add(&proportions);
            slot.count += 1;
        }
    }

    if acc.is_empty() {
        debug!(
            competitions = competition_dates.len(),
            "no taper windows in baseline; using conservative taper profile"
        );
        return TaperProfile::conservative(window_size);
    }

    let offsets = (1..=window_size)
        .map(|k| {
            let day = match acc.get(&k) {
                Some(slot) => {
                    let n = slot.count as f64;
                    let mean = slot.proportion_sum.map(|_, v| v / n);
                    let sum = mean.total();
                    TaperDay {
                        total_minutes: slot.total_sum / n,
                        zone_proportions: if sum > 0.0 {
                            mean.map(|_, v| v / sum)
                        } else {
                            DEFAULT_OFFSET_PROPORTIONS
                        },
                    }
                }
                None => TaperDay {
                    total_minutes: default_taper_total(k),
                    zone_proportions: DEFAULT_OFFSET_PROPORTIONS,
                },
            };
            (k, day)
        })
        .collect();

    TaperProfile { offsets }
}

/// Estimate how much weekly Z4+Z5 load concentrates on the peak day.
pub fn derive_focus_pattern(baseline: &CalendarTable) -> FocusPattern {
    let days = baseline.days();
    let mut ratios = Vec::new();

    for week in baseline.week_ranges() {
        let hi: Vec<f64> = days[week].iter().map(|d| d.zone_minutes.high_intensity()).collect();
        let sum: f64 = hi.iter().sum();
        if sum <= 0.0 {
            continue;
        }
        let peak = hi.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let others = sum - peak;
        if others > 0.0 {
            let mean_others = others / (hi.len().saturating_sub(1).max(1) as f64);
            ratios.push(peak / mean_others);
        }
    }

    if ratios.is_empty() {
        debug!("no weeks with spread high-intensity load; using default focus pattern");
        return DEFAULT_FOCUS_PATTERN;
    }

    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    FocusPattern::from_ratio(mean)
}

/// Relative zone emphasis across the preparatory terciles (days before the
/// first Primary competition).
pub fn derive_prep_tercile_multipliers(baseline: &CalendarTable) -> TercileMultipliers {
    let first_primary = baseline
        .days()
        .iter()
        .find(|d| d.is_competition && d.competition_kind == Some(CompetitionKind::Primary))
        .map(|d| d.date);

    let prep: &[_] = match first_primary {
        Some(date) => {
            let end = baseline.days().partition_point(|d| d.date < date);
            &baseline.days()[..end]
        }
        None => &[],
    };

    let sums: Vec<ZoneMinutes> = split_thirds(prep.len())
        .into_iter()
        .filter(|r| !r.is_empty())
        .map(|r| {
            let mut s = ZoneMinutes::zero();
            for day in &prep[r] {
                s.add(&day.zone_minutes);
            }
            s
        })
        .collect();

    if sums.len() < 3 {
        debug!(
            prep_days = prep.len(),
            "not enough preparatory data; using default tercile multipliers"
        );
        return DEFAULT_TERCILE_MULTIPLIERS;
    }

    let mut grand = ZoneMinutes::zero();
    for s in &sums {
        grand.add(s);
    }

    let multipliers: Vec<ZoneMinutes> = sums
        .iter()
        .map(|s| {
            s.map(|zone, v| {
                let total = grand[zone];
                if total <= 0.0 {
                    return 1.0;
                }
                let proportion = v / total;
                // the three proportions of a zone sum to 1, so their mean is 1/3
                let mean = 1.0 / 3.0;
                (0.8 + (proportion / mean) * 0.2).clamp(0.85, 1.15)
            })
        })
        .collect();

    TercileMultipliers {
        early: multipliers[0],
        mid: multipliers[1],
        late: multipliers[2],
    }
}

/// Zone-wise view used in reports.
pub fn describe_zone_table(table: &ZoneMinutes) -> String {
    Zone::ALL
        .iter()
        .map(|z| format!("{}={:.3}", z.column_name(), table[*z]))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::test_support::*;
    use crate::calendar::Day;
    use crate::competition::CompetitionKind;
    use chrono::{Duration, NaiveDate};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_taper_defaults_without_competitions() {
        let cal = uniform_calendar(21, ZoneMinutes::splat(10.0));
        let profile = derive_taper_profile(&cal, 7);
        assert_eq!(profile, TaperProfile::conservative(7));
        assert_eq!(profile.window_size(), 7);
        assert_close(profile.get(1).unwrap().total_minutes, 60.0);
        assert_close(profile.get(7).unwrap().total_minutes, 30.0);
        assert_close(profile.get(3).unwrap().zone_proportions.total(), 1.0);
    }

    #[test]
    fn test_taper_averages_by_offset() {
        let mut days = uniform_calendar(20, ZoneMinutes::new(60.0, 20.0, 0.0, 0.0, 0.0, 20.0)).into_days();
        // two competitions; day before the second one is different
        days[9] = days[9].clone().with_competition(Some(CompetitionKind::Control));
        days[19] = days[19].clone().with_competition(Some(CompetitionKind::Primary));
        days[18].zone_minutes = ZoneMinutes::new(20.0, 0.0, 0.0, 0.0, 20.0, 0.0);
        let cal = CalendarTable::new(days).unwrap();

        let profile = derive_taper_profile(&cal, 7);
        let k1 = profile.get(1).unwrap();
        assert_close(k1.total_minutes, (100.0 + 40.0) / 2.0);
        // mean of (0.6,0.2,..,0.2) and (0.5,..,0.5,..)
        assert_close(k1.zone_proportions[Zone::Z1], 0.55);
        assert_close(k1.zone_proportions[Zone::Z5], 0.25);
        assert_close(k1.zone_proportions[Zone::Strength], 0.1);
        assert_close(k1.zone_proportions.total(), 1.0);

        let k5 = profile.get(5).unwrap();
        assert_close(k5.total_minutes, 100.0);
        assert_close(k5.zone_proportions[Zone::Z1], 0.6);
    }

    #[test]
    fn test_taper_fills_missing_offsets_and_zero_days() {
        let mut days = uniform_calendar(4, ZoneMinutes::zero()).into_days();
        days[3] = days[3].clone().with_competition(Some(CompetitionKind::Primary));
        let cal = CalendarTable::new(days).unwrap();

        let profile = derive_taper_profile(&cal, 7);
        // offsets 1..3 observed but all-zero days
        let k1 = profile.get(1).unwrap();
        assert_close(k1.total_minutes, 0.0);
        assert_eq!(k1.zone_proportions, DEFAULT_OFFSET_PROPORTIONS);
        // offset 4.. never observed
        let k6 = profile.get(6).unwrap();
        assert_close(k6.total_minutes, 35.0);
        assert_eq!(k6.zone_proportions, DEFAULT_OFFSET_PROPORTIONS);
    }

    #[test]
    fn test_focus_defaults_without_high_intensity() {
        let cal = uniform_calendar(14, ZoneMinutes::new(60.0, 10.0, 5.0, 0.0, 0.0, 0.0));
        assert_eq!(derive_focus_pattern(&cal), DEFAULT_FOCUS_PATTERN);
    }

    #[test]
    fn test_focus_pattern_from_peaked_weeks() {
        let mut days = uniform_calendar(7, ZoneMinutes::new(60.0, 0.0, 0.0, 5.0, 0.0, 0.0)).into_days();
        days[2].zone_minutes[Zone::Z4] = 10.0;
        days[2].zone_minutes[Zone::Z5] = 5.0;
        let cal = CalendarTable::new(days).unwrap();

        // peak 15 vs mean of the other six days 5 → ratio 3.0, clipped to 2.0
        let p = derive_focus_pattern(&cal);
        assert_close(p.high_multiplier, 1.6);
        assert_close(p.low_multiplier, 1.0 - 0.6 * 0.6);
    }

    #[test]
    fn test_focus_ratio_mapping_bounds() {
        let low = FocusPattern::from_ratio(0.5);
        assert_close(low.high_multiplier, 1.2);
        assert_close(low.low_multiplier, 0.88);
        let mid = FocusPattern::from_ratio(1.6);
        assert_close(mid.high_multiplier, 1.4);
        assert!(mid.low_multiplier >= 0.6 && mid.low_multiplier <= 1.0);
    }

    #[test]
    fn test_terciles_default_without_primary() {
        let cal = uniform_calendar(30, ZoneMinutes::splat(10.0));
        assert_eq!(derive_prep_tercile_multipliers(&cal), DEFAULT_TERCILE_MULTIPLIERS);
    }

    #[test]
    fn test_terciles_default_with_short_prep() {
        let mut days = uniform_calendar(5, ZoneMinutes::splat(10.0)).into_days();
        days[2] = days[2].clone().with_competition(Some(CompetitionKind::Primary));
        let cal = CalendarTable::new(days).unwrap();
        // two prep days → only two non-empty terciles
        assert_eq!(derive_prep_tercile_multipliers(&cal), DEFAULT_TERCILE_MULTIPLIERS);
    }

    #[test]
    fn test_terciles_flat_baseline_is_neutral() {
        let mut days = uniform_calendar(10, ZoneMinutes::new(30.0, 20.0, 10.0, 5.0, 5.0, 0.0)).into_days();
        days[9] = days[9].clone().with_competition(Some(CompetitionKind::Primary));
        let cal = CalendarTable::new(days).unwrap();

        let m = derive_prep_tercile_multipliers(&cal);
        // equal thirds everywhere; Strength has a zero total and stays neutral
        for (_, v) in m.early.iter().chain(m.mid.iter()).chain(m.late.iter()) {
            assert_close(v, 1.0);
        }
    }

    #[test]
    fn test_terciles_track_load_growth() {
        let start = ymd(2026, 1, 5);
        let mut days: Vec<Day> = (0..10)
            .map(|i| {
                let z4 = if i < 3 { 0.0 } else if i < 6 { 5.0 } else { 20.0 };
                Day::new(start + Duration::days(i), ZoneMinutes::new(30.0, 0.0, 0.0, z4, 0.0, 0.0))
            })
            .collect();
        days[9] = days[9].clone().with_competition(Some(CompetitionKind::Primary));
        let cal = CalendarTable::new(days).unwrap();

        let m = derive_prep_tercile_multipliers(&cal);
        // Z4 is concentrated late: early clipped low, late clipped high
        assert_close(m.early[Zone::Z4], 0.85);
        assert_close(m.late[Zone::Z4], 1.15);
        for table in m.as_array() {
            for (_, v) in table.iter() {
                assert!((0.85..=1.15).contains(&v));
            }
        }
    }

    #[test]
    fn test_long_window_at_earliest_date() {
        let start = NaiveDate::MIN;
        let mut days: Vec<Day> = (0..10)
            .map(|i| Day::new(start + Duration::days(i), ZoneMinutes::splat(10.0)))
            .collect();
        days[4] = days[4].clone().with_competition(Some(CompetitionKind::Primary));
        let baseline = CalendarTable::new(days).unwrap();

        let profile = derive_taper_profile(&baseline, 365);
        assert_eq!(profile.window_size(), 365);
        // four learned offsets, the rest from the fallback table
        assert_close(profile.get(4).unwrap().total_minutes, 60.0);
        assert_close(profile.get(5).unwrap().total_minutes, default_taper_total(5));
    }
}
