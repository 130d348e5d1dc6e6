//! Standalone load and speed estimators.
//!
//! These sit beside the plan pipeline: critical speed from two time trials,
//! the acute:chronic workload ratio, and the target-speed bands derived from
//! critical speed.

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// ACWR at or above this value flags a load spike.
pub const ACWR_HIGH_LOAD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeTrial {
    pub distance_m: f64,
    pub time_s: f64,
}

impl TimeTrial {
    pub fn new(distance_m: f64, time_s: f64) -> Self {
        Self { distance_m, time_s }
    }
}

/// Critical speed in km/h: the slope of distance over time between two trials.
///
/// `None` when both trials share the same duration (the slope is undefined).
pub fn critical_speed_kmh(a: TimeTrial, b: TimeTrial) -> Option<f64> {
    let dt = b.time_s - a.time_s;
    if dt == 0.0 || !dt.is_finite() {
        return None;
    }
    let mps = (b.distance_m - a.distance_m) / dt;
    Some(mps * 3.6)
}

/// Acute:chronic workload ratio from daily minutes (oldest first).
///
/// Acute load is the sum of the last 7 entries, chronic load the sum of the
/// last 28 divided by 4. `None` when the chronic load is zero or negative.
pub fn acwr(daily_minutes: &[f64]) -> Option<f64> {
    let tail = |n: usize| -> f64 {
        daily_minutes[daily_minutes.len().saturating_sub(n)..]
            .iter()
            .sum()
    };
    let load7 = tail(7);
    let load28 = tail(28);
    if load28 <= 0.0 {
        return None;
    }
    Some(load7 / (load28 / 4.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadFlag {
    Ok,
    HighLoad,
}

impl LoadFlag {
    /// Undefined ratios are not flagged.
    pub fn from_acwr(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r >= ACWR_HIGH_LOAD => LoadFlag::HighLoad,
            _ => LoadFlag::Ok,
        }
    }
}

/// Fraction-of-critical-speed band for an intensity zone. Strength has none.
pub fn speed_band_fraction(zone: Zone) -> Option<(f64, f64)> {
    match zone {
        Zone::Z1 => Some((0.60, 0.75)),
        Zone::Z2 => Some((0.76, 0.80)),
        Zone::Z3 => Some((0.81, 0.88)),
        Zone::Z4 => Some((0.89, 0.95)),
        Zone::Z5 => Some((0.96, 1.05)),
        Zone::Strength => None,
    }
}

/// Target speed range (km/h) for `zone` given critical speed.
pub fn target_speed_kmh(zone: Zone, critical_speed_kmh: f64) -> Option<(f64, f64)> {
    speed_band_fraction(zone).map(|(lo, hi)| (lo * critical_speed_kmh, hi * critical_speed_kmh))
}
