//! Training zones and per-day minute allocations.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Intensity bands plus the separate strength column.
///
/// Declaration order is the canonical iteration order and is relied on by
/// anything that must be reproducible (e.g. random draws, CSV columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    Z1,
    Z2,
    Z3,
    Z4,
    Z5,
    Strength,
}

impl Zone {
    pub const ALL: [Zone; 6] = [Zone::Z1, Zone::Z2, Zone::Z3, Zone::Z4, Zone::Z5, Zone::Strength];

    /// High-intensity zones used for focus-day concentration.
    pub const HIGH_INTENSITY: [Zone; 2] = [Zone::Z4, Zone::Z5];

    fn index(self) -> usize {
        match self {
            Zone::Z1 => 0,
            Zone::Z2 => 1,
            Zone::Z3 => 2,
            Zone::Z4 => 3,
            Zone::Z5 => 4,
            Zone::Strength => 5,
        }
    }

    /// Column label used by the spreadsheet-style exports.
    pub fn column_name(self) -> &'static str {
        match self {
            Zone::Z1 => "Zone 1",
            Zone::Z2 => "Zone 2",
            Zone::Z3 => "Zone 3",
            Zone::Z4 => "Zone 4",
            Zone::Z5 => "Zone 5",
            Zone::Strength => "Strength",
        }
    }

    /// Map a numbered intensity zone (1..=5) onto the enum.
    pub fn from_number(n: u32) -> Option<Zone> {
        match n {
            1 => Some(Zone::Z1),
            2 => Some(Zone::Z2),
            3 => Some(Zone::Z3),
            4 => Some(Zone::Z4),
            5 => Some(Zone::Z5),
            _ => None,
        }
    }
}

/// Minutes per zone for a single day (or a per-zone factor table).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneMinutes([f64; 6]);

impl ZoneMinutes {
    pub const fn new(z1: f64, z2: f64, z3: f64, z4: f64, z5: f64, strength: f64) -> Self {
        Self([z1, z2, z3, z4, z5, strength])
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Same value in every zone.
    pub fn splat(value: f64) -> Self {
        Self([value; 6])
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn high_intensity(&self) -> f64 {
        self[Zone::Z4] + self[Zone::Z5]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, f64)> + '_ {
        Zone::ALL.iter().map(move |z| (*z, self[*z]))
    }

    pub fn scale(&mut self, factor: f64) {
        for v in self.0.iter_mut() {
            *v *= factor;
        }
    }

    /// Element-wise product with a per-zone factor table.
    pub fn scale_by(&mut self, factors: &ZoneMinutes) {
        for z in Zone::ALL {
            self[z] *= factors[z];
        }
    }

    pub fn add(&mut self, other: &ZoneMinutes) {
        for z in Zone::ALL {
            self[z] += other[z];
        }
    }

    /// Apply `f` to every zone value.
    pub fn map(&self, f: impl Fn(Zone, f64) -> f64) -> ZoneMinutes {
        let mut out = *self;
        for z in Zone::ALL {
            out[z] = f(z, self[z]);
        }
        out
    }
}

impl Index<Zone> for ZoneMinutes {
    type Output = f64;

    fn index(&self, zone: Zone) -> &f64 {
        &self.0[zone.index()]
    }
}

impl IndexMut<Zone> for ZoneMinutes {
    fn index_mut(&mut self, zone: Zone) -> &mut f64 {
        &mut self.0[zone.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_declaration_order() {
        let m = ZoneMinutes::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let values: Vec<f64> = m.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m[Zone::Strength], 6.0);
        assert_eq!(m.total(), 21.0);
        assert_eq!(m.high_intensity(), 9.0);
    }

    #[test]
    fn test_scale_by_factor_table() {
        let mut m = ZoneMinutes::splat(10.0);
        m.scale_by(&ZoneMinutes::new(1.0, 0.5, 2.0, 1.0, 1.0, 0.0));
        assert_eq!(m, ZoneMinutes::new(10.0, 5.0, 20.0, 10.0, 10.0, 0.0));
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Zone::from_number(3), Some(Zone::Z3));
        assert_eq!(Zone::from_number(6), None);
        assert_eq!(Zone::Z5.column_name(), "Zone 5");
    }
}
