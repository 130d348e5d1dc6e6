//! Run parameters for plan generation.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::patterns::DEFAULT_TAPER_WINDOW;

pub const DEFAULT_REFERENCE_CAPACITY: f64 = 65.0;
pub const DEFAULT_SEED: u64 = 42;
/// Longest accepted taper window.
pub const MAX_TAPER_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Seed for the competition-day random draws.
    pub seed: u64,
    /// Capacity (VO2max) the baseline calendar was written for.
    pub reference_capacity: f64,
    /// Days before each competition covered by the taper.
    pub taper_window_days: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            reference_capacity: DEFAULT_REFERENCE_CAPACITY,
            taper_window_days: DEFAULT_TAPER_WINDOW,
        }
    }
}

impl PlanConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_reference_capacity(mut self, reference: f64) -> Self {
        self.reference_capacity = reference;
        self
    }

    pub fn with_taper_window(mut self, days: u32) -> Self {
        self.taper_window_days = days;
        self
    }

    pub fn validate_taper_window(&self) -> Result<u32, PlanError> {
        check_taper_window(self.taper_window_days)
    }
}

pub fn check_taper_window(days: u32) -> Result<u32, PlanError> {
    if (1..=MAX_TAPER_WINDOW_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(PlanError::InvalidWindow {
            days,
            max: MAX_TAPER_WINDOW_DAYS,
        })
    }
}
