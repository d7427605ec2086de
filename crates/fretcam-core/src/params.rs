//! Tunable parameters of the kinematic timing model and the profile comparator.
//!
//! The defaults reproduce the calibrated behaviour of the timing model:
//! a segment counts as reaching cruise once the reachable peak velocity is
//! within 90% of its target, and a short move is labelled jerk-limited when
//! the machine's jerk is below twice its acceleration. Both are empirical
//! heuristics, not physical law.

use crate::error::{ParameterError, ParameterResult};
use serde::{Deserialize, Serialize};

/// Parameters of the jerk-limited segment timer and the corner capper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingParameters {
    /// Fraction of the target velocity the reachable peak must attain for a
    /// segment to be timed with a cruise phase.
    pub cruise_threshold: f64,
    /// A short move is jerk-limited when `jerk < jerk_tiebreak_factor * accel`.
    pub jerk_tiebreak_factor: f64,
    /// Positive floor applied to missing, zero or negative profile limits.
    pub limit_floor: f64,
    /// Cap rapid/linear target velocity at polyline corners using the
    /// profile's corner tolerance.
    pub junction_capping: bool,
    /// Junctions whose half-angle sine is within this distance of 1 are
    /// treated as straight continuations.
    pub collinear_tolerance: f64,
}

impl Default for TimingParameters {
    fn default() -> Self {
        Self {
            cruise_threshold: 0.9,
            jerk_tiebreak_factor: 2.0,
            limit_floor: 1e-6,
            junction_capping: true,
            collinear_tolerance: 1e-9,
        }
    }
}

impl TimingParameters {
    /// Checks every parameter is inside its valid range.
    pub fn validate(&self) -> ParameterResult<()> {
        if !(self.cruise_threshold > 0.0 && self.cruise_threshold <= 1.0) {
            return Err(ParameterError::OutOfRange {
                name: "cruise_threshold",
                value: self.cruise_threshold,
                expected: "0 < value <= 1",
            });
        }
        if !(self.jerk_tiebreak_factor.is_finite() && self.jerk_tiebreak_factor > 0.0) {
            return Err(ParameterError::OutOfRange {
                name: "jerk_tiebreak_factor",
                value: self.jerk_tiebreak_factor,
                expected: "finite and > 0",
            });
        }
        if !(self.limit_floor.is_finite() && self.limit_floor > 0.0) {
            return Err(ParameterError::OutOfRange {
                name: "limit_floor",
                value: self.limit_floor,
                expected: "finite and > 0",
            });
        }
        if !(self.collinear_tolerance >= 0.0 && self.collinear_tolerance < 1.0) {
            return Err(ParameterError::OutOfRange {
                name: "collinear_tolerance",
                value: self.collinear_tolerance,
                expected: "0 <= value < 1",
            });
        }
        Ok(())
    }
}

/// How the comparator picks the profile every speedup is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// The first profile, in request order, whose run succeeded.
    #[default]
    FirstSuccessful,
    /// The successful profile with the longest total time.
    Slowest,
}

impl std::fmt::Display for BaselinePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstSuccessful => write!(f, "first_successful"),
            Self::Slowest => write!(f, "slowest"),
        }
    }
}

/// Multi-profile comparison settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    /// Baseline selection for speedup ratios.
    pub baseline: BaselinePolicy,
    /// Maximum number of distinct profiles per request.
    pub max_profiles: usize,
    /// Run each profile on its own scoped worker thread.
    pub parallel: bool,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            baseline: BaselinePolicy::FirstSuccessful,
            max_profiles: 3,
            parallel: false,
        }
    }
}

impl ComparisonSettings {
    /// Checks the settings are usable.
    pub fn validate(&self) -> ParameterResult<()> {
        if self.max_profiles == 0 {
            return Err(ParameterError::ZeroProfileCap);
        }
        Ok(())
    }
}
