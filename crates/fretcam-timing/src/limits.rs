//! Engine-side view of a machine profile.

use fretcam_core::units::mm_per_min_to_mm_per_sec;
use fretcam_core::TimingParameters;
use fretcam_devicedb::MachineProfile;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Kinematic limits in engine units (mm/s, mm/s², mm/s³, mm).
///
/// Missing, zero, negative or non-finite limits are raised to
/// [`TimingParameters::limit_floor`]. The floor keeps the model free of
/// division by zero and yields a very slow, clearly conservative estimate;
/// it does not reinterpret what the profile meant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicLimits {
    pub feed_xy: f64,
    pub rapid_rate: f64,
    pub acceleration: f64,
    pub jerk: f64,
    /// Zero disables junction capping.
    pub corner_tolerance: f64,
}

impl KinematicLimits {
    /// Builds the limits for `profile`, warning about every clamped field.
    pub fn from_profile(profile: &MachineProfile, params: &TimingParameters) -> Self {
        let floor = params.limit_floor;
        let feed_xy = floored(&profile.id, "feed_xy", mm_per_min_to_mm_per_sec(profile.feed_xy), floor);
        let rapid_rate = floored(&profile.id, "rapid_rate", mm_per_min_to_mm_per_sec(profile.rapid_rate), floor);
        let acceleration = floored(&profile.id, "acceleration", profile.acceleration, floor);
        let jerk = floored(&profile.id, "jerk", profile.jerk, floor);

        let corner_tolerance = if profile.corner_tolerance.is_finite() && profile.corner_tolerance >= 0.0 {
            profile.corner_tolerance
        } else {
            warn!(
                "Profile '{}': corner_tolerance {} unusable, junction capping disabled",
                profile.id, profile.corner_tolerance
            );
            0.0
        };

        Self {
            feed_xy,
            rapid_rate,
            acceleration,
            jerk,
            corner_tolerance,
        }
    }

    /// The feed ceiling for a move: the rapid rate for a rapid traverse that
    /// programs no feed, feed_xy for every programmed feed.
    pub fn ceiling(&self, rapid_traverse: bool) -> f64 {
        if rapid_traverse {
            self.rapid_rate
        } else {
            self.feed_xy
        }
    }
}

fn floored(profile_id: &str, field: &str, value: f64, floor: f64) -> f64 {
    if value.is_finite() && value >= floor {
        value
    } else {
        warn!(
            "Profile '{}': {} = {} is below the floor, clamping to {}",
            profile_id, field, value, floor
        );
        floor
    }
}
