use crate::error::{ProfileError, ProfileResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named set of kinematic limits for one machine/controller configuration.
///
/// Feeds follow the G-code convention (mm/min); acceleration and jerk are in
/// mm/s² and mm/s³. Limits absent from a serialized profile read as `0.0`,
/// which the timing engine clamps to a small positive floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,

    /// Maximum cutting feed (mm/min).
    #[serde(default)]
    pub feed_xy: f64,
    /// Maximum rapid traverse rate (mm/min).
    #[serde(default)]
    pub rapid_rate: f64,
    /// Acceleration limit (mm/s²).
    #[serde(default)]
    pub acceleration: f64,
    /// Jerk limit (mm/s³).
    #[serde(default)]
    pub jerk: f64,
    /// Maximum chordal deviation when blending corners (mm). Zero disables
    /// junction-based corner capping.
    #[serde(default)]
    pub corner_tolerance: f64,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "New Machine".to_string(),
            description: String::new(),
            feed_xy: 5000.0,
            rapid_rate: 10000.0,
            acceleration: 500.0,
            jerk: 2000.0,
            corner_tolerance: 0.01,
        }
    }
}

impl MachineProfile {
    /// Creates a profile with default limits and the given identity.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the feed ceilings (mm/min).
    pub fn with_feeds(mut self, feed_xy: f64, rapid_rate: f64) -> Self {
        self.feed_xy = feed_xy;
        self.rapid_rate = rapid_rate;
        self
    }

    /// Sets acceleration (mm/s²) and jerk (mm/s³).
    pub fn with_dynamics(mut self, acceleration: f64, jerk: f64) -> Self {
        self.acceleration = acceleration;
        self.jerk = jerk;
        self
    }

    /// Sets the corner tolerance (mm).
    pub fn with_corner_tolerance(mut self, tolerance: f64) -> Self {
        self.corner_tolerance = tolerance;
        self
    }

    /// Checks the profile carries usable limits.
    ///
    /// The timing engine does not require this to pass: it clamps bad limits
    /// instead. Callers that would rather reject such profiles use this.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.id.trim().is_empty() {
            return Err(ProfileError::MissingField("id".to_string()));
        }

        let limits = [
            ("feed_xy", self.feed_xy),
            ("rapid_rate", self.rapid_rate),
            ("acceleration", self.acceleration),
            ("jerk", self.jerk),
        ];
        for (field, value) in limits {
            if !(value.is_finite() && value > 0.0) {
                return Err(ProfileError::ValueOutOfRange {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if !(self.corner_tolerance.is_finite() && self.corner_tolerance >= 0.0) {
            return Err(ProfileError::ValueOutOfRange {
                field: "corner_tolerance".to_string(),
                value: self.corner_tolerance.to_string(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Display for MachineProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = MachineProfile::default();
        assert!(!profile.id.is_empty());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let profile = MachineProfile::new("router", "Bench Router")
            .with_feeds(3000.0, 6000.0)
            .with_dynamics(800.0, 3000.0)
            .with_corner_tolerance(0.02);
        assert_eq!(profile.id, "router");
        assert_eq!(profile.feed_xy, 3000.0);
        assert_eq!(profile.jerk, 3000.0);
        assert_eq!(profile.corner_tolerance, 0.02);
        assert_eq!(profile.to_string(), "Bench Router (router)");
    }

    #[test]
    fn test_validate_rejects_non_positive_limits() {
        let profile = MachineProfile::new("m", "M").with_dynamics(0.0, 2000.0);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::ValueOutOfRange {
                field: "acceleration".to_string(),
                value: "0".to_string(),
            })
        );

        let profile = MachineProfile::new("", "Unnamed");
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MissingField("id".to_string()))
        );
    }

    #[test]
    fn test_missing_limits_deserialize_as_zero() {
        let profile: MachineProfile =
            serde_json::from_str(r#"{"id": "bare", "feed_xy": 1200.0}"#).unwrap();
        assert_eq!(profile.feed_xy, 1200.0);
        assert_eq!(profile.acceleration, 0.0);
        assert_eq!(profile.jerk, 0.0);
        assert!(profile.validate().is_err());
    }
}
