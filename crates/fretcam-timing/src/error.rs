//! Error types for the timing engine.
//!
//! Request-level failures are [`TimingError`]s. A comparator run that fails
//! for one profile is not an error of the whole request; it is recorded in
//! the report as a [`ProfileFailure`].

use fretcam_core::ParameterError;
use fretcam_devicedb::DeviceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a timing request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    /// A motion record carries a kind outside rapid/linear/arc-CW/arc-CCW.
    #[error("Unknown segment kind '{kind}' at program position {position}")]
    UnknownSegmentKind {
        /// Program position of the offending record.
        position: usize,
        /// The unrecognised tag.
        kind: String,
    },

    /// A motion record cannot be measured.
    #[error("Invalid segment at program position {position}: {reason}")]
    InvalidSegment {
        /// Program position of the offending record.
        position: usize,
        /// Why the segment was rejected.
        reason: String,
    },

    /// A comparison was requested without any profile ids.
    #[error("No machine profiles requested for comparison")]
    NoProfiles,

    /// A comparison named more distinct profiles than allowed.
    #[error("Too many machine profiles requested: {requested} (maximum {max})")]
    TooManyProfiles {
        /// Number of distinct ids requested.
        requested: usize,
        /// Configured cap.
        max: usize,
    },

    /// The engine was configured with out-of-range parameters.
    #[error("Invalid engine parameters: {0}")]
    Parameters(#[from] ParameterError),
}

/// Result type alias for timing operations.
pub type Result<T> = std::result::Result<T, TimingError>;

/// Why one profile's comparator run produced no statistics.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ProfileFailure {
    /// The repository has no profile with this id.
    #[error("Profile not found: {profile_id}")]
    NotFound { profile_id: String },

    /// The id is blank or otherwise unusable.
    #[error("Invalid profile id: {profile_id:?}")]
    InvalidId { profile_id: String },

    /// The repository failed to resolve the profile.
    #[error("Profile {profile_id} unavailable: {message}")]
    Unavailable { profile_id: String, message: String },

    /// The worker evaluating this profile panicked.
    #[error("Evaluation of profile {profile_id} aborted")]
    WorkerPanicked { profile_id: String },
}

impl ProfileFailure {
    /// Maps a repository error for `profile_id` to a failure marker.
    pub fn from_device_error(profile_id: &str, err: &DeviceError) -> Self {
        let profile_id = profile_id.to_string();
        match err {
            DeviceError::ProfileNotFound(_) => Self::NotFound { profile_id },
            DeviceError::InvalidProfileId(_) => Self::InvalidId { profile_id },
            other => Self::Unavailable {
                profile_id,
                message: other.to_string(),
            },
        }
    }

    /// The profile id this failure belongs to.
    pub fn profile_id(&self) -> &str {
        match self {
            Self::NotFound { profile_id }
            | Self::InvalidId { profile_id }
            | Self::Unavailable { profile_id, .. }
            | Self::WorkerPanicked { profile_id } => profile_id,
        }
    }
}
