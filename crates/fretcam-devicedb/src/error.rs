//! Error types for the device database crate.
//!
//! Structured errors for machine profile lookup, loading and validation.

use std::io;
use thiserror::Error;

/// Errors that can occur during machine profile operations.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The requested profile was not found.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// A profile with this ID already exists.
    #[error("Profile already exists: {0}")]
    ProfileAlreadyExists(String),

    /// The profile ID cannot identify any profile (empty or blank).
    #[error("Invalid profile id: {0:?}")]
    InvalidProfileId(String),

    /// Failed to load profiles from storage.
    #[error("Failed to load profiles: {0}")]
    LoadError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A profile validation error occurred.
    #[error("Validation error: {0}")]
    Validation(#[from] ProfileError),
}

/// Errors related to machine profile validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A numeric value is out of valid range.
    #[error("Value out of range for '{field}': {value}")]
    ValueOutOfRange { field: String, value: String },
}

/// Result type alias for device management operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result type alias for profile validation operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
