//! In-memory machine profile registry.
//!
//! The caller owns the repository's lifecycle: build it (or load it from a
//! JSON file) once, then hand it to the timing engine by reference.

use crate::error::{DeviceError, DeviceResult};
use crate::model::MachineProfile;
use crate::traits::MachineProfileProvider;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Profiles keyed by id. Iteration order is the id order.
#[derive(Debug, Clone, Default)]
pub struct ProfileRepository {
    profiles: BTreeMap<String, MachineProfile>,
}

impl ProfileRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from a list of profiles, rejecting duplicate ids.
    pub fn from_profiles(profiles: impl IntoIterator<Item = MachineProfile>) -> DeviceResult<Self> {
        let mut repository = Self::new();
        for profile in profiles {
            repository.insert(profile)?;
        }
        Ok(repository)
    }

    /// Loads a JSON array of profiles.
    ///
    /// Profiles with unusable limits are kept (the timing engine clamps
    /// them) but reported with a warning.
    pub fn load_from_file(path: impl AsRef<Path>) -> DeviceResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        if !value.is_array() {
            return Err(DeviceError::LoadError(format!(
                "{} does not contain a JSON array of profiles",
                path.display()
            )));
        }
        let profiles: Vec<MachineProfile> = serde_json::from_value(value)?;

        for profile in &profiles {
            if let Err(e) = profile.validate() {
                warn!("Profile '{}' loaded with unusable limits: {}", profile.id, e);
            }
        }

        let repository = Self::from_profiles(profiles)?;
        debug!(
            "Loaded {} machine profiles from {}",
            repository.len(),
            path.display()
        );
        Ok(repository)
    }

    /// Adds a profile. Fails if the id is blank or already present.
    pub fn insert(&mut self, profile: MachineProfile) -> DeviceResult<()> {
        if profile.id.trim().is_empty() {
            return Err(DeviceError::InvalidProfileId(profile.id));
        }
        if self.profiles.contains_key(&profile.id) {
            return Err(DeviceError::ProfileAlreadyExists(profile.id));
        }
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Number of profiles held.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when no profiles are held.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl MachineProfileProvider for ProfileRepository {
    fn get_profile(&self, id: &str) -> DeviceResult<MachineProfile> {
        if id.trim().is_empty() {
            return Err(DeviceError::InvalidProfileId(id.to_string()));
        }
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| DeviceError::ProfileNotFound(id.to_string()))
    }

    fn profile_ids(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}
