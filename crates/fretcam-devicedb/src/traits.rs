//! Repository interface the timing engine resolves machine profiles through.

use crate::error::DeviceResult;
use crate::model::MachineProfile;
use std::sync::Arc;

/// Read-only source of machine profiles.
///
/// Implementations must be shareable across threads: the profile comparator
/// may resolve profiles from scoped worker threads.
pub trait MachineProfileProvider: Send + Sync {
    /// Resolves a profile by id.
    ///
    /// Returns [`DeviceError::ProfileNotFound`](crate::DeviceError::ProfileNotFound)
    /// for unknown ids and
    /// [`DeviceError::InvalidProfileId`](crate::DeviceError::InvalidProfileId)
    /// for blank ones.
    fn get_profile(&self, id: &str) -> DeviceResult<MachineProfile>;

    /// Ids of every profile this provider can resolve, in a stable order.
    fn profile_ids(&self) -> Vec<String>;
}

impl<P: MachineProfileProvider + ?Sized> MachineProfileProvider for Arc<P> {
    fn get_profile(&self, id: &str) -> DeviceResult<MachineProfile> {
        (**self).get_profile(id)
    }

    fn profile_ids(&self) -> Vec<String> {
        (**self).profile_ids()
    }
}

impl<P: MachineProfileProvider + ?Sized> MachineProfileProvider for &P {
    fn get_profile(&self, id: &str) -> DeviceResult<MachineProfile> {
        (**self).get_profile(id)
    }

    fn profile_ids(&self) -> Vec<String> {
        (**self).profile_ids()
    }
}
