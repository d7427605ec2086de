//! # FretCAM Device Database
//!
//! Machine profiles (identity plus kinematic limits) and the repository
//! interface the timing engine resolves them through. The engine never
//! mutates a profile; editing and persistence belong to the caller.

pub mod error;
pub mod model;
pub mod repository;
pub mod traits;

pub use error::{DeviceError, DeviceResult, ProfileError, ProfileResult};
pub use model::MachineProfile;
pub use repository::ProfileRepository;
pub use traits::MachineProfileProvider;
