//! # FretCAM Core
//!
//! Core types shared by the FretCAM timing engine and its configuration layer.
//! Provides the 3-D point type used by motion segments, the mm/min to mm/s
//! feed conversion, and the tunable parameters of the kinematic timing model.

pub mod error;
pub mod geometry;
pub mod params;
pub mod units;

pub use error::{ParameterError, ParameterResult};
pub use geometry::Point3;
pub use params::{BaselinePolicy, ComparisonSettings, TimingParameters};
