//! Feed rate unit conversion
//!
//! Programs and machine profiles express feeds the G-code way (mm/min);
//! the kinematic model works in mm/s.

/// Converts a G-code feed (mm/min) to mm/s.
pub fn mm_per_min_to_mm_per_sec(feed: f64) -> f64 {
    feed / 60.0
}
