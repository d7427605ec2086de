//! Bottleneck labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical constraint that governs a segment's achievable speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limiter {
    /// The programmed feed exceeds the machine's feed ceiling.
    FeedCap,
    /// The move is too short to cruise; acceleration dominates.
    Accel,
    /// The move is too short to cruise; jerk dominates.
    Jerk,
    /// Cruise velocity is reached, or the segment is degenerate.
    None,
}

impl Limiter {
    /// Every label, in histogram order.
    pub const ALL: [Limiter; 4] = [Limiter::FeedCap, Limiter::Accel, Limiter::Jerk, Limiter::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Limiter::FeedCap => "feed_cap",
            Limiter::Accel => "accel",
            Limiter::Jerk => "jerk",
            Limiter::None => "none",
        }
    }
}

impl fmt::Display for Limiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when the programmed velocity asks for more than the machine allows.
pub fn exceeds_feed_cap(programmed_velocity: f64, ceiling: f64) -> bool {
    programmed_velocity > ceiling
}

/// Final label for a segment.
///
/// The feed-cap check is made on the programmed velocity before any
/// kinematic timing and always wins over the timer's label.
pub fn classify(feed_capped: bool, kinematic: Limiter) -> Limiter {
    if feed_capped {
        Limiter::FeedCap
    } else {
        kinematic
    }
}
