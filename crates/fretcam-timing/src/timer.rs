//! Jerk-limited segment timer.
//!
//! Approximates a jerk-limited trapezoidal velocity profile for one segment
//! that starts and ends at rest. Blending with neighbouring segments is not
//! modelled, so consecutive moves each pay for a full ramp up and down; the
//! estimate is deliberately conservative at smooth transitions.
//!
//! With `t_a = a / j` the time to ramp acceleration to its limit and
//! `s_a = a * t_a² / 2` the distance covered by one ramp:
//!
//! - a move that fits both ramps and can still reach the cruise threshold of
//!   its target velocity takes `2 t_a + (d - 2 s_a) / v` and is labelled
//!   [`Limiter::None`];
//! - any other move takes the triangular `2 sqrt(d / a)` and is labelled
//!   [`Limiter::Jerk`] when `j < tiebreak * a`, else [`Limiter::Accel`].
//!
//! The cruise threshold (0.9) and tie-break factor (2) are calibrated
//! heuristics carried by [`TimingParameters`].
//!
//! The time never grows with acceleration or jerk while the move is too
//! short for both jerk ramps (`d < a³ / j²`), where only the triangular
//! branch applies. In the cruise branch `2 a / j` shrinks with jerk but the
//! cruise distance `d - a³ / j²` grows, so a stiffer machine can be slower
//! when `a² > j v`. Monotonicity is only asserted for short moves.

use crate::classify::Limiter;
use fretcam_core::TimingParameters;
use serde::{Deserialize, Serialize};

/// Time and kinematic label of one move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTiming {
    /// Seconds.
    pub time: f64,
    /// `None`, `Accel` or `Jerk`; never `FeedCap`.
    pub limiter: Limiter,
}

impl MoveTiming {
    /// A move that takes no time.
    pub const IDLE: MoveTiming = MoveTiming {
        time: 0.0,
        limiter: Limiter::None,
    };
}

/// Times a move of `distance` mm towards `target_velocity` mm/s.
///
/// `acceleration` (mm/s²) and `jerk` (mm/s³) are raised to the parameters'
/// limit floor. Zero distance or zero target velocity takes no time.
pub fn time_move(
    distance: f64,
    target_velocity: f64,
    acceleration: f64,
    jerk: f64,
    params: &TimingParameters,
) -> MoveTiming {
    if !(distance > 0.0 && target_velocity > 0.0) || !distance.is_finite() {
        return MoveTiming::IDLE;
    }

    let a = floor(acceleration, params.limit_floor);
    let j = floor(jerk, params.limit_floor);

    let ramp_time = a / j;
    let ramp_distance = 0.5 * a * ramp_time * ramp_time;

    if 2.0 * ramp_distance <= distance {
        let reachable = (2.0 * a * (distance - 2.0 * ramp_distance).max(0.0)).sqrt();
        if reachable >= params.cruise_threshold * target_velocity {
            return MoveTiming {
                time: 2.0 * ramp_time + (distance - 2.0 * ramp_distance) / target_velocity,
                limiter: Limiter::None,
            };
        }
    }

    let limiter = if j < params.jerk_tiebreak_factor * a {
        Limiter::Jerk
    } else {
        Limiter::Accel
    };
    MoveTiming {
        time: 2.0 * (distance / a).sqrt(),
        limiter,
    }
}

fn floor(value: f64, floor: f64) -> f64 {
    if value.is_finite() && value >= floor {
        value
    } else {
        floor
    }
}
