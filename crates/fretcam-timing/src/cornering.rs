//! Corner and curvature feed capping.
//!
//! Produces the target velocity the segment timer tries to reach: the
//! programmed velocity, limited by the machine's feed ceiling and, where the
//! path curves, by the speed at which centripetal acceleration stays within
//! the machine's acceleration limit (`v = sqrt(a * r)`).
//!
//! Arcs curve with their own radius. Straight moves only curve at the
//! junctions with their neighbours; a junction is approximated by the circle
//! that deviates from the corner by the profile's corner tolerance.

use crate::limits::KinematicLimits;
use crate::segment::MotionSegment;
use fretcam_core::units::mm_per_min_to_mm_per_sec;
use fretcam_core::TimingParameters;
use serde::{Deserialize, Serialize};

/// Neighbouring moves that join a segment without the machine stopping.
#[derive(Debug, Clone, Copy, Default)]
pub struct CornerContext<'a> {
    pub previous: Option<&'a MotionSegment>,
    pub next: Option<&'a MotionSegment>,
}

impl<'a> CornerContext<'a> {
    /// A segment timed on its own.
    pub fn isolated() -> Self {
        Self::default()
    }
}

/// Velocities considered while capping one segment (mm/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityCap {
    /// Velocity the program asked for.
    pub programmed: f64,
    /// The machine's ceiling for this move.
    pub ceiling: f64,
    /// Centripetal-limited velocity, when the segment carries curvature.
    pub cornering: Option<f64>,
    /// Velocity handed to the timer.
    pub target: f64,
}

/// True for a rapid that programs no feed of its own.
pub fn is_rapid_traverse(segment: &MotionSegment) -> bool {
    segment.kind.is_rapid() && segment.feed <= 0.0
}

/// Velocity the program commands for `segment`, in mm/s.
///
/// A rapid without a programmed feed commands the machine's rapid rate.
pub fn programmed_velocity(segment: &MotionSegment, limits: &KinematicLimits) -> f64 {
    if is_rapid_traverse(segment) {
        limits.rapid_rate
    } else {
        mm_per_min_to_mm_per_sec(segment.feed)
    }
}

/// Centripetal-limited velocity for a path of radius `radius`.
pub fn cornering_velocity(acceleration: f64, radius: f64) -> f64 {
    (acceleration * radius.max(0.0)).sqrt()
}

/// Radius of the circle blending a corner within `tolerance` of its vertex.
///
/// `incoming` and `outgoing` are unit travel directions on either side of the
/// vertex. Returns `None` when the corner is a straight continuation.
pub fn junction_radius(
    incoming: [f64; 3],
    outgoing: [f64; 3],
    tolerance: f64,
    params: &TimingParameters,
) -> Option<f64> {
    // Angle between the reversed incoming direction and the outgoing one.
    let cos_theta = -(incoming[0] * outgoing[0] + incoming[1] * outgoing[1] + incoming[2] * outgoing[2]);
    let sin_half = (0.5 * (1.0 - cos_theta.clamp(-1.0, 1.0))).sqrt();
    if 1.0 - sin_half <= params.collinear_tolerance {
        return None;
    }
    Some(tolerance * sin_half / (1.0 - sin_half))
}

/// Effective radius of curvature bounding `segment`'s speed, if any.
pub fn curvature_radius(
    segment: &MotionSegment,
    context: &CornerContext<'_>,
    limits: &KinematicLimits,
    params: &TimingParameters,
) -> Option<f64> {
    if segment.kind.is_arc() {
        return segment.arc_radius();
    }
    if !params.junction_capping || limits.corner_tolerance <= 0.0 {
        return None;
    }

    let tolerance = limits.corner_tolerance;
    let entry = context.previous.and_then(|prev| {
        junction_radius(prev.exit_direction()?, segment.entry_direction()?, tolerance, params)
    });
    let exit = context.next.and_then(|next| {
        junction_radius(segment.exit_direction()?, next.entry_direction()?, tolerance, params)
    });

    let radius = match (entry, exit) {
        (Some(a), Some(b)) => a.min(b),
        (Some(r), None) | (None, Some(r)) => r,
        (None, None) => return None,
    };
    Some(radius.max(tolerance))
}

/// Computes the target velocity for `segment`.
///
/// Any programmed feed, whatever the segment kind, is held to feed_xy. Only
/// a rapid without a feed is held to the rapid rate instead.
pub fn cap_target_velocity(
    segment: &MotionSegment,
    context: &CornerContext<'_>,
    limits: &KinematicLimits,
    params: &TimingParameters,
) -> VelocityCap {
    let programmed = programmed_velocity(segment, limits);
    let ceiling = limits.ceiling(is_rapid_traverse(segment));
    let cornering = curvature_radius(segment, context, limits, params)
        .map(|radius| cornering_velocity(limits.acceleration, radius));

    let mut target = programmed.min(ceiling);
    if let Some(v) = cornering {
        target = target.min(v);
    }

    VelocityCap {
        programmed,
        ceiling,
        cornering,
        target,
    }
}
