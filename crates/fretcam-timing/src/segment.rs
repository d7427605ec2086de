//! Motion program records.
//!
//! [`ProgramInstruction`] is the raw, ordered program as produced by the
//! toolpath planner. [`MotionSegment`] is the typed form of one physical move
//! that the timing engine consumes read-only.

use crate::error::{Result, TimingError};
use fretcam_core::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Planar distance below which two points are treated as coincident.
const COINCIDENT_TOLERANCE: f64 = 1e-9;

/// Allowed disagreement between an explicit arc radius and the one implied
/// by its center: an absolute part in mm plus a fraction of the radius.
const RADIUS_MISMATCH_ABSOLUTE: f64 = 0.005;
const RADIUS_MISMATCH_RELATIVE: f64 = 0.001;

/// Types of motion segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
}

impl SegmentKind {
    /// Returns the canonical tag of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            SegmentKind::Rapid => "rapid",
            SegmentKind::Linear => "linear",
            SegmentKind::ArcCw => "arc_cw",
            SegmentKind::ArcCcw => "arc_ccw",
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, SegmentKind::ArcCw | SegmentKind::ArcCcw)
    }

    pub fn is_rapid(&self) -> bool {
        matches!(self, SegmentKind::Rapid)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SegmentKind {
    type Err = String;

    /// Accepts canonical tags and G-code motion words, case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rapid" | "g0" | "g00" => Ok(Self::Rapid),
            "linear" | "line" | "g1" | "g01" => Ok(Self::Linear),
            "arc_cw" | "arc-cw" | "cw" | "g2" | "g02" => Ok(Self::ArcCw),
            "arc_ccw" | "arc-ccw" | "ccw" | "g3" | "g03" => Ok(Self::ArcCcw),
            _ => Err(format!("Unknown segment kind: {}", s)),
        }
    }
}

/// A single physical move of a motion program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSegment {
    /// Index of the instruction this segment came from in its program.
    pub position: usize,
    pub kind: SegmentKind,
    pub start: Point3,
    pub end: Point3,
    /// Programmed feed in mm/min. Zero means no feed was programmed; rapids
    /// then travel at the machine's rapid rate.
    pub feed: f64,
    /// Arc center (IJK form).
    pub center: Option<Point3>,
    /// Arc radius (R form). A negative radius selects the arc longer than a
    /// half turn.
    pub radius: Option<f64>,
}

impl MotionSegment {
    /// Creates a rapid move.
    pub fn rapid(start: Point3, end: Point3) -> Self {
        Self::straight(SegmentKind::Rapid, start, end, 0.0)
    }

    /// Creates a linear cutting move at `feed` mm/min.
    pub fn linear(start: Point3, end: Point3, feed: f64) -> Self {
        Self::straight(SegmentKind::Linear, start, end, feed)
    }

    fn straight(kind: SegmentKind, start: Point3, end: Point3, feed: f64) -> Self {
        Self {
            position: 0,
            kind,
            start,
            end,
            feed,
            center: None,
            radius: None,
        }
    }

    /// Creates an arc described by its center.
    pub fn arc(clockwise: bool, start: Point3, end: Point3, center: Point3, feed: f64) -> Self {
        Self {
            position: 0,
            kind: Self::arc_kind(clockwise),
            start,
            end,
            feed,
            center: Some(center),
            radius: None,
        }
    }

    /// Creates an arc described by its radius.
    pub fn arc_with_radius(clockwise: bool, start: Point3, end: Point3, radius: f64, feed: f64) -> Self {
        Self {
            position: 0,
            kind: Self::arc_kind(clockwise),
            start,
            end,
            feed,
            center: None,
            radius: Some(radius),
        }
    }

    fn arc_kind(clockwise: bool) -> SegmentKind {
        if clockwise {
            SegmentKind::ArcCw
        } else {
            SegmentKind::ArcCcw
        }
    }

    /// Sets the program position.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Sets the programmed feed (mm/min).
    pub fn with_feed(mut self, feed: f64) -> Self {
        self.feed = feed;
        self
    }

    /// Checks the segment can be measured.
    pub fn check(&self) -> Result<()> {
        let invalid = |reason: &str| TimingError::InvalidSegment {
            position: self.position,
            reason: reason.to_string(),
        };

        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(invalid("non-finite endpoint"));
        }
        if !self.feed.is_finite() || self.feed < 0.0 {
            return Err(invalid("feed must be finite and non-negative"));
        }
        if self.kind.is_arc() {
            if let Some(center) = self.center {
                if !center.is_finite() {
                    return Err(invalid("non-finite arc center"));
                }
            }
            match (self.center, self.radius) {
                (_, Some(r)) if !r.is_finite() => return Err(invalid("non-finite arc radius")),
                (_, Some(r)) if r.abs() <= COINCIDENT_TOLERANCE => return Err(invalid("arc radius is zero")),
                (None, None) => return Err(invalid("arc has neither center nor radius")),
                (None, Some(_)) => {}
                (Some(center), explicit) => {
                    let derived = center.planar_distance_to(&self.end);
                    if derived <= COINCIDENT_TOLERANCE {
                        return Err(invalid("arc center lies on its end point"));
                    }
                    if let Some(r) = explicit {
                        let allowed = RADIUS_MISMATCH_ABSOLUTE + RADIUS_MISMATCH_RELATIVE * derived;
                        if (r.abs() - derived).abs() > allowed {
                            return Err(invalid("arc radius does not match its center"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Arc radius: the explicit radius if given, else the distance from the
    /// center to the end point. `None` for straight moves.
    ///
    /// [`check`](Self::check) rejects arcs whose explicit radius disagrees
    /// with their center beyond a small tolerance.
    pub fn arc_radius(&self) -> Option<f64> {
        if !self.kind.is_arc() {
            return None;
        }
        match (self.radius, self.center) {
            (Some(r), _) => Some(r.abs()),
            (None, Some(center)) => Some(center.planar_distance_to(&self.end)),
            (None, None) => None,
        }
    }

    /// Swept angle of an arc in the XY plane, radians.
    pub fn sweep_angle(&self) -> Option<f64> {
        if !self.kind.is_arc() {
            return None;
        }
        let chord = self.start.planar_distance_to(&self.end);
        match (self.center, self.radius) {
            (Some(center), _) => {
                if chord <= COINCIDENT_TOLERANCE {
                    return Some(TAU);
                }
                let a0 = self.start.angle_from(&center);
                let a1 = self.end.angle_from(&center);
                let mut sweep = match self.kind {
                    SegmentKind::ArcCcw => a1 - a0,
                    _ => a0 - a1,
                };
                if sweep <= 0.0 {
                    sweep += TAU;
                }
                Some(sweep)
            }
            (None, Some(r)) if r != 0.0 => {
                let half = (chord / (2.0 * r.abs())).min(1.0);
                let short = 2.0 * half.asin();
                Some(if r < 0.0 { TAU - short } else { short })
            }
            _ => None,
        }
    }

    /// Path length in mm. Arcs are measured along the helix they describe.
    pub fn length(&self) -> f64 {
        if !self.kind.is_arc() {
            return self.start.distance_to(&self.end);
        }
        match (self.arc_radius(), self.sweep_angle()) {
            (Some(r), Some(sweep)) => {
                let planar = r * sweep;
                let dz = self.end.z - self.start.z;
                planar.hypot(dz)
            }
            _ => self.start.distance_to(&self.end),
        }
    }

    /// Unit travel direction as the move begins.
    pub fn entry_direction(&self) -> Option<[f64; 3]> {
        self.tangent_at(&self.start)
            .or_else(|| self.start.direction_to(&self.end))
    }

    /// Unit travel direction as the move ends.
    pub fn exit_direction(&self) -> Option<[f64; 3]> {
        self.tangent_at(&self.end)
            .or_else(|| self.start.direction_to(&self.end))
    }

    fn tangent_at(&self, point: &Point3) -> Option<[f64; 3]> {
        let center = self.center.filter(|_| self.kind.is_arc())?;
        let rx = point.x - center.x;
        let ry = point.y - center.y;
        let r = rx.hypot(ry);
        if r <= COINCIDENT_TOLERANCE {
            return None;
        }
        let (tx, ty) = match self.kind {
            SegmentKind::ArcCcw => (-ry / r, rx / r),
            _ => (ry / r, -rx / r),
        };
        let planar = self.arc_radius()? * self.sweep_angle()?;
        let dz = self.end.z - self.start.z;
        let (x, y, z) = (tx * planar, ty * planar, dz);
        let norm = (x * x + y * y + z * z).sqrt();
        if norm <= f64::EPSILON {
            return None;
        }
        Some([x / norm, y / norm, z / norm])
    }
}

/// A motion record as emitted by the toolpath planner, with its kind still
/// an unchecked tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub kind: String,
    pub start: Point3,
    pub end: Point3,
    #[serde(default)]
    pub feed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl SegmentRecord {
    /// Resolves the record into a typed segment at `position`.
    pub fn to_segment(&self, position: usize) -> Result<MotionSegment> {
        let kind = self
            .kind
            .parse::<SegmentKind>()
            .map_err(|_| TimingError::UnknownSegmentKind {
                position,
                kind: self.kind.clone(),
            })?;
        Ok(MotionSegment {
            position,
            kind,
            start: self.start,
            end: self.end,
            feed: self.feed,
            center: self.center,
            radius: self.radius,
        })
    }
}

impl From<&MotionSegment> for SegmentRecord {
    fn from(segment: &MotionSegment) -> Self {
        Self {
            kind: segment.kind.name().to_string(),
            start: segment.start,
            end: segment.end,
            feed: segment.feed,
            center: segment.center,
            radius: segment.radius,
        }
    }
}

/// One entry of an ordered machine program.
///
/// Only `Motion` entries are timed; every other instruction is passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgramInstruction {
    Motion(SegmentRecord),
    ToolChange { tool: u32 },
    Dwell { seconds: f64 },
    SpindleOn { rpm: f64 },
    SpindleOff,
    Coolant { enabled: bool },
    Pause,
    Comment { text: String },
}

impl ProgramInstruction {
    /// Wraps a typed segment as a program entry.
    pub fn motion(segment: &MotionSegment) -> Self {
        Self::Motion(SegmentRecord::from(segment))
    }

    pub fn is_motion(&self) -> bool {
        matches!(self, Self::Motion(_))
    }

    /// True for instructions that bring the machine to a halt between the
    /// moves around them. Comments do not.
    pub fn interrupts_motion(&self) -> bool {
        !matches!(self, Self::Motion(_) | Self::Comment { .. })
    }
}
