//! # FretCAM Timing
//!
//! Estimates how long a toolpath takes on a given machine and labels which
//! physical constraint limits each move.
//!
//! A program is an ordered list of [`ProgramInstruction`]s. Motion records are
//! extracted into [`MotionSegment`]s; everything else passes through
//! untouched. Each segment's target velocity is the programmed feed capped by
//! the machine's feed ceiling and, on curved paths, by centripetal
//! acceleration. A jerk-limited trapezoidal approximation then gives the
//! segment's time and a [`Limiter`] label: `feed_cap`, `accel`, `jerk` or
//! `none`.
//!
//! ```no_run
//! use fretcam_core::Point3;
//! use fretcam_devicedb::MachineProfile;
//! use fretcam_timing::{estimate_program_time, MotionSegment, ProgramInstruction};
//!
//! let profile = MachineProfile::new("router", "Shop router")
//!     .with_feeds(1200.0, 6000.0)
//!     .with_dynamics(1000.0, 4000.0);
//! let program = vec![
//!     ProgramInstruction::motion(&MotionSegment::rapid(Point3::xy(0.0, 0.0), Point3::xy(10.0, 0.0))),
//!     ProgramInstruction::motion(&MotionSegment::linear(Point3::xy(10.0, 0.0), Point3::xy(110.0, 0.0), 1200.0)),
//! ];
//! let estimate = estimate_program_time(&program, &profile).unwrap();
//! println!("{:.2} s", estimate.stats.total_time);
//! ```
//!
//! All calls are pure: neither the program nor the profiles are modified,
//! and identical inputs produce bit-identical outputs.

pub mod classify;
pub mod compare;
pub mod cornering;
pub mod engine;
pub mod error;
pub mod extract;
pub mod limits;
pub mod report;
pub mod segment;
pub mod timer;

pub use classify::Limiter;
pub use compare::{speedup_ratio, ComparisonReport, ProfileComparison, ProfileOutcome};
pub use cornering::{CornerContext, VelocityCap};
pub use engine::TimingEngine;
pub use error::{ProfileFailure, Result, TimingError};
pub use extract::{extract_segments, ExtractedProgram, PassThrough};
pub use limits::KinematicLimits;
pub use report::{AggregateStats, LimiterBuckets, LimiterHistogram, ProgramEstimate, TaggedSegment, TimingResult};
pub use segment::{MotionSegment, ProgramInstruction, SegmentKind, SegmentRecord};
pub use timer::{time_move, MoveTiming};

use fretcam_devicedb::{MachineProfile, MachineProfileProvider};

/// Times one segment with the default engine.
pub fn estimate_segment_time(segment: &MotionSegment, profile: &MachineProfile) -> TimingResult {
    TimingEngine::new().estimate_segment_time(segment, profile)
}

/// Times a whole program with the default engine.
pub fn estimate_program_time(program: &[ProgramInstruction], profile: &MachineProfile) -> Result<ProgramEstimate> {
    TimingEngine::new().estimate_program_time(program, profile)
}

/// Compares up to three profiles with the default engine.
pub fn compare_profiles<P>(program: &[ProgramInstruction], profile_ids: &[&str], provider: &P) -> Result<ComparisonReport>
where
    P: MachineProfileProvider + ?Sized,
{
    TimingEngine::new().compare_profiles(program, profile_ids, provider)
}
