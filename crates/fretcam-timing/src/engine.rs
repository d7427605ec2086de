//! Timing engine.
//!
//! [`TimingEngine`] holds the calibrated heuristics and comparison settings
//! and drives the per-segment pipeline: measure, cap the target velocity,
//! time the move and label its bottleneck. Engines are plain values; every
//! call is a pure function of its inputs.

use crate::classify::{classify, exceeds_feed_cap, Limiter};
use crate::compare::{compare_extracted, ComparisonReport};
use crate::cornering::{cap_target_velocity, CornerContext};
use crate::error::Result;
use crate::extract::{extract_segments, ExtractedProgram};
use crate::limits::KinematicLimits;
use crate::report::{aggregate, ProgramEstimate, TimingResult};
use crate::segment::{MotionSegment, ProgramInstruction};
use crate::timer::time_move;
use fretcam_core::{ComparisonSettings, TimingParameters};
use fretcam_devicedb::{MachineProfile, MachineProfileProvider};
use tracing::debug;

/// Maximum gap (mm) between one segment's end and the next one's start for
/// the two to share a junction.
pub const JOIN_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingEngine {
    params: TimingParameters,
    comparison: ComparisonSettings,
}

impl TimingEngine {
    /// Engine with default heuristics and comparison settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an engine from validated settings.
    pub fn with_settings(params: TimingParameters, comparison: ComparisonSettings) -> Result<Self> {
        params.validate()?;
        comparison.validate()?;
        Ok(Self { params, comparison })
    }

    pub fn with_parameters(self, params: TimingParameters) -> Result<Self> {
        Self::with_settings(params, self.comparison)
    }

    pub fn with_comparison_settings(self, comparison: ComparisonSettings) -> Result<Self> {
        Self::with_settings(self.params, comparison)
    }

    pub fn parameters(&self) -> &TimingParameters {
        &self.params
    }

    pub fn comparison_settings(&self) -> &ComparisonSettings {
        &self.comparison
    }

    /// Times a single segment in isolation.
    ///
    /// Without neighbours, straight moves are not corner capped; arcs are
    /// still capped by their own radius.
    pub fn estimate_segment_time(&self, segment: &MotionSegment, profile: &MachineProfile) -> TimingResult {
        let limits = KinematicLimits::from_profile(profile, &self.params);
        self.time_segment(segment, &CornerContext::isolated(), &limits)
    }

    /// Extracts and times every motion segment of `program`.
    ///
    /// Fails fast on unknown segment kinds or unmeasurable geometry; nothing
    /// is timed in that case.
    pub fn estimate_program_time(
        &self,
        program: &[ProgramInstruction],
        profile: &MachineProfile,
    ) -> Result<ProgramEstimate> {
        let extracted = extract_segments(program)?;
        Ok(self.estimate_extracted(&extracted, profile))
    }

    /// Times an already-typed segment sequence.
    pub fn estimate_segments(&self, segments: &[MotionSegment], profile: &MachineProfile) -> Result<ProgramEstimate> {
        for segment in segments {
            segment.check()?;
        }
        Ok(self.estimate_extracted(&ExtractedProgram::from_segments(segments), profile))
    }

    /// Times `program` against every profile in `profile_ids`.
    pub fn compare_profiles<P>(
        &self,
        program: &[ProgramInstruction],
        profile_ids: &[&str],
        provider: &P,
    ) -> Result<ComparisonReport>
    where
        P: MachineProfileProvider + ?Sized,
    {
        let extracted = extract_segments(program)?;
        compare_extracted(self, &extracted, profile_ids, provider)
    }

    pub(crate) fn estimate_extracted(&self, program: &ExtractedProgram, profile: &MachineProfile) -> ProgramEstimate {
        let limits = KinematicLimits::from_profile(profile, &self.params);

        let timings = program.segments.iter().enumerate().map(|(index, segment)| {
            let context = corner_context(program, index);
            (segment, self.time_segment(segment, &context, &limits))
        });
        let (stats, segments) = aggregate(&profile.id, timings);

        debug!(
            "Profile '{}': {} segments, {:.3} s, {:.3} mm, histogram {:?}",
            stats.machine_profile_id,
            stats.segments_processed,
            stats.total_time,
            stats.total_distance,
            stats.histogram
        );

        ProgramEstimate {
            stats,
            segments,
            passthrough: program.passthrough.clone(),
        }
    }

    fn time_segment(&self, segment: &MotionSegment, context: &CornerContext<'_>, limits: &KinematicLimits) -> TimingResult {
        let distance = segment.length();
        let cap = cap_target_velocity(segment, context, limits, &self.params);
        let idle = TimingResult {
            distance,
            programmed_velocity: cap.programmed,
            target_velocity: cap.target,
            cornering_velocity: cap.cornering,
            time: 0.0,
            limiter: Limiter::None,
        };

        // Degenerate segments carry no bottleneck, whatever their feed.
        if !(distance > 0.0 && cap.target > 0.0) {
            return idle;
        }

        let feed_capped = exceeds_feed_cap(cap.programmed, cap.ceiling);
        let kinematic = time_move(distance, cap.target, limits.acceleration, limits.jerk, &self.params);
        TimingResult {
            time: kinematic.time,
            limiter: classify(feed_capped, kinematic.limiter),
            ..idle
        }
    }
}

/// Neighbours of segment `index` that join it without the machine halting.
fn corner_context(program: &ExtractedProgram, index: usize) -> CornerContext<'_> {
    let segments = &program.segments;
    let current = &segments[index];
    let previous = index
        .checked_sub(1)
        .map(|i| &segments[i])
        .filter(|prev| joins(program, prev, current));
    let next = segments.get(index + 1).filter(|next| joins(program, current, next));
    CornerContext { previous, next }
}

fn joins(program: &ExtractedProgram, first: &MotionSegment, second: &MotionSegment) -> bool {
    first.end.distance_to(&second.start) <= JOIN_TOLERANCE
        && !program.interrupted_between(first.position, second.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretcam_core::Point3;

    fn profile() -> MachineProfile {
        MachineProfile::new("router", "Router")
            .with_feeds(1200.0, 6000.0)
            .with_dynamics(1000.0, 4000.0)
            .with_corner_tolerance(0.01)
    }

    #[test]
    fn test_zero_length_segment_takes_no_time() {
        let engine = TimingEngine::new();
        let seg = MotionSegment::linear(Point3::xy(3.0, 3.0), Point3::xy(3.0, 3.0), 9000.0);
        let result = engine.estimate_segment_time(&seg, &profile());
        assert_eq!(result.time, 0.0);
        assert_eq!(result.limiter, Limiter::None);
    }

    #[test]
    fn test_zero_feed_cut_takes_no_time() {
        let engine = TimingEngine::new();
        let seg = MotionSegment::linear(Point3::xy(0.0, 0.0), Point3::xy(5.0, 0.0), 0.0);
        let result = engine.estimate_segment_time(&seg, &profile());
        assert_eq!(result.time, 0.0);
        assert_eq!(result.limiter, Limiter::None);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let params = TimingParameters {
            cruise_threshold: 1.5,
            ..TimingParameters::default()
        };
        assert!(TimingEngine::new().with_parameters(params).is_err());

        let comparison = ComparisonSettings {
            max_profiles: 0,
            ..ComparisonSettings::default()
        };
        assert!(TimingEngine::new().with_comparison_settings(comparison).is_err());
    }

    #[test]
    fn test_corner_context_respects_interruptions() {
        let program = vec![
            ProgramInstruction::motion(&MotionSegment::linear(Point3::xy(0.0, 0.0), Point3::xy(10.0, 0.0), 600.0)),
            ProgramInstruction::Comment {
                text: "corner".to_string(),
            },
            ProgramInstruction::motion(&MotionSegment::linear(Point3::xy(10.0, 0.0), Point3::xy(10.0, 10.0), 600.0)),
            ProgramInstruction::Pause,
            ProgramInstruction::motion(&MotionSegment::linear(Point3::xy(10.0, 10.0), Point3::xy(0.0, 10.0), 600.0)),
        ];
        let extracted = extract_segments(&program).unwrap();

        let first = corner_context(&extracted, 0);
        assert!(first.previous.is_none());
        assert!(first.next.is_some());

        let middle = corner_context(&extracted, 1);
        assert!(middle.previous.is_some());
        assert!(middle.next.is_none());
    }

    #[test]
    fn test_disjoint_segments_share_no_junction() {
        let segments = vec![
            MotionSegment::linear(Point3::xy(0.0, 0.0), Point3::xy(10.0, 0.0), 600.0),
            MotionSegment::linear(Point3::xy(20.0, 0.0), Point3::xy(20.0, 10.0), 600.0),
        ];
        let extracted = ExtractedProgram::from_segments(&segments);
        assert!(corner_context(&extracted, 0).next.is_none());
        assert!(corner_context(&extracted, 1).previous.is_none());
    }

    #[test]
    fn test_estimate_segments_rejects_bad_arc() {
        let engine = TimingEngine::new();
        let arc = MotionSegment::arc(false, Point3::xy(1.0, 0.0), Point3::xy(f64::NAN, 0.0), Point3::xy(0.0, 0.0), 600.0);
        assert!(engine.estimate_segments(&[arc], &profile()).is_err());
    }
}
