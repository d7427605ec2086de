//! Per-program aggregation.
//!
//! Folds ordered per-segment results into program statistics and returns the
//! segments as fresh, limiter-tagged records for visualization. The caller's
//! segments are never modified.

use crate::classify::Limiter;
use crate::extract::PassThrough;
use crate::segment::MotionSegment;
use serde::{Deserialize, Serialize};

/// Timing of one segment against one machine profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingResult {
    /// Path length, mm.
    pub distance: f64,
    /// Velocity the program asked for, mm/s.
    pub programmed_velocity: f64,
    /// Velocity after feed-ceiling and cornering caps, mm/s.
    pub target_velocity: f64,
    /// Centripetal-limited velocity, when the segment carries curvature.
    pub cornering_velocity: Option<f64>,
    /// Traversal time, seconds.
    pub time: f64,
    pub limiter: Limiter,
}

/// One value per limiter label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LimiterBuckets<T> {
    pub feed_cap: T,
    pub accel: T,
    pub jerk: T,
    pub none: T,
}

impl<T: Copy> LimiterBuckets<T> {
    pub fn get(&self, limiter: Limiter) -> T {
        match limiter {
            Limiter::FeedCap => self.feed_cap,
            Limiter::Accel => self.accel,
            Limiter::Jerk => self.jerk,
            Limiter::None => self.none,
        }
    }

    pub fn get_mut(&mut self, limiter: Limiter) -> &mut T {
        match limiter {
            Limiter::FeedCap => &mut self.feed_cap,
            Limiter::Accel => &mut self.accel,
            Limiter::Jerk => &mut self.jerk,
            Limiter::None => &mut self.none,
        }
    }

    /// `(label, value)` pairs in [`Limiter::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Limiter, T)> + '_ {
        Limiter::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

/// Segment count per limiter.
pub type LimiterHistogram = LimiterBuckets<usize>;

impl LimiterHistogram {
    /// Sum of all buckets.
    pub fn total(&self) -> usize {
        self.feed_cap + self.accel + self.jerk + self.none
    }
}

/// Whole-program statistics for one machine profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub machine_profile_id: String,
    /// Motion segments timed; non-motion instructions are not counted.
    pub segments_processed: usize,
    /// Sum of segment times in program order, seconds.
    pub total_time: f64,
    /// Sum of segment lengths, mm.
    pub total_distance: f64,
    pub histogram: LimiterHistogram,
    /// Seconds spent in segments of each label.
    pub time_by_limiter: LimiterBuckets<f64>,
    /// Seconds spent in rapid moves.
    pub rapid_time: f64,
    /// Seconds spent in linear and arc moves.
    pub cutting_time: f64,
}

impl AggregateStats {
    /// Share of segments carrying `limiter`, in `[0, 1]`.
    pub fn fraction(&self, limiter: Limiter) -> f64 {
        if self.segments_processed == 0 {
            0.0
        } else {
            self.histogram.get(limiter) as f64 / self.segments_processed as f64
        }
    }

    /// The label covering the most segments. Ties go to the earlier label in
    /// [`Limiter::ALL`] order.
    pub fn dominant_limiter(&self) -> Option<Limiter> {
        if self.segments_processed == 0 {
            return None;
        }
        let mut best = (Limiter::FeedCap, self.histogram.feed_cap);
        for (limiter, count) in self.histogram.iter().skip(1) {
            if count > best.1 {
                best = (limiter, count);
            }
        }
        Some(best.0)
    }
}

/// A copy of an input segment together with its timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSegment {
    pub segment: MotionSegment,
    pub timing: TimingResult,
}

impl TaggedSegment {
    pub fn limiter(&self) -> Limiter {
        self.timing.limiter
    }
}

/// Everything produced for one program against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramEstimate {
    pub stats: AggregateStats,
    /// Motion segments in program order, tagged with their limiter.
    pub segments: Vec<TaggedSegment>,
    /// Non-motion instructions, untouched, in program order.
    pub passthrough: Vec<PassThrough>,
}

/// Folds ordered `(segment, timing)` pairs into statistics and tagged copies.
pub fn aggregate<'a>(
    machine_profile_id: &str,
    results: impl IntoIterator<Item = (&'a MotionSegment, TimingResult)>,
) -> (AggregateStats, Vec<TaggedSegment>) {
    let mut stats = AggregateStats {
        machine_profile_id: machine_profile_id.to_string(),
        segments_processed: 0,
        total_time: 0.0,
        total_distance: 0.0,
        histogram: LimiterHistogram::default(),
        time_by_limiter: LimiterBuckets::default(),
        rapid_time: 0.0,
        cutting_time: 0.0,
    };
    let mut tagged = Vec::new();

    for (segment, timing) in results {
        stats.segments_processed += 1;
        stats.total_time += timing.time;
        stats.total_distance += timing.distance;
        *stats.histogram.get_mut(timing.limiter) += 1;
        *stats.time_by_limiter.get_mut(timing.limiter) += timing.time;
        if segment.kind.is_rapid() {
            stats.rapid_time += timing.time;
        } else {
            stats.cutting_time += timing.time;
        }

        tagged.push(TaggedSegment {
            segment: segment.clone(),
            timing,
        });
    }

    (stats, tagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretcam_core::Point3;

    fn timing(time: f64, limiter: Limiter) -> TimingResult {
        TimingResult {
            distance: 1.0,
            programmed_velocity: 10.0,
            target_velocity: 10.0,
            cornering_velocity: None,
            time,
            limiter,
        }
    }

    #[test]
    fn test_aggregate_counts_and_sums() {
        let rapid = MotionSegment::rapid(Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0));
        let cut = MotionSegment::linear(Point3::xy(1.0, 0.0), Point3::xy(2.0, 0.0), 600.0);

        let (stats, tagged) = aggregate(
            "router",
            vec![
                (&rapid, timing(0.5, Limiter::None)),
                (&cut, timing(1.25, Limiter::FeedCap)),
                (&cut, timing(0.25, Limiter::Accel)),
            ],
        );

        assert_eq!(stats.machine_profile_id, "router");
        assert_eq!(stats.segments_processed, 3);
        assert_eq!(stats.total_time, 2.0);
        assert_eq!(stats.total_distance, 3.0);
        assert_eq!(stats.histogram.total(), 3);
        assert_eq!(stats.histogram.feed_cap, 1);
        assert_eq!(stats.histogram.jerk, 0);
        assert_eq!(stats.time_by_limiter.feed_cap, 1.25);
        assert_eq!(stats.rapid_time, 0.5);
        assert_eq!(stats.cutting_time, 1.5);
        assert_eq!(tagged.len(), 3);
        assert_eq!(tagged[1].limiter(), Limiter::FeedCap);
        assert_eq!(tagged[0].segment, rapid);
    }

    #[test]
    fn test_empty_program() {
        let (stats, tagged) = aggregate("m", Vec::<(&MotionSegment, TimingResult)>::new());
        assert_eq!(stats.total_time, 0.0);
        assert_eq!(stats.histogram.total(), 0);
        assert_eq!(stats.dominant_limiter(), None);
        assert_eq!(stats.fraction(Limiter::None), 0.0);
        assert!(tagged.is_empty());
    }

    #[test]
    fn test_dominant_limiter_and_fraction() {
        let seg = MotionSegment::linear(Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0), 600.0);
        let (stats, _) = aggregate(
            "m",
            vec![
                (&seg, timing(0.1, Limiter::Jerk)),
                (&seg, timing(0.1, Limiter::Jerk)),
                (&seg, timing(0.1, Limiter::None)),
                (&seg, timing(0.1, Limiter::Accel)),
            ],
        );
        assert_eq!(stats.dominant_limiter(), Some(Limiter::Jerk));
        assert_eq!(stats.fraction(Limiter::Jerk), 0.5);
    }

    #[test]
    fn test_histogram_serializes_all_buckets() {
        let json = serde_json::to_value(LimiterHistogram::default()).unwrap();
        for label in ["feed_cap", "accel", "jerk", "none"] {
            assert_eq!(json[label], 0);
        }
    }
}
