//! Motion segment extraction.
//!
//! Splits an ordered program into the segments that move the machine and the
//! instructions that do not. Order is preserved on both sides.

use crate::error::Result;
use crate::segment::{MotionSegment, ProgramInstruction};
use serde::{Deserialize, Serialize};

/// A non-motion instruction together with its program position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassThrough {
    pub position: usize,
    pub instruction: ProgramInstruction,
}

/// A program split into timed segments and untouched instructions.
///
/// Both lists are ordered by program position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProgram {
    pub segments: Vec<MotionSegment>,
    pub passthrough: Vec<PassThrough>,
}

impl ExtractedProgram {
    /// Wraps already-typed segments; there are no pass-through instructions.
    pub fn from_segments(segments: &[MotionSegment]) -> Self {
        Self {
            segments: segments.to_vec(),
            passthrough: Vec::new(),
        }
    }

    /// True when a machine-halting instruction sits strictly between the two
    /// program positions.
    ///
    /// Only the entries between the two positions are visited, so checking
    /// every neighbouring pair of a program stays linear overall.
    pub fn interrupted_between(&self, from: usize, to: usize) -> bool {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let first = self.passthrough.partition_point(|p| p.position <= lo);
        self.passthrough[first..]
            .iter()
            .take_while(|p| p.position < hi)
            .any(|p| p.instruction.interrupts_motion())
    }
}

/// Extracts motion segments from a program.
///
/// Fails on the first motion record whose kind is unknown or whose geometry
/// cannot be measured. Zero-length segments are kept.
pub fn extract_segments(program: &[ProgramInstruction]) -> Result<ExtractedProgram> {
    let mut extracted = ExtractedProgram::default();

    for (position, instruction) in program.iter().enumerate() {
        match instruction {
            ProgramInstruction::Motion(record) => {
                let segment = record.to_segment(position)?;
                segment.check()?;
                extracted.segments.push(segment);
            }
            other => extracted.passthrough.push(PassThrough {
                position,
                instruction: other.clone(),
            }),
        }
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimingError;
    use crate::segment::{SegmentKind, SegmentRecord};
    use fretcam_core::Point3;

    fn record(kind: &str) -> ProgramInstruction {
        ProgramInstruction::Motion(SegmentRecord {
            kind: kind.to_string(),
            start: Point3::xy(0.0, 0.0),
            end: Point3::xy(10.0, 0.0),
            feed: 1200.0,
            center: None,
            radius: None,
        })
    }

    #[test]
    fn test_splits_motion_and_passthrough() {
        let program = vec![
            ProgramInstruction::SpindleOn { rpm: 18000.0 },
            record("rapid"),
            ProgramInstruction::Comment {
                text: "rough pass".to_string(),
            },
            record("linear"),
            ProgramInstruction::Dwell { seconds: 0.5 },
        ];

        let extracted = extract_segments(&program).unwrap();
        assert_eq!(extracted.segments.len(), 2);
        assert_eq!(extracted.segments[0].kind, SegmentKind::Rapid);
        assert_eq!(extracted.segments[0].position, 1);
        assert_eq!(extracted.segments[1].position, 3);

        let positions: Vec<usize> = extracted.passthrough.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 2, 4]);
        assert_eq!(extracted.passthrough[2].instruction, program[4]);
    }

    #[test]
    fn test_unknown_kind_fails_fast() {
        let program = vec![record("linear"), record("nurbs"), record("spline")];
        let err = extract_segments(&program).unwrap_err();
        assert_eq!(
            err,
            TimingError::UnknownSegmentKind {
                position: 1,
                kind: "nurbs".to_string()
            }
        );
    }

    #[test]
    fn test_zero_length_segments_are_kept() {
        let program = vec![ProgramInstruction::Motion(SegmentRecord {
            kind: "linear".to_string(),
            start: Point3::xy(1.0, 1.0),
            end: Point3::xy(1.0, 1.0),
            feed: 1000.0,
            center: None,
            radius: None,
        })];
        let extracted = extract_segments(&program).unwrap();
        assert_eq!(extracted.segments.len(), 1);
        assert_eq!(extracted.segments[0].length(), 0.0);
    }

    #[test]
    fn test_interruptions() {
        let program = vec![
            record("linear"),
            ProgramInstruction::Comment {
                text: "note".to_string(),
            },
            record("linear"),
            ProgramInstruction::ToolChange { tool: 2 },
            record("linear"),
        ];
        let extracted = extract_segments(&program).unwrap();
        assert!(!extracted.interrupted_between(0, 2));
        assert!(extracted.interrupted_between(2, 4));
    }

    #[test]
    fn test_interruptions_only_look_between_positions() {
        let program = vec![
            ProgramInstruction::Pause,
            record("linear"),
            ProgramInstruction::Comment {
                text: "a".to_string(),
            },
            ProgramInstruction::Comment {
                text: "b".to_string(),
            },
            record("linear"),
            record("linear"),
            ProgramInstruction::SpindleOff,
            record("linear"),
            ProgramInstruction::Dwell { seconds: 1.0 },
        ];
        let extracted = extract_segments(&program).unwrap();

        // halts at positions 0 and 8 lie outside every pair tested here
        assert!(!extracted.interrupted_between(1, 4));
        assert!(!extracted.interrupted_between(4, 1));
        assert!(!extracted.interrupted_between(4, 5));
        assert!(extracted.interrupted_between(5, 7));
        assert!(extracted.interrupted_between(7, 5));
        assert!(extracted.interrupted_between(1, 7));
        // the endpoints themselves never count
        assert!(!extracted.interrupted_between(6, 7));
        assert!(!extracted.interrupted_between(0, 1));
        assert!(!extracted.interrupted_between(7, 8));
    }

    #[test]
    fn test_commented_program_keeps_every_junction() {
        let mut program = Vec::new();
        for i in 0..20_000 {
            let x = i as f64;
            program.push(ProgramInstruction::motion(&MotionSegment::linear(
                Point3::xy(x, 0.0),
                Point3::xy(x + 1.0, 0.0),
                1200.0,
            )));
            program.push(ProgramInstruction::Comment {
                text: format!("step {i}"),
            });
        }
        let extracted = extract_segments(&program).unwrap();
        assert_eq!(extracted.passthrough.len(), 20_000);
        assert!(extracted
            .segments
            .windows(2)
            .all(|pair| !extracted.interrupted_between(pair[0].position, pair[1].position)));
    }
}
