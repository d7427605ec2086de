//! Multi-profile comparison.
//!
//! Times one extracted program against several machine profiles. Each run
//! only reads the shared program and resolves its own profile; a run that
//! fails is recorded for that profile alone. Entries keep request order, so
//! the report does not depend on whether runs were executed sequentially or
//! on worker threads.

use crate::engine::TimingEngine;
use crate::error::{ProfileFailure, Result, TimingError};
use crate::extract::ExtractedProgram;
use crate::report::AggregateStats;
use fretcam_core::BaselinePolicy;
use fretcam_devicedb::MachineProfileProvider;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Result of one profile's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProfileOutcome {
    Completed(AggregateStats),
    Failed(ProfileFailure),
}

impl ProfileOutcome {
    pub fn stats(&self) -> Option<&AggregateStats> {
        match self {
            ProfileOutcome::Completed(stats) => Some(stats),
            ProfileOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ProfileFailure> {
        match self {
            ProfileOutcome::Completed(_) => None,
            ProfileOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// One requested profile in a comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileComparison {
    pub profile_id: String,
    pub outcome: ProfileOutcome,
    /// `baseline_time / total_time`; `None` for failed runs, when there is no
    /// baseline, or when the ratio is undefined.
    pub speedup: Option<f64>,
}

/// Per-profile outcomes and speedups for one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline_policy: BaselinePolicy,
    /// Profile every speedup is relative to; `None` when every run failed.
    pub baseline_profile_id: Option<String>,
    /// Entries in request order, one per distinct id.
    pub entries: Vec<ProfileComparison>,
}

impl ComparisonReport {
    pub fn get(&self, profile_id: &str) -> Option<&ProfileComparison> {
        self.entries.iter().find(|e| e.profile_id == profile_id)
    }

    pub fn stats(&self, profile_id: &str) -> Option<&AggregateStats> {
        self.get(profile_id).and_then(|e| e.outcome.stats())
    }

    pub fn speedup(&self, profile_id: &str) -> Option<f64> {
        self.get(profile_id).and_then(|e| e.speedup)
    }

    /// Failure markers, in request order.
    pub fn failures(&self) -> impl Iterator<Item = &ProfileFailure> {
        self.entries.iter().filter_map(|e| e.outcome.failure())
    }

    /// The successful run with the lowest total time (earliest on ties).
    pub fn fastest(&self) -> Option<&ProfileComparison> {
        let mut best: Option<(&ProfileComparison, f64)> = None;
        for entry in &self.entries {
            if let Some(stats) = entry.outcome.stats() {
                if best.is_none_or(|(_, time)| stats.total_time < time) {
                    best = Some((entry, stats.total_time));
                }
            }
        }
        best.map(|(entry, _)| entry)
    }
}

/// Runs the comparison for already-extracted `program`.
pub(crate) fn compare_extracted<P>(
    engine: &TimingEngine,
    program: &ExtractedProgram,
    profile_ids: &[&str],
    provider: &P,
) -> Result<ComparisonReport>
where
    P: MachineProfileProvider + ?Sized,
{
    let settings = engine.comparison_settings();

    let mut ids: Vec<&str> = Vec::with_capacity(profile_ids.len());
    for &id in profile_ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return Err(TimingError::NoProfiles);
    }
    if ids.len() > settings.max_profiles {
        return Err(TimingError::TooManyProfiles {
            requested: ids.len(),
            max: settings.max_profiles,
        });
    }

    let outcomes: Vec<ProfileOutcome> = if settings.parallel && ids.len() > 1 {
        std::thread::scope(|scope| {
            let handles: Vec<_> = ids
                .iter()
                .map(|id| {
                    let id = *id;
                    (id, scope.spawn(move || evaluate(engine, program, id, provider)))
                })
                .collect();
            handles
                .into_iter()
                .map(|(id, handle)| handle.join().unwrap_or_else(|_| panicked(id)))
                .collect()
        })
    } else {
        ids.iter()
            .map(|id| {
                panic::catch_unwind(AssertUnwindSafe(|| evaluate(engine, program, id, provider)))
                    .unwrap_or_else(|_| panicked(id))
            })
            .collect()
    };

    let baseline = select_baseline(settings.baseline, &ids, &outcomes);
    let entries = ids
        .iter()
        .zip(outcomes)
        .map(|(id, outcome)| {
            let speedup = match (&baseline, outcome.stats()) {
                (Some((_, baseline_time)), Some(stats)) => speedup_ratio(*baseline_time, stats.total_time),
                _ => None,
            };
            ProfileComparison {
                profile_id: id.to_string(),
                outcome,
                speedup,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Compared {} profiles over {} segments, baseline {:?}",
        entries.len(),
        program.segments.len(),
        baseline.as_ref().map(|(id, _)| id)
    );

    Ok(ComparisonReport {
        baseline_policy: settings.baseline,
        baseline_profile_id: baseline.map(|(id, _)| id),
        entries,
    })
}

fn evaluate<P>(engine: &TimingEngine, program: &ExtractedProgram, profile_id: &str, provider: &P) -> ProfileOutcome
where
    P: MachineProfileProvider + ?Sized,
{
    match provider.get_profile(profile_id) {
        Ok(profile) => ProfileOutcome::Completed(engine.estimate_extracted(program, &profile).stats),
        Err(err) => {
            let failure = ProfileFailure::from_device_error(profile_id, &err);
            warn!("Comparison run failed: {}", failure);
            ProfileOutcome::Failed(failure)
        }
    }
}

fn panicked(profile_id: &str) -> ProfileOutcome {
    warn!("Comparison run for profile '{}' panicked", profile_id);
    ProfileOutcome::Failed(ProfileFailure::WorkerPanicked {
        profile_id: profile_id.to_string(),
    })
}

fn select_baseline(policy: BaselinePolicy, ids: &[&str], outcomes: &[ProfileOutcome]) -> Option<(String, f64)> {
    let mut successes = ids
        .iter()
        .zip(outcomes)
        .filter_map(|(id, outcome)| outcome.stats().map(|s| (*id, s.total_time)));

    let chosen = match policy {
        BaselinePolicy::FirstSuccessful => successes.next(),
        BaselinePolicy::Slowest => successes.fold(None, |best: Option<(&str, f64)>, candidate| match best {
            Some((_, time)) if candidate.1 <= time => best,
            _ => Some(candidate),
        }),
    };
    chosen.map(|(id, time)| (id.to_string(), time))
}

/// `baseline_time / profile_time`, or `None` when undefined.
///
/// Two zero-time runs are equally fast.
pub fn speedup_ratio(baseline_time: f64, profile_time: f64) -> Option<f64> {
    if profile_time > 0.0 {
        Some(baseline_time / profile_time)
    } else if baseline_time == 0.0 {
        Some(1.0)
    } else {
        None
    }
}
