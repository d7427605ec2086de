//! # FretCAM
//!
//! Kinematic timing and bottleneck classification for CNC toolpaths.
//!
//! Given an ordered motion program and a machine profile, FretCAM estimates
//! how long each move takes on that machine and which physical limit governs
//! it: the feed ceiling, acceleration, jerk, or nothing at all. The same
//! program can be timed against several machines to see what an upgrade would
//! buy.
//!
//! ## Architecture
//!
//! FretCAM is organized as a workspace with multiple crates:
//!
//! 1. **fretcam-core** - Geometry, feed conversion, timing parameters
//! 2. **fretcam-devicedb** - Machine profiles and the profile repository
//! 3. **fretcam-settings** - Configuration file handling
//! 4. **fretcam-timing** - Segment extraction, capping, timing, comparison
//! 5. **fretcam** - This facade, plus logging setup

pub use fretcam_core::{BaselinePolicy, ComparisonSettings, ParameterError, Point3, TimingParameters};
pub use fretcam_devicedb::{
    DeviceError, DeviceResult, MachineProfile, MachineProfileProvider, ProfileError, ProfileRepository,
};
pub use fretcam_settings::{Config, ConfigError, LoggingSettings, SettingsError};
pub use fretcam_timing::{
    compare_profiles, estimate_program_time, estimate_segment_time, AggregateStats, ComparisonReport, Limiter,
    LimiterHistogram, MotionSegment, ProfileComparison, ProfileFailure, ProfileOutcome, ProgramEstimate,
    ProgramInstruction, SegmentKind, SegmentRecord, TaggedSegment, TimingEngine, TimingError, TimingResult,
};

use anyhow::Context;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds a timing engine from the `timing` and `comparison` sections.
pub fn engine_from_config(config: &Config) -> Result<TimingEngine, TimingError> {
    TimingEngine::with_settings(config.timing, config.comparison)
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Initialize logging from the `logging` configuration section
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging_with(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(settings.level.trim())
            .with_context(|| format!("Invalid log level '{}'", settings.level))?,
    };

    let json_layer = settings.json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
    });
    let pretty_layer = (!settings.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
