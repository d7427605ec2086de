//! End-to-end tests: profiles and configuration loaded from files

use fretcam_core::{BaselinePolicy, Point3};
use fretcam_devicedb::{MachineProfile, MachineProfileProvider, ProfileRepository};
use fretcam_settings::Config;
use fretcam_timing::{Limiter, MotionSegment, ProgramInstruction, TimingEngine};
use tempfile::TempDir;

fn profiles_file(dir: &TempDir) -> std::path::PathBuf {
    let profiles = vec![
        MachineProfile::new("desktop", "Desktop router")
            .with_feeds(1500.0, 3000.0)
            .with_dynamics(600.0, 1500.0),
        MachineProfile::new("shop", "Shop router")
            .with_feeds(6000.0, 12000.0)
            .with_dynamics(1800.0, 4000.0),
    ];
    let path = dir.path().join("machines.json");
    std::fs::write(&path, serde_json::to_string_pretty(&profiles).unwrap()).unwrap();
    path
}

fn slot_program() -> Vec<ProgramInstruction> {
    vec![
        ProgramInstruction::SpindleOn { rpm: 16000.0 },
        ProgramInstruction::motion(&MotionSegment::rapid(Point3::new(0.0, 0.0, 5.0), Point3::new(40.0, 0.0, 5.0))),
        ProgramInstruction::motion(&MotionSegment::linear(
            Point3::new(40.0, 0.0, 5.0),
            Point3::new(40.0, 0.0, -3.0),
            300.0,
        )),
        ProgramInstruction::motion(&MotionSegment::linear(
            Point3::new(40.0, 0.0, -3.0),
            Point3::new(40.0, 56.0, -3.0),
            4000.0,
        )),
        ProgramInstruction::motion(&MotionSegment::rapid(Point3::new(40.0, 56.0, -3.0), Point3::new(40.0, 56.0, 5.0))),
        ProgramInstruction::SpindleOff,
    ]
}

#[test]
fn test_config_repository_and_comparison() {
    let dir = TempDir::new().unwrap();
    let repo = ProfileRepository::load_from_file(profiles_file(&dir)).unwrap();
    assert_eq!(repo.profile_ids(), vec!["desktop".to_string(), "shop".to_string()]);

    let config_path = dir.path().join("fretcam.toml");
    let mut config = Config::new();
    config.comparison.baseline = BaselinePolicy::Slowest;
    config.save_to_file(&config_path).unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    let engine = TimingEngine::with_settings(config.timing, config.comparison).unwrap();
    let report = engine
        .compare_profiles(&slot_program(), &["shop", "desktop"], &repo)
        .unwrap();

    assert_eq!(report.baseline_profile_id.as_deref(), Some("desktop"));
    assert!(report.speedup("shop").unwrap() > 1.0);

    // 4000 mm/min exceeds the desktop machine's 1500 mm/min ceiling
    let desktop = engine
        .estimate_program_time(&slot_program(), &repo.get_profile("desktop").unwrap())
        .unwrap();
    assert_eq!(desktop.segments[2].limiter(), Limiter::FeedCap);
    assert_eq!(desktop.stats.histogram.total(), 4);
}

#[test]
fn test_invalid_config_does_not_build_an_engine() {
    let mut config = Config::new();
    config.timing.limit_floor = 0.0;
    assert!(TimingEngine::with_settings(config.timing, config.comparison).is_err());
}
