#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use eduboard_core::config::{EduboardConfig, LatencyConfig};
use eduboard_core::store::{create_campus, Campus, SeedData};

/// Bundled fixtures with no simulated latency.
pub fn bundled_campus() -> Campus {
    Campus::from_seed(SeedData::bundled().unwrap(), &LatencyConfig::instant())
}

/// Config that seeds from `dir` and resolves instantly.
pub fn config_with_seed_dir(dir: &std::path::Path) -> EduboardConfig {
    let mut config = EduboardConfig::default_config();
    config.latency = LatencyConfig::instant();
    config.seed.dir = Some(dir.display().to_string());
    config
}

pub fn campus_from(config: &EduboardConfig) -> Campus {
    create_campus(config).unwrap()
}

/// A scratch directory unique to this test process and `name`.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("eduboard-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Midday on the fixtures' reference date.
pub fn fixture_now() -> DateTime<Utc> {
    date(2026, 10, 18).and_hms_opt(12, 0, 0).unwrap().and_utc()
}
