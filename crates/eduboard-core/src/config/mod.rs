use crate::error::{EduboardError, Result};
use crate::model::Role;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EduboardConfig {
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// Simulated round-trip per entity store, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_course_latency")]
    pub course: u64,
    #[serde(default = "default_assignment_latency")]
    pub assignment: u64,
    #[serde(default = "default_calendar_latency")]
    pub calendar: u64,
    #[serde(default = "default_user_latency")]
    pub user: u64,
    #[serde(default = "default_ai_job_latency")]
    pub ai_job: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            course: default_course_latency(),
            assignment: default_assignment_latency(),
            calendar: default_calendar_latency(),
            user: default_user_latency(),
            ai_job: default_ai_job_latency(),
        }
    }
}

impl LatencyConfig {
    /// All stores resolve immediately. Handy for tests and batch use.
    pub fn instant() -> Self {
        Self {
            course: 0,
            assignment: 0,
            calendar: 0,
            user: 0,
            ai_job: 0,
        }
    }

    pub fn course(&self) -> Duration {
        Duration::from_millis(self.course)
    }

    pub fn assignment(&self) -> Duration {
        Duration::from_millis(self.assignment)
    }

    pub fn calendar(&self) -> Duration {
        Duration::from_millis(self.calendar)
    }

    pub fn user(&self) -> Duration {
        Duration::from_millis(self.user)
    }

    pub fn ai_job(&self) -> Duration {
        Duration::from_millis(self.ai_job)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Directory holding replacement fixture files. Files missing from it
    /// fall back to the bundled copies.
    #[serde(default)]
    pub dir: Option<String>,
}

/// Who the dashboard is rendered for. The id is a placeholder matched
/// against `instructorId` and submission `userId`; nothing authenticates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_viewer_id")]
    pub id: String,
    #[serde(default)]
    pub role: Role,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            id: default_viewer_id(),
            role: Role::default(),
        }
    }
}

fn default_course_latency() -> u64 {
    300
}
fn default_assignment_latency() -> u64 {
    250
}
fn default_calendar_latency() -> u64 {
    500
}
fn default_user_latency() -> u64 {
    350
}
fn default_ai_job_latency() -> u64 {
    200
}
fn default_viewer_id() -> String {
    "current-user".to_string()
}

/// Latencies above this are clamped by [`EduboardConfig::validate`].
pub const MAX_LATENCY_MS: u64 = 10_000;

impl EduboardConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/eduboard/config.toml (global)
    /// 2. .eduboard/config.toml (project)
    /// 3. .eduboard/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".eduboard").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".eduboard").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| EduboardError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| EduboardError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Fix out-of-range values in place, returning (and logging) a warning
    /// for each correction.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        let latencies: Vec<(&str, &mut u64)> = vec![
            ("latency.course", &mut self.latency.course),
            ("latency.assignment", &mut self.latency.assignment),
            ("latency.calendar", &mut self.latency.calendar),
            ("latency.user", &mut self.latency.user),
            ("latency.ai_job", &mut self.latency.ai_job),
        ];
        for (name, val) in latencies {
            if *val > MAX_LATENCY_MS {
                warnings.push(format!(
                    "{name} = {val}ms exceeds {MAX_LATENCY_MS}ms, clamping"
                ));
                *val = MAX_LATENCY_MS;
            }
        }

        if self.viewer.id.trim().is_empty() {
            warnings.push(format!(
                "viewer.id is empty, using '{}'",
                default_viewer_id()
            ));
            self.viewer.id = default_viewer_id();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// Seed directory as a path, if configured.
    pub fn seed_dir(&self) -> Option<PathBuf> {
        self.seed.dir.as_deref().map(PathBuf::from)
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("eduboard").join("config.toml"))
}
