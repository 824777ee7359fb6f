//! Fixture loading for the entity stores.
//!
//! The bundled fixtures are compiled into the library. A seed directory can
//! replace any of them file by file; a file it lacks falls back to the
//! bundled copy. Nothing is ever written back.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{EduboardError, Result};
use super::Entity;
use crate::model::*;

const COURSES: &str = include_str!("../../fixtures/courses.json");
const ASSIGNMENTS: &str = include_str!("../../fixtures/assignments.json");
const CALENDAR: &str = include_str!("../../fixtures/calendar.json");
const USERS: &str = include_str!("../../fixtures/users.json");
const AI_JOBS: &str = include_str!("../../fixtures/ai_jobs.json");

/// Initial contents for every store.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub events: Vec<CalendarEvent>,
    pub users: Vec<User>,
    pub ai_jobs: Vec<AiJob>,
}

impl SeedData {
    /// The fixtures shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            courses: parse("courses.json", COURSES)?,
            assignments: parse("assignments.json", ASSIGNMENTS)?,
            events: parse("calendar.json", CALENDAR)?,
            users: parse("users.json", USERS)?,
            ai_jobs: parse("ai_jobs.json", AI_JOBS)?,
        })
    }

    /// Fixtures from `dir`, falling back to the bundled copy per file.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(EduboardError::Seed(format!(
                "seed directory does not exist: {}",
                dir.display()
            )));
        }
        Ok(Self {
            courses: load_or_bundled(dir, "courses.json", COURSES)?,
            assignments: load_or_bundled(dir, "assignments.json", ASSIGNMENTS)?,
            events: load_or_bundled(dir, "calendar.json", CALENDAR)?,
            users: load_or_bundled(dir, "users.json", USERS)?,
            ai_jobs: load_or_bundled(dir, "ai_jobs.json", AI_JOBS)?,
        })
    }

    pub fn total(&self) -> usize {
        self.courses.len()
            + self.assignments.len()
            + self.events.len()
            + self.users.len()
            + self.ai_jobs.len()
    }
}

fn load_or_bundled<T: Entity + DeserializeOwned>(
    dir: &Path,
    name: &str,
    bundled: &str,
) -> Result<Vec<T>> {
    let path = dir.join(name);
    if !path.exists() {
        tracing::debug!(file = name, "seed file missing, using bundled fixture");
        return parse(name, bundled);
    }
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| EduboardError::Seed(format!("failed to read {}: {e}", path.display())))?;
    parse(name, &raw)
}

/// Parse one fixture file. Every record needs an Id in `1..u32::MAX`, unique
/// within the file; a missing `Id` reads as 0 and is rejected.
fn parse<T: Entity + DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>> {
    let records: Vec<T> =
        serde_json::from_str(raw).map_err(|e| EduboardError::Seed(format!("{name}: {e}")))?;
    let mut seen = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let id = record.id();
        if id == 0 {
            return Err(EduboardError::Seed(format!("{name}: record {index} has no Id")));
        }
        if id == u32::MAX {
            return Err(EduboardError::Seed(format!(
                "{name}: Id {id} leaves no room for new records"
            )));
        }
        if !seen.insert(id) {
            return Err(EduboardError::Seed(format!("{name}: duplicate Id {id}")));
        }
    }
    Ok(records)
}
