mod memory;
mod seed;

pub use memory::Store;
pub use seed::SeedData;

use chrono::{DateTime, Utc};

use crate::config::{EduboardConfig, LatencyConfig};
use crate::error::Result;
use crate::model::*;

/// A record type owned by a [`Store`].
///
/// Each entity names itself for error messages, declares the shape accepted
/// on create (`Draft`) and on update (`Patch`), and knows how to apply its
/// own lifecycle defaults.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in `NotFound` errors, e.g. `"Assignment"`.
    const NAME: &'static str;

    type Draft: Send;
    type Patch: Send;

    fn id(&self) -> u32;

    /// Build a stored record from a draft. Entity-specific defaults are
    /// applied here and win over anything the draft carries.
    fn from_draft(id: u32, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Shallow-merge a patch: fields the patch leaves as `None` keep their
    /// current value.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// An entity that can be placed on the calendar.
pub trait Dated: Entity {
    /// The instant used for date-range queries (event start, assignment due
    /// date). Records without one never match a range.
    fn date_key(&self) -> Option<DateTime<Utc>>;
}

/// The five entity stores of one running dashboard.
///
/// Built once at startup and handed to consumers by reference. Cloning
/// yields handles onto the same collections.
#[derive(Clone)]
pub struct Campus {
    pub courses: Store<Course>,
    pub assignments: Store<Assignment>,
    pub events: Store<CalendarEvent>,
    pub users: Store<User>,
    pub ai_jobs: Store<AiJob>,
}

impl Campus {
    pub fn from_seed(seed: SeedData, latency: &LatencyConfig) -> Self {
        Self {
            courses: Store::new(seed.courses, latency.course()),
            assignments: Store::new(seed.assignments, latency.assignment()),
            events: Store::new(seed.events, latency.calendar()),
            users: Store::new(seed.users, latency.user()),
            ai_jobs: Store::new(seed.ai_jobs, latency.ai_job()),
        }
    }

    /// Validate a course draft, then create it.
    pub async fn add_course(&self, draft: NewCourse) -> Result<Course> {
        validate_course_draft(&draft)?;
        self.courses.create(draft).await
    }

    /// Validate an assignment draft (title and due date), then create it.
    pub async fn add_assignment(&self, draft: NewAssignment) -> Result<Assignment> {
        validate_assignment_draft(&draft)?;
        self.assignments.create(draft).await
    }

    /// Validate an event draft (title, start, end after start), then create it.
    pub async fn add_event(&self, draft: NewEvent) -> Result<CalendarEvent> {
        validate_event_draft(&draft)?;
        self.events.create(draft).await
    }
}

/// Seed a campus as the configuration describes: fixtures from `seed.dir`
/// when set, the bundled fixtures otherwise.
pub fn create_campus(config: &EduboardConfig) -> Result<Campus> {
    let seed = match config.seed_dir() {
        Some(dir) => SeedData::from_dir(&dir)?,
        None => SeedData::bundled()?,
    };
    tracing::info!(
        total = seed.total(),
        courses = seed.courses.len(),
        assignments = seed.assignments.len(),
        events = seed.events.len(),
        users = seed.users.len(),
        ai_jobs = seed.ai_jobs.len(),
        "seeded campus"
    );
    Ok(Campus::from_seed(seed, &config.latency))
}
