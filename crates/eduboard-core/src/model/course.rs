use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::error::{EduboardError, Result};
use crate::store::Entity;

/// A course offered on the platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "Id")]
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub instructor_id: Option<String>,
    pub status: CourseStatus,
    pub enrollments: u32,
    pub modules: Vec<CourseModule>,
    pub ai_generated: bool,
    #[serde(with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseModule {
    pub title: String,
    pub lessons: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("unknown course status: {s}")),
        }
    }
}

/// Fields accepted when creating a course. Lifecycle fields (status,
/// enrollments, modules, aiGenerated) are always reset by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub instructor_id: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewCourse {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a course. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Option<String>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Option<String>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Option<String>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<Option<String>>,
    pub status: Option<CourseStatus>,
    pub enrollments: Option<u32>,
    pub modules: Option<Vec<CourseModule>>,
    pub ai_generated: Option<bool>,
}

impl Entity for Course {
    const NAME: &'static str = "Course";
    type Draft = NewCourse;
    type Patch = CoursePatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewCourse, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            difficulty: draft.difficulty,
            duration: draft.duration,
            instructor: draft.instructor,
            instructor_id: draft.instructor_id,
            status: CourseStatus::Draft,
            enrollments: 0,
            modules: Vec::new(),
            ai_generated: false,
            created_at: draft.created_at,
        }
    }

    fn apply_patch(&mut self, patch: CoursePatch, _now: DateTime<Utc>) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.category, patch.category);
        merge(&mut self.difficulty, patch.difficulty);
        merge(&mut self.duration, patch.duration);
        merge(&mut self.instructor, patch.instructor);
        merge(&mut self.instructor_id, patch.instructor_id);
        merge(&mut self.status, patch.status);
        merge(&mut self.enrollments, patch.enrollments);
        merge(&mut self.modules, patch.modules);
        merge(&mut self.ai_generated, patch.ai_generated);
    }
}

/// Reject drafts the course form would not submit.
pub fn validate_course_draft(draft: &NewCourse) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(EduboardError::InvalidInput("title cannot be empty".into()));
    }
    Ok(())
}
