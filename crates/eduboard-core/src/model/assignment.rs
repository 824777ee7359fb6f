use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::error::{EduboardError, Result};
use crate::store::{Dated, Entity};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "Id")]
    pub id: u32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub course_id: Option<u32>,
    #[serde(rename = "type")]
    pub kind: AssignmentType,
    #[serde(with = "super::timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    pub points: Option<u32>,
    pub max_points: Option<u32>,
    pub instructions: String,
    pub status: Option<AssignmentStatus>,
    pub submissions: Vec<Submission>,
    #[serde(with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Whether the given user has handed this assignment in.
    pub fn submitted_by(&self, user_id: &str) -> bool {
        self.submissions.iter().any(|s| s.user_id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Submission {
    pub user_id: String,
    #[serde(with = "super::timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub grade: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    Homework,
    Project,
    Quiz,
    Exam,
    Discussion,
    Presentation,
    #[default]
    Essay,
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Homework => write!(f, "homework"),
            Self::Project => write!(f, "project"),
            Self::Quiz => write!(f, "quiz"),
            Self::Exam => write!(f, "exam"),
            Self::Discussion => write!(f, "discussion"),
            Self::Presentation => write!(f, "presentation"),
            Self::Essay => write!(f, "essay"),
        }
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "homework" => Ok(Self::Homework),
            "project" => Ok(Self::Project),
            "quiz" => Ok(Self::Quiz),
            "exam" => Ok(Self::Exam),
            "discussion" => Ok(Self::Discussion),
            "presentation" => Ok(Self::Presentation),
            "essay" => Ok(Self::Essay),
            _ => Err(format!("unknown assignment type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Draft,
    Active,
    Closed,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("unknown assignment status: {s}")),
        }
    }
}

/// Fields accepted when creating an assignment. A missing `type` becomes
/// `essay`; submissions always start empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub content: String,
    pub course_id: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<AssignmentType>,
    #[serde(with = "super::timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    pub points: Option<u32>,
    pub max_points: Option<u32>,
    pub instructions: String,
    pub status: Option<AssignmentStatus>,
    #[serde(with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Option<u32>>,
    #[serde(rename = "type")]
    pub kind: Option<AssignmentType>,
    #[serde(with = "super::timestamp::nullable", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub points: Option<Option<u32>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub max_points: Option<Option<u32>>,
    pub instructions: Option<String>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<AssignmentStatus>>,
    pub submissions: Option<Vec<Submission>>,
}

impl Entity for Assignment {
    const NAME: &'static str = "Assignment";
    type Draft = NewAssignment;
    type Patch = AssignmentPatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewAssignment, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            content: draft.content,
            course_id: draft.course_id,
            kind: draft.kind.unwrap_or_default(),
            due_date: draft.due_date,
            points: draft.points,
            max_points: draft.max_points,
            instructions: draft.instructions,
            status: draft.status,
            submissions: Vec::new(),
            created_at: draft.created_at,
        }
    }

    fn apply_patch(&mut self, patch: AssignmentPatch, _now: DateTime<Utc>) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.content, patch.content);
        merge(&mut self.course_id, patch.course_id);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.due_date, patch.due_date);
        merge(&mut self.points, patch.points);
        merge(&mut self.max_points, patch.max_points);
        merge(&mut self.instructions, patch.instructions);
        merge(&mut self.status, patch.status);
        merge(&mut self.submissions, patch.submissions);
    }
}

impl Dated for Assignment {
    fn date_key(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }
}

/// Reject drafts the assignment form would not submit.
pub fn validate_assignment_draft(draft: &NewAssignment) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(EduboardError::InvalidInput("title cannot be empty".into()));
    }
    if draft.due_date.is_none() {
        return Err(EduboardError::InvalidInput("due date is required".into()));
    }
    Ok(())
}
