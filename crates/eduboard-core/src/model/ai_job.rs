use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::store::Entity;

/// A content-generation job. Jobs are fixtures: nothing executes them, they
/// only move through their lifecycle via `update`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiJob {
    #[serde(rename = "Id")]
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: Option<String>,
    pub course_id: Option<u32>,
    pub status: JobStatus,
    pub progress: f32,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AiJob {
    /// Progress as a whole percentage in `0..=100`.
    pub fn rounded_progress(&self) -> u8 {
        if self.progress.is_nan() {
            return 0;
        }
        self.progress.clamp(0.0, 100.0).round() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("unknown job status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewAiJob {
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: Option<String>,
    pub course_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiJobPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Option<String>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Option<u32>>,
    pub status: Option<JobStatus>,
    pub progress: Option<f32>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub result: Option<Option<serde_json::Value>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub error: Option<Option<String>>,
}

impl Entity for AiJob {
    const NAME: &'static str = "AI Job";
    type Draft = NewAiJob;
    type Patch = AiJobPatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewAiJob, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: draft.kind,
            prompt: draft.prompt,
            course_id: draft.course_id,
            status: JobStatus::Pending,
            progress: 0.0,
            result: None,
            error: None,
            created_at: Some(now),
        }
    }

    fn apply_patch(&mut self, patch: AiJobPatch, _now: DateTime<Utc>) {
        merge(&mut self.kind, patch.kind);
        merge(&mut self.prompt, patch.prompt);
        merge(&mut self.course_id, patch.course_id);
        merge(&mut self.status, patch.status);
        merge(&mut self.progress, patch.progress);
        merge(&mut self.result, patch.result);
        merge(&mut self.error, patch.error);
    }
}
