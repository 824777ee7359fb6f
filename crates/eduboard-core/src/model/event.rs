use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::error::{EduboardError, Result};
use crate::store::{Dated, Entity};

/// A calendar entry: lecture, meeting, deadline or reminder.
///
/// `recurring_type` only carries meaning while `is_recurring` is set; the
/// store clears it whenever a write leaves the event non-recurring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(rename = "Id")]
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(with = "super::timestamp")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub course_id: Option<u32>,
    pub location: Option<String>,
    pub is_recurring: bool,
    pub recurring_type: Option<RecurringType>,
    #[serde(with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CalendarEvent {
    fn normalize_recurrence(&mut self) {
        if !self.is_recurring {
            self.recurring_type = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Event,
    Meeting,
    Deadline,
    Reminder,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Meeting => write!(f, "meeting"),
            Self::Deadline => write!(f, "deadline"),
            Self::Reminder => write!(f, "reminder"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" => Ok(Self::Event),
            "meeting" => Ok(Self::Meeting),
            "deadline" => Ok(Self::Deadline),
            "reminder" => Ok(Self::Reminder),
            _ => Err(format!("unknown event type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringType {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for RecurringType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for RecurringType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("unknown recurrence: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    #[serde(with = "super::timestamp")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<EventType>,
    pub course_id: Option<u32>,
    pub location: Option<String>,
    pub is_recurring: bool,
    pub recurring_type: Option<RecurringType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(with = "super::timestamp::nullable", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(with = "super::timestamp::nullable", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(rename = "type")]
    pub kind: Option<EventType>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Option<u32>>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    pub is_recurring: Option<bool>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub recurring_type: Option<Option<RecurringType>>,
}

impl Entity for CalendarEvent {
    const NAME: &'static str = "Event";
    type Draft = NewEvent;
    type Patch = EventPatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewEvent, now: DateTime<Utc>) -> Self {
        let mut event = Self {
            id,
            title: draft.title,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            kind: draft.kind.unwrap_or_default(),
            course_id: draft.course_id,
            location: draft.location,
            is_recurring: draft.is_recurring,
            recurring_type: draft.recurring_type,
            created_at: Some(now),
            updated_at: Some(now),
        };
        event.normalize_recurrence();
        event
    }

    fn apply_patch(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.end_date, patch.end_date);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.course_id, patch.course_id);
        merge(&mut self.location, patch.location);
        merge(&mut self.is_recurring, patch.is_recurring);
        merge(&mut self.recurring_type, patch.recurring_type);
        self.normalize_recurrence();
        self.updated_at = Some(now);
    }
}

impl Dated for CalendarEvent {
    fn date_key(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }
}

/// Reject drafts the event form would not submit: empty title, no start,
/// or an end that is not after the start.
pub fn validate_event_draft(draft: &NewEvent) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(EduboardError::InvalidInput("title is required".into()));
    }
    let Some(start) = draft.start_date else {
        return Err(EduboardError::InvalidInput("start date is required".into()));
    };
    if let Some(end) = draft.end_date {
        if end <= start {
            return Err(EduboardError::InvalidInput(
                "end must be after start".into(),
            ));
        }
    }
    Ok(())
}
