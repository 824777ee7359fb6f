//! Merged agenda of assignments and calendar events.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::{Assignment, CalendarEvent, EventType};

/// What an agenda entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "type")]
pub enum AgendaKind {
    Assignment,
    Event(EventType),
}

impl std::fmt::Display for AgendaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assignment => write!(f, "assignment"),
            Self::Event(kind) => write!(f, "{kind}"),
        }
    }
}

/// One line on an agenda: an assignment placed at its due date, or an
/// event placed at its start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: u32,
    pub title: String,
    pub kind: AgendaKind,
    pub date: Option<DateTime<Utc>>,
    pub course_id: Option<u32>,
}

impl From<&Assignment> for AgendaItem {
    fn from(a: &Assignment) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            kind: AgendaKind::Assignment,
            date: a.due_date,
            course_id: a.course_id,
        }
    }
}

impl From<&CalendarEvent> for AgendaItem {
    fn from(e: &CalendarEvent) -> Self {
        Self {
            id: e.id,
            title: e.title.clone(),
            kind: AgendaKind::Event(e.kind),
            date: e.start_date,
            course_id: e.course_id,
        }
    }
}

/// Assignments then events, stably sorted by date ascending and cut to
/// `limit`. Equal dates keep assignments ahead of events; undated items go
/// last.
pub fn upcoming_items(
    assignments: &[Assignment],
    events: &[CalendarEvent],
    limit: usize,
) -> Vec<AgendaItem> {
    let mut items: Vec<AgendaItem> = assignments
        .iter()
        .map(AgendaItem::from)
        .chain(events.iter().map(AgendaItem::from))
        .collect();
    items.sort_by(|a, b| by_date(a.date, b.date));
    items.truncate(limit);
    items
}

/// Everything dated on `day` (UTC): events first, then assignments, each in
/// collection order.
pub fn items_on(
    day: NaiveDate,
    events: &[CalendarEvent],
    assignments: &[Assignment],
) -> Vec<AgendaItem> {
    let on_day = |date: Option<DateTime<Utc>>| date.is_some_and(|d| d.date_naive() == day);
    events
        .iter()
        .filter(|e| on_day(e.start_date))
        .map(AgendaItem::from)
        .chain(
            assignments
                .iter()
                .filter(|a| on_day(a.due_date))
                .map(AgendaItem::from),
        )
        .collect()
}

fn by_date(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
