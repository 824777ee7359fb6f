//! Page-level loaders.
//!
//! Each loader issues its store calls together and awaits them jointly, so
//! a view costs the slowest store's latency rather than the sum. Roles that
//! never see the user directory do not query it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::agenda::{self, AgendaItem};
use crate::calendar::{self, CalendarDay, DateWindow};
use crate::model::{AiJob, Assignment, CalendarEvent, Course, CourseStatus, Role, User};
use crate::stats::{self, DashboardData, Share, StatCard};
use crate::store::Campus;

const RECENT_JOBS: usize = 3;
const UPCOMING_ASSIGNMENTS: usize = 5;
const TOP_COURSES: usize = 5;
const WEEK_EVENTS: usize = 5;
const WEEK_ASSIGNMENTS: usize = 3;
const WEEK_ITEMS: usize = 4;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub role: Role,
    pub stats: Vec<StatCard>,
    pub upcoming_assignments: Vec<Assignment>,
    pub recent_ai_jobs: Vec<AiJob>,
    pub courses: Vec<Course>,
}

impl DashboardView {
    pub async fn load(
        campus: &Campus,
        role: Role,
        viewer_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let users = campus.users.clone();
        let (courses, assignments, users, ai_jobs) = tokio::join!(
            campus.courses.get_all(),
            campus.assignments.get_all(),
            async move {
                if role.is_staff() {
                    users.get_all().await
                } else {
                    Vec::new()
                }
            },
            campus.ai_jobs.get_all(),
        );
        let data = DashboardData {
            courses,
            assignments,
            users,
            ai_jobs,
        };
        tracing::debug!(%role, "dashboard loaded");

        Self {
            role,
            stats: stats::dashboard_stats(role, &data, now, viewer_id),
            upcoming_assignments: stats::upcoming_assignments(
                &data.assignments,
                now,
                UPCOMING_ASSIGNMENTS,
            ),
            recent_ai_jobs: stats::recent_ai_jobs(&data.ai_jobs, RECENT_JOBS),
            courses: data.courses,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub stats: Vec<StatCard>,
    pub top_courses: Vec<Course>,
    pub course_status: Vec<Share<CourseStatus>>,
    pub assignment_count: usize,
    /// Empty unless the viewer is an admin.
    pub users: Vec<User>,
}

impl AnalyticsView {
    pub async fn load(campus: &Campus, role: Role) -> Self {
        let users = campus.users.clone();
        let (courses, assignments, users) = tokio::join!(
            campus.courses.get_all(),
            campus.assignments.get_all(),
            async move {
                if role == Role::Admin {
                    users.get_all().await
                } else {
                    Vec::new()
                }
            },
        );

        Self {
            stats: stats::analytics_stats(&courses),
            top_courses: courses.iter().take(TOP_COURSES).cloned().collect(),
            course_status: stats::course_status_shares(&courses),
            assignment_count: assignments.len(),
            users,
        }
    }
}

/// The week widget: this week's events and assignments merged into a short
/// agenda.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekAgenda {
    pub window: DateWindow,
    pub events: Vec<CalendarEvent>,
    pub assignments: Vec<Assignment>,
    pub items: Vec<AgendaItem>,
}

impl WeekAgenda {
    pub async fn load(campus: &Campus, date: NaiveDate) -> Self {
        let window = DateWindow::week_of(date);
        let (events, assignments) = tokio::join!(
            campus.events.get_all(),
            campus.assignments.get_by_date_range(window.start, window.end),
        );

        let events: Vec<CalendarEvent> = window
            .select(&events)
            .into_iter()
            .take(WEEK_EVENTS)
            .collect();
        let assignments: Vec<Assignment> =
            assignments.into_iter().take(WEEK_ASSIGNMENTS).collect();
        let items = agenda::upcoming_items(&assignments, &events, WEEK_ITEMS);

        Self {
            window,
            events,
            assignments,
            items,
        }
    }
}

/// The calendar page for one month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCalendar {
    pub window: DateWindow,
    pub days: Vec<CalendarDay>,
    pub events: Vec<CalendarEvent>,
    pub assignments: Vec<Assignment>,
    pub courses: Vec<Course>,
}

impl MonthCalendar {
    pub async fn load(campus: &Campus, anchor: NaiveDate, today: NaiveDate) -> Self {
        let window = DateWindow::month_of(anchor);
        let (events, assignments, courses) = tokio::join!(
            campus.events.get_all(),
            campus.assignments.get_by_date_range(window.start, window.end),
            campus.courses.get_all(),
        );
        let days = calendar::month_grid(anchor, today, &events, &assignments);

        Self {
            window,
            days,
            events,
            assignments,
            courses,
        }
    }

    /// Course title for an Id, for labelling events and assignments.
    pub fn course_title(&self, course_id: u32) -> Option<&str> {
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .map(|c| c.title.as_str())
    }
}
