//! Role-scoped stat cards and the counts behind them.
//!
//! Everything here is a pure function of already-fetched collections and an
//! explicit `now`. Change deltas are fixed per card; only the values are
//! derived from data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AiJob, Assignment, Course, CourseStatus, Role, User};

/// Collections a dashboard is computed from. `users` stays empty for roles
/// that never load the directory.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub users: Vec<User>,
    pub ai_jobs: Vec<AiJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(u64),
    Percent(u32),
    Text(String),
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: &'static str,
    pub value: StatValue,
    /// Period-over-period change in percent.
    pub change: i32,
    pub change_type: Trend,
}

impl StatCard {
    fn new(title: &'static str, value: StatValue, change: i32) -> Self {
        let change_type = if change < 0 {
            Trend::Negative
        } else {
            Trend::Positive
        };
        Self {
            title,
            value,
            change,
            change_type,
        }
    }
}

/// Share of `part` in `whole` as a rounded percentage; 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// An assignment is pending while its due date lies strictly in the future.
pub fn is_pending(assignment: &Assignment, now: DateTime<Utc>) -> bool {
    assignment.due_date.is_some_and(|due| due > now)
}

pub fn pending_count(assignments: &[Assignment], now: DateTime<Utc>) -> usize {
    assignments.iter().filter(|a| is_pending(a, now)).count()
}

/// The first `limit` pending assignments, in collection order.
pub fn upcoming_assignments(
    assignments: &[Assignment],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<Assignment> {
    assignments
        .iter()
        .filter(|a| is_pending(a, now))
        .take(limit)
        .cloned()
        .collect()
}

/// Whole days until the due date, rounded up. Negative once overdue.
pub fn days_until_due(assignment: &Assignment, now: DateTime<Utc>) -> Option<i64> {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    assignment.due_date.map(|due| {
        let ms = (due - now).num_milliseconds();
        ms.div_euclid(DAY_MS) + i64::from(ms.rem_euclid(DAY_MS) != 0)
    })
}

pub fn recent_ai_jobs(jobs: &[AiJob], limit: usize) -> Vec<AiJob> {
    jobs.iter().take(limit).cloned().collect()
}

pub fn total_enrollments(courses: &[Course]) -> u64 {
    courses.iter().map(|c| u64::from(c.enrollments)).sum()
}

pub fn count_courses_with_status(courses: &[Course], status: CourseStatus) -> usize {
    courses.iter().filter(|c| c.status == status).count()
}

/// Jobs created on the same UTC calendar day as `now`.
pub fn ai_jobs_on_day(jobs: &[AiJob], now: DateTime<Utc>) -> usize {
    let today = now.date_naive();
    jobs.iter()
        .filter(|j| j.created_at.is_some_and(|c| c.date_naive() == today))
        .count()
}

/// The four dashboard cards for `role`. `viewer_id` is matched against
/// course `instructorId` for the manager's "My Courses".
pub fn dashboard_stats(
    role: Role,
    data: &DashboardData,
    now: DateTime<Utc>,
    viewer_id: &str,
) -> Vec<StatCard> {
    let pending = pending_count(&data.assignments, now) as u64;
    match role {
        Role::Admin => vec![
            StatCard::new(
                "Total Students",
                StatValue::Count(data.users.iter().filter(|u| u.role == Role::User).count() as u64),
                12,
            ),
            StatCard::new(
                "Active Courses",
                StatValue::Count(
                    count_courses_with_status(&data.courses, CourseStatus::Active) as u64,
                ),
                8,
            ),
            StatCard::new("Pending Assignments", StatValue::Count(pending), -5),
            StatCard::new(
                "AI Jobs Today",
                StatValue::Count(ai_jobs_on_day(&data.ai_jobs, now) as u64),
                25,
            ),
        ],
        Role::Manager => vec![
            StatCard::new(
                "My Courses",
                StatValue::Count(
                    data.courses
                        .iter()
                        .filter(|c| c.instructor_id.as_deref() == Some(viewer_id))
                        .count() as u64,
                ),
                5,
            ),
            StatCard::new(
                "Student Enrollments",
                StatValue::Count(total_enrollments(&data.courses)),
                15,
            ),
            StatCard::new(
                "Assignments Created",
                StatValue::Count(data.assignments.len() as u64),
                10,
            ),
            StatCard::new("Avg. Completion Rate", StatValue::Percent(87), 3),
        ],
        Role::User => vec![
            StatCard::new(
                "Enrolled Courses",
                StatValue::Count(data.courses.len() as u64),
                2,
            ),
            StatCard::new("Pending Assignments", StatValue::Count(pending), -1),
            StatCard::new("Completion Rate", StatValue::Percent(92), 5),
            StatCard::new("Study Streak", StatValue::Count(12), 1),
        ],
    }
}

pub fn analytics_stats(courses: &[Course]) -> Vec<StatCard> {
    vec![
        StatCard::new(
            "Total Enrollment",
            StatValue::Count(total_enrollments(courses)),
            15,
        ),
        StatCard::new("Course Completion Rate", StatValue::Percent(87), 5),
        StatCard::new("Average Grade", StatValue::Text("B+".into()), 3),
        StatCard::new("Student Satisfaction", StatValue::Text("4.6/5".into()), 8),
    ]
}

/// Count and share of each value in a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share<K> {
    pub key: K,
    pub count: usize,
    pub percent: u32,
}

pub fn course_status_shares(courses: &[Course]) -> Vec<Share<CourseStatus>> {
    [CourseStatus::Active, CourseStatus::Draft, CourseStatus::Archived]
        .into_iter()
        .map(|status| {
            let count = count_courses_with_status(courses, status);
            Share {
                key: status,
                count,
                percent: percent(count, courses.len()),
            }
        })
        .collect()
}
