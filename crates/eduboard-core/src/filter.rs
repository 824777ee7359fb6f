//! List filters for the course, assignment and user tables.
//!
//! Each filter is a bag of optional criteria; a record passes when it meets
//! every criterion that is set. Search text matches case-insensitively as a
//! substring. Filtering never reorders records.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Assignment, AssignmentType, Course, CourseStatus, Role, User};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Blank search text matches everything.
fn search_term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseFilter {
    /// Matched against title and description.
    pub search: Option<String>,
    pub status: Option<CourseStatus>,
    pub instructor_id: Option<String>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&course.title, term) && !contains_ci(&course.description, term) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != course.status) {
            return false;
        }
        if let Some(ref instructor) = self.instructor_id {
            if course.instructor_id.as_deref() != Some(instructor.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, courses: &[Course]) -> Vec<Course> {
        courses.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignmentFilter {
    /// Matched against title.
    pub search: Option<String>,
    pub course_id: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<AssignmentType>,
}

impl AssignmentFilter {
    pub fn matches(&self, assignment: &Assignment) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&assignment.title, term) {
                return false;
            }
        }
        if self.course_id.is_some() && assignment.course_id != self.course_id {
            return false;
        }
        if self.kind.is_some_and(|k| k != assignment.kind) {
            return false;
        }
        true
    }

    pub fn apply(&self, assignments: &[Assignment]) -> Vec<Assignment> {
        assignments
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    #[default]
    Name,
    Role,
    LastActive,
}

impl std::fmt::Display for UserSortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Role => write!(f, "role"),
            Self::LastActive => write!(f, "last_active"),
        }
    }
}

impl std::str::FromStr for UserSortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "name" => Ok(Self::Name),
            "role" => Ok(Self::Role),
            "last_active" | "lastactive" => Ok(Self::LastActive),
            _ => Err(format!("unknown sort field: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserFilter {
    /// Matched against email and "first last".
    pub search: Option<String>,
    pub role: Option<Role>,
    pub institution_id: Option<String>,
    /// Unsorted (collection order) when `None`.
    pub sort: Option<UserSortField>,
    pub direction: SortDirection,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&user.email, term) && !contains_ci(&user.display_name(), term) {
                return false;
            }
        }
        if self.role.is_some_and(|r| r != user.role) {
            return false;
        }
        if let Some(ref institution) = self.institution_id {
            if user.institution_id.as_deref() != Some(institution.as_str()) {
                return false;
            }
        }
        true
    }

    /// Matching users, sorted when a sort field is set. The sort is stable.
    pub fn apply(&self, users: &[User]) -> Vec<User> {
        let mut out: Vec<User> = users.iter().filter(|u| self.matches(u)).cloned().collect();
        if let Some(field) = self.sort {
            out.sort_by(|a, b| {
                let ord = compare_users(field, a, b);
                match self.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        out
    }
}

fn compare_users(field: UserSortField, a: &User, b: &User) -> Ordering {
    match field {
        UserSortField::Name => a
            .display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase()),
        UserSortField::Role => a.role.to_string().cmp(&b.role.to_string()),
        UserSortField::LastActive => a.last_active.cmp(&b.last_active),
    }
}

/// How an assignment reads in the list for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "standing", content = "count")]
pub enum AssignmentStanding {
    Submitted,
    Overdue,
    Pending,
    /// Staff see the submission count instead of their own standing.
    Submissions(usize),
}

impl AssignmentStanding {
    pub fn for_viewer(
        assignment: &Assignment,
        role: Role,
        viewer_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        if role.is_staff() {
            return Self::Submissions(assignment.submissions.len());
        }
        if assignment.submitted_by(viewer_id) {
            Self::Submitted
        } else if assignment.due_date.is_some_and(|due| now > due) {
            Self::Overdue
        } else {
            Self::Pending
        }
    }
}

impl std::fmt::Display for AssignmentStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Overdue => write!(f, "overdue"),
            Self::Pending => write!(f, "pending"),
            Self::Submissions(n) => write!(f, "{n} submissions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{timestamp, Profile, Submission};

    fn course(id: u32, title: &str, description: &str, status: CourseStatus) -> Course {
        Course {
            id,
            title: title.into(),
            description: description.into(),
            status,
            instructor_id: Some(format!("instructor-{id}")),
            ..Default::default()
        }
    }

    fn user(id: u32, first: &str, last: &str, role: Role, active: &str) -> User {
        User {
            id,
            email: format!("{}@example.edu", first.to_lowercase()),
            role,
            profile: Profile {
                first_name: first.into(),
                last_name: last.into(),
            },
            institution_id: Some(if id % 2 == 0 { "even" } else { "odd" }.into()),
            last_active: timestamp::parse(active),
            ..Default::default()
        }
    }

    fn users() -> Vec<User> {
        vec![
            user(1, "Zoe", "Adams", Role::User, "2026-10-10T00:00:00Z"),
            user(2, "Ann", "Baker", Role::Manager, "2026-10-12T00:00:00Z"),
            user(3, "Mia", "Cole", Role::Admin, "2026-10-01T00:00:00Z"),
        ]
    }

    #[test]
    fn course_search_matches_title_or_description() {
        let courses = vec![
            course(1, "Machine Learning", "Intro", CourseStatus::Active),
            course(2, "Web Dev", "Build with machine-friendly HTML", CourseStatus::Draft),
            course(3, "Marketing", "Campaigns", CourseStatus::Active),
        ];
        let filter = CourseFilter {
            search: Some("MACHINE".into()),
            ..Default::default()
        };
        let ids: Vec<u32> = filter.apply(&courses).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let filter = CourseFilter {
            search: Some("machine".into()),
            status: Some(CourseStatus::Active),
            ..Default::default()
        };
        assert_eq!(filter.apply(&courses).len(), 1);
    }

    #[test]
    fn course_instructor_filter() {
        let courses = vec![
            course(1, "A", "", CourseStatus::Active),
            course(2, "B", "", CourseStatus::Active),
        ];
        let filter = CourseFilter {
            instructor_id: Some("instructor-2".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&courses)[0].id, 2);
    }

    #[test]
    fn blank_search_matches_all() {
        let courses = vec![course(1, "A", "", CourseStatus::Draft)];
        let filter = CourseFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&courses).len(), 1);
    }

    #[test]
    fn assignment_filter_by_course_and_type() {
        let assignments = vec![
            Assignment {
                id: 1,
                title: "Quiz One".into(),
                course_id: Some(1),
                kind: AssignmentType::Quiz,
                ..Default::default()
            },
            Assignment {
                id: 2,
                title: "Essay".into(),
                course_id: Some(1),
                ..Default::default()
            },
            Assignment {
                id: 3,
                title: "Quiz Two".into(),
                course_id: Some(2),
                kind: AssignmentType::Quiz,
                ..Default::default()
            },
        ];
        let filter = AssignmentFilter {
            course_id: Some(1),
            kind: Some(AssignmentType::Quiz),
            ..Default::default()
        };
        let ids: Vec<u32> = filter.apply(&assignments).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1]);

        let filter = AssignmentFilter {
            search: Some("quiz".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&assignments).len(), 2);
    }

    #[test]
    fn user_search_matches_full_name_and_email() {
        let filter = UserFilter {
            search: Some("ann baker".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&users())[0].id, 2);

        let filter = UserFilter {
            search: Some("zoe@".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&users())[0].id, 1);
    }

    #[test]
    fn user_role_and_institution() {
        let filter = UserFilter {
            institution_id: Some("odd".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&users()).len(), 2);

        let filter = UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert_eq!(filter.apply(&users())[0].id, 3);
    }

    #[test]
    fn user_sorting() {
        let ids = |filter: UserFilter| -> Vec<u32> {
            filter.apply(&users()).iter().map(|u| u.id).collect()
        };
        assert_eq!(ids(UserFilter::default()), vec![1, 2, 3]);
        assert_eq!(
            ids(UserFilter {
                sort: Some(UserSortField::Name),
                ..Default::default()
            }),
            vec![2, 3, 1]
        );
        assert_eq!(
            ids(UserFilter {
                sort: Some(UserSortField::LastActive),
                direction: SortDirection::Desc,
                ..Default::default()
            }),
            vec![2, 1, 3]
        );
        assert_eq!(
            ids(UserFilter {
                sort: Some(UserSortField::Role),
                ..Default::default()
            }),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn sort_field_parses() {
        assert_eq!("last-active".parse::<UserSortField>(), Ok(UserSortField::LastActive));
        assert!("age".parse::<UserSortField>().is_err());
    }

    #[test]
    fn standing_for_student_and_staff() {
        let now = timestamp::parse("2026-10-18T12:00:00Z").unwrap();
        let mut a = Assignment {
            id: 1,
            due_date: timestamp::parse("2026-10-17T12:00:00Z"),
            ..Default::default()
        };
        assert_eq!(
            AssignmentStanding::for_viewer(&a, Role::User, "current-user", now),
            AssignmentStanding::Overdue
        );

        a.submissions.push(Submission {
            user_id: "current-user".into(),
            ..Default::default()
        });
        assert_eq!(
            AssignmentStanding::for_viewer(&a, Role::User, "current-user", now),
            AssignmentStanding::Submitted
        );
        assert_eq!(
            AssignmentStanding::for_viewer(&a, Role::Manager, "current-user", now),
            AssignmentStanding::Submissions(1)
        );

        a.due_date = timestamp::parse("2026-10-25T12:00:00Z");
        assert_eq!(
            AssignmentStanding::for_viewer(&a, Role::User, "someone-else", now),
            AssignmentStanding::Pending
        );
    }
}
