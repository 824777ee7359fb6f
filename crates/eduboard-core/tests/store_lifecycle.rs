//! Whole-store scenarios against the bundled fixtures and seed directories.

mod common;

use std::time::Duration;

use common::*;
use eduboard_core::config::LatencyConfig;
use eduboard_core::error::EduboardError;
use eduboard_core::model::*;
use eduboard_core::store::{Campus, SeedData};

#[tokio::test]
async fn test_bundled_seed_counts() {
    let campus = bundled_campus();
    assert_eq!(campus.courses.get_all().await.len(), 5);
    assert_eq!(campus.assignments.get_all().await.len(), 6);
    assert_eq!(campus.events.get_all().await.len(), 6);
    assert_eq!(campus.users.get_all().await.len(), 6);
    assert_eq!(campus.ai_jobs.get_all().await.len(), 4);
}

#[tokio::test]
async fn test_assignment_lifecycle() {
    let campus = bundled_campus();

    let created = campus
        .assignments
        .create(NewAssignment {
            title: "Reflection Essay".into(),
            course_id: Some(2),
            due_date: timestamp::parse("2026-10-30T23:59:00Z"),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 7);
    assert_eq!(created.kind, AssignmentType::Essay);

    let all = campus.assignments.get_all().await;
    assert_eq!(all.last(), Some(&created));

    let updated = campus
        .assignments
        .update(
            7,
            AssignmentPatch {
                max_points: Some(Some(50)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.max_points, Some(50));
    assert_eq!(updated.title, "Reflection Essay");

    campus.assignments.delete(7).await.unwrap();
    let err = campus.assignments.get_by_id(7).await.unwrap_err();
    assert!(err.is_not_found());

    // The deleted Id is not handed out again.
    let next = campus
        .assignments
        .create(NewAssignment {
            title: "Replacement".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(next.id, 8);
}

#[tokio::test]
async fn test_delete_missing_assignment() {
    let campus = bundled_campus();
    let err = campus.assignments.delete(999).await.unwrap_err();
    assert!(matches!(
        err,
        EduboardError::NotFound {
            entity: "Assignment",
            id: 999
        }
    ));
    assert_eq!(err.to_string(), "Assignment not found: 999");
    assert_eq!(campus.assignments.get_all().await.len(), 6);
}

#[tokio::test]
async fn test_add_event_validates_before_create() {
    let campus = bundled_campus();
    let start = fixture_now();

    let backwards = NewEvent {
        title: "Study group".into(),
        start_date: Some(start),
        end_date: Some(start),
        ..Default::default()
    };
    let err = campus.add_event(backwards.clone()).await.unwrap_err();
    assert!(matches!(err, EduboardError::InvalidInput(_)));
    assert_eq!(campus.events.get_all().await.len(), 6);

    let event = campus
        .add_event(NewEvent {
            end_date: Some(start + chrono::Duration::hours(2)),
            ..backwards
        })
        .await
        .unwrap();
    assert_eq!(event.id, 7);
    assert_eq!(event.created_at, event.updated_at);
}

#[tokio::test]
async fn test_add_course_and_assignment_validate_drafts() {
    let campus = bundled_campus();

    let err = campus.add_course(NewCourse::titled("   ")).await.unwrap_err();
    assert!(matches!(err, EduboardError::InvalidInput(_)));
    let course = campus.add_course(NewCourse::titled("Ethics")).await.unwrap();
    assert_eq!(course.id, 6);
    assert_eq!(course.status, CourseStatus::Draft);

    let undated = NewAssignment {
        title: "Case study".into(),
        course_id: Some(course.id),
        ..Default::default()
    };
    assert!(campus.add_assignment(undated.clone()).await.is_err());
    assert_eq!(campus.assignments.get_all().await.len(), 6);

    let assignment = campus
        .add_assignment(NewAssignment {
            due_date: Some(fixture_now()),
            ..undated
        })
        .await
        .unwrap();
    assert_eq!(assignment.id, 7);
    assert_eq!(assignment.course_id, Some(6));
}

#[tokio::test]
async fn test_event_edit_clears_recurrence() {
    let campus = bundled_campus();
    let before = campus.events.get_by_id(1).await.unwrap();
    assert_eq!(before.recurring_type, Some(RecurringType::Weekly));

    let after = campus
        .events
        .update(
            1,
            EventPatch {
                is_recurring: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(after.recurring_type.is_none());
    assert_eq!(after.title, before.title);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_ai_job_moves_through_lifecycle() {
    let campus = bundled_campus();
    let job = campus
        .ai_jobs
        .create(NewAiJob {
            kind: "course_outline".into(),
            prompt: Some("Intro to statistics".into()),
            course_id: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(job.id, 5);
    assert_eq!(job.status, JobStatus::Pending);

    let done = campus
        .ai_jobs
        .update(
            job.id,
            AiJobPatch {
                status: Some(JobStatus::Completed),
                progress: Some(100.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.rounded_progress(), 100);
}

#[tokio::test]
async fn test_date_range_over_fixtures() {
    let campus = bundled_campus();
    let week = eduboard_core::calendar::DateWindow::week_of(date(2026, 10, 18));
    let due: Vec<u32> = campus
        .assignments
        .get_by_date_range(week.start, week.end)
        .await
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(due, vec![1, 2]);

    let inverted = campus.events.get_by_date_range(week.end, week.start).await;
    assert!(inverted.is_empty());
}

#[tokio::test]
async fn test_clones_share_collections() {
    let campus = bundled_campus();
    let other = campus.clone();
    other.courses.delete(4).await.unwrap();
    assert!(campus.courses.get_by_id(4).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_read_issued_before_delete_sees_old_snapshot() {
    let latency = LatencyConfig::default();
    let campus = Campus::from_seed(SeedData::bundled().unwrap(), &latency);

    let read = campus.courses.get_all();
    let delete = campus.courses.delete(1);
    let (snapshot, deleted) = tokio::join!(read, delete);
    assert!(deleted.is_ok());
    assert!(snapshot.iter().any(|c| c.id == 1));
    assert!(campus.courses.get_all().await.iter().all(|c| c.id != 1));
}

#[tokio::test(start_paused = true)]
async fn test_operations_wait_for_latency() {
    let latency = LatencyConfig::default();
    let campus = Campus::from_seed(SeedData::bundled().unwrap(), &latency);
    let started = tokio::time::Instant::now();
    campus.events.get_all().await;
    assert!(started.elapsed() >= Duration::from_millis(latency.calendar));
}

#[tokio::test]
async fn test_seed_dir_overrides_per_file() {
    let dir = scratch_dir("seed-override");
    std::fs::write(
        dir.join("courses.json"),
        r#"[{"Id": 10, "title": "Only Course", "status": "active", "enrollments": 12}]"#,
    )
    .unwrap();

    let campus = campus_from(&config_with_seed_dir(&dir));
    let courses = campus.courses.get_all().await;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].status, CourseStatus::Active);
    assert_eq!(campus.assignments.get_all().await.len(), 6);

    let created = campus.courses.create(NewCourse::titled("Next")).await.unwrap();
    assert_eq!(created.id, 11);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_malformed_seed_file_names_the_file() {
    let dir = scratch_dir("seed-malformed");
    std::fs::write(dir.join("users.json"), "{ not json").unwrap();

    let err = SeedData::from_dir(&dir).unwrap_err();
    assert!(matches!(err, EduboardError::Seed(_)));
    assert!(err.to_string().contains("users.json"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_seed_dir_is_an_error() {
    let config = config_with_seed_dir(std::path::Path::new("/nonexistent/eduboard-seed"));
    assert!(eduboard_core::store::create_campus(&config).is_err());
}
