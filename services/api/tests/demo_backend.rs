//! Integration tests for the in-memory demo backend, driven entirely through
//! the `DataService` port. The live backend shares these semantics; anything
//! asserted here is part of the port contract, not a demo quirk.

use std::time::Duration;

use api_lib::adapters::demo::{DemoAdapter, DEMO_LEARNER_EMAIL, DEMO_TRAINER_EMAIL};
use course_market_core::domain::{Level, NewCourse, NewLesson, Role};
use course_market_core::ports::{DataService, PortError};
use uuid::Uuid;

fn adapter() -> DemoAdapter {
    DemoAdapter::seeded(Duration::ZERO).unwrap()
}

async fn user_id(data: &dyn DataService, email: &str) -> Uuid {
    data.get_credentials_by_email(email).await.unwrap().user_id
}

async fn course_id_by_title(data: &dyn DataService, trainer_id: Uuid, title: &str) -> Uuid {
    data.list_trainer_courses(trainer_id)
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.course.title == title)
        .map(|s| s.course.id)
        .unwrap()
}

const REACT_COURSE: &str = "Modern Web Development with React";
const MOBILE_COURSE: &str = "Mobile Apps with React Native";
const DRAFT_COURSE: &str = "Advanced TypeScript Patterns";

#[tokio::test]
async fn catalog_lists_published_courses_newest_first() {
    let data = adapter();
    let courses = data.list_published_courses().await.unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].course.title, MOBILE_COURSE);
    assert_eq!(courses[1].course.title, REACT_COURSE);
    assert_eq!(courses[0].lesson_count, 2);
    assert_eq!(courses[1].lesson_count, 3);
    assert!(courses.iter().all(|c| c.course.is_published));
}

#[tokio::test]
async fn draft_courses_stay_out_of_the_catalog() {
    let data = adapter();
    let courses = data.list_published_courses().await.unwrap();
    assert!(courses.iter().all(|c| c.course.title != DRAFT_COURSE));

    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let own = data.list_trainer_courses(trainer).await.unwrap();
    assert_eq!(own.len(), 3);
}

#[tokio::test]
async fn enrolling_twice_in_the_same_course_conflicts() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let mobile = course_id_by_title(&data, trainer, MOBILE_COURSE).await;

    let enrollment = data.enroll(learner, mobile).await.unwrap();
    assert_eq!(enrollment.progress, 0);

    let err = data.enroll(learner, mobile).await.unwrap_err();
    assert!(matches!(err, PortError::AlreadyExists(_)));

    // Still exactly one enrollment for the pair.
    let enrollments = data.list_enrollments(learner).await.unwrap();
    let count = enrollments
        .iter()
        .filter(|e| e.course.id == mobile)
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn enrolling_in_a_draft_or_missing_course_is_not_found() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let draft = course_id_by_title(&data, trainer, DRAFT_COURSE).await;

    let err = data.enroll(learner, draft).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));

    let err = data.enroll(learner, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn completing_lessons_walks_progress_to_one_hundred() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let mobile = course_id_by_title(&data, trainer, MOBILE_COURSE).await;

    let enrollment = data.enroll(learner, mobile).await.unwrap();
    let lessons = data.get_course(mobile).await.unwrap().lessons;
    assert_eq!(lessons.len(), 2);

    let after_first = data
        .mark_lesson_complete(enrollment.id, lessons[0].id)
        .await
        .unwrap();
    assert_eq!(after_first.progress, 50);

    let after_second = data
        .mark_lesson_complete(enrollment.id, lessons[1].id)
        .await
        .unwrap();
    assert_eq!(after_second.progress, 100);
}

#[tokio::test]
async fn re_marking_a_completed_lesson_changes_nothing() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let react = course_id_by_title(&data, trainer, REACT_COURSE).await;

    let enrollment = data.get_enrollment(learner, react).await.unwrap().unwrap();
    let lessons = data.get_course(react).await.unwrap().lessons;

    // The seeded learner already completed the first lesson.
    let marks = data.list_lesson_progress(enrollment.id).await.unwrap();
    let original = marks
        .iter()
        .find(|m| m.lesson_id == lessons[0].id)
        .cloned()
        .unwrap();
    assert!(original.completed);

    let updated = data
        .mark_lesson_complete(enrollment.id, lessons[0].id)
        .await
        .unwrap();
    assert_eq!(updated.progress, 33);

    let marks = data.list_lesson_progress(enrollment.id).await.unwrap();
    assert_eq!(marks.len(), 1);
    let re_marked = marks
        .iter()
        .find(|m| m.lesson_id == lessons[0].id)
        .unwrap();
    assert_eq!(re_marked.completed_at, original.completed_at);
}

#[tokio::test]
async fn marking_a_lesson_outside_the_enrolled_course_is_not_found() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let react = course_id_by_title(&data, trainer, REACT_COURSE).await;
    let mobile = course_id_by_title(&data, trainer, MOBILE_COURSE).await;

    let enrollment = data.get_enrollment(learner, react).await.unwrap().unwrap();
    let foreign_lesson = data.get_course(mobile).await.unwrap().lessons[0].id;

    let err = data
        .mark_lesson_complete(enrollment.id, foreign_lesson)
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn deleting_an_incomplete_lesson_rebases_progress_upward() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let react = course_id_by_title(&data, trainer, REACT_COURSE).await;

    // 1 of 3 complete.
    let lessons = data.get_course(react).await.unwrap().lessons;
    data.delete_lesson(lessons[2].id, trainer).await.unwrap();

    // 1 of 2 complete now.
    let enrollments = data.list_enrollments(learner).await.unwrap();
    let entry = enrollments.iter().find(|e| e.course.id == react).unwrap();
    assert_eq!(entry.lesson_count, 2);
    assert_eq!(entry.completed_count, 1);
    assert_eq!(entry.enrollment.progress, 50);
}

#[tokio::test]
async fn deleting_a_completed_lesson_orphans_its_mark() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let react = course_id_by_title(&data, trainer, REACT_COURSE).await;

    // Delete the one lesson the learner finished.
    let lessons = data.get_course(react).await.unwrap().lessons;
    data.delete_lesson(lessons[0].id, trainer).await.unwrap();

    // The mark survives as an orphan but stops counting.
    let enrollment = data.get_enrollment(learner, react).await.unwrap().unwrap();
    let marks = data.list_lesson_progress(enrollment.id).await.unwrap();
    assert_eq!(marks.len(), 1);

    let enrollments = data.list_enrollments(learner).await.unwrap();
    let entry = enrollments.iter().find(|e| e.course.id == react).unwrap();
    assert_eq!(entry.lesson_count, 2);
    assert_eq!(entry.completed_count, 0);
    assert_eq!(entry.enrollment.progress, 0);
}

#[tokio::test]
async fn enrollments_come_back_most_recent_first() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let mobile = course_id_by_title(&data, trainer, MOBILE_COURSE).await;

    data.enroll(learner, mobile).await.unwrap();

    let enrollments = data.list_enrollments(learner).await.unwrap();
    assert_eq!(enrollments.len(), 2);
    assert_eq!(enrollments[0].course.id, mobile);
    assert!(
        enrollments[0].enrollment.enrolled_at >= enrollments[1].enrollment.enrolled_at
    );
}

#[tokio::test]
async fn publishing_requires_at_least_one_lesson() {
    let data = adapter();
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let draft = course_id_by_title(&data, trainer, DRAFT_COURSE).await;

    let err = data.publish_course(draft, trainer).await.unwrap_err();
    assert!(matches!(err, PortError::Validation(_)));

    data.add_lesson(
        draft,
        trainer,
        NewLesson {
            title: "Conditional Types".to_string(),
            description: None,
            video: None,
            duration_minutes: Some(40),
            is_free: false,
        },
    )
    .await
    .unwrap();

    let published = data.publish_course(draft, trainer).await.unwrap();
    assert!(published.is_published);

    let catalog = data.list_published_courses().await.unwrap();
    assert!(catalog.iter().any(|c| c.course.id == draft));
}

#[tokio::test]
async fn only_the_owner_may_publish_or_delete() {
    let data = adapter();
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let react = course_id_by_title(&data, trainer, REACT_COURSE).await;
    let stranger = data
        .create_profile("other@demo.test", "hash", "Other Trainer", Role::Trainer)
        .await
        .unwrap();

    let err = data.publish_course(react, stranger.id).await.unwrap_err();
    assert!(matches!(err, PortError::Forbidden(_)));

    let err = data.delete_course(react, stranger.id).await.unwrap_err();
    assert!(matches!(err, PortError::Forbidden(_)));
}

#[tokio::test]
async fn unpublishing_takes_a_course_out_of_the_catalog() {
    let data = adapter();
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let mobile = course_id_by_title(&data, trainer, MOBILE_COURSE).await;

    let course = data.unpublish_course(mobile, trainer).await.unwrap();
    assert!(!course.is_published);

    let catalog = data.list_published_courses().await.unwrap();
    assert!(catalog.iter().all(|c| c.course.id != mobile));

    // And enrollment is refused as if the course did not exist.
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let err = data.enroll(learner, mobile).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_course_cascades_to_lessons_and_enrollments() {
    let data = adapter();
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let react = course_id_by_title(&data, trainer, REACT_COURSE).await;
    let lesson_id = data.get_course(react).await.unwrap().lessons[0].id;

    data.delete_course(react, trainer).await.unwrap();

    assert!(matches!(
        data.get_course(react).await.unwrap_err(),
        PortError::NotFound(_)
    ));
    assert!(matches!(
        data.get_lesson(lesson_id).await.unwrap_err(),
        PortError::NotFound(_)
    ));
    assert!(data.get_enrollment(learner, react).await.unwrap().is_none());
}

#[tokio::test]
async fn new_course_starts_as_a_draft_and_lessons_append_in_order() {
    let data = adapter();
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;

    let course = data
        .create_course(
            trainer,
            NewCourse {
                title: "Rust for Backend Developers".to_string(),
                description: None,
                price: 90_000,
                category: Some("Backend".to_string()),
                level: Level::Intermediate,
            },
        )
        .await
        .unwrap();
    assert!(!course.is_published);

    for title in ["Ownership", "Traits", "Async"] {
        data.add_lesson(
            course.id,
            trainer,
            NewLesson {
                title: title.to_string(),
                description: None,
                video: None,
                duration_minutes: None,
                is_free: false,
            },
        )
        .await
        .unwrap();
    }
    let lessons = data.get_course(course.id).await.unwrap().lessons;
    let indices: Vec<i32> = lessons.iter().map(|l| l.order_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);

    // Removal does not recycle indices.
    data.delete_lesson(lessons[1].id, trainer).await.unwrap();
    let appended = data
        .add_lesson(
            course.id,
            trainer,
            NewLesson {
                title: "Error Handling".to_string(),
                description: None,
                video: None,
                duration_minutes: None,
                is_free: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(appended.order_index, 4);
}

#[tokio::test]
async fn trainer_stats_aggregate_enrollment_revenue() {
    let data = adapter();
    let trainer = user_id(&data, DEMO_TRAINER_EMAIL).await;
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let mobile = course_id_by_title(&data, trainer, MOBILE_COURSE).await;

    // Seeded: one learner in the React course (75 000).
    let stats = data.trainer_stats(trainer).await.unwrap();
    assert_eq!(stats.total_courses, 3);
    assert_eq!(stats.published_courses, 2);
    assert_eq!(stats.total_learners, 1);
    assert_eq!(stats.total_revenue, 75_000);
    assert_eq!(stats.account_balance, 52_500);

    // A second enrollment by the same learner adds revenue, not learners.
    data.enroll(learner, mobile).await.unwrap();
    let stats = data.trainer_stats(trainer).await.unwrap();
    assert_eq!(stats.total_learners, 1);
    assert_eq!(stats.total_revenue, 160_000);
    assert_eq!(stats.account_balance, 112_000);
}

#[tokio::test]
async fn auth_sessions_validate_until_deleted() {
    let data = adapter();
    let learner = user_id(&data, DEMO_LEARNER_EMAIL).await;
    let expires_at = chrono::Utc::now() + chrono::Duration::days(30);

    data.create_auth_session("session-1", learner, expires_at)
        .await
        .unwrap();
    assert_eq!(
        data.validate_auth_session("session-1").await.unwrap(),
        learner
    );

    data.delete_auth_session("session-1").await.unwrap();
    assert!(matches!(
        data.validate_auth_session("session-1").await.unwrap_err(),
        PortError::Unauthorized
    ));

    // Expired sessions are rejected even while still stored.
    let expired = chrono::Utc::now() - chrono::Duration::hours(1);
    data.create_auth_session("session-2", learner, expired)
        .await
        .unwrap();
    assert!(matches!(
        data.validate_auth_session("session-2").await.unwrap_err(),
        PortError::Unauthorized
    ));
}

#[tokio::test]
async fn duplicate_signup_email_conflicts() {
    let data = adapter();
    let err = data
        .create_profile(DEMO_LEARNER_EMAIL, "hash", "Imposter", Role::Learner)
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::AlreadyExists(_)));
}
