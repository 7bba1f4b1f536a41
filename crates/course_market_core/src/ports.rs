//! crates/course_market_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations. The live
//! Postgres backend and the in-memory demo backend both implement
//! `DataService`, so calling code is agnostic to which one was selected at
//! startup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Course, CourseDetail, CourseSummary, CourseUpdate, Credentials, EnrolledCourse, Enrollment,
    Lesson, LessonDetail, LessonProgress, NewCourse, NewLesson, Profile, ProfileUpdate, Role,
    TrainerStats,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error shape shared by every backend implementation.
///
/// Both the live and the demo backend must surface exactly these variants so
/// callers cannot tell the implementations apart.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Upstream failure: {0}")]
    Upstream(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The single logical backend interface: catalog, enrollment ledger,
/// profiles, and auth sessions.
#[async_trait]
pub trait DataService: Send + Sync {
    // --- Profiles & Auth ---
    async fn create_profile(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: &str,
        role: Role,
    ) -> PortResult<Profile>;

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile>;

    async fn update_profile(&self, user_id: Uuid, updates: ProfileUpdate) -> PortResult<Profile>;

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<Credentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Catalog ---
    async fn list_published_courses(&self) -> PortResult<Vec<CourseSummary>>;

    async fn get_course(&self, course_id: Uuid) -> PortResult<CourseDetail>;

    async fn list_trainer_courses(&self, trainer_id: Uuid) -> PortResult<Vec<CourseSummary>>;

    async fn create_course(&self, trainer_id: Uuid, course: NewCourse) -> PortResult<Course>;

    /// Fails with `Forbidden` when `trainer_id` does not own the course.
    async fn update_course(
        &self,
        course_id: Uuid,
        trainer_id: Uuid,
        updates: CourseUpdate,
    ) -> PortResult<Course>;

    /// Deletes the course and cascades to its lessons and enrollments.
    async fn delete_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<()>;

    /// `draft -> published`; fails with `Validation` when the course has no
    /// lessons, with `Forbidden` for a non-owner.
    async fn publish_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course>;

    /// `published -> draft`; always allowed for the owner.
    async fn unpublish_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course>;

    /// Appends a lesson at `max existing order_index + 1`.
    async fn add_lesson(
        &self,
        course_id: Uuid,
        trainer_id: Uuid,
        lesson: NewLesson,
    ) -> PortResult<Lesson>;

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<LessonDetail>;

    async fn delete_lesson(&self, lesson_id: Uuid, trainer_id: Uuid) -> PortResult<()>;

    // --- Enrollment Ledger ---
    /// Fails with `AlreadyExists` when the (learner, course) pair is already
    /// enrolled, and with `NotFound` when the course is missing or not
    /// published. A new enrollment starts at progress 0.
    async fn enroll(&self, learner_id: Uuid, course_id: Uuid) -> PortResult<Enrollment>;

    async fn get_enrollment(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
    ) -> PortResult<Option<Enrollment>>;

    async fn get_enrollment_by_id(&self, enrollment_id: Uuid) -> PortResult<Enrollment>;

    /// Most recent enrollment first.
    async fn list_enrollments(&self, learner_id: Uuid) -> PortResult<Vec<EnrolledCourse>>;

    /// Idempotent. On first completion creates the per-lesson mark, then
    /// synchronously recomputes the enrollment's progress against the
    /// course's current lesson set and persists it.
    async fn mark_lesson_complete(
        &self,
        enrollment_id: Uuid,
        lesson_id: Uuid,
    ) -> PortResult<Enrollment>;

    /// All completion marks of one enrollment, including orphans whose
    /// lesson no longer exists.
    async fn list_lesson_progress(&self, enrollment_id: Uuid) -> PortResult<Vec<LessonProgress>>;

    // --- Trainer Dashboard ---
    async fn trainer_stats(&self, trainer_id: Uuid) -> PortResult<TrainerStats>;
}

/// A handle to a video created on the hosting provider, to be encoded into a
/// `VideoRef` once the upload succeeds.
#[derive(Debug, Clone)]
pub struct VideoHandle {
    pub video_id: String,
    pub library_id: String,
}

/// The video hosting provider: ingest only. Playback URLs are derived
/// deterministically from a `VideoRef`, never fetched from the provider.
#[async_trait]
pub trait VideoService: Send + Sync {
    async fn create_video(&self, title: &str) -> PortResult<VideoHandle>;

    async fn upload_video(&self, video_id: &str, data: Vec<u8>) -> PortResult<()>;

    async fn delete_video(&self, video_id: &str) -> PortResult<()>;
}
