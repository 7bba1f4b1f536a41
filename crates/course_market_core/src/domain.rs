//! crates/course_market_core/src/domain.rs
//!
//! Defines the pure, core data structures for the marketplace.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::video::VideoRef;

/// The two account roles in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Trainer,
    Learner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Trainer => "trainer",
            Role::Learner => "learner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trainer" => Ok(Role::Trainer),
            "learner" => Ok(Role::Learner),
            other => Err(format!("'{}' is not a valid role", other)),
        }
    }
}

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("'{}' is not a valid level", other)),
        }
    }
}

/// A user account: identity, role, and contact/payout metadata.
///
/// Created at sign-up, mutated by the owning user only, never deleted in-app.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// A course owned by exactly one trainer.
///
/// Price is in whole currency units with no minor-unit fraction. A course
/// may only carry `is_published == true` while it has at least one lesson.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: u32,
    pub category: Option<String>,
    pub level: Level,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A video lesson, ordered within its course by an explicit `order_index`.
///
/// `order_index` is unique within a course and stable under insertion and
/// removal; a new lesson always takes `max existing + 1`.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video: Option<VideoRef>,
    pub duration_minutes: Option<u32>,
    pub order_index: i32,
    pub is_free: bool,
    pub created_at: DateTime<Utc>,
}

/// One enrollment per (learner, course) pair.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    /// Stored percentage in [0, 100]. Recomputed from current lesson counts
    /// on every completion; read projections re-derive it instead of
    /// trusting this field.
    pub progress: u8,
}

/// Per-lesson completion mark, at most one per (enrollment, lesson).
///
/// A missing record means "not completed"; callers must treat absence and
/// `completed: false` as equivalent.
#[derive(Debug, Clone)]
pub struct LessonProgress {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub lesson_id: Uuid,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

//=========================================================================================
// Read Projections (denormalized views, not entities)
//=========================================================================================

/// A course as shown in catalog lists: the row plus its trainer and lesson count.
#[derive(Debug, Clone)]
pub struct CourseSummary {
    pub course: Course,
    pub trainer: Profile,
    pub lesson_count: usize,
}

/// A course with its trainer and lessons ordered by `order_index`.
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: Course,
    pub trainer: Profile,
    pub lessons: Vec<Lesson>,
}

/// A lesson resolved together with its course and the course's trainer.
#[derive(Debug, Clone)]
pub struct LessonDetail {
    pub lesson: Lesson,
    pub course: Course,
    pub trainer: Profile,
}

/// An enrollment joined with its course for the learner's "my courses" list.
///
/// `completed_count` only counts completion marks whose lesson still exists,
/// so a percentage derived from it can never exceed 100.
#[derive(Debug, Clone)]
pub struct EnrolledCourse {
    pub enrollment: Enrollment,
    pub course: Course,
    pub trainer: Profile,
    pub lesson_count: usize,
    pub completed_count: usize,
}

/// Aggregate numbers for the trainer dashboard.
#[derive(Debug, Clone)]
pub struct TrainerStats {
    pub total_courses: usize,
    pub published_courses: usize,
    pub total_learners: usize,
    pub total_revenue: u64,
    /// Payout balance after the platform's 30% cut.
    pub account_balance: u64,
}

//=========================================================================================
// Write Payloads
//=========================================================================================

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub price: u32,
    pub category: Option<String>,
    pub level: Level,
}

/// Partial course update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<u32>,
    pub category: Option<String>,
    pub level: Option<Level>,
}

#[derive(Debug, Clone)]
pub struct NewLesson {
    pub title: String,
    pub description: Option<String>,
    pub video: Option<VideoRef>,
    pub duration_minutes: Option<u32>,
    pub is_free: bool,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub avatar_url: Option<String>,
}
