//! services/api/src/adapters/db.rs
//!
//! The live backend adapter: the concrete implementation of the
//! `DataService` port against PostgreSQL using `sqlx`. The schema carries
//! the uniqueness invariants (one enrollment per learner/course, one
//! completion mark per enrollment/lesson, one order_index per course), so
//! application-level checks and the database agree on error shapes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use course_market_core::domain::{
    Course, CourseDetail, CourseSummary, CourseUpdate, Credentials, EnrolledCourse, Enrollment,
    Lesson, LessonDetail, LessonProgress, NewCourse, NewLesson, Profile, ProfileUpdate, Role,
    TrainerStats,
};
use course_market_core::ports::{DataService, PortError, PortResult};
use course_market_core::{progress, publication};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DataService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Upstream(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

/// Maps a missing row to `NotFound` and every other database failure to
/// `Upstream`. A transient outage must never read as "does not exist".
fn not_found_or_upstream(e: sqlx::Error, missing: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(missing),
        _ => unexpected(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileRecord {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    bio: Option<String>,
    phone_number: Option<String>,
    mobile_money_provider: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl ProfileRecord {
    fn to_domain(self) -> PortResult<Profile> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(PortError::Upstream)?;
        Ok(Profile {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role,
            bio: self.bio,
            phone_number: self.phone_number,
            mobile_money_provider: self.mobile_money_provider,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
}

impl CredentialsRecord {
    fn to_domain(self) -> Credentials {
        Credentials {
            user_id: self.id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct CourseRecord {
    id: Uuid,
    trainer_id: Uuid,
    title: String,
    description: Option<String>,
    price: i64,
    category: Option<String>,
    level: String,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRecord {
    fn to_domain(self) -> PortResult<Course> {
        let level = self
            .level
            .parse()
            .map_err(PortError::Upstream)?;
        Ok(Course {
            id: self.id,
            trainer_id: self.trainer_id,
            title: self.title,
            description: self.description,
            price: self.price as u32,
            category: self.category,
            level,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct LessonRecord {
    id: Uuid,
    course_id: Uuid,
    title: String,
    description: Option<String>,
    video_ref: Option<String>,
    duration_minutes: Option<i32>,
    order_index: i32,
    is_free: bool,
    created_at: DateTime<Utc>,
}

impl LessonRecord {
    fn to_domain(self) -> PortResult<Lesson> {
        let video = self
            .video_ref
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e| PortError::Upstream(format!("{}", e)))?;
        Ok(Lesson {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            video,
            duration_minutes: self.duration_minutes.map(|m| m as u32),
            order_index: self.order_index,
            is_free: self.is_free,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct EnrollmentRecord {
    id: Uuid,
    learner_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
    progress: i32,
}

#[derive(FromRow)]
struct LessonProgressRecord {
    id: Uuid,
    enrollment_id: Uuid,
    lesson_id: Uuid,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl LessonProgressRecord {
    fn to_domain(self) -> LessonProgress {
        LessonProgress {
            id: self.id,
            enrollment_id: self.enrollment_id,
            lesson_id: self.lesson_id,
            completed: self.completed,
            completed_at: self.completed_at,
        }
    }
}

impl EnrollmentRecord {
    fn to_domain(self) -> Enrollment {
        Enrollment {
            id: self.id,
            learner_id: self.learner_id,
            course_id: self.course_id,
            enrolled_at: self.enrolled_at,
            progress: self.progress.clamp(0, 100) as u8,
        }
    }
}

//=========================================================================================
// Internal Query Helpers
//=========================================================================================

const PROFILE_COLUMNS: &str = "id, email, full_name, role, bio, phone_number, \
     mobile_money_provider, avatar_url, created_at";
const COURSE_COLUMNS: &str = "id, trainer_id, title, description, price, category, level, \
     is_published, created_at, updated_at";
const LESSON_COLUMNS: &str = "id, course_id, title, description, video_ref, duration_minutes, \
     order_index, is_free, created_at";

impl DbAdapter {
    async fn fetch_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("Profile {} not found", user_id)))?;
        record.to_domain()
    }

    async fn fetch_course(&self, course_id: Uuid) -> PortResult<Course> {
        let record = sqlx::query_as::<_, CourseRecord>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("Course {} not found", course_id)))?;
        record.to_domain()
    }

    /// Fetches the course and checks ownership in one step; every trainer
    /// mutation goes through here.
    async fn fetch_owned_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course> {
        let course = self.fetch_course(course_id).await?;
        if course.trainer_id != trainer_id {
            return Err(PortError::Forbidden(
                "only the owning trainer may modify this course".to_string(),
            ));
        }
        Ok(course)
    }

    async fn lesson_count(&self, course_id: Uuid) -> PortResult<usize> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&self.pool)
                .await
                .map_err(unexpected)?;
        Ok(count as usize)
    }

    /// Completion marks whose lesson still exists in the course. Orphaned
    /// marks from deleted lessons are excluded by the join.
    async fn completed_count(&self, enrollment_id: Uuid, course_id: Uuid) -> PortResult<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lesson_progress lp \
             JOIN lessons l ON l.id = lp.lesson_id AND l.course_id = $2 \
             WHERE lp.enrollment_id = $1 AND lp.completed",
        )
        .bind(enrollment_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(count as usize)
    }

    async fn summarize(&self, course: Course) -> PortResult<CourseSummary> {
        let trainer = self.fetch_profile(course.trainer_id).await?;
        let lesson_count = self.lesson_count(course.id).await?;
        Ok(CourseSummary {
            course,
            trainer,
            lesson_count,
        })
    }
}

//=========================================================================================
// `DataService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DataService for DbAdapter {
    async fn create_profile(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: &str,
        role: Role,
    ) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "INSERT INTO profiles (id, email, hashed_password, full_name, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .bind(full_name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::AlreadyExists(format!("an account for {} already exists", email))
            } else {
                unexpected(e)
            }
        })?;
        record.to_domain()
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        self.fetch_profile(user_id).await
    }

    async fn update_profile(&self, user_id: Uuid, updates: ProfileUpdate) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "UPDATE profiles SET \
                full_name = COALESCE($2, full_name), \
                bio = COALESCE($3, bio), \
                phone_number = COALESCE($4, phone_number), \
                mobile_money_provider = COALESCE($5, mobile_money_provider), \
                avatar_url = COALESCE($6, avatar_url) \
             WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(updates.full_name)
        .bind(updates.bio)
        .bind(updates.phone_number)
        .bind(updates.mobile_money_provider)
        .bind(updates.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("Profile {} not found", user_id)))?;
        record.to_domain()
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<Credentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, hashed_password FROM profiles WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("No account for {}", email)))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row = sqlx::query("SELECT user_id, expires_at FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => PortError::Unauthorized,
                _ => unexpected(e),
            })?;
        let user_id: Uuid = row.try_get("user_id").map_err(unexpected)?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(unexpected)?;
        if expires_at < Utc::now() {
            return Err(PortError::Unauthorized);
        }
        Ok(user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn list_published_courses(&self) -> PortResult<Vec<CourseSummary>> {
        let records = sqlx::query_as::<_, CourseRecord>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE is_published ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            summaries.push(self.summarize(record.to_domain()?).await?);
        }
        Ok(summaries)
    }

    async fn get_course(&self, course_id: Uuid) -> PortResult<CourseDetail> {
        let course = self.fetch_course(course_id).await?;
        let trainer = self.fetch_profile(course.trainer_id).await?;
        let records = sqlx::query_as::<_, LessonRecord>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = $1 ORDER BY order_index"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let lessons = records
            .into_iter()
            .map(LessonRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        Ok(CourseDetail {
            course,
            trainer,
            lessons,
        })
    }

    async fn list_trainer_courses(&self, trainer_id: Uuid) -> PortResult<Vec<CourseSummary>> {
        let records = sqlx::query_as::<_, CourseRecord>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE trainer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            summaries.push(self.summarize(record.to_domain()?).await?);
        }
        Ok(summaries)
    }

    async fn create_course(&self, trainer_id: Uuid, course: NewCourse) -> PortResult<Course> {
        let record = sqlx::query_as::<_, CourseRecord>(&format!(
            "INSERT INTO courses (id, trainer_id, title, description, price, category, level) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COURSE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(trainer_id)
        .bind(course.title)
        .bind(course.description)
        .bind(course.price as i64)
        .bind(course.category)
        .bind(course.level.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn update_course(
        &self,
        course_id: Uuid,
        trainer_id: Uuid,
        updates: CourseUpdate,
    ) -> PortResult<Course> {
        self.fetch_owned_course(course_id, trainer_id).await?;
        let record = sqlx::query_as::<_, CourseRecord>(&format!(
            "UPDATE courses SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                price = COALESCE($4, price), \
                category = COALESCE($5, category), \
                level = COALESCE($6, level), \
                updated_at = now() \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(course_id)
        .bind(updates.title)
        .bind(updates.description)
        .bind(updates.price.map(|p| p as i64))
        .bind(updates.category)
        .bind(updates.level.map(|l| l.as_str().to_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn delete_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<()> {
        self.fetch_owned_course(course_id, trainer_id).await?;
        // Lessons, enrollments, and completion marks go with the course via
        // the schema's cascade rules.
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn publish_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course> {
        self.fetch_owned_course(course_id, trainer_id).await?;
        publication::ensure_publishable(self.lesson_count(course_id).await?)?;
        let record = sqlx::query_as::<_, CourseRecord>(&format!(
            "UPDATE courses SET is_published = TRUE, updated_at = now() \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn unpublish_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course> {
        self.fetch_owned_course(course_id, trainer_id).await?;
        let record = sqlx::query_as::<_, CourseRecord>(&format!(
            "UPDATE courses SET is_published = FALSE, updated_at = now() \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn add_lesson(
        &self,
        course_id: Uuid,
        trainer_id: Uuid,
        lesson: NewLesson,
    ) -> PortResult<Lesson> {
        self.fetch_owned_course(course_id, trainer_id).await?;
        let record = sqlx::query_as::<_, LessonRecord>(&format!(
            "INSERT INTO lessons \
                (id, course_id, title, description, video_ref, duration_minutes, order_index, is_free) \
             SELECT $1, $2, $3, $4, $5, $6, COALESCE(MAX(order_index), 0) + 1, $7 \
             FROM lessons WHERE course_id = $2 \
             RETURNING {LESSON_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(course_id)
        .bind(lesson.title)
        .bind(lesson.description)
        .bind(lesson.video.map(|v| v.to_string()))
        .bind(lesson.duration_minutes.map(|m| m as i32))
        .bind(lesson.is_free)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<LessonDetail> {
        let record = sqlx::query_as::<_, LessonRecord>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"
        ))
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("Lesson {} not found", lesson_id)))?;
        let lesson = record.to_domain()?;
        let course = self.fetch_course(lesson.course_id).await?;
        let trainer = self.fetch_profile(course.trainer_id).await?;
        Ok(LessonDetail {
            lesson,
            course,
            trainer,
        })
    }

    async fn delete_lesson(&self, lesson_id: Uuid, trainer_id: Uuid) -> PortResult<()> {
        let detail = self.get_lesson(lesson_id).await?;
        if detail.course.trainer_id != trainer_id {
            return Err(PortError::Forbidden(
                "only the owning trainer may modify this course".to_string(),
            ));
        }
        // Completion marks referencing this lesson stay behind as orphans;
        // progress recomputation excludes them.
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn enroll(&self, learner_id: Uuid, course_id: Uuid) -> PortResult<Enrollment> {
        let course = self.fetch_course(course_id).await?;
        if !course.is_published {
            // Unpublished courses are not enrollable, and not disclosed.
            return Err(PortError::NotFound(format!("Course {} not found", course_id)));
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE learner_id = $1 AND course_id = $2)",
        )
        .bind(learner_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        if exists {
            return Err(PortError::AlreadyExists(
                "already enrolled in this course".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, EnrollmentRecord>(
            "INSERT INTO enrollments (id, learner_id, course_id) VALUES ($1, $2, $3) \
             RETURNING id, learner_id, course_id, enrolled_at, progress",
        )
        .bind(Uuid::new_v4())
        .bind(learner_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Two concurrent enrolls can pass the existence check; the
            // unique constraint settles it with the same error shape.
            if is_unique_violation(&e) {
                PortError::AlreadyExists("already enrolled in this course".to_string())
            } else {
                unexpected(e)
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_enrollment(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
    ) -> PortResult<Option<Enrollment>> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(
            "SELECT id, learner_id, course_id, enrolled_at, progress FROM enrollments \
             WHERE learner_id = $1 AND course_id = $2",
        )
        .bind(learner_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(EnrollmentRecord::to_domain))
    }

    async fn get_enrollment_by_id(&self, enrollment_id: Uuid) -> PortResult<Enrollment> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(
            "SELECT id, learner_id, course_id, enrolled_at, progress FROM enrollments WHERE id = $1",
        )
        .bind(enrollment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("Enrollment {} not found", enrollment_id)))?;
        Ok(record.to_domain())
    }

    async fn list_enrollments(&self, learner_id: Uuid) -> PortResult<Vec<EnrolledCourse>> {
        let records = sqlx::query_as::<_, EnrollmentRecord>(
            "SELECT id, learner_id, course_id, enrolled_at, progress FROM enrollments \
             WHERE learner_id = $1 ORDER BY enrolled_at DESC",
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut result = Vec::with_capacity(records.len());
        for record in records {
            let mut enrollment = record.to_domain();
            let course = self.fetch_course(enrollment.course_id).await?;
            let trainer = self.fetch_profile(course.trainer_id).await?;
            let lesson_count = self.lesson_count(course.id).await?;
            let completed_count = self.completed_count(enrollment.id, course.id).await?;
            // Derive the percentage from live counts instead of trusting the
            // stored column; the two can drift if a write was interrupted.
            enrollment.progress = progress::percentage(lesson_count, completed_count);
            result.push(EnrolledCourse {
                enrollment,
                course,
                trainer,
                lesson_count,
                completed_count,
            });
        }
        Ok(result)
    }

    async fn mark_lesson_complete(
        &self,
        enrollment_id: Uuid,
        lesson_id: Uuid,
    ) -> PortResult<Enrollment> {
        let enrollment = sqlx::query_as::<_, EnrollmentRecord>(
            "SELECT id, learner_id, course_id, enrolled_at, progress FROM enrollments WHERE id = $1",
        )
        .bind(enrollment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_upstream(e, format!("Enrollment {} not found", enrollment_id)))?
        .to_domain();

        let in_course: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM lessons WHERE id = $1 AND course_id = $2)",
        )
        .bind(lesson_id)
        .bind(enrollment.course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        if !in_course {
            return Err(PortError::NotFound(format!(
                "Lesson {} is not part of the enrolled course",
                lesson_id
            )));
        }

        // Idempotent: re-marking keeps the original completion timestamp.
        sqlx::query(
            "INSERT INTO lesson_progress (id, enrollment_id, lesson_id, completed, completed_at) \
             VALUES ($1, $2, $3, TRUE, now()) \
             ON CONFLICT (enrollment_id, lesson_id) DO UPDATE \
             SET completed = TRUE, \
                 completed_at = COALESCE(lesson_progress.completed_at, now())",
        )
        .bind(Uuid::new_v4())
        .bind(enrollment_id)
        .bind(lesson_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        let total = self.lesson_count(enrollment.course_id).await?;
        let completed = self.completed_count(enrollment_id, enrollment.course_id).await?;
        let pct = progress::percentage(total, completed);

        let record = sqlx::query_as::<_, EnrollmentRecord>(
            "UPDATE enrollments SET progress = $2 WHERE id = $1 \
             RETURNING id, learner_id, course_id, enrolled_at, progress",
        )
        .bind(enrollment_id)
        .bind(pct as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_lesson_progress(&self, enrollment_id: Uuid) -> PortResult<Vec<LessonProgress>> {
        let records = sqlx::query_as::<_, LessonProgressRecord>(
            "SELECT id, enrollment_id, lesson_id, completed, completed_at \
             FROM lesson_progress WHERE enrollment_id = $1",
        )
        .bind(enrollment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(LessonProgressRecord::to_domain).collect())
    }

    async fn trainer_stats(&self, trainer_id: Uuid) -> PortResult<TrainerStats> {
        let total_courses: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE trainer_id = $1")
                .bind(trainer_id)
                .fetch_one(&self.pool)
                .await
                .map_err(unexpected)?;
        let published_courses: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE trainer_id = $1 AND is_published",
        )
        .bind(trainer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        let total_learners: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT e.learner_id) FROM enrollments e \
             JOIN courses c ON c.id = e.course_id WHERE c.trainer_id = $1",
        )
        .bind(trainer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        let total_revenue: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(c.price), 0) FROM enrollments e \
             JOIN courses c ON c.id = e.course_id WHERE c.trainer_id = $1",
        )
        .bind(trainer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        let total_revenue = total_revenue.max(0) as u64;
        Ok(TrainerStats {
            total_courses: total_courses as usize,
            published_courses: published_courses as usize,
            total_learners: total_learners as usize,
            total_revenue,
            account_balance: total_revenue * 70 / 100,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_map_to_not_found() {
        let e = not_found_or_upstream(sqlx::Error::RowNotFound, "Course x not found".to_string());
        assert!(matches!(e, PortError::NotFound(msg) if msg == "Course x not found"));
    }

    #[test]
    fn transient_database_failures_stay_upstream() {
        // An outage mid-lookup must not read as "does not exist".
        let e = not_found_or_upstream(sqlx::Error::PoolTimedOut, "Course x not found".to_string());
        assert!(matches!(e, PortError::Upstream(_)));

        let e = not_found_or_upstream(sqlx::Error::WorkerCrashed, "Profile y not found".to_string());
        assert!(matches!(e, PortError::Upstream(_)));
    }
}
