//! services/api/src/adapters/demo.rs
//!
//! The demo backend adapter: an in-memory implementation of the
//! `DataService` port seeded with fixed sample data. It exposes exactly the
//! same operation signatures and error shapes as the live adapter, so the
//! rest of the service cannot tell which one it is running against.
//!
//! The backing collections are owned by the adapter and never exposed;
//! mutations last only for the lifetime of the process. Every operation
//! applies a configurable artificial delay so loading states in clients
//! behave the way they do against the network.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use course_market_core::domain::{
    Course, CourseDetail, CourseSummary, CourseUpdate, Credentials, EnrolledCourse, Enrollment,
    Lesson, LessonDetail, LessonProgress, Level, NewCourse, NewLesson, Profile, ProfileUpdate,
    Role, TrainerStats,
};
use course_market_core::ports::{
    DataService, PortError, PortResult, VideoHandle, VideoService,
};
use course_market_core::video::VideoRef;
use course_market_core::{progress, publication};

pub const DEMO_TRAINER_EMAIL: &str = "trainer@demo.test";
pub const DEMO_LEARNER_EMAIL: &str = "learner@demo.test";
pub const DEMO_PASSWORD: &str = "demo123";

const DEMO_LIBRARY_ID: &str = "527238";

//=========================================================================================
// Backing State
//=========================================================================================

#[derive(Default)]
struct DemoState {
    profiles: Vec<Profile>,
    credentials: Vec<Credentials>,
    auth_sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    courses: Vec<Course>,
    lessons: Vec<Lesson>,
    enrollments: Vec<Enrollment>,
    marks: Vec<LessonProgress>,
}

impl DemoState {
    fn profile(&self, user_id: Uuid) -> PortResult<Profile> {
        self.profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", user_id)))
    }

    fn course(&self, course_id: Uuid) -> PortResult<Course> {
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Course {} not found", course_id)))
    }

    fn owned_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course> {
        let course = self.course(course_id)?;
        if course.trainer_id != trainer_id {
            return Err(PortError::Forbidden(
                "only the owning trainer may modify this course".to_string(),
            ));
        }
        Ok(course)
    }

    fn lessons_of(&self, course_id: Uuid) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }

    fn lesson_ids_of(&self, course_id: Uuid) -> Vec<Uuid> {
        self.lessons
            .iter()
            .filter(|l| l.course_id == course_id)
            .map(|l| l.id)
            .collect()
    }

    fn marks_of(&self, enrollment_id: Uuid) -> Vec<LessonProgress> {
        self.marks
            .iter()
            .filter(|m| m.enrollment_id == enrollment_id)
            .cloned()
            .collect()
    }

    fn summarize(&self, course: Course) -> PortResult<CourseSummary> {
        let trainer = self.profile(course.trainer_id)?;
        let lesson_count = self.lesson_ids_of(course.id).len();
        Ok(CourseSummary {
            course,
            trainer,
            lesson_count,
        })
    }
}

//=========================================================================================
// The Demo Adapter
//=========================================================================================

pub struct DemoAdapter {
    state: Mutex<DemoState>,
    latency: Duration,
}

impl DemoAdapter {
    /// Builds the adapter with the fixed demo dataset: one trainer with two
    /// published courses and a draft, and one learner already enrolled in
    /// the first course with one lesson behind them.
    pub fn seeded(latency: Duration) -> PortResult<Self> {
        let mut state = DemoState::default();
        let seeded_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().ok_or_else(
            || PortError::Upstream("invalid seed timestamp".to_string()),
        )?;

        let trainer_id = Uuid::new_v4();
        let learner_id = Uuid::new_v4();
        state.profiles.push(Profile {
            id: trainer_id,
            email: DEMO_TRAINER_EMAIL.to_string(),
            full_name: "Jean-Claude Fotso".to_string(),
            role: Role::Trainer,
            bio: Some("Web and mobile trainer with ten years in the field.".to_string()),
            phone_number: Some("+237 600 000 001".to_string()),
            mobile_money_provider: Some("Orange Money".to_string()),
            avatar_url: None,
            created_at: seeded_at,
        });
        state.profiles.push(Profile {
            id: learner_id,
            email: DEMO_LEARNER_EMAIL.to_string(),
            full_name: "Marie Ngo".to_string(),
            role: Role::Learner,
            bio: Some("Learning to build for the web.".to_string()),
            phone_number: Some("+237 600 000 002".to_string()),
            mobile_money_provider: Some("MTN MoMo".to_string()),
            avatar_url: None,
            created_at: seeded_at,
        });
        for (user_id, email) in [(trainer_id, DEMO_TRAINER_EMAIL), (learner_id, DEMO_LEARNER_EMAIL)]
        {
            state.credentials.push(Credentials {
                user_id,
                email: email.to_string(),
                hashed_password: hash_demo_password()?,
            });
        }

        let react_course = Uuid::new_v4();
        let mobile_course = Uuid::new_v4();
        let draft_course = Uuid::new_v4();
        state.courses.push(Course {
            id: react_course,
            trainer_id,
            title: "Modern Web Development with React".to_string(),
            description: Some("From components to a production build.".to_string()),
            price: 75_000,
            category: Some("Web Development".to_string()),
            level: Level::Intermediate,
            is_published: true,
            created_at: seeded_at,
            updated_at: seeded_at,
        });
        state.courses.push(Course {
            id: mobile_course,
            trainer_id,
            title: "Mobile Apps with React Native".to_string(),
            description: Some("Your first apps on both platforms.".to_string()),
            price: 85_000,
            category: Some("Mobile Development".to_string()),
            level: Level::Beginner,
            is_published: true,
            created_at: seeded_at + chrono::Duration::days(1),
            updated_at: seeded_at + chrono::Duration::days(1),
        });
        state.courses.push(Course {
            id: draft_course,
            trainer_id,
            title: "Advanced TypeScript Patterns".to_string(),
            description: None,
            price: 60_000,
            category: Some("Web Development".to_string()),
            level: Level::Advanced,
            is_published: false,
            created_at: seeded_at + chrono::Duration::days(2),
            updated_at: seeded_at + chrono::Duration::days(2),
        });

        let seed_lessons: [(Uuid, &str, u32, bool, &str); 5] = [
            (react_course, "Introduction to React", 25, true, "demo-video-1"),
            (react_course, "Components and Props", 35, false, "demo-video-2"),
            (react_course, "State and Hooks", 45, false, "demo-video-3"),
            (mobile_course, "Setting Up the Environment", 20, true, "demo-video-4"),
            (mobile_course, "Your First Screen", 30, false, "demo-video-5"),
        ];
        let mut first_lesson = None;
        let mut next_index: HashMap<Uuid, i32> = HashMap::new();
        for (course_id, title, minutes, is_free, video_id) in seed_lessons {
            let index = next_index.entry(course_id).or_insert(0);
            *index += 1;
            let lesson = Lesson {
                id: Uuid::new_v4(),
                course_id,
                title: title.to_string(),
                description: None,
                video: Some(VideoRef::new("bunny", DEMO_LIBRARY_ID, video_id)),
                duration_minutes: Some(minutes),
                order_index: *index,
                is_free,
                created_at: seeded_at,
            };
            if first_lesson.is_none() {
                first_lesson = Some(lesson.id);
            }
            state.lessons.push(lesson);
        }

        // The learner is mid-way through the React course.
        let enrollment_id = Uuid::new_v4();
        state.enrollments.push(Enrollment {
            id: enrollment_id,
            learner_id,
            course_id: react_course,
            enrolled_at: seeded_at + chrono::Duration::days(3),
            progress: 33,
        });
        if let Some(lesson_id) = first_lesson {
            state.marks.push(LessonProgress {
                id: Uuid::new_v4(),
                enrollment_id,
                lesson_id,
                completed: true,
                completed_at: Some(seeded_at + chrono::Duration::days(4)),
            });
        }

        Ok(Self {
            state: Mutex::new(state),
            latency,
        })
    }

    /// Simulated network latency, applied before every operation.
    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn hash_demo_password() -> PortResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PortError::Upstream(format!("failed to hash demo password: {}", e)))
}

//=========================================================================================
// `DataService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DataService for DemoAdapter {
    async fn create_profile(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: &str,
        role: Role,
    ) -> PortResult<Profile> {
        self.pause().await;
        let mut state = self.state.lock().await;
        if state.profiles.iter().any(|p| p.email == email) {
            return Err(PortError::AlreadyExists(format!(
                "an account for {} already exists",
                email
            )));
        }
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            role,
            bio: None,
            phone_number: None,
            mobile_money_provider: None,
            avatar_url: None,
            created_at: Utc::now(),
        };
        state.credentials.push(Credentials {
            user_id: profile.id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        });
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        self.pause().await;
        self.state.lock().await.profile(user_id)
    }

    async fn update_profile(&self, user_id: Uuid, updates: ProfileUpdate) -> PortResult<Profile> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", user_id)))?;
        if let Some(full_name) = updates.full_name {
            profile.full_name = full_name;
        }
        if let Some(bio) = updates.bio {
            profile.bio = Some(bio);
        }
        if let Some(phone_number) = updates.phone_number {
            profile.phone_number = Some(phone_number);
        }
        if let Some(provider) = updates.mobile_money_provider {
            profile.mobile_money_provider = Some(provider);
        }
        if let Some(avatar_url) = updates.avatar_url {
            profile.avatar_url = Some(avatar_url);
        }
        Ok(profile.clone())
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<Credentials> {
        self.pause().await;
        self.state
            .lock()
            .await
            .credentials
            .iter()
            .find(|c| c.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("No account for {}", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.pause().await;
        self.state
            .lock()
            .await
            .auth_sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        self.pause().await;
        let state = self.state.lock().await;
        match state.auth_sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at >= Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.pause().await;
        self.state.lock().await.auth_sessions.remove(session_id);
        Ok(())
    }

    async fn list_published_courses(&self) -> PortResult<Vec<CourseSummary>> {
        self.pause().await;
        let state = self.state.lock().await;
        let mut courses: Vec<Course> = state
            .courses
            .iter()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        courses
            .into_iter()
            .map(|c| state.summarize(c))
            .collect()
    }

    async fn get_course(&self, course_id: Uuid) -> PortResult<CourseDetail> {
        self.pause().await;
        let state = self.state.lock().await;
        let course = state.course(course_id)?;
        let trainer = state.profile(course.trainer_id)?;
        let lessons = state.lessons_of(course_id);
        Ok(CourseDetail {
            course,
            trainer,
            lessons,
        })
    }

    async fn list_trainer_courses(&self, trainer_id: Uuid) -> PortResult<Vec<CourseSummary>> {
        self.pause().await;
        let state = self.state.lock().await;
        let mut courses: Vec<Course> = state
            .courses
            .iter()
            .filter(|c| c.trainer_id == trainer_id)
            .cloned()
            .collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        courses
            .into_iter()
            .map(|c| state.summarize(c))
            .collect()
    }

    async fn create_course(&self, trainer_id: Uuid, course: NewCourse) -> PortResult<Course> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let created = Course {
            id: Uuid::new_v4(),
            trainer_id,
            title: course.title,
            description: course.description,
            price: course.price,
            category: course.category,
            level: course.level,
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        state.courses.push(created.clone());
        Ok(created)
    }

    async fn update_course(
        &self,
        course_id: Uuid,
        trainer_id: Uuid,
        updates: CourseUpdate,
    ) -> PortResult<Course> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.owned_course(course_id, trainer_id)?;
        let course = state
            .courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| PortError::NotFound(format!("Course {} not found", course_id)))?;
        if let Some(title) = updates.title {
            course.title = title;
        }
        if let Some(description) = updates.description {
            course.description = Some(description);
        }
        if let Some(price) = updates.price {
            course.price = price;
        }
        if let Some(category) = updates.category {
            course.category = Some(category);
        }
        if let Some(level) = updates.level {
            course.level = level;
        }
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    async fn delete_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<()> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.owned_course(course_id, trainer_id)?;
        // Mirror the live schema's cascades.
        let removed_enrollments: Vec<Uuid> = state
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .map(|e| e.id)
            .collect();
        state.courses.retain(|c| c.id != course_id);
        state.lessons.retain(|l| l.course_id != course_id);
        state.enrollments.retain(|e| e.course_id != course_id);
        state
            .marks
            .retain(|m| !removed_enrollments.contains(&m.enrollment_id));
        Ok(())
    }

    async fn publish_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.owned_course(course_id, trainer_id)?;
        publication::ensure_publishable(state.lesson_ids_of(course_id).len())?;
        let course = state
            .courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| PortError::NotFound(format!("Course {} not found", course_id)))?;
        course.is_published = true;
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    async fn unpublish_course(&self, course_id: Uuid, trainer_id: Uuid) -> PortResult<Course> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.owned_course(course_id, trainer_id)?;
        let course = state
            .courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| PortError::NotFound(format!("Course {} not found", course_id)))?;
        course.is_published = false;
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    async fn add_lesson(
        &self,
        course_id: Uuid,
        trainer_id: Uuid,
        lesson: NewLesson,
    ) -> PortResult<Lesson> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.owned_course(course_id, trainer_id)?;
        // Deleted indices are not reused; new lessons go after the highest
        // index the course has ever held among current lessons.
        let next_index = state
            .lessons
            .iter()
            .filter(|l| l.course_id == course_id)
            .map(|l| l.order_index)
            .max()
            .unwrap_or(0)
            + 1;
        let created = Lesson {
            id: Uuid::new_v4(),
            course_id,
            title: lesson.title,
            description: lesson.description,
            video: lesson.video,
            duration_minutes: lesson.duration_minutes,
            order_index: next_index,
            is_free: lesson.is_free,
            created_at: Utc::now(),
        };
        state.lessons.push(created.clone());
        Ok(created)
    }

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<LessonDetail> {
        self.pause().await;
        let state = self.state.lock().await;
        let lesson = state
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Lesson {} not found", lesson_id)))?;
        let course = state.course(lesson.course_id)?;
        let trainer = state.profile(course.trainer_id)?;
        Ok(LessonDetail {
            lesson,
            course,
            trainer,
        })
    }

    async fn delete_lesson(&self, lesson_id: Uuid, trainer_id: Uuid) -> PortResult<()> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let lesson = state
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Lesson {} not found", lesson_id)))?;
        state.owned_course(lesson.course_id, trainer_id)?;
        // Completion marks for this lesson stay behind as orphans; the
        // progress recomputation excludes them.
        state.lessons.retain(|l| l.id != lesson_id);
        Ok(())
    }

    async fn enroll(&self, learner_id: Uuid, course_id: Uuid) -> PortResult<Enrollment> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let course = state.course(course_id)?;
        if !course.is_published {
            // Unpublished courses are not enrollable, and not disclosed.
            return Err(PortError::NotFound(format!("Course {} not found", course_id)));
        }
        if state
            .enrollments
            .iter()
            .any(|e| e.learner_id == learner_id && e.course_id == course_id)
        {
            return Err(PortError::AlreadyExists(
                "already enrolled in this course".to_string(),
            ));
        }
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            learner_id,
            course_id,
            enrolled_at: Utc::now(),
            progress: 0,
        };
        state.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn get_enrollment(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
    ) -> PortResult<Option<Enrollment>> {
        self.pause().await;
        Ok(self
            .state
            .lock()
            .await
            .enrollments
            .iter()
            .find(|e| e.learner_id == learner_id && e.course_id == course_id)
            .cloned())
    }

    async fn get_enrollment_by_id(&self, enrollment_id: Uuid) -> PortResult<Enrollment> {
        self.pause().await;
        self.state
            .lock()
            .await
            .enrollments
            .iter()
            .find(|e| e.id == enrollment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Enrollment {} not found", enrollment_id)))
    }

    async fn list_enrollments(&self, learner_id: Uuid) -> PortResult<Vec<EnrolledCourse>> {
        self.pause().await;
        let state = self.state.lock().await;
        let mut enrollments: Vec<Enrollment> = state
            .enrollments
            .iter()
            .filter(|e| e.learner_id == learner_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));

        let mut result = Vec::with_capacity(enrollments.len());
        for mut enrollment in enrollments {
            let course = state.course(enrollment.course_id)?;
            let trainer = state.profile(course.trainer_id)?;
            let lesson_ids = state.lesson_ids_of(course.id);
            let marks = state.marks_of(enrollment.id);
            let completed_count = progress::completed_lessons(&lesson_ids, &marks);
            // Derive the percentage from live counts instead of trusting the
            // stored field.
            enrollment.progress = progress::percentage(lesson_ids.len(), completed_count);
            result.push(EnrolledCourse {
                enrollment,
                course,
                trainer,
                lesson_count: lesson_ids.len(),
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
        self.pause().await;
        let mut state = self.state.lock().await;
        let course_id = state
            .enrollments
            .iter()
            .find(|e| e.id == enrollment_id)
            .map(|e| e.course_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("Enrollment {} not found", enrollment_id))
            })?;
        if !state
            .lessons
            .iter()
            .any(|l| l.id == lesson_id && l.course_id == course_id)
        {
            return Err(PortError::NotFound(format!(
                "Lesson {} is not part of the enrolled course",
                lesson_id
            )));
        }

        // Idempotent: re-marking keeps the original completion timestamp.
        match state
            .marks
            .iter_mut()
            .find(|m| m.enrollment_id == enrollment_id && m.lesson_id == lesson_id)
        {
            Some(mark) => {
                if !mark.completed {
                    mark.completed = true;
                    mark.completed_at = Some(Utc::now());
                }
            }
            None => state.marks.push(LessonProgress {
                id: Uuid::new_v4(),
                enrollment_id,
                lesson_id,
                completed: true,
                completed_at: Some(Utc::now()),
            }),
        }

        let lesson_ids = state.lesson_ids_of(course_id);
        let marks = state.marks_of(enrollment_id);
        let pct = progress::course_progress(&lesson_ids, &marks);
        let enrollment = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == enrollment_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("Enrollment {} not found", enrollment_id))
            })?;
        enrollment.progress = pct;
        Ok(enrollment.clone())
    }

    async fn list_lesson_progress(&self, enrollment_id: Uuid) -> PortResult<Vec<LessonProgress>> {
        self.pause().await;
        Ok(self.state.lock().await.marks_of(enrollment_id))
    }

    async fn trainer_stats(&self, trainer_id: Uuid) -> PortResult<TrainerStats> {
        self.pause().await;
        let state = self.state.lock().await;
        let courses: Vec<&Course> = state
            .courses
            .iter()
            .filter(|c| c.trainer_id == trainer_id)
            .collect();
        let published_courses = courses.iter().filter(|c| c.is_published).count();
        let mut learners = Vec::new();
        let mut total_revenue: u64 = 0;
        for enrollment in &state.enrollments {
            if let Some(course) = courses.iter().find(|c| c.id == enrollment.course_id) {
                if !learners.contains(&enrollment.learner_id) {
                    learners.push(enrollment.learner_id);
                }
                total_revenue += course.price as u64;
            }
        }
        Ok(TrainerStats {
            total_courses: courses.len(),
            published_courses,
            total_learners: learners.len(),
            total_revenue,
            account_balance: total_revenue * 70 / 100,
        })
    }
}

//=========================================================================================
// Demo Video Service
//=========================================================================================

/// Stand-in for the video provider: accepts every request after the same
/// artificial delay and fabricates provider ids.
pub struct DemoVideoService {
    latency: Duration,
}

impl DemoVideoService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl VideoService for DemoVideoService {
    async fn create_video(&self, _title: &str) -> PortResult<VideoHandle> {
        self.pause().await;
        Ok(VideoHandle {
            video_id: format!("demo-video-{}", Uuid::new_v4()),
            library_id: DEMO_LIBRARY_ID.to_string(),
        })
    }

    async fn upload_video(&self, _video_id: &str, _data: Vec<u8>) -> PortResult<()> {
        self.pause().await;
        Ok(())
    }

    async fn delete_video(&self, _video_id: &str) -> PortResult<()> {
        self.pause().await;
        Ok(())
    }
}
