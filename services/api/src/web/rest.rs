//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use course_market_core::access;
use course_market_core::domain::{
    Course, CourseUpdate, EnrolledCourse, Enrollment, Lesson, LessonDetail, Level, NewCourse,
    NewLesson, Profile, ProfileUpdate, Role,
};
use course_market_core::ports::PortError;
use course_market_core::video::VideoRef;

use crate::web::state::{AppState, AuthUser};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_courses_handler,
        get_course_handler,
        create_course_handler,
        update_course_handler,
        delete_course_handler,
        publish_course_handler,
        unpublish_course_handler,
        add_lesson_handler,
        get_lesson_handler,
        delete_lesson_handler,
        enroll_handler,
        list_enrollments_handler,
        complete_lesson_handler,
        trainer_stats_handler,
        list_trainer_courses_handler,
        get_profile_handler,
        update_profile_handler,
        create_video_handler,
        upload_video_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
    ),
    components(schemas(
        CourseResponse,
        CourseSummaryResponse,
        CourseDetailResponse,
        LessonResponse,
        LessonViewResponse,
        EnrollmentResponse,
        EnrolledCourseResponse,
        ProfileResponse,
        StatsResponse,
        VideoHandleResponse,
        CreateCourseRequest,
        UpdateCourseRequest,
        CreateLessonRequest,
        EnrollRequest,
        UpdateProfileRequest,
        CreateVideoRequest,
        crate::web::auth::SignupRequest,
        crate::web::auth::LoginRequest,
        crate::web::auth::AuthResponse,
    )),
    tags(
        (name = "Course Marketplace API", description = "Courses, lessons, enrollments, and progress tracking.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            role: p.role.as_str().to_string(),
            bio: p.bio,
            phone_number: p.phone_number,
            mobile_money_provider: p.mobile_money_provider,
            avatar_url: p.avatar_url,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: u32,
    pub category: Option<String>,
    pub level: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            trainer_id: c.trainer_id,
            title: c.title,
            description: c.description,
            price: c.price,
            category: c.category,
            level: c.level.as_str().to_string(),
            is_published: c.is_published,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CourseSummaryResponse {
    pub course: CourseResponse,
    pub trainer: ProfileResponse,
    pub lesson_count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct LessonResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// The stored `{provider}://{library}/{videoId}` reference.
    pub video_ref: Option<String>,
    pub duration_minutes: Option<u32>,
    pub order_index: i32,
    pub is_free: bool,
}

impl From<Lesson> for LessonResponse {
    fn from(l: Lesson) -> Self {
        Self {
            id: l.id,
            course_id: l.course_id,
            title: l.title,
            description: l.description,
            video_ref: l.video.map(|v| v.to_string()),
            duration_minutes: l.duration_minutes,
            order_index: l.order_index,
            is_free: l.is_free,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CourseDetailResponse {
    pub course: CourseResponse,
    pub trainer: ProfileResponse,
    pub lessons: Vec<LessonResponse>,
}

/// A lesson as seen by a viewer who passed the access gate.
#[derive(Serialize, ToSchema)]
pub struct LessonViewResponse {
    pub lesson: LessonResponse,
    pub course_title: String,
    pub trainer_name: String,
    /// Derived embed URL, present when the lesson has a video attached.
    pub playback_url: Option<String>,
    /// Whether the calling learner has completed this lesson.
    pub completed: bool,
}

#[derive(Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub progress: u8,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        Self {
            id: e.id,
            learner_id: e.learner_id,
            course_id: e.course_id,
            enrolled_at: e.enrolled_at,
            progress: e.progress,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EnrolledCourseResponse {
    pub enrollment: EnrollmentResponse,
    pub course: CourseResponse,
    pub trainer: ProfileResponse,
    pub lesson_count: usize,
    pub completed_count: usize,
}

impl From<EnrolledCourse> for EnrolledCourseResponse {
    fn from(e: EnrolledCourse) -> Self {
        Self {
            enrollment: e.enrollment.into(),
            course: e.course.into(),
            trainer: e.trainer.into(),
            lesson_count: e.lesson_count,
            completed_count: e.completed_count,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_courses: usize,
    pub published_courses: usize,
    pub total_learners: usize,
    pub total_revenue: u64,
    pub account_balance: u64,
}

#[derive(Serialize, ToSchema)]
pub struct VideoHandleResponse {
    pub video_id: String,
    pub library_id: String,
    /// The reference to store on a lesson once the upload succeeds.
    pub video_ref: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: u32,
    pub category: Option<String>,
    /// "beginner", "intermediate", or "advanced".
    pub level: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<u32>,
    pub category: Option<String>,
    pub level: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLessonRequest {
    pub title: String,
    pub description: Option<String>,
    /// A `{provider}://{library}/{videoId}` reference, if a video is attached.
    pub video_ref: Option<String>,
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub is_free: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct EnrollRequest {
    pub course_id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Maps a port error onto the HTTP surface. Every failure is terminal for
/// the attempt; the service never retries on the caller's behalf.
fn port_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg),
        PortError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        PortError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        PortError::Upstream(msg) => {
            error!("Upstream failure: {}", msg);
            (
                StatusCode::BAD_GATEWAY,
                "An upstream service failed".to_string(),
            )
        }
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
    }
}

fn require_trainer(user: &AuthUser) -> Result<(), (StatusCode, String)> {
    if user.role != Role::Trainer {
        return Err((
            StatusCode::FORBIDDEN,
            "This operation requires a trainer account".to_string(),
        ));
    }
    Ok(())
}

fn require_learner(user: &AuthUser) -> Result<(), (StatusCode, String)> {
    if user.role != Role::Learner {
        return Err((
            StatusCode::FORBIDDEN,
            "This operation requires a learner account".to_string(),
        ));
    }
    Ok(())
}

fn parse_level(raw: &str) -> Result<Level, (StatusCode, String)> {
    raw.parse::<Level>()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e))
}

fn parse_video_ref(raw: &str) -> Result<VideoRef, (StatusCode, String)> {
    raw.parse::<VideoRef>()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

/// Upper bound on a lesson's duration; the storage column is a signed
/// 32-bit integer, so anything past this would wrap on the way in.
const MAX_LESSON_MINUTES: u32 = i32::MAX as u32;

fn parse_duration(minutes: Option<u32>) -> Result<Option<u32>, (StatusCode, String)> {
    match minutes {
        Some(m) if m > MAX_LESSON_MINUTES => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "duration_minutes is out of range".to_string(),
        )),
        other => Ok(other),
    }
}

//=========================================================================================
// Catalog Handlers
//=========================================================================================

/// List all published courses.
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "Published courses", body = [CourseSummaryResponse])
    )
)]
pub async fn list_courses_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summaries = state
        .data
        .list_published_courses()
        .await
        .map_err(port_error)?;
    let response: Vec<CourseSummaryResponse> = summaries
        .into_iter()
        .map(|s| CourseSummaryResponse {
            course: s.course.into(),
            trainer: s.trainer.into(),
            lesson_count: s.lesson_count,
        })
        .collect();
    Ok(Json(response))
}

/// Get one course with its trainer and ordered lessons.
///
/// Draft courses are only visible to their owning trainer.
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetailResponse),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let detail = state.data.get_course(id).await.map_err(port_error)?;
    if !detail.course.is_published && detail.course.trainer_id != user.id {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Course {} not found", id),
        ));
    }
    Ok(Json(CourseDetailResponse {
        course: detail.course.into(),
        trainer: detail.trainer.into(),
        lessons: detail.lessons.into_iter().map(Into::into).collect(),
    }))
}

/// Create a draft course.
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 403, description = "Not a trainer"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_course_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    if req.title.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "title is required".to_string(),
        ));
    }
    let level = parse_level(&req.level)?;
    let course = state
        .data
        .create_course(
            user.id,
            NewCourse {
                title: req.title.trim().to_string(),
                description: req.description,
                price: req.price,
                category: req.category,
                level,
            },
        )
        .await
        .map_err(port_error)?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

/// Update course content, price, category, or level.
#[utoipa::path(
    patch,
    path = "/courses/{id}",
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 403, description = "Not the owning trainer"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let level = req.level.as_deref().map(parse_level).transpose()?;
    let course = state
        .data
        .update_course(
            id,
            user.id,
            CourseUpdate {
                title: req.title,
                description: req.description,
                price: req.price,
                category: req.category,
                level,
            },
        )
        .await
        .map_err(port_error)?;
    Ok(Json(CourseResponse::from(course)))
}

/// Delete a course; its lessons and enrollments go with it.
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Not the owning trainer"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    state
        .data
        .delete_course(id, user.id)
        .await
        .map_err(port_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish a draft course. Requires at least one lesson.
#[utoipa::path(
    post,
    path = "/courses/{id}/publish",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course published", body = CourseResponse),
        (status = 422, description = "Course has no lessons"),
        (status = 403, description = "Not the owning trainer")
    )
)]
pub async fn publish_course_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let course = state
        .data
        .publish_course(id, user.id)
        .await
        .map_err(port_error)?;
    Ok(Json(CourseResponse::from(course)))
}

/// Take a published course back to draft. Always allowed for the owner.
#[utoipa::path(
    post,
    path = "/courses/{id}/unpublish",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course unpublished", body = CourseResponse),
        (status = 403, description = "Not the owning trainer")
    )
)]
pub async fn unpublish_course_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let course = state
        .data
        .unpublish_course(id, user.id)
        .await
        .map_err(port_error)?;
    Ok(Json(CourseResponse::from(course)))
}

//=========================================================================================
// Lesson Handlers
//=========================================================================================

/// Append a lesson to a course at the next order index.
#[utoipa::path(
    post,
    path = "/courses/{id}/lessons",
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 403, description = "Not the owning trainer"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn add_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateLessonRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    if req.title.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "title is required".to_string(),
        ));
    }
    let video = req.video_ref.as_deref().map(parse_video_ref).transpose()?;
    let duration_minutes = parse_duration(req.duration_minutes)?;
    let lesson = state
        .data
        .add_lesson(
            id,
            user.id,
            NewLesson {
                title: req.title.trim().to_string(),
                description: req.description,
                video,
                duration_minutes,
                is_free: req.is_free,
            },
        )
        .await
        .map_err(port_error)?;
    Ok((StatusCode::CREATED, Json(LessonResponse::from(lesson))))
}

/// View a lesson.
///
/// The access gate is evaluated here, per request: the lesson is viewable
/// iff it is free, the caller is enrolled in its course, or the caller is
/// the owning trainer previewing their own content.
#[utoipa::path(
    get,
    path = "/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson view", body = LessonViewResponse),
        (status = 403, description = "Enrollment required"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn get_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let LessonDetail {
        lesson,
        course,
        trainer,
    } = state.data.get_lesson(id).await.map_err(port_error)?;

    let enrollment = state
        .data
        .get_enrollment(user.id, course.id)
        .await
        .map_err(port_error)?;

    let is_owner = course.trainer_id == user.id;
    if !course.is_published && !is_owner {
        // Drafts are not disclosed by lesson id probing either.
        return Err((
            StatusCode::NOT_FOUND,
            format!("Lesson {} not found", id),
        ));
    }
    if !is_owner && !access::can_view(&lesson, enrollment.as_ref()) {
        return Err((
            StatusCode::FORBIDDEN,
            "Enroll in the course to view this lesson".to_string(),
        ));
    }

    let completed = match &enrollment {
        Some(enrollment) => state
            .data
            .list_lesson_progress(enrollment.id)
            .await
            .map_err(port_error)?
            .iter()
            .any(|m| m.lesson_id == lesson.id && m.completed),
        None => false,
    };

    let playback_url = lesson.video.as_ref().map(VideoRef::playback_url);
    Ok(Json(LessonViewResponse {
        lesson: lesson.into(),
        course_title: course.title,
        trainer_name: trainer.full_name,
        playback_url,
        completed,
    }))
}

/// Delete a lesson. Completion marks for it become orphans and stop
/// counting toward progress.
#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 403, description = "Not the owning trainer"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn delete_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let detail = state.data.get_lesson(id).await.map_err(port_error)?;
    state
        .data
        .delete_lesson(id, user.id)
        .await
        .map_err(port_error)?;
    // Best-effort provider cleanup; the lesson is already gone either way.
    if let Some(video) = &detail.lesson.video {
        if let Err(e) = state.video.delete_video(&video.video_id).await {
            warn!("Failed to delete hosted video {}: {}", video.video_id, e);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Enrollment Handlers
//=========================================================================================

/// Enroll the calling learner in a published course.
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Enrolled", body = EnrollmentResponse),
        (status = 404, description = "Course not found or not published"),
        (status = 409, description = "Already enrolled")
    )
)]
pub async fn enroll_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EnrollRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_learner(&user)?;
    let enrollment = state
        .data
        .enroll(user.id, req.course_id)
        .await
        .map_err(port_error)?;
    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from(enrollment))))
}

/// The calling learner's enrollments, most recent first.
#[utoipa::path(
    get,
    path = "/enrollments",
    responses(
        (status = 200, description = "Enrollments with course projections", body = [EnrolledCourseResponse]),
        (status = 403, description = "Not a learner")
    )
)]
pub async fn list_enrollments_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_learner(&user)?;
    let enrollments = state
        .data
        .list_enrollments(user.id)
        .await
        .map_err(port_error)?;
    let response: Vec<EnrolledCourseResponse> =
        enrollments.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// Mark a lesson complete. Idempotent; recomputes course progress.
#[utoipa::path(
    post,
    path = "/enrollments/{enrollment_id}/lessons/{lesson_id}/complete",
    params(
        ("enrollment_id" = Uuid, Path, description = "Enrollment id"),
        ("lesson_id" = Uuid, Path, description = "Lesson id")
    ),
    responses(
        (status = 200, description = "Updated enrollment", body = EnrollmentResponse),
        (status = 403, description = "Not the caller's enrollment"),
        (status = 404, description = "Enrollment or lesson not found")
    )
)]
pub async fn complete_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((enrollment_id, lesson_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let enrollment = state
        .data
        .get_enrollment_by_id(enrollment_id)
        .await
        .map_err(port_error)?;
    if enrollment.learner_id != user.id {
        return Err((
            StatusCode::FORBIDDEN,
            "This enrollment belongs to another learner".to_string(),
        ));
    }
    let updated = state
        .data
        .mark_lesson_complete(enrollment_id, lesson_id)
        .await
        .map_err(port_error)?;
    Ok(Json(EnrollmentResponse::from(updated)))
}

//=========================================================================================
// Trainer & Profile Handlers
//=========================================================================================

/// Aggregate dashboard numbers for the calling trainer.
#[utoipa::path(
    get,
    path = "/trainer/stats",
    responses(
        (status = 200, description = "Trainer stats", body = StatsResponse),
        (status = 403, description = "Not a trainer")
    )
)]
pub async fn trainer_stats_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let stats = state
        .data
        .trainer_stats(user.id)
        .await
        .map_err(port_error)?;
    Ok(Json(StatsResponse {
        total_courses: stats.total_courses,
        published_courses: stats.published_courses,
        total_learners: stats.total_learners,
        total_revenue: stats.total_revenue,
        account_balance: stats.account_balance,
    }))
}

/// The calling trainer's own courses, drafts included.
#[utoipa::path(
    get,
    path = "/trainer/courses",
    responses(
        (status = 200, description = "The trainer's courses", body = [CourseSummaryResponse]),
        (status = 403, description = "Not a trainer")
    )
)]
pub async fn list_trainer_courses_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let summaries = state
        .data
        .list_trainer_courses(user.id)
        .await
        .map_err(port_error)?;
    let response: Vec<CourseSummaryResponse> = summaries
        .into_iter()
        .map(|s| CourseSummaryResponse {
            course: s.course.into(),
            trainer: s.trainer.into(),
            lesson_count: s.lesson_count,
        })
        .collect();
    Ok(Json(response))
}

/// The calling user's profile.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse)
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state.data.get_profile(user.id).await.map_err(port_error)?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Update the calling user's profile.
#[utoipa::path(
    patch,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse)
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state
        .data
        .update_profile(
            user.id,
            ProfileUpdate {
                full_name: req.full_name,
                bio: req.bio,
                phone_number: req.phone_number,
                mobile_money_provider: req.mobile_money_provider,
                avatar_url: req.avatar_url,
            },
        )
        .await
        .map_err(port_error)?;
    Ok(Json(ProfileResponse::from(profile)))
}

//=========================================================================================
// Video Handlers
//=========================================================================================

/// Create a video entry on the hosting provider.
#[utoipa::path(
    post,
    path = "/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video created on the provider", body = VideoHandleResponse),
        (status = 403, description = "Not a trainer"),
        (status = 502, description = "Provider failure")
    )
)]
pub async fn create_video_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    let handle = state
        .video
        .create_video(&req.title)
        .await
        .map_err(port_error)?;
    let video_ref = VideoRef::new("bunny", &handle.library_id, &handle.video_id);
    Ok((
        StatusCode::CREATED,
        Json(VideoHandleResponse {
            video_id: handle.video_id,
            library_id: handle.library_id,
            video_ref: video_ref.to_string(),
        }),
    ))
}

/// Upload the video file for a previously created entry.
#[utoipa::path(
    put,
    path = "/videos/{id}",
    params(("id" = String, Path, description = "Provider video id")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Upload accepted"),
        (status = 403, description = "Not a trainer"),
        (status = 502, description = "Provider failure")
    )
)]
pub async fn upload_video_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_trainer(&user)?;
    state
        .video
        .upload_video(&id, body.to_vec())
        .await
        .map_err(port_error)?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn role_guards_reject_the_other_role() {
        assert!(require_trainer(&user(Role::Trainer)).is_ok());
        assert!(require_learner(&user(Role::Learner)).is_ok());

        let err = require_trainer(&user(Role::Learner)).unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
        let err = require_learner(&user(Role::Trainer)).unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn lesson_durations_past_the_column_range_are_rejected() {
        assert_eq!(parse_duration(None).unwrap(), None);
        assert_eq!(parse_duration(Some(90)).unwrap(), Some(90));
        assert_eq!(
            parse_duration(Some(MAX_LESSON_MINUTES)).unwrap(),
            Some(MAX_LESSON_MINUTES)
        );

        let err = parse_duration(Some(MAX_LESSON_MINUTES + 1)).unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
