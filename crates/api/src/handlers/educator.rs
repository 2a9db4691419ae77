//! Educator handlers: role upgrade, course authoring, dashboard.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skillmarket_core::content::{validate_content, Chapter};
use skillmarket_core::error::CoreError;
use skillmarket_core::pricing::{discounted_amount, validate_discount};
use skillmarket_core::roles::ROLE_EDUCATOR;
use skillmarket_core::types::DbId;
use skillmarket_db::models::course::{Course, CreateCourse};
use skillmarket_db::models::purchase::CompletedPurchaseRow;
use skillmarket_db::models::user::StudentInfo;
use skillmarket_db::repositories::{CourseRepo, PurchaseRepo, UserRepo};
use sqlx::types::Json as SqlJson;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEducator;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// `POST /api/v1/educators/me`
///
/// Upgrades the caller to the `educator` role. Idempotent: upgrading an
/// educator again succeeds with the same confirmation.
pub async fn become_educator(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    let updated = UserRepo::set_role(&state.pool, user.user_id, ROLE_EDUCATOR).await?;
    if !updated {
        return Err(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }
        .into());
    }

    tracing::info!(user_id = user.user_id, "role upgraded to educator");

    Ok(Json(MessageResponse {
        message: "You can publish courses now".to_string(),
    }))
}

/// Client-supplied course fields, sent as the `course` JSON part of the
/// multipart request.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount: i32,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub content: Vec<Chapter>,
}

/// `POST /api/v1/educators/me/courses` (multipart)
///
/// Expects two parts: `course` (JSON, [`CreateCourseRequest`]) and
/// `thumbnail` (image file). The thumbnail is uploaded to the media host
/// BEFORE the course row is inserted, so a failed upload never leaves a
/// course without its image.
pub async fn add_course(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    let mut course_json: Option<String> = None;
    let mut thumbnail: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {e}")))?
    {
        match field.name() {
            Some("course") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid course part: {e}")))?;
                course_json = Some(text);
            }
            Some("thumbnail") => {
                let filename = field.file_name().unwrap_or("thumbnail").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid thumbnail part: {e}")))?;
                thumbnail = Some((filename, content_type, bytes.to_vec()));
            }
            _ => continue,
        }
    }

    let course_json =
        course_json.ok_or_else(|| AppError::BadRequest("Missing course part".into()))?;
    let (filename, content_type, bytes) =
        thumbnail.ok_or_else(|| AppError::BadRequest("Missing thumbnail part".into()))?;

    let request: CreateCourseRequest = serde_json::from_str(&course_json)
        .map_err(|e| CoreError::Validation(format!("Invalid course JSON: {e}")))?;

    if request.title.trim().is_empty() {
        return Err(CoreError::Validation("Course title must not be empty".into()).into());
    }
    validate_discount(request.discount)?;
    // Rejects negative prices as a side effect of computing the display amount.
    discounted_amount(request.price, request.discount)?;
    validate_content(&request.content)?;

    let uploaded = state
        .media
        .upload(&filename, &content_type, bytes)
        .await
        .map_err(AppError::Media)?;

    let course = CourseRepo::create(
        &state.pool,
        &CreateCourse {
            educator_id: user.user_id,
            title: request.title,
            description: request.description,
            thumbnail_url: Some(uploaded.url),
            price: request.price,
            discount: request.discount,
            is_published: request.is_published,
            content: SqlJson(request.content),
        },
    )
    .await?;

    tracing::info!(
        course_id = course.id,
        educator_id = user.user_id,
        "course created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// `GET /api/v1/educators/me/courses`
pub async fn my_courses(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list_by_educator(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// Per-course slice of the dashboard: the course title and who is enrolled.
#[derive(Debug, Serialize)]
pub struct CourseEnrollment {
    pub course_id: DbId,
    pub course_title: String,
    pub students: Vec<StudentInfo>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_courses: usize,
    /// Sum of completed purchase amounts across all of the educator's courses.
    pub total_earnings: Decimal,
    pub enrollments: Vec<CourseEnrollment>,
}

/// `GET /api/v1/educators/me/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let courses = CourseRepo::list_by_educator(&state.pool, user.user_id).await?;
    let total_earnings = PurchaseRepo::total_earnings(&state.pool, user.user_id).await?;

    let mut enrollments = Vec::with_capacity(courses.len());
    for course in &courses {
        let students = UserRepo::find_students(&state.pool, &course.enrolled_students).await?;
        enrollments.push(CourseEnrollment {
            course_id: course.id,
            course_title: course.title.clone(),
            students,
        });
    }

    Ok(Json(DataResponse {
        data: DashboardResponse {
            total_courses: courses.len(),
            total_earnings,
            enrollments,
        },
    }))
}

/// `GET /api/v1/educators/me/students`
///
/// One row per completed purchase of the educator's courses, newest first.
pub async fn enrolled_students(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
) -> AppResult<Json<DataResponse<Vec<CompletedPurchaseRow>>>> {
    let rows = PurchaseRepo::completed_for_educator(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: rows }))
}
