//! Authenticated student handlers: profile, enrollments, purchases,
//! progress, and ratings.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use skillmarket_core::content::{contains_lecture, lecture_count};
use skillmarket_core::error::CoreError;
use skillmarket_core::types::DbId;
use skillmarket_db::models::course::Course;
use skillmarket_db::models::rating::CourseRating;
use skillmarket_db::models::user::UserResponse;
use skillmarket_db::repositories::{CourseRepo, ProgressRepo, RatingRepo, UserRepo};

use crate::enrollment;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Look up the caller's full user row, 404 if the account vanished.
async fn current_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<skillmarket_db::models::user::User> {
    UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "user",
                id: user.user_id,
            })
        })
}

/// `GET /api/v1/users/me`
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = current_user(&state, &user).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// `GET /api/v1/users/me/enrollments`
///
/// Full course records for everything the caller is enrolled in.
pub async fn enrollments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = UserRepo::enrolled_courses(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: courses }))
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub purchase_id: DbId,
    /// Checkout URL the client redirects to.
    pub session_url: String,
}

/// `POST /api/v1/users/me/purchases/{course_id}`
///
/// Starts the paid-enrollment flow. The `Origin` header anchors the
/// post-checkout redirect URLs, so it is required here.
pub async fn purchase_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<DataResponse<PurchaseResponse>>)> {
    let origin = headers
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Origin header".into()))?;

    let started = enrollment::initiate(
        &state.pool,
        state.gateway.as_ref(),
        &state.config.payment_currency,
        &user,
        course_id,
        origin,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PurchaseResponse {
                purchase_id: started.purchase.id,
                session_url: started.session_url,
            },
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct MarkCompleteRequest {
    pub lecture_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub course_id: DbId,
    pub lectures_completed: Vec<String>,
    /// Total lectures currently in the course. The completion ratio is
    /// derived client-side and never stored.
    pub total_lectures: usize,
    /// `true` when the submitted lecture was already marked complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_completed: Option<bool>,
}

/// `POST /api/v1/users/me/progress/{course_id}`
///
/// Marks a lecture complete. Set semantics: repeating a completion is
/// reported, not rejected. The lecture must exist in the course's current
/// content.
pub async fn mark_complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<DbId>,
    Json(payload): Json<MarkCompleteRequest>,
) -> AppResult<Json<DataResponse<ProgressResponse>>> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "course",
            id: course_id,
        })?;

    if !contains_lecture(&course.content.0, &payload.lecture_id) {
        return Err(CoreError::Validation(format!(
            "Lecture {} does not exist in this course",
            payload.lecture_id
        ))
        .into());
    }

    let already_completed =
        ProgressRepo::mark_complete(&state.pool, user.user_id, course_id, &payload.lecture_id)
            .await?;

    let progress = ProgressRepo::get(&state.pool, user.user_id, course_id).await?;
    let lectures_completed = progress.map(|p| p.lectures_completed).unwrap_or_default();

    Ok(Json(DataResponse {
        data: ProgressResponse {
            course_id,
            lectures_completed,
            total_lectures: lecture_count(&course.content.0),
            already_completed: Some(already_completed),
        },
    }))
}

/// `GET /api/v1/users/me/progress/{course_id}`
///
/// No progress record yet means an empty completion set, not a 404.
pub async fn get_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProgressResponse>>> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "course",
            id: course_id,
        })?;

    let progress = ProgressRepo::get(&state.pool, user.user_id, course_id).await?;
    let lectures_completed = progress.map(|p| p.lectures_completed).unwrap_or_default();

    Ok(Json(DataResponse {
        data: ProgressResponse {
            course_id,
            lectures_completed,
            total_lectures: lecture_count(&course.content.0),
            already_completed: None,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

/// `POST /api/v1/users/me/ratings/{course_id}`
///
/// Insert-or-replace the caller's rating. Only enrolled students may rate.
pub async fn rate_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<DbId>,
    Json(payload): Json<RateRequest>,
) -> AppResult<Json<DataResponse<CourseRating>>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(CoreError::Validation("Rating must be between 1 and 5".into()).into());
    }

    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "course",
            id: course_id,
        })?;

    let caller = current_user(&state, &user).await?;
    if !caller.enrolled_courses.contains(&course_id) {
        return Err(
            CoreError::Forbidden("Only enrolled students can rate a course".into()).into(),
        );
    }

    let rating = RatingRepo::upsert(&state.pool, course_id, user.user_id, payload.rating).await?;

    tracing::info!(
        user_id = user.user_id,
        course_id,
        rating = payload.rating,
        "course rated"
    );

    Ok(Json(DataResponse { data: rating }))
}
