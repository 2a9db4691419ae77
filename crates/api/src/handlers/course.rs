//! Public course catalog handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use skillmarket_core::content::strip_locked_lecture_urls;
use skillmarket_core::error::CoreError;
use skillmarket_core::pagination::{clamp_limit, clamp_offset};
use skillmarket_core::types::DbId;
use skillmarket_db::models::course::{Course, CourseSummary};
use skillmarket_db::repositories::CourseRepo;

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the catalog listing.
const DEFAULT_LIMIT: i64 = 50;
/// Hard cap on the catalog page size.
const MAX_LIMIT: i64 = 200;

/// `GET /api/v1/courses`
///
/// Published courses only, newest first, with rating aggregates.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<CourseSummary>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let courses = CourseRepo::list_published(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// `GET /api/v1/courses/{id}`
///
/// Full course detail with content, but with the media URL of every
/// non-preview lecture blanked. Unpublished courses do not exist from the
/// public catalog's point of view.
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Course>>> {
    let mut course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .filter(|c| c.is_published)
        .ok_or(CoreError::NotFound {
            entity: "course",
            id: course_id,
        })?;

    strip_locked_lecture_urls(&mut course.content.0);

    Ok(Json(DataResponse { data: course }))
}
