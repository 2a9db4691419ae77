use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Mount authenticated student routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(user::profile))
        .route("/users/me/enrollments", get(user::enrollments))
        .route("/users/me/purchases/{course_id}", post(user::purchase_course))
        .route(
            "/users/me/progress/{course_id}",
            get(user::get_progress).post(user::mark_complete),
        )
        .route("/users/me/ratings/{course_id}", post(user::rate_course))
}
