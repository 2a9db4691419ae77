use axum::routing::get;
use axum::Router;

use crate::handlers::course;
use crate::state::AppState;

/// Mount public catalog routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(course::list_courses))
        .route("/courses/{id}", get(course::get_course))
}
