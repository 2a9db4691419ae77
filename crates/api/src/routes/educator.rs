use axum::routing::{get, post};
use axum::Router;

use crate::handlers::educator;
use crate::state::AppState;

/// Mount educator routes. Role enforcement lives in the handlers via
/// `RequireEducator`, except `become_educator` which any user may call.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/educators/me", post(educator::become_educator))
        .route(
            "/educators/me/courses",
            get(educator::my_courses).post(educator::add_course),
        )
        .route("/educators/me/dashboard", get(educator::dashboard))
        .route("/educators/me/students", get(educator::enrolled_students))
}
