pub mod auth;
pub mod course;
pub mod educator;
pub mod health;
pub mod user;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /courses                               published catalog (public)
/// /courses/{id}                          course detail, locked URLs blanked (public)
///
/// /users/me                              profile
/// /users/me/enrollments                  enrolled courses
/// /users/me/purchases/{course_id}        start checkout
/// /users/me/progress/{course_id}         get / mark lecture completion
/// /users/me/ratings/{course_id}          rate an enrolled course
///
/// /educators/me                          become an educator
/// /educators/me/courses                  list own, create (multipart)
/// /educators/me/dashboard                earnings + enrollments overview
/// /educators/me/students                 completed purchases, newest first
///
/// /webhooks/payments                     gateway settlement callback (signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(course::router())
        .merge(user::router())
        .merge(educator::router())
        .merge(webhook::router())
}
