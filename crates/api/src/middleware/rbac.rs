//! Role-based access control extractors.
//!
//! Wraps [`AuthUser`] and rejects requests whose role does not meet the
//! requirement, enforcing authorization at the type level before any
//! store operation runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use skillmarket_core::error::CoreError;
use skillmarket_core::roles::ROLE_EDUCATOR;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `educator` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn educator_only(RequireEducator(user): RequireEducator) -> AppResult<Json<()>> {
///     // user is guaranteed to be an educator here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEducator(pub AuthUser);

impl FromRequestParts<AppState> for RequireEducator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_EDUCATOR {
            return Err(AppError::Core(CoreError::Forbidden(
                "Educator role required".into(),
            )));
        }
        Ok(RequireEducator(user))
    }
}
