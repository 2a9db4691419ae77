//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `0001_create_users.sql`.

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_EDUCATOR: &str = "educator";
