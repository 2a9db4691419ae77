//! Request handlers, grouped by resource.

pub mod auth;
pub mod course;
pub mod educator;
pub mod user;
pub mod webhook;
