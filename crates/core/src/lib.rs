//! Domain types and pure logic shared across the skillmarket backend.
//!
//! This crate has no internal dependencies so it can be used by the API,
//! the repository layer, and any future worker or CLI tooling.

pub mod content;
pub mod error;
pub mod pagination;
pub mod pricing;
pub mod roles;
pub mod signing;
pub mod types;
