//! # HTTP Request Handlers
//!
//! Axum handlers grouped by concern: the task API and health probes.

pub mod health;
pub mod tasks;
