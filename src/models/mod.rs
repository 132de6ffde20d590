//! # Task Record Models
//!
//! Persistence models for the task record store: the [`Task`] row, its
//! append-only [`TaskLog`] entries, and the read-side [`stats`] rollup.
//! All queries use sqlx's runtime API against the shared pool.

pub mod stats;
pub mod task;
pub mod task_log;

pub use stats::TaskStats;
pub use task::{Task, TaskStatus};
pub use task_log::{NewTaskLog, TaskLog};
