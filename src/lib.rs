#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, RabbitMQ in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taskhelm
//!
//! Broker-driven task distribution with live operator control and durable
//! report reconciliation.
//!
//! ## Overview
//!
//! Taskhelm splits task processing across two processes connected only
//! through RabbitMQ and Postgres. The **server** exposes the operator REST
//! API, enqueues work, and reconciles worker reports into the task record
//! store. The **worker** consumes one task at a time, drives it through an
//! in-memory execution state machine, and reports every lifecycle change
//! back over the broker.
//!
//! ## Architecture
//!
//! Three broker primitives carry everything:
//!
//! - a durable **priority work queue** feeding tasks to competing workers,
//! - a durable **report queue** carrying lifecycle reports back to the
//!   server's reconciler,
//! - a durable **direct command exchange** routing operator commands to
//!   whichever worker currently owns a task, via an exclusive per-task
//!   queue bound with the task id as the routing key.
//!
//! Workers never touch the database; the reconciler is the only writer of
//! task state, so the record store stays consistent no matter how many
//! workers run.
//!
//! ## Module Organization
//!
//! - [`web`] - Operator REST API (task CRUD, control commands, stats)
//! - [`messaging`] - Broker connection, topology, dispatcher, wire types
//! - [`worker`] - Worker runtime, command lease, work policies
//! - [`state_machine`] - In-memory task execution lifecycle
//! - [`reconciler`] - Report consumer applying status changes and logs
//! - [`models`] - Task record store (tasks, task logs, stats rollup)
//! - [`config`] - Environment configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use taskhelm::config::TaskhelmConfig;
//! use taskhelm::messaging::{Broker, TaskDispatcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TaskhelmConfig::from_env()?;
//! let broker = Arc::new(Broker::connect(&config.broker).await?);
//! let dispatcher = TaskDispatcher::new(broker);
//!
//! let task_id = uuid::Uuid::new_v4();
//! dispatcher.submit(task_id, 3).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod reconciler;
pub mod state_machine;
pub mod web;
pub mod worker;

pub use config::{BrokerConfig, DatabaseConfig, ServerConfig, TaskhelmConfig};
pub use error::{Result, TaskhelmError};
pub use messaging::{Broker, Command, Report, TaskDispatcher, TaskStartMessage};
pub use models::{Task, TaskLog, TaskStats, TaskStatus};
pub use reconciler::ReportReconciler;
pub use state_machine::{ExecutionEvent, ExecutionState, TaskExecution};
pub use worker::{SimulatedWorkPolicy, WorkPolicy, WorkerRuntime};
