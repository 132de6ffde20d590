//! # Messaging
//!
//! Broker topology, wire message types, and the producer-side dispatcher.
//!
//! Three pieces of RabbitMQ topology carry the whole system:
//! - `taskhelm_tasks`: durable priority work queue, one task in flight per
//!   worker via a prefetch window of one
//! - `taskhelm_reports`: durable queue of worker lifecycle reports consumed
//!   by the reconciler
//! - `taskhelm_commands`: durable direct exchange; workers bind a transient
//!   per-task queue keyed by task id for the task they currently own

pub mod broker;
pub mod dispatcher;
pub mod errors;
pub mod messages;

pub use broker::Broker;
pub use dispatcher::TaskDispatcher;
pub use errors::{MessagingError, MessagingResult};
pub use messages::{event_time_from_millis, now_millis, Command, Report, TaskStartMessage};
