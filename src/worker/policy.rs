//! # Work Policy
//!
//! The pluggable unit of work behind a task execution. A policy decides the
//! tick cadence and progress step up front, then evaluates each tick, which
//! is where real work would run. Tests swap in a deterministic policy to
//! force specific tick counts and failure points.
//!
//! ```rust
//! use taskhelm::worker::{FixedWorkPolicy, TickOutcome, WorkPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let policy = FixedWorkPolicy::new(Duration::from_millis(10), 25).failing_at(2);
//!
//! assert!(matches!(policy.evaluate_tick(1).await, TickOutcome::Advance));
//! assert!(matches!(policy.evaluate_tick(2).await, TickOutcome::Fault(_)));
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;

use crate::constants::progress;

/// Cadence and step size for one task execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPlan {
    /// Time between progress ticks
    pub tick_interval: Duration,
    /// Progress added per tick
    pub progress_step: i32,
}

impl WorkPlan {
    pub fn new(tick_interval: Duration, progress_step: i32) -> Self {
        Self {
            tick_interval,
            // A non-positive step would tick forever without finishing
            progress_step: progress_step.max(1),
        }
    }
}

/// Outcome of evaluating one tick of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The slice of work succeeded; advance progress
    Advance,
    /// The slice of work failed; end the execution with this message
    Fault(String),
}

/// A pluggable unit of work executed tick by tick
#[async_trait]
pub trait WorkPolicy: Send + Sync {
    /// Choose the cadence and step for a fresh execution
    ///
    /// Called once per task start and again after a restart, so a policy
    /// with randomized plans re-rolls on restart.
    fn plan(&self) -> WorkPlan;

    /// Run one slice of work; `tick` counts from 1 within the current run
    async fn evaluate_tick(&self, tick: u32) -> TickOutcome;
}

/// Simulated work with a randomized duration and a per-tick fault chance
///
/// Each run lasts a random whole number of seconds in `5..=120`, split into
/// ten equal ticks of ten percent progress. Every tick carries a small
/// chance of failing the run.
#[derive(Debug, Clone)]
pub struct SimulatedWorkPolicy {
    fault_probability: f32,
}

impl SimulatedWorkPolicy {
    const MIN_DURATION_SECS: u64 = 5;
    const MAX_DURATION_SECS: u64 = 120;
    const TICKS_PER_RUN: u32 = 10;

    pub fn new() -> Self {
        Self {
            fault_probability: 0.05,
        }
    }

    pub fn with_fault_probability(fault_probability: f32) -> Self {
        Self { fault_probability }
    }
}

impl Default for SimulatedWorkPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkPolicy for SimulatedWorkPolicy {
    fn plan(&self) -> WorkPlan {
        let duration_secs = fastrand::u64(Self::MIN_DURATION_SECS..=Self::MAX_DURATION_SECS);
        let tick_interval = Duration::from_millis(duration_secs * 1000 / Self::TICKS_PER_RUN as u64);
        let progress_step = progress::COMPLETE / Self::TICKS_PER_RUN as i32;
        WorkPlan::new(tick_interval, progress_step)
    }

    async fn evaluate_tick(&self, _tick: u32) -> TickOutcome {
        if fastrand::f32() < self.fault_probability {
            TickOutcome::Fault("Random task error occurred".to_string())
        } else {
            TickOutcome::Advance
        }
    }
}

/// Deterministic policy for tests: fixed cadence, optional forced fault
#[derive(Debug, Clone)]
pub struct FixedWorkPolicy {
    tick_interval: Duration,
    progress_step: i32,
    fail_at: Option<u32>,
}

impl FixedWorkPolicy {
    pub fn new(tick_interval: Duration, progress_step: i32) -> Self {
        Self {
            tick_interval,
            progress_step,
            fail_at: None,
        }
    }

    /// Force a fault on the given tick number
    pub fn failing_at(mut self, tick: u32) -> Self {
        self.fail_at = Some(tick);
        self
    }
}

#[async_trait]
impl WorkPolicy for FixedWorkPolicy {
    fn plan(&self) -> WorkPlan {
        WorkPlan::new(self.tick_interval, self.progress_step)
    }

    async fn evaluate_tick(&self, tick: u32) -> TickOutcome {
        match self.fail_at {
            Some(fail_at) if tick == fail_at => {
                TickOutcome::Fault(format!("injected fault at tick {tick}"))
            }
            _ => TickOutcome::Advance,
        }
    }
}
