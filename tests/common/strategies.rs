//! Proptest strategies for driving the execution state machine.

use proptest::prelude::*;
use taskhelm::state_machine::ExecutionEvent;

/// Any single event the worker's select loop could feed the machine
///
/// Weighted toward ticks so generated sequences actually make progress
/// instead of being wall-to-wall command noise.
pub fn execution_event_strategy() -> impl Strategy<Value = ExecutionEvent> {
    prop_oneof![
        4 => (1..=50i32).prop_map(|step| ExecutionEvent::Tick { step }),
        1 => Just(ExecutionEvent::Pause),
        1 => Just(ExecutionEvent::Resume),
        1 => Just(ExecutionEvent::Cancel),
        1 => Just(ExecutionEvent::Restart),
        1 => "[a-z ]{1,30}".prop_map(|message| ExecutionEvent::fault(message)),
    ]
}

/// A burst of events in arbitrary order
pub fn event_sequence_strategy() -> impl Strategy<Value = Vec<ExecutionEvent>> {
    prop::collection::vec(execution_event_strategy(), 0..32)
}
