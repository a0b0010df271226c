//! svclife_core::lifecycle
//!
//! Four stable states and three requested transitions:
//!
//! ```text
//! Initialized --start--> Started --stop--> Stopped
//!                           ^                 |
//!                           +------start------+
//! Initialized | Started | Stopped --close--> Closed (terminal)
//! ```
//!
//! Key ideas:
//! - `can_move_to_*` queries never mutate
//! - `move_to_*` commits atomically; at most one racer wins
//! - `try_begin()` reserves a transition so the caller can run side effects
//!   before committing, without holding the lock
//! - a legal request that collides with a start/stop in flight is deferred
//!   and handed to that transition's owner

mod engine;
mod graph;
mod machine;
mod state;
mod transition;

pub use engine::{available_transitions, can_transition, goal_state};
pub use graph::{transition_graph, TransitionEdge, TransitionGraph};
pub use machine::{Handoff, Lifecycle, LifecycleView, PendingTransition};
pub use state::{State, ALL_STATES};
pub use transition::{Outcome, Transition, ALL_TRANSITIONS};
