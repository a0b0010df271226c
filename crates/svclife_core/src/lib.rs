//! svclife_core: the lifecycle state machine, free of listeners and hooks.
//!
//! Design goals:
//! - Pure, testable transition table.
//! - One small lock, held only for a check-then-commit.
//! - Invalid transitions are reported as `Outcome::Rejected`, not as errors.

pub mod error;

/// Lifecycle states, the transition table and the thread-safe `Lifecycle`.
pub mod lifecycle;
