use std::fmt;

use svclife_core::error::{CoreError, Severity};
use svclife_core::lifecycle::Transition;
use thiserror::Error;

/// The six listener notification points.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    BeforeStart,
    AfterStart,
    BeforeStop,
    AfterStop,
    BeforeClose,
    AfterClose,
}

impl Phase {
    pub const fn label(self) -> &'static str {
        match self {
            Phase::BeforeStart => "before_start",
            Phase::AfterStart => "after_start",
            Phase::BeforeStop => "before_stop",
            Phase::AfterStop => "after_stop",
            Phase::BeforeClose => "before_close",
            Phase::AfterClose => "after_close",
        }
    }

    /// The transition this phase brackets.
    pub const fn transition(self) -> Transition {
        match self {
            Phase::BeforeStart | Phase::AfterStart => Transition::Start,
            Phase::BeforeStop | Phase::AfterStop => Transition::Stop,
            Phase::BeforeClose | Phase::AfterClose => Transition::Close,
        }
    }

    pub const fn is_before(self) -> bool {
        matches!(
            self,
            Phase::BeforeStart | Phase::BeforeStop | Phase::BeforeClose
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failures surfaced by lifecycle operations.
///
/// Invalid transitions never show up here; they are reported as
/// `Outcome::Rejected`.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A listener callback failed. In a before-phase of start/stop the
    /// transition did not happen; in an after-phase it already committed.
    #[error("component `{component}`: listener failed during {phase}")]
    Listener {
        component: String,
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    /// The start (enter-work), stop (exit-work) or close (teardown) hook failed.
    #[error("component `{component}`: {transition} hook failed")]
    Hook {
        component: String,
        transition: Transition,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl LifecycleError {
    pub fn severity(&self) -> Severity {
        match self {
            LifecycleError::Listener { .. } => Severity::Warn,
            LifecycleError::Hook { .. } => Severity::Error,
            LifecycleError::Core(e) => e.severity,
        }
    }

    /// Name of the component that produced the error, if any.
    pub fn component(&self) -> Option<&str> {
        match self {
            LifecycleError::Listener { component, .. } | LifecycleError::Hook { component, .. } => {
                Some(component)
            }
            LifecycleError::Core(_) => None,
        }
    }
}
