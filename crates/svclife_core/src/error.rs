use std::borrow::Cow;
use thiserror::Error;

use crate::lifecycle::{State, Transition};

/// Convenient result alias for svclife_core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// How loudly an error should be reported. The component crate maps each
/// level onto a `tracing` level.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Which part of the library raised the error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Domain {
    /// The state machine itself.
    Lifecycle,
    /// Construction-time settings of a component.
    Config,
    Other,
}

/// Stable error "kind" for matching/branching.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidTransition,
    Other,
}

/// Structured context carried next to the message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Payload {
    None,

    /// The offending value of a named argument.
    Argument {
        name: &'static str,
        value: Cow<'static, str>,
    },

    /// A transition that is not legal from `from`.
    Transition { from: State, via: Transition },
}

/// The error type shared by the state machine and component construction.
///
/// Invalid lifecycle requests made through the normal API are not errors
/// (they come back as `Outcome::Rejected`); only the strict table query
/// [`goal_state`](crate::lifecycle::goal_state) turns them into one.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("[{severity:?}] {message}")]
pub struct CoreError {
    pub domain: Domain,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: Cow<'static, str>,
    pub payload: Payload,
}

impl CoreError {
    #[inline]
    pub fn warn() -> ErrB {
        ErrB::new(Severity::Warn)
    }

    #[inline]
    pub fn error() -> ErrB {
        ErrB::new(Severity::Error)
    }

    /// `via` requested from `from`, where the table has no such edge.
    pub fn invalid_transition(from: State, via: Transition) -> Self {
        CoreError::warn()
            .domain(Domain::Lifecycle)
            .kind(ErrorKind::InvalidTransition)
            .msg(format!("cannot {via} a component that is {from}"))
            .payload(Payload::Transition { from, via })
            .build()
    }

    /// A construction argument failed validation.
    pub fn invalid_argument(
        name: &'static str,
        value: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        CoreError::error()
            .domain(Domain::Config)
            .kind(ErrorKind::InvalidArgument)
            .msg(message)
            .payload(Payload::Argument {
                name,
                value: value.into(),
            })
            .build()
    }
}

/// Fluent builder. Unset fields default to `Other`, an empty message and no
/// payload.
#[derive(Debug, Clone)]
pub struct ErrB {
    domain: Domain,
    kind: ErrorKind,
    severity: Severity,
    message: Cow<'static, str>,
    payload: Payload,
}

impl ErrB {
    #[inline]
    fn new(severity: Severity) -> Self {
        Self {
            domain: Domain::Other,
            kind: ErrorKind::Other,
            severity,
            message: Cow::Borrowed(""),
            payload: Payload::None,
        }
    }

    #[inline]
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    #[inline]
    pub fn kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn msg(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Replaces any earlier payload.
    #[inline]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> CoreError {
        let ErrB {
            domain,
            kind,
            severity,
            message,
            payload,
        } = self;
        CoreError {
            domain,
            kind,
            severity,
            message,
            payload,
        }
    }
}

impl From<ErrB> for CoreError {
    fn from(builder: ErrB) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_other() {
        let e = CoreError::error().msg("boom").build();
        assert_eq!(e.domain, Domain::Other);
        assert_eq!(e.kind, ErrorKind::Other);
        assert_eq!(e.payload, Payload::None);
        assert_eq!(e.to_string(), "[Error] boom");
    }

    #[test]
    fn invalid_transition_names_both_ends() {
        let e = CoreError::invalid_transition(State::Closed, Transition::Start);
        assert_eq!(e.severity, Severity::Warn);
        assert_eq!(e.to_string(), "[Warn] cannot start a component that is CLOSED");
        assert_eq!(
            e.payload,
            Payload::Transition {
                from: State::Closed,
                via: Transition::Start
            }
        );
    }

    #[test]
    fn invalid_argument_keeps_offending_value() {
        let e = CoreError::invalid_argument("name", "", "component name must not be empty");
        assert_eq!(e.domain, Domain::Config);
        assert_eq!(e.kind, ErrorKind::InvalidArgument);
        assert_eq!(
            e.payload,
            Payload::Argument {
                name: "name",
                value: Cow::Borrowed("")
            }
        );
    }
}
