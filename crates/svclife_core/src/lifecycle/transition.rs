use std::fmt;

use super::State;

/// Requested lifecycle transitions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Transition {
    Start,
    Stop,
    Close,
}

impl Transition {
    /// State reached when this transition commits.
    pub const fn target(self) -> State {
        match self {
            Transition::Start => State::Started,
            Transition::Stop => State::Stopped,
            Transition::Close => State::Closed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::Stop => "stop",
            Transition::Close => "close",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const ALL_TRANSITIONS: [Transition; 3] =
    [Transition::Start, Transition::Stop, Transition::Close];

/// Result of asking for a transition.
///
/// Neither `Rejected` nor `Deferred` is a failure. A rejected transition is
/// not legal from `current` (or a close is already under way) and nothing
/// happened. A deferred transition was legal but collided with a start/stop
/// in flight; whoever owns that start/stop runs it once it is done.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Committed { from: State, to: State },
    Rejected { current: State, requested: Transition },
    Deferred { current: State, requested: Transition },
}

impl Outcome {
    pub const fn is_committed(self) -> bool {
        matches!(self, Outcome::Committed { .. })
    }

    pub const fn is_rejected(self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }

    pub const fn is_deferred(self) -> bool {
        matches!(self, Outcome::Deferred { .. })
    }
}
