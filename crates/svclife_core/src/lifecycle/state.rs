use std::fmt;

/// Lifecycle states of a managed component.
///
/// - `Initialized`: constructed, never started
/// - `Started`: enter-work succeeded and the start was committed
/// - `Stopped`: stop was committed; may be restarted
/// - `Closed`: terminal
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum State {
    Initialized,
    Started,
    Stopped,
    Closed,
}

/// Compact IDs used for error payloads and the atomic state cell.
impl State {
    pub const fn id(self) -> u8 {
        match self {
            State::Initialized => 0,
            State::Started => 1,
            State::Stopped => 2,
            State::Closed => 3,
        }
    }

    /// Inverse of [`State::id`].
    pub const fn from_id(id: u8) -> Option<State> {
        match id {
            0 => Some(State::Initialized),
            1 => Some(State::Started),
            2 => Some(State::Stopped),
            3 => Some(State::Closed),
            _ => None,
        }
    }

    /// True once no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, State::Closed)
    }

    /// Stable, human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            State::Initialized => "INITIALIZED",
            State::Started => "STARTED",
            State::Stopped => "STOPPED",
            State::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical list of all lifecycle states.
pub const ALL_STATES: [State; 4] = [
    State::Initialized,
    State::Started,
    State::Stopped,
    State::Closed,
];
