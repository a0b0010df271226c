use crate::error::{CoreError, Result};

use super::{State, Transition};

/// Whether `via` is legal from `current`.
///
/// Legal edges:
/// - Initialized -> Started, Stopped -> Started
/// - Started -> Stopped
/// - any non-Closed state -> Closed
pub const fn can_transition(current: State, via: Transition) -> bool {
    use State::*;
    use Transition::*;

    match (current, via) {
        (Initialized, Start) | (Stopped, Start) => true,
        (Started, Stop) => true,
        (Closed, Close) => false,
        (_, Close) => true,
        _ => false,
    }
}

/// Strict form of [`can_transition`]: the goal state, or an InvalidTransition error.
pub fn goal_state(current: State, via: Transition) -> Result<State> {
    if can_transition(current, via) {
        Ok(via.target())
    } else {
        Err(CoreError::invalid_transition(current, via))
    }
}

/// Transitions that may be requested from a given state.
pub fn available_transitions(state: State) -> &'static [Transition] {
    use State::*;
    use Transition::*;

    match state {
        Initialized => &[Start, Close],
        Started => &[Stop, Close],
        Stopped => &[Start, Close],
        Closed => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Domain, ErrorKind, Payload};
    use crate::lifecycle::{ALL_STATES, ALL_TRANSITIONS};

    #[test]
    fn invalid_transition_has_payload() {
        let e = goal_state(State::Initialized, Transition::Stop).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidTransition);
        assert_eq!(e.domain, Domain::Lifecycle);

        assert_eq!(
            e.payload,
            Payload::Transition {
                from: State::Initialized,
                via: Transition::Stop
            }
        );
    }

    #[test]
    fn restart_from_stopped_is_legal() {
        assert_eq!(
            goal_state(State::Stopped, Transition::Start).unwrap(),
            State::Started
        );
    }

    #[test]
    fn closed_accepts_nothing() {
        for via in ALL_TRANSITIONS {
            assert!(!can_transition(State::Closed, via));
        }
        assert!(available_transitions(State::Closed).is_empty());
    }

    #[test]
    fn available_transitions_agree_with_can_transition() {
        for state in ALL_STATES {
            for via in ALL_TRANSITIONS {
                assert_eq!(
                    available_transitions(state).contains(&via),
                    can_transition(state, via),
                    "{state} via {via}"
                );
            }
        }
    }
}
