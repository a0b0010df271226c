use crate::error::Result;

use super::{available_transitions, goal_state, State, Transition, ALL_STATES};

/// One legal `start --transition--> goal` step.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransitionEdge {
    pub start: State,
    pub transition: Transition,
    pub goal: State,
}

/// Every state and every legal edge between them, for introspection and docs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionGraph {
    pub states: Vec<State>,
    pub transitions: Vec<TransitionEdge>,
}

impl TransitionGraph {
    /// Edges leaving `state`, in table order.
    pub fn edges_from(&self, state: State) -> impl Iterator<Item = &TransitionEdge> + '_ {
        self.transitions.iter().filter(move |edge| edge.start == state)
    }

    /// Whether `to` can be reached from `from` in zero or more steps.
    pub fn is_reachable(&self, from: State, to: State) -> bool {
        let mut seen = vec![from];
        let mut frontier = vec![from];
        while let Some(state) = frontier.pop() {
            if state == to {
                return true;
            }
            for edge in self.edges_from(state) {
                if !seen.contains(&edge.goal) {
                    seen.push(edge.goal);
                    frontier.push(edge.goal);
                }
            }
        }
        false
    }
}

/// Walk the transition table and collect its edges.
pub fn transition_graph() -> Result<TransitionGraph> {
    let transitions = ALL_STATES
        .iter()
        .flat_map(|&start| {
            available_transitions(start)
                .iter()
                .map(move |&transition| (start, transition))
        })
        .map(|(start, transition)| {
            Ok(TransitionEdge {
                start,
                transition,
                goal: goal_state(start, transition)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TransitionGraph {
        states: ALL_STATES.to_vec(),
        transitions,
    })
}
