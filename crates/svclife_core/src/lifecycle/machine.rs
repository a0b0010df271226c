use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

use super::{can_transition, Outcome, State, Transition};

/// Transitions that have been granted to a caller but not yet released.
///
/// Start and stop share one slot so their side effects never overlap. While a
/// close holds its slot no start/stop is granted, which keeps the state stable
/// until the close commits.
#[derive(Debug, Default)]
struct Reservations {
    in_flight: Option<Transition>,
    closing: bool,
    handoff: Handoff,
}

/// Requests that were legal but arrived while a start/stop was in flight.
///
/// Returned by [`PendingTransition::finish`]; the finishing caller runs them,
/// `transition` first and `close` last.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Handoff {
    /// Latest start/stop request.
    pub transition: Option<Transition>,
    pub close: bool,
}

impl Handoff {
    pub fn is_empty(&self) -> bool {
        self.transition.is_none() && !self.close
    }
}

/// Thread-safe owner of a single component's lifecycle state.
///
/// Reads are lock-free. Every check-then-commit runs under one short lock that
/// is never held while caller code executes.
pub struct Lifecycle {
    state: AtomicU8,
    reservations: Mutex<Reservations>,
}

impl Lifecycle {
    /// A new lifecycle, always `Initialized`.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(State::Initialized.id()),
            reservations: Mutex::new(Reservations::default()),
        }
    }

    /// Query-only handle, safe to give to code that must not commit.
    pub fn view(&self) -> LifecycleView<'_> {
        LifecycleView { lifecycle: self }
    }

    /// Most recently committed state.
    pub fn current_state(&self) -> State {
        // Only ids written by `commit_locked` are ever stored.
        State::from_id(self.state.load(Ordering::Acquire)).unwrap_or(State::Closed)
    }

    pub fn initialized(&self) -> bool {
        self.current_state() == State::Initialized
    }

    pub fn started(&self) -> bool {
        self.current_state() == State::Started
    }

    pub fn stopped(&self) -> bool {
        self.current_state() == State::Stopped
    }

    pub fn closed(&self) -> bool {
        self.current_state() == State::Closed
    }

    pub fn stopped_or_closed(&self) -> bool {
        matches!(self.current_state(), State::Stopped | State::Closed)
    }

    // ---------------- Queries ----------------

    pub fn can_move_to_started(&self) -> bool {
        can_transition(self.current_state(), Transition::Start)
    }

    pub fn can_move_to_stopped(&self) -> bool {
        can_transition(self.current_state(), Transition::Stop)
    }

    pub fn can_move_to_closed(&self) -> bool {
        can_transition(self.current_state(), Transition::Close)
    }

    // ---------------- Commits ----------------
    //
    // These bypass reservations. Callers that run side effects around a
    // transition go through `try_begin` instead.

    pub fn move_to_started(&self) -> Outcome {
        self.commit(Transition::Start)
    }

    pub fn move_to_stopped(&self) -> Outcome {
        self.commit(Transition::Stop)
    }

    pub fn move_to_closed(&self) -> Outcome {
        self.commit(Transition::Close)
    }

    // ---------------- Reservations ----------------

    /// Reserve `via` so side effects can run before (or around) the commit.
    ///
    /// Refusals:
    /// - illegal from the current state: `Rejected`
    /// - start/stop or close while a close holds a reservation: `Rejected`
    /// - anything legal while a start/stop is in flight: `Deferred`; the holder
    ///   of that reservation gets it back from [`PendingTransition::finish`]
    pub fn try_begin(&self, via: Transition) -> Result<PendingTransition<'_>, Outcome> {
        let mut reservations = self.reservations.lock();
        let current = self.current_state();
        let rejected = Outcome::Rejected {
            current,
            requested: via,
        };
        if !can_transition(current, via) {
            return Err(rejected);
        }

        if reservations.closing {
            return Err(rejected);
        }
        if reservations.in_flight.is_some() {
            match via {
                Transition::Close => reservations.handoff.close = true,
                Transition::Start | Transition::Stop => {
                    reservations.handoff.transition = Some(via);
                }
            }
            return Err(Outcome::Deferred {
                current,
                requested: via,
            });
        }

        match via {
            Transition::Close => reservations.closing = true,
            Transition::Start | Transition::Stop => reservations.in_flight = Some(via),
        }

        Ok(PendingTransition {
            lifecycle: self,
            via,
            from: current,
            released: false,
        })
    }

    fn commit(&self, via: Transition) -> Outcome {
        let _reservations = self.reservations.lock();
        self.commit_locked(via)
    }

    fn commit_locked(&self, via: Transition) -> Outcome {
        let current = self.current_state();
        if !can_transition(current, via) {
            return Outcome::Rejected {
                current,
                requested: via,
            };
        }

        let to = via.target();
        self.state.store(to.id(), Ordering::Release);
        Outcome::Committed { from: current, to }
    }

    /// Returns what was deferred onto this reservation.
    fn release(&self, via: Transition) -> Handoff {
        let mut reservations = self.reservations.lock();
        match via {
            Transition::Close => {
                reservations.closing = false;
                Handoff::default()
            }
            Transition::Start | Transition::Stop => {
                reservations.in_flight = None;
                std::mem::take(&mut reservations.handoff)
            }
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("state", &self.current_state())
            .finish()
    }
}

/// Read-only access to a [`Lifecycle`]: state and `can_move_to_*` queries.
#[derive(Debug, Copy, Clone)]
pub struct LifecycleView<'a> {
    lifecycle: &'a Lifecycle,
}

impl LifecycleView<'_> {
    pub fn current_state(&self) -> State {
        self.lifecycle.current_state()
    }

    pub fn initialized(&self) -> bool {
        self.lifecycle.initialized()
    }

    pub fn started(&self) -> bool {
        self.lifecycle.started()
    }

    pub fn stopped(&self) -> bool {
        self.lifecycle.stopped()
    }

    pub fn closed(&self) -> bool {
        self.lifecycle.closed()
    }

    pub fn stopped_or_closed(&self) -> bool {
        self.lifecycle.stopped_or_closed()
    }

    pub fn can_move_to_started(&self) -> bool {
        self.lifecycle.can_move_to_started()
    }

    pub fn can_move_to_stopped(&self) -> bool {
        self.lifecycle.can_move_to_stopped()
    }

    pub fn can_move_to_closed(&self) -> bool {
        self.lifecycle.can_move_to_closed()
    }
}

/// A granted, not yet released, transition.
///
/// Holding it does not hold any lock. `commit()` applies the state change;
/// `finish()` (or drop) releases the reservation whether or not it committed.
#[must_use = "dropping the reservation releases it immediately"]
#[derive(Debug)]
pub struct PendingTransition<'a> {
    lifecycle: &'a Lifecycle,
    via: Transition,
    from: State,
    released: bool,
}

impl PendingTransition<'_> {
    pub fn transition(&self) -> Transition {
        self.via
    }

    /// State observed when the reservation was granted.
    pub fn from_state(&self) -> State {
        self.from
    }

    /// Commit the reserved transition. The reservation stays held until released.
    pub fn commit(&mut self) -> Outcome {
        self.lifecycle.commit(self.via)
    }

    /// Release the reservation.
    ///
    /// Returns the requests deferred while this start/stop was in flight; the
    /// caller is then responsible for running them.
    pub fn finish(mut self) -> Handoff {
        self.released = true;
        self.lifecycle.release(self.via)
    }
}

impl Drop for PendingTransition<'_> {
    fn drop(&mut self) {
        if !self.released {
            // Requests deferred onto an abandoned reservation are dropped with it.
            let _ = self.lifecycle.release(self.via);
        }
    }
}
