use std::sync::Arc;

use svclife_core::error::CoreError;
use svclife_core::lifecycle::{Handoff, Lifecycle, LifecycleView, Outcome, State, Transition};

use crate::error::{LifecycleError, Phase};
use crate::hooks::{FnHooks, LifecycleHooks};
use crate::listener::{LifecycleListener, ListenerRegistry};
use crate::logging::log_lifecycle_error;

/// A long-lived service object driven through start/stop/close.
///
/// Responsibilities:
/// - Own the component's `Lifecycle` and listener registry
/// - Run the concrete component's hooks at the right point of each transition
/// - Fan out before/after notifications in registration order
///
/// All operations are synchronous, run on the caller's thread, and may be
/// called concurrently from any number of threads. Share it behind an `Arc`.
pub struct LifecycleComponent {
    name: String,
    lifecycle: Lifecycle,
    listeners: ListenerRegistry,
    hooks: Box<dyn LifecycleHooks>,
}

/// Public API (library user facing).
impl LifecycleComponent {
    /// Create a component in `Initialized`.
    pub fn new(
        name: impl Into<String>,
        hooks: impl LifecycleHooks + 'static,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::invalid_argument(
                "name",
                name,
                "component name must not be empty",
            ));
        }

        Ok(Self {
            name,
            lifecycle: Lifecycle::new(),
            listeners: ListenerRegistry::new(),
            hooks: Box::new(hooks),
        })
    }

    /// Build a component from closures instead of a `LifecycleHooks` impl.
    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder {
            name: name.into(),
            hooks: FnHooks::new(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.lifecycle.current_state()
    }

    /// State queries (`can_move_to_*`, predicates). Commits only happen
    /// through `start`, `stop` and `close`.
    pub fn lifecycle(&self) -> LifecycleView<'_> {
        self.lifecycle.view()
    }

    pub fn add_listener(&self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.add(listener);
    }

    /// Remove the earliest registration of `listener`. Returns whether one was found.
    pub fn remove_listener<L>(&self, listener: &Arc<L>) -> bool
    where
        L: LifecycleListener + ?Sized,
    {
        self.listeners.remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Start the component.
    ///
    /// Sequence: `before_start` -> `on_start` -> commit `Started` -> `after_start`.
    ///
    /// Returns `Outcome::Rejected` without side effects when the component
    /// cannot start (already started, closed or closing). If a start/stop is
    /// in flight the request returns `Outcome::Deferred` and is run by that
    /// transition's owner once it finishes; its result is then only logged.
    /// A failing `before_start` listener or `on_start` hook leaves the state
    /// unchanged, so the call may simply be retried.
    pub fn start(&self) -> Result<Outcome, LifecycleError> {
        let (result, handoff) = self.run_start();
        self.run_handoff(handoff);
        result
    }

    /// Stop the component.
    ///
    /// Sequence: `before_stop` -> commit `Stopped` -> `on_stop` -> `after_stop`.
    ///
    /// The state is `Stopped` while `on_stop` runs; `after_stop` is the
    /// completion signal. If `on_stop` fails the error surfaces, the state
    /// stays `Stopped` and `after_stop` is not sent. Rejection and deferral
    /// follow `start`.
    pub fn stop(&self) -> Result<Outcome, LifecycleError> {
        let (result, handoff) = self.run_stop();
        self.run_handoff(handoff);
        result
    }

    /// Close the component. Never fails.
    ///
    /// A started component is stopped first. Then: `before_close` -> commit
    /// `Closed` -> `on_close` -> `after_close`. Failures anywhere on this path
    /// are logged and do not stop the sequence. Closing twice is a no-op.
    ///
    /// If a start or stop is in flight on another thread (or further up this
    /// thread's stack) the close is handed to it and runs as soon as it
    /// finishes; this call then returns `Outcome::Deferred` and the state is
    /// not yet `Closed`. Callers that need `Closed` must wait for the
    /// in-flight transition to complete, e.g. by watching `after_close`.
    pub fn close(&self) -> Outcome {
        let mut pending = match self.lifecycle.try_begin(Transition::Close) {
            Ok(pending) => pending,
            Err(outcome) => return self.not_applied(outcome),
        };

        // No start/stop can be granted while we hold the close reservation.
        if self.lifecycle.started() {
            let stopped = self
                .exit()
                .and_then(|outcome| self.notify_after(Phase::AfterStop, outcome));
            if let Err(err) = stopped {
                log_lifecycle_error(&err);
            }
        }

        self.notify_logged(Phase::BeforeClose);

        let outcome = pending.commit();
        if !outcome.is_committed() {
            return self.not_applied(outcome);
        }
        self.log_commit(outcome);

        if let Err(source) = self.hooks.on_close() {
            log_lifecycle_error(&self.hook_error(Transition::Close, source));
        }
        drop(pending);

        self.notify_logged(Phase::AfterClose);
        outcome
    }
}

/// Internal plumbing.
impl LifecycleComponent {
    fn run_start(&self) -> (Result<Outcome, LifecycleError>, Handoff) {
        let mut pending = match self.lifecycle.try_begin(Transition::Start) {
            Ok(pending) => pending,
            Err(outcome) => return (Ok(self.not_applied(outcome)), Handoff::default()),
        };

        let entered = self.enter(|| pending.commit());
        let handoff = pending.finish();

        let result = entered.and_then(|outcome| self.notify_after(Phase::AfterStart, outcome));
        (result, handoff)
    }

    fn run_stop(&self) -> (Result<Outcome, LifecycleError>, Handoff) {
        let pending = match self.lifecycle.try_begin(Transition::Stop) {
            Ok(pending) => pending,
            Err(outcome) => return (Ok(self.not_applied(outcome)), Handoff::default()),
        };

        let exited = self.exit();
        let handoff = pending.finish();

        let result = exited.and_then(|outcome| self.notify_after(Phase::AfterStop, outcome));
        (result, handoff)
    }

    /// Run requests deferred onto a finished start/stop. Loops instead of
    /// recursing: each run may hand back more work.
    fn run_handoff(&self, mut handoff: Handoff) {
        while let Some(via) = handoff.transition.take() {
            tracing::debug!(component = %self.name, %via, "running deferred transition");
            let (result, next) = match via {
                Transition::Start => self.run_start(),
                Transition::Stop => self.run_stop(),
                Transition::Close => (Ok(self.close()), Handoff::default()),
            };
            if let Err(err) = result {
                log_lifecycle_error(&err);
            }
            handoff.transition = next.transition;
            handoff.close |= next.close;
        }

        if handoff.close {
            tracing::debug!(component = %self.name, "running deferred close");
            self.close();
        }
    }

    /// `before_start` -> `on_start` -> commit.
    fn enter(&self, commit: impl FnOnce() -> Outcome) -> Result<Outcome, LifecycleError> {
        self.notify(Phase::BeforeStart)?;
        self.hooks
            .on_start()
            .map_err(|source| self.hook_error(Transition::Start, source))?;

        let outcome = commit();
        self.log_commit(outcome);
        Ok(outcome)
    }

    /// `before_stop` -> commit -> `on_stop`. Callers hold a stop or close reservation.
    fn exit(&self) -> Result<Outcome, LifecycleError> {
        self.notify(Phase::BeforeStop)?;

        let outcome = self.lifecycle.move_to_stopped();
        if !outcome.is_committed() {
            return Ok(self.not_applied(outcome));
        }
        self.log_commit(outcome);

        self.hooks
            .on_stop()
            .map_err(|source| self.hook_error(Transition::Stop, source))?;
        Ok(outcome)
    }

    fn notify(&self, phase: Phase) -> Result<(), LifecycleError> {
        self.listeners
            .notify(phase)
            .map_err(|source| self.listener_error(phase, source))
    }

    /// After-phase fan-out, only for transitions that actually committed.
    fn notify_after(&self, phase: Phase, outcome: Outcome) -> Result<Outcome, LifecycleError> {
        if outcome.is_committed() {
            self.notify(phase)?;
        }
        Ok(outcome)
    }

    fn notify_logged(&self, phase: Phase) {
        for source in self.listeners.notify_all(phase) {
            log_lifecycle_error(&self.listener_error(phase, source));
        }
    }

    fn not_applied(&self, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::Rejected { current, requested } => {
                tracing::trace!(component = %self.name, %current, %requested, "transition not applicable");
            }
            Outcome::Deferred { current, requested } => {
                tracing::debug!(component = %self.name, %current, %requested, "transition deferred until in-flight transition completes");
            }
            Outcome::Committed { .. } => {}
        }
        outcome
    }

    fn log_commit(&self, outcome: Outcome) {
        if let Outcome::Committed { from, to } = outcome {
            tracing::debug!(component = %self.name, %from, %to, "lifecycle transition committed");
        }
    }

    fn hook_error(&self, transition: Transition, source: anyhow::Error) -> LifecycleError {
        LifecycleError::Hook {
            component: self.name.clone(),
            transition,
            source,
        }
    }

    fn listener_error(&self, phase: Phase, source: anyhow::Error) -> LifecycleError {
        LifecycleError::Listener {
            component: self.name.clone(),
            phase,
            source,
        }
    }
}

impl std::fmt::Debug for LifecycleComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleComponent")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Construction-time configuration for a closure-backed component.
pub struct ComponentBuilder {
    name: String,
    hooks: FnHooks,
    listeners: Vec<Arc<dyn LifecycleListener>>,
}

impl ComponentBuilder {
    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_start(f);
        self
    }

    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_stop(f);
        self
    }

    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_close(f);
        self
    }

    /// Register a listener up front (same as `add_listener` after build).
    pub fn listener(mut self, listener: Arc<dyn LifecycleListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn build(self) -> Result<LifecycleComponent, CoreError> {
        let component = LifecycleComponent::new(self.name, self.hooks)?;
        for listener in self.listeners {
            component.add_listener(listener);
        }
        Ok(component)
    }
}
