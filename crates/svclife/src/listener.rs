use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::Phase;

/// Observer notified around each lifecycle transition.
///
/// Every hook defaults to a no-op, so implementors override only what they
/// need. A returned error is handled per phase by the component:
/// - before start/stop: aborts the transition and surfaces to the caller
/// - after start/stop: surfaces to the caller, the transition stands
/// - before/after close: logged, never surfaced
pub trait LifecycleListener: Send + Sync {
    fn before_start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_stop(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_stop(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_close(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_close(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Phase {
    /// Invoke the hook for this phase on `listener`.
    pub fn notify(self, listener: &dyn LifecycleListener) -> anyhow::Result<()> {
        match self {
            Phase::BeforeStart => listener.before_start(),
            Phase::AfterStart => listener.after_start(),
            Phase::BeforeStop => listener.before_stop(),
            Phase::AfterStop => listener.after_stop(),
            Phase::BeforeClose => listener.before_close(),
            Phase::AfterClose => listener.after_close(),
        }
    }
}

/// Snapshot of the registered listeners, in registration order.
pub type ListenerSnapshot = Arc<Vec<Arc<dyn LifecycleListener>>>;

/// Copy-on-write, ordered set of listener references.
///
/// Dispatch iterates an immutable snapshot, so listeners may add or remove
/// listeners (including themselves) from inside a callback. Changes become
/// visible to the next snapshot, never to one already being iterated.
pub struct ListenerRegistry {
    listeners: ArcSwap<Vec<Arc<dyn LifecycleListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append a listener. The same listener may be registered more than once
    /// and is then notified once per registration.
    pub fn add(&self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&listener));
            next
        });
    }

    /// Remove the earliest registration of `listener` (compared by identity).
    ///
    /// Returns whether anything was removed.
    pub fn remove<L>(&self, listener: &Arc<L>) -> bool
    where
        L: LifecycleListener + ?Sized,
    {
        let target = Arc::as_ptr(listener) as *const ();
        let mut removed = false;
        self.listeners.rcu(|current| {
            let mut next = Vec::clone(current);
            removed = match next
                .iter()
                .position(|l| Arc::as_ptr(l) as *const () == target)
            {
                Some(index) => {
                    next.remove(index);
                    true
                }
                None => false,
            };
            next
        });
        removed
    }

    pub fn snapshot(&self) -> ListenerSnapshot {
        self.listeners.load_full()
    }

    pub fn len(&self) -> usize {
        self.listeners.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify every listener of the current snapshot, stopping at the first failure.
    pub(crate) fn notify(&self, phase: Phase) -> anyhow::Result<()> {
        for listener in self.snapshot().iter() {
            phase.notify(listener.as_ref())?;
        }
        Ok(())
    }

    /// Notify every listener of the current snapshot, collecting failures.
    pub(crate) fn notify_all(&self, phase: Phase) -> Vec<anyhow::Error> {
        self.snapshot()
            .iter()
            .filter_map(|listener| phase.notify(listener.as_ref()).err())
            .collect()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Named {
        name: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl LifecycleListener for Named {
        fn before_start(&self) -> anyhow::Result<()> {
            self.seen.lock().push(self.name.to_string());
            Ok(())
        }
    }

    fn named(name: &'static str, seen: &Arc<Mutex<Vec<String>>>) -> Arc<Named> {
        Arc::new(Named {
            name,
            seen: Arc::clone(seen),
        })
    }

    #[test]
    fn notifies_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.add(named("a", &seen));
        registry.add(named("b", &seen));
        registry.add(named("c", &seen));

        registry.notify(Phase::BeforeStart).unwrap();
        assert_eq!(*seen.lock(), ["a", "b", "c"]);
    }

    #[test]
    fn remove_matches_identity_and_first_registration_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        let a = named("a", &seen);
        let twin = named("a", &seen);

        registry.add(a.clone());
        registry.add(a.clone());
        assert!(!registry.remove(&twin));
        assert!(registry.remove(&a));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(&a));
        assert!(registry.is_empty());
        assert!(!registry.remove(&a));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        let a = named("a", &seen);
        registry.add(a.clone());

        let snapshot = registry.snapshot();
        registry.remove(&a);
        registry.add(named("b", &seen));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn default_listener_hooks_are_noops() {
        struct Quiet;
        impl LifecycleListener for Quiet {}

        let registry = ListenerRegistry::default();
        registry.add(Arc::new(Quiet));
        for phase in [
            Phase::BeforeStart,
            Phase::AfterStart,
            Phase::BeforeStop,
            Phase::AfterStop,
            Phase::BeforeClose,
            Phase::AfterClose,
        ] {
            assert!(registry.notify_all(phase).is_empty());
        }
    }
}
