#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use svclife::{LifecycleComponent, LifecycleHooks, LifecycleListener};

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().clone()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hooks that record each call and can be told to fail or linger.
#[derive(Default)]
pub struct RecordingHooks {
    pub log: EventLog,
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub fail_close: AtomicBool,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub closes: AtomicUsize,
    pub linger: Mutex<Option<Duration>>,
}

impl RecordingHooks {
    pub fn new(log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::clone(log),
            ..Self::default()
        })
    }

    fn pause(&self) {
        let linger = *self.linger.lock();
        if let Some(linger) = linger {
            std::thread::sleep(linger);
        }
    }
}

impl LifecycleHooks for RecordingHooks {
    fn on_start(&self) -> anyhow::Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push("enter".into());
        self.pause();
        if self.fail_start.load(Ordering::SeqCst) {
            anyhow::bail!("enter-work failed");
        }
        Ok(())
    }

    fn on_stop(&self) -> anyhow::Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push("exit".into());
        self.pause();
        if self.fail_stop.load(Ordering::SeqCst) {
            anyhow::bail!("exit-work failed");
        }
        Ok(())
    }

    fn on_close(&self) -> anyhow::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push("teardown".into());
        if self.fail_close.load(Ordering::SeqCst) {
            anyhow::bail!("teardown failed");
        }
        Ok(())
    }
}

/// Listener that records `<name>:<phase>`, or `<name>:<phase>@<state>` once
/// attached to a component via `watch`.
pub struct Recorder {
    name: &'static str,
    log: EventLog,
    component: OnceLock<Weak<LifecycleComponent>>,
}

impl Recorder {
    pub fn new(name: &'static str, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            component: OnceLock::new(),
        })
    }

    pub fn watch(&self, component: &Arc<LifecycleComponent>) {
        let _ = self.component.set(Arc::downgrade(component));
    }

    fn record(&self, phase: &str) -> anyhow::Result<()> {
        let state = self
            .component
            .get()
            .and_then(Weak::upgrade)
            .map(|c| format!("@{}", c.state()))
            .unwrap_or_default();
        self.log.lock().push(format!("{}:{phase}{state}", self.name));
        Ok(())
    }
}

impl LifecycleListener for Recorder {
    fn before_start(&self) -> anyhow::Result<()> {
        self.record("before_start")
    }
    fn after_start(&self) -> anyhow::Result<()> {
        self.record("after_start")
    }
    fn before_stop(&self) -> anyhow::Result<()> {
        self.record("before_stop")
    }
    fn after_stop(&self) -> anyhow::Result<()> {
        self.record("after_stop")
    }
    fn before_close(&self) -> anyhow::Result<()> {
        self.record("before_close")
    }
    fn after_close(&self) -> anyhow::Result<()> {
        self.record("after_close")
    }
}

/// Listener that fails in the phases it was built for.
pub struct Failing {
    pub before_start: bool,
    pub after_start: bool,
    pub before_stop: bool,
    pub after_stop: bool,
    pub before_close: bool,
    pub after_close: bool,
}

impl Failing {
    pub fn none() -> Self {
        Self {
            before_start: false,
            after_start: false,
            before_stop: false,
            after_stop: false,
            before_close: false,
            after_close: false,
        }
    }
}

impl LifecycleListener for Failing {
    fn before_start(&self) -> anyhow::Result<()> {
        if self.before_start {
            anyhow::bail!("vetoed");
        }
        Ok(())
    }
    fn after_start(&self) -> anyhow::Result<()> {
        if self.after_start {
            anyhow::bail!("after_start blew up");
        }
        Ok(())
    }
    fn before_stop(&self) -> anyhow::Result<()> {
        if self.before_stop {
            anyhow::bail!("stop vetoed");
        }
        Ok(())
    }
    fn after_stop(&self) -> anyhow::Result<()> {
        if self.after_stop {
            anyhow::bail!("after_stop blew up");
        }
        Ok(())
    }
    fn before_close(&self) -> anyhow::Result<()> {
        if self.before_close {
            anyhow::bail!("before_close blew up");
        }
        Ok(())
    }
    fn after_close(&self) -> anyhow::Result<()> {
        if self.after_close {
            anyhow::bail!("after_close blew up");
        }
        Ok(())
    }
}

pub fn component(name: &str, hooks: &Arc<RecordingHooks>) -> Arc<LifecycleComponent> {
    Arc::new(LifecycleComponent::new(name, Arc::clone(hooks)).expect("valid component"))
}
