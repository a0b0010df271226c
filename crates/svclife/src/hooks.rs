use std::sync::Arc;

/// Work a concrete component performs during its transitions.
///
/// - `on_start`: enter-work, runs before the start commits; failure blocks it
/// - `on_stop`: exit-work, runs after the stop commits; failure surfaces
/// - `on_close`: teardown, runs after the close commits; failure is only logged
///
/// Each hook runs on the caller's thread with no lifecycle lock held, so it may
/// drive other components' lifecycles (e.g. close its children).
pub trait LifecycleHooks: Send + Sync {
    fn on_start(&self) -> anyhow::Result<()>;
    fn on_stop(&self) -> anyhow::Result<()>;
    fn on_close(&self) -> anyhow::Result<()>;
}

impl<H> LifecycleHooks for Arc<H>
where
    H: LifecycleHooks + ?Sized,
{
    fn on_start(&self) -> anyhow::Result<()> {
        (**self).on_start()
    }

    fn on_stop(&self) -> anyhow::Result<()> {
        (**self).on_stop()
    }

    fn on_close(&self) -> anyhow::Result<()> {
        (**self).on_close()
    }
}

type HookFn = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Closure-backed hooks. Unset hooks succeed without doing anything.
#[derive(Default)]
pub struct FnHooks {
    start: Option<HookFn>,
    stop: Option<HookFn>,
    close: Option<HookFn>,
}

impl FnHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.start = Some(Box::new(f));
        self
    }

    pub fn with_stop<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.stop = Some(Box::new(f));
        self
    }

    pub fn with_close<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.close = Some(Box::new(f));
        self
    }
}

fn run(hook: &Option<HookFn>) -> anyhow::Result<()> {
    hook.as_ref().map_or(Ok(()), |f| f())
}

impl LifecycleHooks for FnHooks {
    fn on_start(&self) -> anyhow::Result<()> {
        run(&self.start)
    }

    fn on_stop(&self) -> anyhow::Result<()> {
        run(&self.stop)
    }

    fn on_close(&self) -> anyhow::Result<()> {
        run(&self.close)
    }
}

impl std::fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHooks")
            .field("start", &self.start.is_some())
            .field("stop", &self.stop.is_some())
            .field("close", &self.close.is_some())
            .finish()
    }
}
