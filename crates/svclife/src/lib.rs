//! svclife
//!
//! Lifecycle component built on `svclife_core`: wraps the state machine with a
//! listener registry and the concrete component's start/stop/close hooks.
//!
//! ```no_run
//! use svclife::LifecycleComponent;
//!
//! let server = LifecycleComponent::builder("http")
//!     .on_start(|| Ok(()))
//!     .on_stop(|| Ok(()))
//!     .on_close(|| Ok(()))
//!     .build()?;
//!
//! server.start()?;
//! server.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod logging;

mod component;
mod hooks;
mod listener;

pub use component::{ComponentBuilder, LifecycleComponent};
pub use error::{LifecycleError, Phase};
pub use hooks::{FnHooks, LifecycleHooks};
pub use listener::{LifecycleListener, ListenerRegistry, ListenerSnapshot};

// Re-export core types that component users will commonly need
pub use svclife_core::error::CoreError;
pub use svclife_core::lifecycle::{Lifecycle, LifecycleView, Outcome, State, Transition};
