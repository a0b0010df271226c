use std::error::Error as _;

use svclife_core::error::{CoreError, Severity};

use crate::error::LifecycleError;

pub fn log_core_error(err: &CoreError) {
    match err.severity {
        Severity::Trace => tracing::trace!("{err}"),
        Severity::Debug => tracing::debug!("{err}"),
        Severity::Info => tracing::info!("{err}"),
        Severity::Warn => tracing::warn!("{err}"),
        Severity::Error | Severity::Fatal => tracing::error!("{err}"),
    }
}

/// Log a lifecycle error together with its cause at the error's own severity.
pub fn log_lifecycle_error(err: &LifecycleError) {
    let LifecycleError::Core(core) = err else {
        let cause = err
            .source()
            .map(|source| source.to_string())
            .unwrap_or_default();
        match err.severity() {
            Severity::Trace => tracing::trace!(%cause, "{err}"),
            Severity::Debug => tracing::debug!(%cause, "{err}"),
            Severity::Info => tracing::info!(%cause, "{err}"),
            Severity::Warn => tracing::warn!(%cause, "{err}"),
            Severity::Error | Severity::Fatal => tracing::error!(%cause, "{err}"),
        }
        return;
    };
    log_core_error(core);
}
