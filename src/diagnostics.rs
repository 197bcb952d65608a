//! Bootstrap for the diagnostic wrapper
//!
//! The wrapper builds the same router as the mock server, but from a catalog
//! file on disk. Its fault policy comes from configuration; under
//! `FaultPolicy::Expose` panics surface their message and backtrace in the
//! 500 response, and under either policy they are logged with their trace.

use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, Once};

use axum::Router;
use thiserror::Error;

use crate::api::fault::panic_message;
use crate::api::{create_router, AppState};
use crate::catalog::Catalog;
use crate::config::DiagnosticSection;
use crate::error::Error as CatalogError;

thread_local! {
    static PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Install a process-wide panic hook that logs every panic and records its
/// backtrace.
///
/// The panic message is logged at `error` wherever the panic happens. The
/// trace is kept on the panicking thread and picked up by the fault boundary
/// through [`take_panic_trace`]. Installing more than once is a no-op.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let trace = Backtrace::force_capture().to_string();
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let message = panic_message(info.payload());
            let thread = std::thread::current();

            tracing::error!(
                %location,
                thread = thread.name().unwrap_or("<unnamed>"),
                "Panic: {}",
                message
            );
            tracing::debug!(%location, "Panic backtrace:\n{}", trace);

            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(format!("at {}\n{}", location, trace)));
        }));
    });
}

/// Take the trace recorded for the most recent panic on this thread
pub fn take_panic_trace() -> Option<String> {
    PANIC_TRACE.with(|slot| slot.borrow_mut().take())
}

/// Fatal problems detected before the server starts
#[derive(Error, Debug)]
pub enum StartupFailure {
    #[error("ERROR: {} does not exist!", .0.display())]
    MissingApplication(PathBuf),

    #[error("Error importing app: {0}")]
    Import(#[source] CatalogError),
}

/// Resolve, verify and load the wrapped application, returning its router.
pub fn bootstrap(section: &DiagnosticSection) -> Result<Router, StartupFailure> {
    let path = section.catalog_path();
    tracing::info!(path = %path.display(), "Importing app");

    if !path.is_file() {
        return Err(StartupFailure::MissingApplication(path));
    }

    let catalog = Catalog::load(&path).map_err(|err| match err {
        CatalogError::CatalogNotFound(path) => StartupFailure::MissingApplication(path),
        other => StartupFailure::Import(other),
    })?;

    // Traces are logged server-side under either policy
    install_panic_hook();

    Ok(create_router(AppState::new(
        Arc::new(catalog),
        section.fault_policy(),
    )))
}
