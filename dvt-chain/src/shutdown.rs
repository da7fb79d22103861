//! Shutdown related code.
//!
//! A shared flag indicates when the application is shutting down, so
//! long-running scans can stop early.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A cloneable flag that indicates the node is shutting down.
///
/// All clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    is_shutting_down: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Returns a new signal that is not shutting down.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tells every holder of this signal that the application is shutting down.
    pub fn request_shutdown(&self) {
        tracing::info!("shutdown requested");

        // ## Correctness:
        //
        // Since we're shutting down, and this is a one-time operation,
        // performance is not important. So we use the strongest memory
        // ordering.
        // https://doc.rust-lang.org/nomicon/atomics.html#sequentially-consistent
        self.is_shutting_down.store(true, Ordering::SeqCst);
    }

    /// Returns true if the application is shutting down.
    ///
    /// Returns false otherwise.
    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::SeqCst)
    }
}
