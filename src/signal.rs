//! Ctrl+C handling.
//!
//! A shared atomic flag is raised on SIGINT. Long-running stages poll it
//! and wind down at the next safe point; in-flight hash operations finish
//! so partial results stay consistent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle for cooperative shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the underlying flag for handing to worker stages.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Register a SIGINT handler that raises the shutdown flag.
///
/// # Errors
///
/// Fails if a handler is already installed for this process.
pub fn install_handler() -> Result<ShutdownHandler, ctrlc::Error> {
    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();
    ctrlc::set_handler(move || {
        log::warn!("interrupt received, finishing in-flight work...");
        flag.store(true, Ordering::SeqCst);
    })?;
    Ok(handler)
}
