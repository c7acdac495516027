//! Process-wide cancellation.
//!
//! A single [`CancelToken`] is created at startup and handed to everything
//! that waits: subprocess polls check it each tick and terminate the child
//! when it fires, and the scenario loop stops before starting the next run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared across the harness.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    fired: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        self.fired.store(true, Ordering::SeqCst);
    }

    /// Whether the token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Install the SIGINT/SIGTERM handler that fires `token`.
///
/// Installation failure is a warning, not a fatal error: the harness still
/// works, it just cannot be interrupted cleanly.
pub fn install_signal_handler(token: &CancelToken) {
    let listener = token.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        listener.cancel();
    }) {
        eprintln!("Warning: Failed to install signal handler: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_clear_and_latches() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
