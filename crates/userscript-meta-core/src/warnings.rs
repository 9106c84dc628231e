// crates/userscript-meta-core/src/warnings.rs
// ============================================================================
// Module: Warning Sinks
// Description: Injected sinks for non-fatal generation diagnostics.
// Purpose: Route locale best-fit notices without process-wide state.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! Some collaborators substitute input silently (a locale tag canonicalized to
//! a different spelling, for example). They report it through a
//! [`WarningSink`] handed to each generation call, so callers and tests can
//! observe or discard warnings without shared global state.

use std::sync::Mutex;

/// Tracing target used by [`TracingWarnings`].
pub const WARNING_TARGET: &str = "userscript_meta";

/// Receiver for non-fatal generation warnings.
pub trait WarningSink {
    /// Records a warning message.
    fn warn(&self, message: &str);
}

/// Sink that discards every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWarnings;

impl WarningSink for NoopWarnings {
    fn warn(&self, _message: &str) {}
}

/// Sink forwarding warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, message: &str) {
        tracing::warn!(target: WARNING_TARGET, "{message}");
    }
}

/// Sink that keeps warnings in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectedWarnings {
    /// Recorded messages.
    messages: Mutex<Vec<String>>,
}

impl CollectedWarnings {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl WarningSink for CollectedWarnings {
    fn warn(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
