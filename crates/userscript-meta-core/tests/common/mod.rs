// crates/userscript-meta-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared helpers for userscript-meta-core integration tests.
// Purpose: Reduce duplication across expander and generator suites.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use userscript_meta_core::LineBuffer;
use userscript_meta_core::UserScriptMeta;

/// Borrows buffer lines as string slices for comparisons.
pub fn lines_of(buffer: &LineBuffer) -> Vec<&str> {
    buffer.iter().map(String::as_str).collect()
}

/// Decodes a metadata record from a JSON value.
///
/// `json!` objects are key-sorted; use [`meta_from_str`] when key order matters.
pub fn meta_from_json(value: serde_json::Value) -> UserScriptMeta {
    serde_json::from_value(value).expect("metadata record should decode")
}

/// Decodes a metadata record from JSON text, keeping source key order.
pub fn meta_from_str(text: &str) -> UserScriptMeta {
    serde_json::from_str(text).expect("metadata record should decode")
}
