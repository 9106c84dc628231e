// crates/userscript-meta-core/src/lines.rs
// ============================================================================
// Module: Line Buffer
// Description: Append-only accumulation target for formatted tag lines.
// Purpose: Share one ordered output stream across nested expander calls.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`LineBuffer`] is created once per generation call and threaded by
//! mutable reference through every expander. Lines are only ever appended;
//! nothing is removed or rewritten.

use std::slice;

/// Ordered, append-only sequence of tag lines.
///
/// # Invariants
/// - Lines keep insertion order.
/// - Pushed lines are never mutated or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    /// Lines in emission order.
    lines: Vec<String>,
}

impl LineBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
        }
    }

    /// Appends a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Number of lines emitted so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when nothing has been emitted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Borrows the emitted lines.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    /// Iterates over the emitted lines.
    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.lines.iter()
    }

    /// Consumes the buffer, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl<'a> IntoIterator for &'a LineBuffer {
    type IntoIter = slice::Iter<'a, String>;
    type Item = &'a String;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
