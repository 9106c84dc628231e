// crates/userscript-meta-core/src/comments.rs
// ============================================================================
// Module: Comment Rendering
// Description: Wraps generated tag lines in a script comment.
// Purpose: Render the final header text in block, slashes, or raw style.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Rendering is stateless text wrapping:
//! - [`CommentStyle::Block`]: `/*`, one trimmed line per entry with `*/`
//!   escaped as `*\/`, then `*/`. A single line renders inline.
//! - [`CommentStyle::Slashes`]: each line prefixed with `// `.
//! - [`CommentStyle::None`]: lines joined with `\n`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Comment style used to render the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// `/* ... */` block comment.
    #[default]
    Block,
    /// `//` line comments.
    Slashes,
    /// Raw newline-joined text.
    None,
}

impl CommentStyle {
    /// Returns the stable label for the style.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Slashes => "slashes",
            Self::None => "none",
        }
    }

    /// Renders lines in this style.
    #[must_use]
    pub fn render(self, lines: &[String]) -> String {
        match self {
            Self::Block => block_comment(lines),
            Self::Slashes => slashes_comment(lines),
            Self::None => lines.join("\n"),
        }
    }
}

impl fmt::Display for CommentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown comment style label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comment style \"{0}\" (expected block, slashes, or none)")]
pub struct UnknownCommentStyle(pub String);

impl FromStr for CommentStyle {
    type Err = UnknownCommentStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "block" => Ok(Self::Block),
            "slashes" => Ok(Self::Slashes),
            "none" => Ok(Self::None),
            other => Err(UnknownCommentStyle(other.to_string())),
        }
    }
}

/// Renders a `/* */` block comment.
#[must_use]
pub fn block_comment(lines: &[String]) -> String {
    let format_line = |line: &str| line.replace("*/", "*\\/").trim().to_string();
    let mut comment = String::from("/*");
    if lines.len() > 1 {
        for line in lines {
            comment.push('\n');
            comment.push_str(&format_line(line));
        }
        comment.push('\n');
    } else {
        comment.push(' ');
        comment.push_str(&format_line(lines.first().map_or("", String::as_str)));
        comment.push(' ');
    }
    comment.push_str("*/");
    comment
}

/// Renders `//`-prefixed lines.
#[must_use]
pub fn slashes_comment(lines: &[String]) -> String {
    lines.iter().map(|line| format!("// {}", line.trim())).collect::<Vec<_>>().join("\n")
}
