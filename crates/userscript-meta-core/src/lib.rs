// crates/userscript-meta-core/src/lib.rs
// ============================================================================
// Module: Userscript Metadata Core Library
// Description: Public API surface for userscript header generation.
// Purpose: Expose the metadata model, tag expanders, and header generator.
// Dependencies: crate::{comments, error, expanders, generator, hashing, lines,
//               locale, model, options, resource, warnings}
// ============================================================================

//! ## Overview
//! `userscript-meta-core` turns a typed [`UserScriptMeta`] record into the
//! `// ==UserScript==` metadata block read by userscript managers. The
//! expanders in [`expanders`] encode the line grammar (tag naming, value
//! validation, localization fan-out, single vs. multi-value tags,
//! string-or-descriptor tags); [`Generator`] applies them in the fixed
//! [`FIELD_ORDER`].
//!
//! Generation is synchronous and all-or-nothing: any validation or
//! collaborator failure aborts the call with a [`GenerateError`].
//!
//! ```
//! use userscript_meta_core::CommentStyle;
//! use userscript_meta_core::GeneratorOptions;
//! use userscript_meta_core::NoopWarnings;
//! use userscript_meta_core::UserScriptMeta;
//! use userscript_meta_core::generate;
//!
//! # fn main() -> Result<(), userscript_meta_core::GenerateError> {
//! let meta = UserScriptMeta::new("Test", "1.0", "Alice");
//! let options = GeneratorOptions::default().with_comment_style(CommentStyle::None);
//! let header = generate(&meta, options, &NoopWarnings)?;
//! assert_eq!(header, "==UserScript==\n@name Test\n@version 1.0\n@author Alice\n==/UserScript==");
//! # Ok(())
//! # }
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod comments;
pub mod error;
pub mod expanders;
pub mod generator;
pub mod hashing;
pub mod lines;
pub mod locale;
pub mod model;
pub mod options;
pub mod resource;
pub mod warnings;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comments::CommentStyle;
pub use error::GenerateError;
pub use error::ValidationError;
pub use generator::FIELD_ORDER;
pub use generator::FieldExpander;
pub use generator::FieldRule;
pub use generator::Generator;
pub use generator::generate;
pub use hashing::ContentHasher;
pub use hashing::HashAlgorithm;
pub use hashing::HashError;
pub use hashing::StreamingFileHasher;
pub use lines::LineBuffer;
pub use locale::Bcp47LocaleResolver;
pub use locale::LocaleContext;
pub use locale::LocaleError;
pub use locale::LocaleResolver;
pub use model::*;
pub use options::GeneratorOptions;
pub use resource::resolve_resource_url;
pub use warnings::CollectedWarnings;
pub use warnings::NoopWarnings;
pub use warnings::TracingWarnings;
pub use warnings::WarningSink;
