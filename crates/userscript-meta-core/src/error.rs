// crates/userscript-meta-core/src/error.rs
// ============================================================================
// Module: Generation Errors
// Description: Validation and collaborator error taxonomy for header generation.
// Purpose: Give every expander a single, fail-closed error surface.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every failure inside the generator is fatal: the call aborts and no partial
//! header is returned. [`ValidationError`] covers malformed input detected by
//! the expanders and the resource URL resolver. Collaborator failures
//! ([`LocaleError`], [`HashError`]) are wrapped unchanged by
//! [`GenerateError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::hashing::HashError;
use crate::locale::LocaleError;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Malformed metadata detected while expanding tags.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
/// - Messages name the offending tag (or resource id) verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tag name contains characters outside `[A-Za-z0-9:_-]`, or is empty.
    #[error("illegal tag name \"{tag}\"")]
    IllegalTagName {
        /// Offending tag name.
        tag: String,
    },
    /// Tag value contains a line break.
    #[error("Tag \"{tag}\" has illegal characters in its value - \"{value}\".")]
    IllegalValue {
        /// Tag being expanded.
        tag: String,
        /// Rejected value.
        value: String,
    },
    /// A required value is absent.
    #[error("Tag \"{tag}\" cannot contain a null value.")]
    NullValue {
        /// Tag being expanded.
        tag: String,
    },
    /// An array was supplied where a scalar is required.
    #[error("Tag \"{tag}\" cannot contain an array value.")]
    ArrayValue {
        /// Tag being expanded.
        tag: String,
    },
    /// A structured object was supplied where a scalar is required.
    #[error("Tag \"{tag}\" cannot contain an object value.")]
    UnsupportedValue {
        /// Tag being expanded.
        tag: String,
    },
    /// Multiple values were supplied to a tag that allows only one.
    #[error("Tag \"{tag}\" cannot contain multiple values.")]
    MultipleValues {
        /// Tag being expanded.
        tag: String,
    },
    /// A single value was supplied to a tag that only accepts arrays.
    #[error("Tag \"{tag}\" only accepts array values.")]
    NotArray {
        /// Tag being expanded.
        tag: String,
    },
    /// A string was supplied to a tag that only accepts structured values.
    #[error("Tag \"{tag}\" does not allow string values.")]
    StringDisallowed {
        /// Tag being expanded.
        tag: String,
    },
    /// Two locale keys canonicalized to the same locale tag.
    #[error("Locale \"{locale}\" has already been added to tag \"{tag}\".")]
    DuplicateLocale {
        /// Tag being expanded.
        tag: String,
        /// Canonical locale that collided.
        locale: String,
    },
    /// A resource requested an automatic hash but has no source file.
    #[error(
        "Resource \"{id}\" has \"hash\" set to \"auto\", but its \"src\" is null and cannot be \
         resolved."
    )]
    HashSourceUnresolved {
        /// Resource identifier.
        id: String,
    },
    /// A resource has no URL and none could be resolved.
    #[error("Resource \"{id}\" has no \"url\" set and it cannot be resolved.")]
    UrlUnresolved {
        /// Resource identifier.
        id: String,
    },
}

// ============================================================================
// SECTION: Generation Errors
// ============================================================================

/// Error returned by every generation and expansion call.
///
/// # Invariants
/// - Collaborator errors are carried unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Metadata failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Locale canonicalization failed.
    #[error(transparent)]
    Locale(#[from] LocaleError),
    /// Content hashing failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}
