// crates/userscript-meta-core/src/locale.rs
// ============================================================================
// Module: Locale Canonicalization
// Description: BCP 47 locale tag validation and canonical casing.
// Purpose: Resolve translation keys to the locale suffix of `@tag:locale`.
// Dependencies: thiserror, crate::warnings
// ============================================================================

//! ## Overview
//! Localized tags are emitted as `@name:locale`. Keys of a localized value are
//! passed through a [`LocaleResolver`] first, and duplicate detection runs on
//! the resolved form. The default [`Bcp47LocaleResolver`] checks the tag
//! structure (language, extlang, script, region, variants, extensions,
//! private use) and applies canonical casing, e.g. `EN-us` becomes `en-US`.
//! A changed spelling is reported to the [`WarningSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::warnings::WarningSink;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by locale resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// The locale key is empty.
    #[error("Locale tag is empty.")]
    Empty,
    /// The locale key is not a well-formed language tag.
    #[error("Locale \"{0}\" is not a valid locale.")]
    Invalid(String),
}

// ============================================================================
// SECTION: Resolver Interface
// ============================================================================

/// Maps a locale key to the tag emitted after `:`.
pub trait LocaleResolver {
    /// Resolves `tag`, reporting silent substitutions to `warnings`.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] when the tag is malformed.
    fn resolve(&self, tag: &str, warnings: &dyn WarningSink) -> Result<String, LocaleError>;
}

/// Structural BCP 47 resolver.
///
/// # Invariants
/// - With best fit enabled, output is the canonical casing of the input.
/// - With best fit disabled, valid input is returned unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Bcp47LocaleResolver {
    /// Whether to substitute the canonical spelling.
    best_fit: bool,
}

impl Bcp47LocaleResolver {
    /// Resolver that canonicalizes and warns on substitution.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            best_fit: true,
        }
    }

    /// Resolver that validates but keeps keys as written.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            best_fit: false,
        }
    }
}

impl Default for Bcp47LocaleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleResolver for Bcp47LocaleResolver {
    fn resolve(&self, tag: &str, warnings: &dyn WarningSink) -> Result<String, LocaleError> {
        let canonical = canonicalize_locale(tag)?;
        if self.best_fit && canonical != tag {
            warnings.warn(&format!("Locale \"{tag}\" has been resolved to \"{canonical}\"."));
            return Ok(canonical);
        }
        Ok(tag.to_string())
    }
}

/// Locale resolver paired with the sink it reports to.
#[derive(Clone, Copy)]
pub struct LocaleContext<'a> {
    /// Resolver applied to every locale key.
    resolver: &'a dyn LocaleResolver,
    /// Sink receiving substitution warnings.
    warnings: &'a dyn WarningSink,
}

impl<'a> LocaleContext<'a> {
    /// Pairs a resolver with a warning sink.
    #[must_use]
    pub const fn new(resolver: &'a dyn LocaleResolver, warnings: &'a dyn WarningSink) -> Self {
        Self {
            resolver,
            warnings,
        }
    }

    /// Resolves a locale key.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] when the resolver rejects the key.
    pub fn resolve(&self, tag: &str) -> Result<String, LocaleError> {
        self.resolver.resolve(tag, self.warnings)
    }
}

// ============================================================================
// SECTION: Canonicalization
// ============================================================================

/// Validates a BCP 47 tag and returns its canonical casing.
///
/// # Errors
///
/// Returns [`LocaleError`] when the tag is empty or malformed.
pub fn canonicalize_locale(tag: &str) -> Result<String, LocaleError> {
    if tag.is_empty() {
        return Err(LocaleError::Empty);
    }
    let invalid = || LocaleError::Invalid(tag.to_string());
    if tag.split('-').any(|subtag| {
        subtag.is_empty() || subtag.len() > 8 || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
    }) {
        return Err(invalid());
    }

    let mut subtags = tag.split('-').peekable();
    let mut out: Vec<String> = Vec::new();

    let language = subtags.next().ok_or_else(invalid)?;
    if !(is_alpha(language) && matches!(language.len(), 2 ..= 3 | 5 ..= 8)) {
        return Err(invalid());
    }
    out.push(language.to_ascii_lowercase());

    if language.len() <= 3 {
        for _ in 0 .. 3 {
            match subtags.next_if(|s| s.len() == 3 && is_alpha(s)) {
                Some(extlang) => out.push(extlang.to_ascii_lowercase()),
                None => break,
            }
        }
    }
    if let Some(script) = subtags.next_if(|s| s.len() == 4 && is_alpha(s)) {
        out.push(title_case(script));
    }
    if let Some(region) = subtags
        .next_if(|s| (s.len() == 2 && is_alpha(s)) || (s.len() == 3 && is_digit(s)))
    {
        out.push(region.to_ascii_uppercase());
    }
    while let Some(variant) = subtags.next_if(|s| is_variant(s)) {
        out.push(variant.to_ascii_lowercase());
    }

    while let Some(singleton) = subtags.next() {
        if singleton.len() != 1 {
            return Err(invalid());
        }
        let singleton = singleton.to_ascii_lowercase();
        let private_use = singleton == "x";
        out.push(singleton);
        let mut parts = 0_usize;
        while let Some(part) = subtags.next_if(|s| private_use || s.len() >= 2) {
            out.push(part.to_ascii_lowercase());
            parts += 1;
        }
        if parts == 0 {
            return Err(invalid());
        }
    }

    Ok(out.join("-"))
}

/// Returns true for an all-letter subtag.
fn is_alpha(subtag: &str) -> bool {
    subtag.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Returns true for an all-digit subtag.
fn is_digit(subtag: &str) -> bool {
    subtag.bytes().all(|b| b.is_ascii_digit())
}

/// Variant subtags: 5-8 alphanumerics, or 4 starting with a digit.
fn is_variant(subtag: &str) -> bool {
    match subtag.len() {
        5 ..= 8 => true,
        4 => subtag.bytes().next().is_some_and(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Uppercases the first letter and lowercases the rest.
fn title_case(subtag: &str) -> String {
    let lower = subtag.to_ascii_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = first.to_ascii_uppercase().to_string();
        out.push_str(chars.as_str());
        out
    })
}
