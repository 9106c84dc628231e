// crates/userscript-meta-core/src/model.rs
// ============================================================================
// Module: Metadata Model
// Description: Typed metadata record and value shapes for userscript headers.
// Purpose: Replace runtime shape probing with explicit sum types.
// Dependencies: indexmap, serde, serde_json
// ============================================================================

//! ## Overview
//! The metadata record mirrors the JSON shape userscript tooling already uses
//! (camelCase keys, strings or descriptor objects per tag). Each polymorphic
//! field is a sum type discriminated at deserialization time:
//! - [`OneOrMany`] for scalar-or-array fields,
//! - [`Localizable`] for plain or locale-keyed text,
//! - [`Presented`] for string-or-descriptor tags.
//!
//! All record fields are optional at the type level. Mandatory fields
//! (`name`, `version`, `author`) are enforced by their expanders so that a
//! missing value surfaces as a [`crate::ValidationError`] rather than a
//! deserialization failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::slice;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::hashing::HashAlgorithm;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key holding the source-language string of a localized value.
pub const BASE_LOCALE_KEY: &str = "@";

// ============================================================================
// SECTION: Value Shapes
// ============================================================================

/// A single value or an array of values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Array form.
    Many(Vec<T>),
    /// Scalar form.
    One(T),
}

impl<T> OneOrMany<T> {
    /// Borrows the values as a slice (one element for the scalar form).
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Many(values) => values,
            Self::One(value) => slice::from_ref(value),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// Text that is either plain or keyed by locale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Localizable {
    /// Non-localized text.
    Plain(String),
    /// Source text plus translations.
    Localized(Translations),
}

impl From<&str> for Localizable {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<Translations> for Localizable {
    fn from(value: Translations) -> Self {
        Self::Localized(value)
    }
}

/// Raised when a locale-keyed map lacks the `"@"` base entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("localized value is missing its \"@\" base translation")]
pub struct MissingBaseTranslation;

/// Locale-keyed text with a mandatory base entry.
///
/// # Invariants
/// - `base` holds the `"@"` entry; `locales` never contains the `"@"` key.
/// - `locales` keeps the insertion order of the source map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, String>")]
pub struct Translations {
    /// Source-language text.
    base: String,
    /// Raw locale key to translation, in source order.
    locales: IndexMap<String, String>,
}

impl Translations {
    /// Creates translations holding only the base text.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            locales: IndexMap::new(),
        }
    }

    /// Adds a translation. A `"@"` key replaces the base text.
    #[must_use]
    pub fn with(mut self, locale: impl Into<String>, translation: impl Into<String>) -> Self {
        let locale = locale.into();
        if locale == BASE_LOCALE_KEY {
            self.base = translation.into();
        } else {
            self.locales.insert(locale, translation.into());
        }
        self
    }

    /// Source-language text.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Iterates over `(raw locale key, translation)` pairs in source order.
    pub fn locales(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locales.iter().map(|(locale, text)| (locale.as_str(), text.as_str()))
    }
}

impl TryFrom<IndexMap<String, String>> for Translations {
    type Error = MissingBaseTranslation;

    fn try_from(mut map: IndexMap<String, String>) -> Result<Self, Self::Error> {
        let base = map.shift_remove(BASE_LOCALE_KEY).ok_or(MissingBaseTranslation)?;
        Ok(Self {
            base,
            locales: map,
        })
    }
}

/// A tag value given either as a string shorthand or a descriptor object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Presented<T> {
    /// String shorthand.
    Text(String),
    /// Structured descriptor.
    Object(T),
}

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// A person credited in the header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDescriptor {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Personal page.
    #[serde(default)]
    pub url: Option<String>,
}

impl UserDescriptor {
    /// Renders `name [email] <url>`, omitting absent parts.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut signature = self.name.clone();
        if let Some(email) = &self.email {
            signature.push_str(&format!(" [{email}]"));
        }
        if let Some(url) = &self.url {
            signature.push_str(&format!(" <{url}>"));
        }
        signature
    }
}

/// Script icons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IconDescriptor {
    /// Low resolution icon, emitted as `@icon`.
    #[serde(default)]
    pub small: Option<String>,
    /// 64x64 icon, emitted as `@icon64`.
    #[serde(default)]
    pub larger: Option<String>,
}

/// A regular expression page pattern for `include`/`exclude`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegexPattern {
    /// Expression source, without delimiters.
    pub regex: String,
    /// Expression flags.
    #[serde(default)]
    pub flags: Option<String>,
}

impl fmt::Display for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.regex, self.flags.as_deref().unwrap_or(""))
    }
}

/// A declared anti-feature and the reason it exists.
///
/// Decoded from a `[kind, reason]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, Localizable)")]
pub struct AntiFeature {
    /// Anti-feature kind, e.g. `ads` or `tracking`.
    pub kind: String,
    /// Explanation, optionally localized.
    pub reason: Localizable,
}

impl From<(String, Localizable)> for AntiFeature {
    fn from((kind, reason): (String, Localizable)) -> Self {
        Self {
            kind,
            reason,
        }
    }
}

/// Hash value of a resource: literal digest or computed from `src`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum HashValue {
    /// Compute the digest from the resource's source file.
    Auto,
    /// Precomputed hex digest.
    Literal(String),
}

impl From<String> for HashValue {
    fn from(value: String) -> Self {
        if value == "auto" { Self::Auto } else { Self::Literal(value) }
    }
}

/// Subresource integrity hash of a resource.
///
/// Decoded from a `[value | "auto", algorithm]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(HashValue, HashAlgorithm)")]
pub struct HashDescriptor {
    /// Digest or `auto`.
    pub value: HashValue,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
}

impl From<(HashValue, HashAlgorithm)> for HashDescriptor {
    fn from((value, algorithm): (HashValue, HashAlgorithm)) -> Self {
        Self {
            value,
            algorithm,
        }
    }
}

/// A remote script or resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource identifier; the `@resource` name.
    pub id: String,
    /// Local source file, used for `auto` hashing.
    #[serde(default)]
    pub src: Option<PathBuf>,
    /// URL the resource is served from.
    #[serde(default)]
    pub url: Option<String>,
    /// Integrity hash appended as a URL fragment.
    #[serde(default)]
    pub hash: Option<HashDescriptor>,
}

impl ResourceDescriptor {
    /// Creates a descriptor with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: None,
            url: None,
            hash: None,
        }
    }
}

// ============================================================================
// SECTION: Metadata Record
// ============================================================================

/// Full description of a userscript header.
///
/// # Invariants
/// - The record is never mutated by the generator.
/// - `custom_tags` keeps the key order of the source document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScriptMeta {
    /// Script name. Mandatory.
    pub name: Option<OneOrMany<Localizable>>,
    /// Namespace used to avoid name collisions.
    pub namespace: Option<String>,
    /// Script version. Mandatory.
    pub version: Option<String>,
    /// Script author. Mandatory.
    pub author: Option<Presented<UserDescriptor>>,
    /// Code contributors.
    pub contributors: Option<OneOrMany<Presented<UserDescriptor>>>,
    /// Short description.
    pub description: Option<OneOrMany<Localizable>>,
    /// Homepage, emitted as `@homepageURL`.
    pub homepage: Option<String>,
    /// License text.
    pub license: Option<String>,
    /// Icons.
    pub icon: Option<Presented<IconDescriptor>>,
    /// URL checked for updates.
    pub update_url: Option<String>,
    /// URL the update is downloaded from.
    pub download_url: Option<String>,
    /// Support or issue tracker URL.
    pub support_url: Option<String>,
    /// Pages the script runs on.
    pub include: Option<OneOrMany<Presented<RegexPattern>>>,
    /// Match patterns the script runs on.
    #[serde(rename = "match")]
    pub matches: Option<OneOrMany<String>>,
    /// Pages the script never runs on.
    pub exclude: Option<OneOrMany<Presented<RegexPattern>>>,
    /// Scripts loaded before the script body.
    pub require: Option<OneOrMany<Presented<ResourceDescriptor>>>,
    /// Named resources available to the script.
    pub resources: Option<OneOrMany<Presented<ResourceDescriptor>>>,
    /// Domains the script sends requests to.
    pub connect: Option<OneOrMany<String>>,
    /// Injection moment, e.g. `document-start`.
    pub run_at: Option<String>,
    /// Granted APIs.
    pub grant: Option<OneOrMany<String>>,
    /// Declared anti-features.
    pub anti_features: Option<OneOrMany<Presented<AntiFeature>>>,
    /// Whether the script skips frames.
    pub no_frames: Option<bool>,
    /// Disabled browser compatibility features.
    pub no_compat: Option<OneOrMany<String>>,
    /// Injection context, e.g. `page` or `content`.
    pub inject_into: Option<String>,
    /// Additional tags, emitted last in key order.
    pub custom_tags: Option<IndexMap<String, serde_json::Value>>,
}

impl UserScriptMeta {
    /// Creates a record holding only the mandatory fields.
    #[must_use]
    pub fn new(
        name: impl Into<Localizable>,
        version: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(OneOrMany::One(name.into())),
            version: Some(version.into()),
            author: Some(Presented::Text(author.into())),
            ..Self::default()
        }
    }
}
