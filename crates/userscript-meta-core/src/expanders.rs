// crates/userscript-meta-core/src/expanders.rs
// ============================================================================
// Module: Tag Expanders
// Description: Validating conversion of typed values into `@tag value` lines.
// Purpose: Provide the primitive, multi-value, localizable, and
//          object-presented expansion rules shared by the header generator.
// Dependencies: serde_json, crate::{error, lines, locale, model}
// ============================================================================

//! ## Overview
//! Every expander appends to a caller-owned [`LineBuffer`] and funnels into
//! [`expand_tag`], which enforces the line grammar:
//! - tag names match `[A-Za-z0-9:_-]+`,
//! - values contain no line break,
//! - absent values are rejected unless the null check is disabled.
//!
//! Tag names are validated before anything is emitted, so a name failure never
//! leaves a partial line behind. Value failures abort the whole generation
//! call; the buffer is discarded by the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::error::GenerateError;
use crate::error::ValidationError;
use crate::lines::LineBuffer;
use crate::locale::LocaleContext;
use crate::model::Localizable;
use crate::model::OneOrMany;
use crate::model::Presented;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Options for [`expand_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOptions {
    /// Reject absent values. When disabled, an absent value emits `@tag`.
    pub check_null: bool,
}

impl TagOptions {
    /// Options that accept absent values.
    #[must_use]
    pub const fn nullable() -> Self {
        Self {
            check_null: false,
        }
    }
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            check_null: true,
        }
    }
}

/// Options for [`expand_localizable_tag`].
#[derive(Clone, Copy)]
pub struct LocalizableTagOptions<'a> {
    /// Reject absent values.
    pub check_null: bool,
    /// Accept an array of values, each expanded independently.
    pub allow_multiple: bool,
    /// Applied to every translation of a localized value before emission.
    pub transform_translation: Option<&'a dyn Fn(&str) -> String>,
}

impl Default for LocalizableTagOptions<'_> {
    fn default() -> Self {
        Self {
            check_null: true,
            allow_multiple: false,
            transform_translation: None,
        }
    }
}

/// How an object-presented tag treats string values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringsBehavior {
    /// Emit strings directly as the tag value.
    #[default]
    Passthrough,
    /// Route strings through the transformer like descriptors.
    Transform,
    /// Reject strings.
    Disallow,
}

/// Options for [`expand_object_presented_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectTagOptions {
    /// Reject absent values.
    pub check_null: bool,
    /// String handling policy.
    pub strings: StringsBehavior,
}

impl ObjectTagOptions {
    /// Options with the given string policy and the null check enabled.
    #[must_use]
    pub const fn with_strings(strings: StringsBehavior) -> Self {
        Self {
            check_null: true,
            strings,
        }
    }
}

impl Default for ObjectTagOptions {
    fn default() -> Self {
        Self::with_strings(StringsBehavior::Passthrough)
    }
}

/// Lines a transformer asks the object-presented expander to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit {
    /// Nothing further; the transformer pushed any lines it needed.
    None,
    /// One value under the expanded tag.
    One(String),
    /// Several values under the expanded tag, in order.
    Many(Vec<String>),
}

// ============================================================================
// SECTION: Primitive Expanders
// ============================================================================

/// Checks a tag name against `[A-Za-z0-9:_-]+`.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalTagName`] for empty names or names with
/// other characters.
pub fn validate_tag_name(tag_name: &str) -> Result<(), ValidationError> {
    let legal = !tag_name.is_empty()
        && tag_name.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b':' | b'-' | b'_'));
    if legal {
        Ok(())
    } else {
        Err(ValidationError::IllegalTagName {
            tag: tag_name.to_string(),
        })
    }
}

/// Appends a bare `@tag` line when `condition` holds.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalTagName`] even when `condition` is false.
pub fn expand_conditional_tag(
    tag_name: &str,
    condition: bool,
    lines: &mut LineBuffer,
) -> Result<(), ValidationError> {
    validate_tag_name(tag_name)?;
    if condition {
        lines.push(format!("@{tag_name}"));
    }
    Ok(())
}

/// Appends exactly one `@tag value` line.
///
/// # Errors
///
/// Returns [`ValidationError`] for an illegal name, a value containing a line
/// break, or an absent value while `check_null` is set.
pub fn expand_tag(
    tag_name: &str,
    value: Option<&str>,
    lines: &mut LineBuffer,
    options: TagOptions,
) -> Result<(), ValidationError> {
    validate_tag_name(tag_name)?;
    let Some(value) = value else {
        if options.check_null {
            return Err(ValidationError::NullValue {
                tag: tag_name.to_string(),
            });
        }
        lines.push(format!("@{tag_name}"));
        return Ok(());
    };
    if value.contains('\n') {
        return Err(ValidationError::IllegalValue {
            tag: tag_name.to_string(),
            value: value.to_string(),
        });
    }
    lines.push(format!("@{tag_name} {value}"));
    Ok(())
}

/// Expands a free-form JSON value as a scalar tag.
///
/// Strings are emitted verbatim, numbers and booleans as their JSON text.
///
/// # Errors
///
/// Returns [`ValidationError`] for `null`, arrays, objects, or any
/// [`expand_tag`] failure.
pub fn expand_custom_tag(
    tag_name: &str,
    value: &Value,
    lines: &mut LineBuffer,
) -> Result<(), ValidationError> {
    validate_tag_name(tag_name)?;
    match value {
        Value::Null => expand_tag(tag_name, None, lines, TagOptions::default()),
        Value::String(text) => expand_tag(tag_name, Some(text), lines, TagOptions::default()),
        Value::Bool(_) | Value::Number(_) => {
            expand_tag(tag_name, Some(&value.to_string()), lines, TagOptions::default())
        }
        Value::Array(_) => Err(ValidationError::ArrayValue {
            tag: tag_name.to_string(),
        }),
        Value::Object(_) => Err(ValidationError::UnsupportedValue {
            tag: tag_name.to_string(),
        }),
    }
}

/// Appends one line per value, in order. Duplicates are kept.
///
/// # Errors
///
/// Returns the first [`expand_tag`] failure.
pub fn expand_multi_tag(
    tag_name: &str,
    value: &OneOrMany<String>,
    lines: &mut LineBuffer,
) -> Result<(), ValidationError> {
    validate_tag_name(tag_name)?;
    for item in value.as_slice() {
        expand_tag(tag_name, Some(item), lines, TagOptions::default())?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Localizable Expander
// ============================================================================

/// Expands plain or localized text, optionally accepting an array of values.
///
/// # Errors
///
/// Returns [`GenerateError`] when the value is absent (with `check_null`), is
/// an array without `allow_multiple`, or fails [`expand_localizable_value`].
pub fn expand_localizable_tag(
    tag_name: &str,
    value: Option<&OneOrMany<Localizable>>,
    lines: &mut LineBuffer,
    options: &LocalizableTagOptions<'_>,
    locale: LocaleContext<'_>,
) -> Result<(), GenerateError> {
    validate_tag_name(tag_name)?;
    let Some(value) = value else {
        let tag_options = TagOptions {
            check_null: options.check_null,
        };
        return Ok(expand_tag(tag_name, None, lines, tag_options)?);
    };
    match value {
        OneOrMany::Many(values) => {
            if !options.allow_multiple {
                return Err(ValidationError::MultipleValues {
                    tag: tag_name.to_string(),
                }
                .into());
            }
            let single = LocalizableTagOptions {
                allow_multiple: false,
                ..*options
            };
            for item in values {
                expand_localizable_value(tag_name, item, lines, &single, locale)?;
            }
            Ok(())
        }
        OneOrMany::One(item) => expand_localizable_value(tag_name, item, lines, options, locale),
    }
}

/// Expands one plain or localized value.
///
/// Plain text is emitted unchanged. Localized text emits the base line under
/// `tag_name`, then one `tag_name:locale` line per translation in source
/// order, with every translation passed through `transform_translation`.
///
/// # Errors
///
/// Returns [`GenerateError`] when a locale key fails resolution, two keys
/// resolve to the same locale, or a line fails validation. Lines emitted
/// before the failure stay in the buffer.
pub fn expand_localizable_value(
    tag_name: &str,
    value: &Localizable,
    lines: &mut LineBuffer,
    options: &LocalizableTagOptions<'_>,
    locale: LocaleContext<'_>,
) -> Result<(), GenerateError> {
    let translations = match value {
        Localizable::Plain(text) => {
            return Ok(expand_tag(tag_name, Some(text), lines, TagOptions::default())?);
        }
        Localizable::Localized(translations) => translations,
    };
    let translate = |text: &str| {
        options.transform_translation.map_or_else(|| text.to_string(), |transform| transform(text))
    };

    expand_tag(tag_name, Some(&translate(translations.base())), lines, TagOptions::default())?;

    let mut included: Vec<String> = Vec::new();
    for (key, text) in translations.locales() {
        let translation = translate(text);
        let resolved = locale.resolve(key)?;
        if included.contains(&resolved) {
            return Err(ValidationError::DuplicateLocale {
                tag: tag_name.to_string(),
                locale: resolved,
            }
            .into());
        }
        let localized_tag = format!("{tag_name}:{resolved}");
        expand_tag(&localized_tag, Some(&translation), lines, TagOptions::default())?;
        included.push(resolved);
    }
    Ok(())
}

// ============================================================================
// SECTION: Object-Presented Expanders
// ============================================================================

/// Expands a string-or-descriptor value through `transformer`.
///
/// Descriptors always reach the transformer. Strings follow
/// [`ObjectTagOptions::strings`]. The transformer receives the value, the tag
/// name, and the shared buffer; its [`Emit`] result is emitted under
/// `tag_name` via [`expand_multi_tag`].
///
/// # Errors
///
/// Returns [`GenerateError`] for an absent value (with `check_null`), a
/// disallowed string, a transformer failure, or an invalid emitted line.
pub fn expand_object_presented_tag<T, F>(
    tag_name: &str,
    value: Option<&Presented<T>>,
    mut transformer: F,
    lines: &mut LineBuffer,
    options: ObjectTagOptions,
) -> Result<(), GenerateError>
where
    F: FnMut(&Presented<T>, &str, &mut LineBuffer) -> Result<Emit, GenerateError>,
{
    validate_tag_name(tag_name)?;
    let tag_options = TagOptions {
        check_null: options.check_null,
    };
    let Some(value) = value else {
        return Ok(expand_tag(tag_name, None, lines, tag_options)?);
    };
    if let Presented::Text(text) = value {
        match options.strings {
            StringsBehavior::Passthrough => {
                return Ok(expand_tag(tag_name, Some(text), lines, tag_options)?);
            }
            StringsBehavior::Transform => {}
            StringsBehavior::Disallow => {
                return Err(ValidationError::StringDisallowed {
                    tag: tag_name.to_string(),
                }
                .into());
            }
        }
    }
    match transformer(value, tag_name, lines)? {
        Emit::None => {}
        Emit::One(line) => expand_multi_tag(tag_name, &OneOrMany::One(line), lines)?,
        Emit::Many(values) => expand_multi_tag(tag_name, &OneOrMany::Many(values), lines)?,
    }
    Ok(())
}

/// Applies [`expand_object_presented_tag`] to every element of an array.
///
/// # Errors
///
/// Returns [`ValidationError::NotArray`] for a scalar value, otherwise the
/// first element failure.
pub fn expand_multi_object_presented_tag<T, F>(
    tag_name: &str,
    values: &OneOrMany<Presented<T>>,
    mut transformer: F,
    lines: &mut LineBuffer,
    options: ObjectTagOptions,
) -> Result<(), GenerateError>
where
    F: FnMut(&Presented<T>, &str, &mut LineBuffer) -> Result<Emit, GenerateError>,
{
    validate_tag_name(tag_name)?;
    let OneOrMany::Many(values) = values else {
        return Err(ValidationError::NotArray {
            tag: tag_name.to_string(),
        }
        .into());
    };
    for item in values {
        expand_object_presented_tag(tag_name, Some(item), &mut transformer, lines, options)?;
    }
    Ok(())
}
