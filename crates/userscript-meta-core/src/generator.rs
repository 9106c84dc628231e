// crates/userscript-meta-core/src/generator.rs
// ============================================================================
// Module: Header Generator
// Description: Field-ordered orchestration of the tag expanders.
// Purpose: Turn a metadata record into the rendered userscript header.
// Dependencies: crate::{comments, error, expanders, hashing, lines, locale,
//               model, options, resource, warnings}
// ============================================================================

//! ## Overview
//! Generation runs in two phases. While building, the generator walks
//! [`FIELD_ORDER`] and expands each present field into the shared
//! [`LineBuffer`] with the expander its row selects. Absent optional fields
//! are skipped; absent required fields (`name`, `version`, `author`) fail with
//! a null-value error naming the tag. While
//! finalizing, the lines are wrapped in `==UserScript==` markers when
//! configured and rendered through the selected [`crate::CommentStyle`].
//!
//! Output is deterministic for a fixed record, options, and resolver.
//! Any error aborts the call; no partial header is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::GenerateError;
use crate::error::ValidationError;
use crate::expanders::Emit;
use crate::expanders::LocalizableTagOptions;
use crate::expanders::ObjectTagOptions;
use crate::expanders::StringsBehavior;
use crate::expanders::TagOptions;
use crate::expanders::expand_conditional_tag;
use crate::expanders::expand_custom_tag;
use crate::expanders::expand_localizable_tag;
use crate::expanders::expand_localizable_value;
use crate::expanders::expand_multi_object_presented_tag;
use crate::expanders::expand_multi_tag;
use crate::expanders::expand_object_presented_tag;
use crate::expanders::expand_tag;
use crate::hashing::ContentHasher;
use crate::hashing::StreamingFileHasher;
use crate::lines::LineBuffer;
use crate::locale::Bcp47LocaleResolver;
use crate::locale::LocaleContext;
use crate::locale::LocaleResolver;
use crate::model::AntiFeature;
use crate::model::IconDescriptor;
use crate::model::Localizable;
use crate::model::OneOrMany;
use crate::model::Presented;
use crate::model::RegexPattern;
use crate::model::ResourceDescriptor;
use crate::model::UserDescriptor;
use crate::model::UserScriptMeta;
use crate::options::GeneratorOptions;
use crate::resource::resolve_resource_url;
use crate::warnings::WarningSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// First line of a wrapped header.
pub const USERSCRIPT_BLOCK_START: &str = "==UserScript==";
/// Last line of a wrapped header.
pub const USERSCRIPT_BLOCK_END: &str = "==/UserScript==";

// ============================================================================
// SECTION: Field Table
// ============================================================================

/// Reads a scalar field.
pub type ScalarField = for<'a> fn(&'a UserScriptMeta) -> Option<&'a str>;
/// Reads a boolean field.
pub type FlagField = fn(&UserScriptMeta) -> Option<bool>;
/// Reads a multi-value string field.
pub type ListField = for<'a> fn(&'a UserScriptMeta) -> Option<&'a OneOrMany<String>>;
/// Reads a localizable text field.
pub type TextField = for<'a> fn(&'a UserScriptMeta) -> Option<&'a OneOrMany<Localizable>>;
/// Reads a string-or-descriptor field.
pub type PresentedField<T> = for<'a> fn(&'a UserScriptMeta) -> Option<&'a Presented<T>>;
/// Reads an array of string-or-descriptor values.
pub type PresentedListField<T> =
    for<'a> fn(&'a UserScriptMeta) -> Option<&'a OneOrMany<Presented<T>>>;
/// Reads the custom tag map.
pub type CustomField = for<'a> fn(&'a UserScriptMeta) -> Option<&'a IndexMap<String, Value>>;

/// Expander selected for a field, with the accessor reading its value.
#[derive(Clone, Copy)]
pub enum FieldExpander {
    /// [`expand_tag`]
    Primitive(ScalarField),
    /// [`expand_conditional_tag`]
    Conditional(FlagField),
    /// [`expand_multi_tag`]
    Multi(ListField),
    /// [`expand_localizable_tag`]
    Localizable(TextField),
    /// [`expand_object_presented_tag`] rendering user signatures.
    User(PresentedField<UserDescriptor>),
    /// [`expand_multi_object_presented_tag`] rendering user signatures.
    Users(PresentedListField<UserDescriptor>),
    /// [`expand_object_presented_tag`] emitting `@icon64` / `@icon`.
    Icon(PresentedField<IconDescriptor>),
    /// [`expand_multi_object_presented_tag`] rendering `/regex/flags`.
    Patterns(PresentedListField<RegexPattern>),
    /// [`expand_multi_object_presented_tag`] emitting `type reason` lines.
    AntiFeatures(PresentedListField<AntiFeature>),
    /// [`expand_multi_object_presented_tag`] emitting resolved URLs.
    Scripts(PresentedListField<ResourceDescriptor>),
    /// [`expand_multi_object_presented_tag`] emitting `id url` pairs.
    Resources(PresentedListField<ResourceDescriptor>),
    /// [`expand_custom_tag`], once per entry, under the entry's own name.
    Custom(CustomField),
}

impl FieldExpander {
    /// Returns true when the record holds a value for the field.
    #[must_use]
    pub fn is_present(self, meta: &UserScriptMeta) -> bool {
        match self {
            Self::Primitive(read) => read(meta).is_some(),
            Self::Conditional(read) => read(meta).is_some(),
            Self::Multi(read) => read(meta).is_some(),
            Self::Localizable(read) => read(meta).is_some(),
            Self::User(read) => read(meta).is_some(),
            Self::Users(read) => read(meta).is_some(),
            Self::Icon(read) => read(meta).is_some(),
            Self::Patterns(read) => read(meta).is_some(),
            Self::AntiFeatures(read) => read(meta).is_some(),
            Self::Scripts(read) | Self::Resources(read) => read(meta).is_some(),
            Self::Custom(read) => read(meta).is_some(),
        }
    }
}

impl fmt::Debug for FieldExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive(_) => "Primitive",
            Self::Conditional(_) => "Conditional",
            Self::Multi(_) => "Multi",
            Self::Localizable(_) => "Localizable",
            Self::User(_) => "User",
            Self::Users(_) => "Users",
            Self::Icon(_) => "Icon",
            Self::Patterns(_) => "Patterns",
            Self::AntiFeatures(_) => "AntiFeatures",
            Self::Scripts(_) => "Scripts",
            Self::Resources(_) => "Resources",
            Self::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

/// One row of the field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Record key, as spelled in the metadata document.
    pub key: &'static str,
    /// Tag emitted for the field (empty for custom tags).
    pub tag: &'static str,
    /// Expander handling the field.
    pub expander: FieldExpander,
    /// Whether an absent value fails generation. Absent optional fields are
    /// skipped.
    pub required: bool,
}

/// Builds a table row.
const fn rule(
    key: &'static str,
    tag: &'static str,
    expander: FieldExpander,
    required: bool,
) -> FieldRule {
    FieldRule {
        key,
        tag,
        expander,
        required,
    }
}

/// Emission order of the header. Userscript managers and tooling rely on it.
pub const FIELD_ORDER: &[FieldRule] = &[
    rule("name", "name", FieldExpander::Localizable(|meta| meta.name.as_ref()), true),
    rule(
        "description",
        "description",
        FieldExpander::Localizable(|meta| meta.description.as_ref()),
        false,
    ),
    rule("version", "version", FieldExpander::Primitive(|meta| meta.version.as_deref()), true),
    rule("author", "author", FieldExpander::User(|meta| meta.author.as_ref()), true),
    rule("contributors", "contributor", FieldExpander::Users(|meta| meta.contributors.as_ref()), false),
    rule("namespace", "namespace", FieldExpander::Primitive(|meta| meta.namespace.as_deref()), false),
    rule("homepage", "homepageURL", FieldExpander::Primitive(|meta| meta.homepage.as_deref()), false),
    rule("license", "license", FieldExpander::Primitive(|meta| meta.license.as_deref()), false),
    rule("icon", "icon", FieldExpander::Icon(|meta| meta.icon.as_ref()), false),
    rule("updateUrl", "updateURL", FieldExpander::Primitive(|meta| meta.update_url.as_deref()), false),
    rule(
        "downloadUrl",
        "downloadURL",
        FieldExpander::Primitive(|meta| meta.download_url.as_deref()),
        false,
    ),
    rule("supportUrl", "supportURL", FieldExpander::Primitive(|meta| meta.support_url.as_deref()), false),
    rule("include", "include", FieldExpander::Patterns(|meta| meta.include.as_ref()), false),
    rule("match", "match", FieldExpander::Multi(|meta| meta.matches.as_ref()), false),
    rule("exclude", "exclude", FieldExpander::Patterns(|meta| meta.exclude.as_ref()), false),
    rule("connect", "connect", FieldExpander::Multi(|meta| meta.connect.as_ref()), false),
    rule("runAt", "run-at", FieldExpander::Primitive(|meta| meta.run_at.as_deref()), false),
    rule("grant", "grant", FieldExpander::Multi(|meta| meta.grant.as_ref()), false),
    rule(
        "antiFeatures",
        "antifeature",
        FieldExpander::AntiFeatures(|meta| meta.anti_features.as_ref()),
        false,
    ),
    rule("noFrames", "noframes", FieldExpander::Conditional(|meta| meta.no_frames), false),
    rule("noCompat", "nocompat", FieldExpander::Multi(|meta| meta.no_compat.as_ref()), false),
    rule(
        "injectInto",
        "inject-into",
        FieldExpander::Primitive(|meta| meta.inject_into.as_deref()),
        false,
    ),
    rule("require", "require", FieldExpander::Scripts(|meta| meta.require.as_ref()), false),
    rule("resources", "resource", FieldExpander::Resources(|meta| meta.resources.as_ref()), false),
    rule("customTags", "", FieldExpander::Custom(|meta| meta.custom_tags.as_ref()), false),
];

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Header generator bundling options with its collaborators.
///
/// # Invariants
/// - Holds no state between calls; each call builds a fresh [`LineBuffer`].
pub struct Generator {
    /// Output and resource resolution settings.
    options: GeneratorOptions,
    /// Locale key resolver for localized tags.
    locales: Box<dyn LocaleResolver>,
    /// Hasher for `auto` resource hashes.
    hasher: Box<dyn ContentHasher>,
}

impl Generator {
    /// Creates a generator with the default collaborators.
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            locales: Box::new(Bcp47LocaleResolver::new()),
            hasher: Box::new(StreamingFileHasher),
        }
    }

    /// Replaces the locale resolver.
    #[must_use]
    pub fn with_locale_resolver(mut self, resolver: impl LocaleResolver + 'static) -> Self {
        self.locales = Box::new(resolver);
        self
    }

    /// Replaces the content hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Returns the generator options.
    #[must_use]
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Renders the header text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when any field fails expansion.
    pub fn generate(
        &self,
        meta: &UserScriptMeta,
        warnings: &dyn WarningSink,
    ) -> Result<String, GenerateError> {
        let lines = self.generate_lines(meta, warnings)?;
        Ok(self.options.comment_style.render(lines.as_slice()))
    }

    /// Builds the header lines, including block markers when configured.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when any field fails expansion.
    pub fn generate_lines(
        &self,
        meta: &UserScriptMeta,
        warnings: &dyn WarningSink,
    ) -> Result<LineBuffer, GenerateError> {
        let locale = LocaleContext::new(self.locales.as_ref(), warnings);
        let mut lines = LineBuffer::new();
        if self.options.include_block {
            lines.push(USERSCRIPT_BLOCK_START);
        }
        for rule in FIELD_ORDER {
            if !rule.expander.is_present(meta) {
                if rule.required {
                    return Err(ValidationError::NullValue {
                        tag: rule.tag.to_string(),
                    }
                    .into());
                }
                continue;
            }
            self.expand_field(rule, meta, &mut lines, locale)?;
        }
        if self.options.include_block {
            lines.push(USERSCRIPT_BLOCK_END);
        }
        Ok(lines)
    }

    /// Expands one present field with the expander its row selects.
    fn expand_field(
        &self,
        rule: &FieldRule,
        meta: &UserScriptMeta,
        lines: &mut LineBuffer,
        locale: LocaleContext<'_>,
    ) -> Result<(), GenerateError> {
        let tag = rule.tag;
        let options = ObjectTagOptions::default();
        match rule.expander {
            FieldExpander::Primitive(read) => {
                expand_tag(tag, read(meta), lines, TagOptions::default())?;
            }
            FieldExpander::Conditional(read) => {
                expand_conditional_tag(tag, read(meta).unwrap_or(false), lines)?;
            }
            FieldExpander::Multi(read) => {
                if let Some(values) = read(meta) {
                    expand_multi_tag(tag, values, lines)?;
                }
            }
            FieldExpander::Localizable(read) => {
                let text_options = LocalizableTagOptions::default();
                expand_localizable_tag(tag, read(meta), lines, &text_options, locale)?;
            }
            FieldExpander::User(read) => {
                expand_object_presented_tag(tag, read(meta), user_signature, lines, options)?;
            }
            FieldExpander::Users(read) => {
                if let Some(users) = read(meta) {
                    expand_multi_object_presented_tag(tag, users, user_signature, lines, options)?;
                }
            }
            FieldExpander::Icon(read) => {
                let icon_options = ObjectTagOptions::with_strings(StringsBehavior::Disallow);
                expand_object_presented_tag(tag, read(meta), expand_icons, lines, icon_options)?;
            }
            FieldExpander::Patterns(read) => {
                if let Some(patterns) = read(meta) {
                    expand_multi_object_presented_tag(tag, patterns, pattern_text, lines, options)?;
                }
            }
            FieldExpander::AntiFeatures(read) => {
                if let Some(anti_features) = read(meta) {
                    expand_multi_object_presented_tag(
                        tag,
                        anti_features,
                        |value: &Presented<AntiFeature>, tag: &str, lines: &mut LineBuffer| {
                            expand_anti_feature(value, tag, lines, locale)
                        },
                        lines,
                        options,
                    )?;
                }
            }
            FieldExpander::Scripts(read) => {
                if let Some(scripts) = read(meta) {
                    expand_multi_object_presented_tag(
                        tag,
                        scripts,
                        |value: &Presented<ResourceDescriptor>, _: &str, _: &mut LineBuffer| {
                            Ok(match value {
                                Presented::Text(text) => Emit::One(text.clone()),
                                Presented::Object(descriptor) => {
                                    Emit::One(self.resource_url(descriptor)?)
                                }
                            })
                        },
                        lines,
                        options,
                    )?;
                }
            }
            FieldExpander::Resources(read) => {
                if let Some(resources) = read(meta) {
                    expand_multi_object_presented_tag(
                        tag,
                        resources,
                        |value: &Presented<ResourceDescriptor>, _: &str, _: &mut LineBuffer| {
                            Ok(match value {
                                Presented::Text(text) => Emit::One(text.clone()),
                                Presented::Object(descriptor) => Emit::One(format!(
                                    "{} {}",
                                    descriptor.id,
                                    self.resource_url(descriptor)?
                                )),
                            })
                        },
                        lines,
                        options,
                    )?;
                }
            }
            FieldExpander::Custom(read) => {
                for (name, value) in read(meta).into_iter().flatten() {
                    expand_custom_tag(name, value, lines)?;
                }
            }
        }
        Ok(())
    }

    /// Resolves a resource URL with this generator's options and hasher.
    fn resource_url(&self, descriptor: &ResourceDescriptor) -> Result<String, GenerateError> {
        resolve_resource_url(descriptor, &self.options, self.hasher.as_ref())
    }
}

/// Renders a header with the default collaborators.
///
/// # Errors
///
/// Returns [`GenerateError`] when any field fails expansion.
pub fn generate(
    meta: &UserScriptMeta,
    options: GeneratorOptions,
    warnings: &dyn WarningSink,
) -> Result<String, GenerateError> {
    Generator::new(options).generate(meta, warnings)
}

// ============================================================================
// SECTION: Field Transformers
// ============================================================================

/// `author` / `contributor`: renders a user signature.
fn user_signature(
    value: &Presented<UserDescriptor>,
    _tag: &str,
    _lines: &mut LineBuffer,
) -> Result<Emit, GenerateError> {
    Ok(match value {
        Presented::Text(text) => Emit::One(text.clone()),
        Presented::Object(user) => Emit::One(user.signature()),
    })
}

/// `include` / `exclude`: renders a regular expression as `/source/flags`.
fn pattern_text(
    value: &Presented<RegexPattern>,
    _tag: &str,
    _lines: &mut LineBuffer,
) -> Result<Emit, GenerateError> {
    Ok(match value {
        Presented::Text(text) => Emit::One(text.clone()),
        Presented::Object(pattern) => Emit::One(pattern.to_string()),
    })
}

/// `icon`: emits `@icon64` for the larger icon and `@icon` for the small one.
fn expand_icons(
    value: &Presented<IconDescriptor>,
    _tag: &str,
    lines: &mut LineBuffer,
) -> Result<Emit, GenerateError> {
    let icon = match value {
        Presented::Text(text) => return Ok(Emit::One(text.clone())),
        Presented::Object(icon) => icon,
    };
    if icon.larger.is_some() {
        expand_tag("icon64", icon.larger.as_deref(), lines, TagOptions::default())?;
    }
    if icon.small.is_some() {
        expand_tag("icon", icon.small.as_deref(), lines, TagOptions::default())?;
    }
    Ok(Emit::None)
}

/// `antifeature`: emits `@antifeature[:locale] kind reason` lines.
fn expand_anti_feature(
    value: &Presented<AntiFeature>,
    tag: &str,
    lines: &mut LineBuffer,
    locale: LocaleContext<'_>,
) -> Result<Emit, GenerateError> {
    let anti_feature = match value {
        Presented::Text(text) => return Ok(Emit::One(text.clone())),
        Presented::Object(anti_feature) => anti_feature,
    };
    let kind = anti_feature.kind.as_str();
    let prefix = |translation: &str| format!("{kind} {translation}");
    let options = LocalizableTagOptions {
        transform_translation: Some(&prefix),
        ..LocalizableTagOptions::default()
    };
    expand_localizable_value(tag, &anti_feature.reason, lines, &options, locale)?;
    Ok(Emit::None)
}
