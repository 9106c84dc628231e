// crates/userscript-meta-config/src/config.rs
// ============================================================================
// Module: Generator Configuration
// Description: Loading and validation of `userscript-meta.toml`.
// Purpose: Provide strict config parsing with hard limits and conversion into
//          core generator options.
// Dependencies: serde, thiserror, toml, userscript-meta-core
// ============================================================================

//! ## Overview
//! Configuration is read from a TOML file whose path comes from the caller,
//! the `USERSCRIPT_META_CONFIG` environment variable, or the default
//! `userscript-meta.toml`, in that order. Files are bounded at 1 MiB and
//! unknown keys are rejected.
//!
//! ```toml
//! [output]
//! include_block = true
//! comment_style = "slashes"
//!
//! [resources]
//! src_template = "dist/{id}.js"
//! url_template = "https://cdn.example.com/{id}.js"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use userscript_meta_core::CommentStyle;
use userscript_meta_core::GeneratorOptions;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "userscript-meta.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "USERSCRIPT_META_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a resource template.
pub(crate) const MAX_TEMPLATE_LENGTH: usize = 2048;
/// Placeholder replaced by the resource identifier.
pub const ID_PLACEHOLDER: &str = "{id}";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Header generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output wrapping settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Resource resolution templates.
    #[serde(default)]
    pub resources: ResourceConfig,
}

impl GeneratorConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        Self::load_from(&resolved)
    }

    /// Loads configuration when one is present, otherwise returns defaults.
    ///
    /// An explicit path or an environment override must exist; only the
    /// implicit default filename may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present file fails loading or validation.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = env::var(CONFIG_ENV_VAR).ok();
        let implicit = path.is_none() && env_path.is_none();
        let resolved = resolve_path(path, env_path)?;
        if implicit && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&resolved)
    }

    /// Parses configuration text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resources.validate()
    }

    /// Builds generator options from this configuration.
    #[must_use]
    pub fn to_options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::default()
            .with_include_block(self.output.include_block)
            .with_comment_style(self.output.comment_style);
        if let Some(template) = self.resources.src_template.clone() {
            options = options.with_src_resolver(move |descriptor| {
                Some(PathBuf::from(expand_template(&template, &descriptor.id)))
            });
        }
        if let Some(template) = self.resources.url_template.clone() {
            options = options
                .with_url_resolver(move |descriptor| Some(expand_template(&template, &descriptor.id)));
        }
        options
    }

    /// Reads and validates a config file at a resolved path.
    fn load_from(resolved: &Path) -> Result<Self, ConfigError> {
        check_path_limits("config file path", resolved)?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }
}

/// Output wrapping settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Wrap the header in `==UserScript==` markers.
    #[serde(default = "default_include_block")]
    pub include_block: bool,
    /// Comment style of the rendered header.
    #[serde(default)]
    pub comment_style: CommentStyle,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_block: default_include_block(),
            comment_style: CommentStyle::default(),
        }
    }
}

/// Resource resolution templates.
///
/// Each template is expanded by replacing every `{id}` with the resource
/// identifier. A template is used only for descriptors that lack the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    /// Template producing the local source path of a resource.
    #[serde(default)]
    pub src_template: Option<String>,
    /// Template producing the public URL of a resource.
    #[serde(default)]
    pub url_template: Option<String>,
}

impl ResourceConfig {
    /// Validates both templates.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(template) = &self.src_template {
            validate_template("resources.src_template", template)?;
            check_path_limits("resources.src_template", Path::new(template.trim()))?;
        }
        if let Some(template) = &self.url_template {
            validate_template("resources.url_template", template)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for `output.include_block`.
const fn default_include_block() -> bool {
    true
}

/// Replaces every `{id}` placeholder with the resource identifier.
#[must_use]
pub fn expand_template(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, id)
}

/// Resolves the config path from the argument, the environment, or the default.
fn resolve_path(path: Option<&Path>, env_path: Option<String>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        let env_path = PathBuf::from(env_path);
        check_path_limits(CONFIG_ENV_VAR, &env_path)?;
        return Ok(env_path);
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Rejects paths whose total or per-segment length exceeds filesystem limits.
fn check_path_limits(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{field} is longer than {MAX_TOTAL_PATH_LENGTH} bytes"
        )));
    }
    let oversized =
        path.components().any(|segment| segment.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH);
    if oversized {
        return Err(ConfigError::Invalid(format!(
            "{field} has a segment longer than {MAX_PATH_COMPONENT_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Validates a template: non-empty, single-line, bounded, and keyed by `{id}`.
fn validate_template(field: &str, template: &str) -> Result<(), ConfigError> {
    if template.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if template.len() > MAX_TEMPLATE_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if template.contains(['\n', '\r']) {
        return Err(ConfigError::Invalid(format!("{field} must be a single line")));
    }
    if !template.contains(ID_PLACEHOLDER) {
        return Err(ConfigError::Invalid(format!("{field} must contain {ID_PLACEHOLDER}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
