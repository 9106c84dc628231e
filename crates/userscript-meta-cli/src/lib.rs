// crates/userscript-meta-cli/src/lib.rs
// ============================================================================
// Module: Userscript Metadata CLI Library
// Description: File handling behind the `userscript-meta` binary.
// Purpose: Load metadata and config, render headers, write outputs, and
//          detect header drift in scripts.
// Dependencies: serde_json, tempfile, thiserror, tracing,
//               userscript-meta-config, userscript-meta-core
// ============================================================================

//! ## Overview
//! The binary is a thin clap layer over [`render_header`], [`write_output`],
//! and [`check_script`]. Metadata files are JSON, bounded at
//! [`MAX_META_FILE_SIZE`]. Outputs are written to a temporary file beside the
//! destination and renamed into place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;
use userscript_meta_config::ConfigError;
use userscript_meta_config::GeneratorConfig;
use userscript_meta_core::CommentStyle;
use userscript_meta_core::GenerateError;
use userscript_meta_core::GeneratorOptions;
use userscript_meta_core::TracingWarnings;
use userscript_meta_core::UserScriptMeta;
use userscript_meta_core::generate;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum metadata file size in bytes.
pub const MAX_META_FILE_SIZE: usize = 1024 * 1024;
/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "USERSCRIPT_META_LOG";
/// Log filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// IO error while reading or writing files.
    #[error("io error: {0}")]
    Io(String),
    /// Metadata file could not be decoded.
    #[error("metadata error: {0}")]
    Meta(String),
    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Header generation failed.
    #[error("generation failed: {0}")]
    Generate(#[from] GenerateError),
    /// A script does not start with the generated header.
    #[error("header drift detected in {0}. Run userscript-meta generate.")]
    Drift(String),
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOverrides {
    /// Comment style replacing the configured one.
    pub comment_style: Option<CommentStyle>,
    /// Drop the `==UserScript==` markers.
    pub no_block: bool,
}

impl OutputOverrides {
    /// Applies the overrides to generator options.
    #[must_use]
    pub fn apply(self, mut options: GeneratorOptions) -> GeneratorOptions {
        if let Some(style) = self.comment_style {
            options = options.with_comment_style(style);
        }
        if self.no_block {
            options = options.with_include_block(false);
        }
        options
    }
}

/// Reads and decodes a JSON metadata file.
///
/// # Errors
///
/// Returns [`CliError`] when the file is unreadable, too large, not UTF-8, or
/// not a metadata record.
pub fn load_meta(path: &Path) -> Result<UserScriptMeta, CliError> {
    let bytes = fs::read(path).map_err(|err| CliError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_META_FILE_SIZE {
        return Err(CliError::Meta("metadata file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| CliError::Meta("metadata file must be utf-8".to_string()))?;
    serde_json::from_str(content).map_err(|err| CliError::Meta(err.to_string()))
}

/// Renders the header for a metadata file.
///
/// The configuration comes from `config_path` when given, otherwise from the
/// environment override or the default file if present.
///
/// # Errors
///
/// Returns [`CliError`] when loading or generation fails.
pub fn render_header(
    meta_path: &Path,
    config_path: Option<&Path>,
    overrides: OutputOverrides,
) -> Result<String, CliError> {
    let meta = load_meta(meta_path)?;
    let config = GeneratorConfig::load_or_default(config_path)?;
    let options = overrides.apply(config.to_options());
    tracing::debug!(meta = %meta_path.display(), ?options, "rendering header");
    Ok(generate(&meta, options, &TracingWarnings)?)
}

// ============================================================================
// SECTION: Drift Check
// ============================================================================

/// Verifies that a script begins with the given header.
///
/// The header must be followed by a line break or the end of the file.
///
/// # Errors
///
/// Returns [`CliError::Drift`] when the script does not begin with the header.
pub fn check_script(script_path: &Path, header: &str) -> Result<(), CliError> {
    let script = fs::read_to_string(script_path)
        .map_err(|err| CliError::Io(format!("{}: {err}", script_path.display())))?;
    let matches = script
        .strip_prefix(header)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['\n', '\r']));
    if !matches {
        return Err(CliError::Drift(script_path.display().to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes the generated contents to the specified path.
///
/// Parent directories are created when missing. Contents go to a temporary
/// file alongside the destination which is then renamed into place, replacing
/// any existing file.
///
/// # Errors
///
/// Returns [`CliError::Io`] when any filesystem step fails.
pub fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    let parent = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|err| CliError::Io(err.to_string()))?;
            parent
        }
        None => Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".userscript-meta-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|err| CliError::Io(err.to_string()))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| CliError::Io(err.to_string()))?;
    temp.persist(path).map_err(|err| CliError::Io(format!("{}: {}", path.display(), err.error)))?;
    Ok(())
}
