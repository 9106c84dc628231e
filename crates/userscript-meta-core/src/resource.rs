// crates/userscript-meta-core/src/resource.rs
// ============================================================================
// Module: Resource URL Resolution
// Description: Final URL and integrity fragment for `@require`/`@resource`.
// Purpose: Resolve source paths, compute `auto` hashes, merge URL fragments.
// Dependencies: tracing, crate::{error, hashing, model, options}
// ============================================================================

//! ## Overview
//! A resource URL is built in four steps:
//! 1. the source path comes from `src`, else the options' source resolver;
//! 2. a hash descriptor yields an `algorithm=digest` fragment, computing the
//!    digest from the (absolute) source path when the value is `auto`;
//! 3. the URL comes from `url`, else the options' URL resolver, which sees
//!    the descriptor with its resolved `src`;
//! 4. a fragment already present on the URL is appended after the hash
//!    fragment, separated by `;`.
//!
//! The hashed file is trusted to match what is served at the URL; no
//! consistency check is made between the two.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::path::Path;
use std::path::PathBuf;

use crate::error::GenerateError;
use crate::error::ValidationError;
use crate::hashing::ContentHasher;
use crate::hashing::HashAlgorithm;
use crate::hashing::HashError;
use crate::model::HashValue;
use crate::model::ResourceDescriptor;
use crate::options::GeneratorOptions;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the final URL of a resource, including its hash fragment.
///
/// # Errors
///
/// Returns [`GenerateError`] when an `auto` hash has no source, the source
/// cannot be hashed, or no URL is set or resolvable.
pub fn resolve_resource_url(
    descriptor: &ResourceDescriptor,
    options: &GeneratorOptions,
    hasher: &dyn ContentHasher,
) -> Result<String, GenerateError> {
    let source = descriptor.src.clone().or_else(|| {
        options.resolve_resource_src.as_ref().and_then(|resolve| resolve(descriptor))
    });

    let mut fragment = match &descriptor.hash {
        None => None,
        Some(hash) => {
            let digest = match &hash.value {
                HashValue::Literal(digest) => digest.clone(),
                HashValue::Auto => {
                    let source = source.as_deref().ok_or_else(|| {
                        ValidationError::HashSourceUnresolved {
                            id: descriptor.id.clone(),
                        }
                    })?;
                    let path = absolute_path(source)?;
                    tracing::debug!(
                        resource = %descriptor.id,
                        path = %path.display(),
                        algorithm = hash.algorithm.as_str(),
                        "hashing resource source"
                    );
                    hasher.hash_file(&path, hash.algorithm)?
                }
            };
            Some(hash_fragment(hash.algorithm, &digest))
        }
    };

    let resolved = ResourceDescriptor {
        src: source,
        ..descriptor.clone()
    };
    let url = descriptor
        .url
        .clone()
        .or_else(|| options.resolve_resource_url.as_ref().and_then(|resolve| resolve(&resolved)))
        .ok_or_else(|| ValidationError::UrlUnresolved {
            id: descriptor.id.clone(),
        })?;

    let mut parts = url.split('#');
    let base = parts.next().unwrap_or_default();
    if let Some(existing) = parts.next() {
        fragment = Some(match fragment {
            Some(hash) => format!("{hash};{existing}"),
            None => existing.to_string(),
        });
    }

    Ok(match fragment.filter(|fragment| !fragment.is_empty()) {
        Some(fragment) => format!("{base}#{fragment}"),
        None => base.to_string(),
    })
}

/// Formats `algorithm=digest`.
fn hash_fragment(algorithm: HashAlgorithm, digest: &str) -> String {
    format!("{}={digest}", algorithm.as_str())
}

/// Resolves relative paths against the current working directory.
fn absolute_path(path: &Path) -> Result<PathBuf, HashError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|err| HashError::WorkingDirectory(err.to_string()))?;
    Ok(cwd.join(path))
}
