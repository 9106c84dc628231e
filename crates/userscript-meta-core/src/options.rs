// crates/userscript-meta-core/src/options.rs
// ============================================================================
// Module: Generator Options
// Description: Output settings and resource resolver callbacks.
// Purpose: Carry caller-supplied generation settings into the generator.
// Dependencies: crate::{comments, model}
// ============================================================================

//! ## Overview
//! [`GeneratorOptions`] holds the rendering switches and the two optional
//! resource resolvers consulted when a descriptor has no explicit `src` or
//! `url`.

use std::fmt;
use std::path::PathBuf;

use crate::comments::CommentStyle;
use crate::model::ResourceDescriptor;

/// Callback resolving the local source file of a resource.
pub type ResourceSrcResolver = Box<dyn Fn(&ResourceDescriptor) -> Option<PathBuf>>;

/// Callback resolving the public URL of a resource.
///
/// The descriptor passed in already carries the resolved `src`.
pub type ResourceUrlResolver = Box<dyn Fn(&ResourceDescriptor) -> Option<String>>;

/// Settings for one generator.
pub struct GeneratorOptions {
    /// Wrap output in `==UserScript==` / `==/UserScript==`.
    pub include_block: bool,
    /// Comment style used for the final text.
    pub comment_style: CommentStyle,
    /// Fallback for resources without `src`.
    pub resolve_resource_src: Option<ResourceSrcResolver>,
    /// Fallback for resources without `url`.
    pub resolve_resource_url: Option<ResourceUrlResolver>,
}

impl GeneratorOptions {
    /// Sets the block switch.
    #[must_use]
    pub fn with_include_block(mut self, include_block: bool) -> Self {
        self.include_block = include_block;
        self
    }

    /// Sets the comment style.
    #[must_use]
    pub fn with_comment_style(mut self, comment_style: CommentStyle) -> Self {
        self.comment_style = comment_style;
        self
    }

    /// Installs a source resolver.
    #[must_use]
    pub fn with_src_resolver(
        mut self,
        resolver: impl Fn(&ResourceDescriptor) -> Option<PathBuf> + 'static,
    ) -> Self {
        self.resolve_resource_src = Some(Box::new(resolver));
        self
    }

    /// Installs a URL resolver.
    #[must_use]
    pub fn with_url_resolver(
        mut self,
        resolver: impl Fn(&ResourceDescriptor) -> Option<String> + 'static,
    ) -> Self {
        self.resolve_resource_url = Some(Box::new(resolver));
        self
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            include_block: true,
            comment_style: CommentStyle::Block,
            resolve_resource_src: None,
            resolve_resource_url: None,
        }
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("include_block", &self.include_block)
            .field("comment_style", &self.comment_style)
            .field("resolve_resource_src", &self.resolve_resource_src.is_some())
            .field("resolve_resource_url", &self.resolve_resource_url.is_some())
            .finish()
    }
}
