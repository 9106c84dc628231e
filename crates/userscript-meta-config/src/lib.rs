// crates/userscript-meta-config/src/lib.rs
// ============================================================================
// Module: Userscript Metadata Config Library
// Description: Generator defaults loaded from `userscript-meta.toml`.
// Purpose: Turn a validated config file into core generator options.
// Dependencies: userscript-meta-core, serde, toml
// ============================================================================

//! ## Overview
//! `userscript-meta-config` owns the on-disk configuration for header
//! generation: output wrapping, comment style, and `{id}` templates that
//! resolve resource sources and URLs. Loading is strict; unknown keys,
//! oversized files, and malformed templates are rejected.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
