// crates/userscript-meta-core/tests/generator.rs
// ============================================================================
// Module: Header Generator Tests
// Description: End-to-end header rendering from decoded metadata records.
// ============================================================================
//! ## Overview
//! Decodes metadata records from JSON and checks the exact header text,
//! the field order, comment styles, and all-or-nothing failure behavior.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::path::Path;

use serde_json::json;
use userscript_meta_core::CollectedWarnings;
use userscript_meta_core::CommentStyle;
use userscript_meta_core::ContentHasher;
use userscript_meta_core::FIELD_ORDER;
use userscript_meta_core::GenerateError;
use userscript_meta_core::Generator;
use userscript_meta_core::GeneratorOptions;
use userscript_meta_core::HashAlgorithm;
use userscript_meta_core::HashError;
use userscript_meta_core::NoopWarnings;
use userscript_meta_core::TracingWarnings;
use userscript_meta_core::UserScriptMeta;
use userscript_meta_core::ValidationError;
use userscript_meta_core::comments::block_comment;
use userscript_meta_core::generate;

use crate::common::meta_from_json;
use crate::common::meta_from_str;

/// Raw output with block markers.
fn raw_options() -> GeneratorOptions {
    GeneratorOptions::default().with_comment_style(CommentStyle::None)
}

fn render(meta: &UserScriptMeta) -> String {
    generate(meta, raw_options(), &NoopWarnings).expect("header should render")
}

/// Hasher returning a fixed digest.
struct FixedHasher;

impl ContentHasher for FixedHasher {
    fn hash_file(&self, _path: &Path, _algorithm: HashAlgorithm) -> Result<String, HashError> {
        Ok("feed".to_string())
    }
}

// ============================================================================
// SECTION: Happy Path
// ============================================================================

#[test]
fn minimal_record_renders_exact_header() {
    let meta = UserScriptMeta::new("Test", "1.0", "Alice");
    assert_eq!(
        render(&meta),
        "==UserScript==\n@name Test\n@version 1.0\n@author Alice\n==/UserScript=="
    );
}

#[test]
fn full_record_renders_every_field_in_order() {
    let meta = meta_from_json(json!({
        "customTags": {"priority": 3, "sandbox": "JavaScript"},
        "resources": [{"id": "style", "url": "https://cdn.example/style.css"}],
        "require": [
            "https://cdn.example/jquery.js",
            {"id": "lodash", "url": "https://cdn.example/lodash.js", "hash": ["abc123", "sha256"]}
        ],
        "injectInto": "content",
        "noCompat": ["Chrome"],
        "noFrames": true,
        "antiFeatures": [
            ["ads", "Shows ads"],
            ["tracking", {"@": "Tracks you", "de": "Verfolgt dich"}]
        ],
        "grant": ["GM_getValue", "GM_setValue"],
        "runAt": "document-start",
        "connect": ["api.example.com"],
        "exclude": ["https://example.com/admin/*"],
        "match": "https://example.com/*",
        "include": ["https://example.com/*", {"regex": "^https://example\\.org/", "flags": "i"}],
        "supportUrl": "https://example.com/issues",
        "downloadUrl": "https://example.com/demo.user.js",
        "updateUrl": "https://example.com/demo.meta.js",
        "icon": {"small": "https://example.com/16.png", "larger": "https://example.com/64.png"},
        "license": "MIT",
        "homepage": "https://example.com/demo",
        "namespace": "https://example.com",
        "contributors": ["Bob", {"name": "Carol"}],
        "author": {"name": "Alice", "email": "a@example.com", "url": "https://alice.example"},
        "version": "1.2.3",
        "description": "Does things",
        "name": {"@": "Demo", "de": "Beispiel"}
    }));
    let expected = [
        "==UserScript==",
        "@name Demo",
        "@name:de Beispiel",
        "@description Does things",
        "@version 1.2.3",
        "@author Alice [a@example.com] <https://alice.example>",
        "@contributor Bob",
        "@contributor Carol",
        "@namespace https://example.com",
        "@homepageURL https://example.com/demo",
        "@license MIT",
        "@icon64 https://example.com/64.png",
        "@icon https://example.com/16.png",
        "@updateURL https://example.com/demo.meta.js",
        "@downloadURL https://example.com/demo.user.js",
        "@supportURL https://example.com/issues",
        "@include https://example.com/*",
        "@include /^https://example\\.org//i",
        "@match https://example.com/*",
        "@exclude https://example.com/admin/*",
        "@connect api.example.com",
        "@run-at document-start",
        "@grant GM_getValue",
        "@grant GM_setValue",
        "@antifeature Shows ads",
        "@antifeature tracking Tracks you",
        "@antifeature:de tracking Verfolgt dich",
        "@noframes",
        "@nocompat Chrome",
        "@inject-into content",
        "@require https://cdn.example/jquery.js",
        "@require https://cdn.example/lodash.js#sha256=abc123",
        "@resource style https://cdn.example/style.css",
        "@priority 3",
        "@sandbox JavaScript",
        "==/UserScript==",
    ]
    .join("\n");
    assert_eq!(render(&meta), expected);
}

#[test]
fn generation_is_repeatable() {
    let meta = meta_from_json(json!({
        "name": {"@": "Demo", "fr": "Démo"},
        "version": "1",
        "author": "Alice",
        "grant": ["none"]
    }));
    let before = meta.clone();
    let first = render(&meta);
    let second = render(&meta);
    assert_eq!(first, second);
    assert_eq!(meta, before);
}

#[test]
fn custom_tags_follow_source_key_order() {
    let meta = meta_from_str(
        r#"{
            "name": "Test",
            "version": "1.0",
            "author": "Alice",
            "customTags": {"zeta": "1", "alpha": "2", "mid": false}
        }"#,
    );
    let header = generate(&meta, raw_options().with_include_block(false), &NoopWarnings).unwrap();
    assert_eq!(header, "@name Test\n@version 1.0\n@author Alice\n@zeta 1\n@alpha 2\n@mid false");
}

#[test]
fn noframes_false_emits_nothing() {
    let meta = meta_from_json(json!({
        "name": "Test", "version": "1.0", "author": "Alice", "noFrames": false
    }));
    assert!(!render(&meta).contains("@noframes"));
}

#[test]
fn localized_names_report_resolution_warnings() {
    let meta = meta_from_json(json!({
        "name": {"@": "Demo", "DE": "Beispiel"},
        "version": "1",
        "author": "Alice"
    }));
    let warnings = CollectedWarnings::new();
    let header = generate(&meta, raw_options(), &warnings).unwrap();
    assert!(header.contains("@name:de Beispiel"));
    assert_eq!(warnings.messages(), vec!["Locale \"DE\" has been resolved to \"de\"."]);
}

#[test]
fn tracing_sink_accepts_warnings() {
    let meta = meta_from_json(json!({
        "name": {"@": "Demo", "en-gb": "Demo"},
        "version": "1",
        "author": "Alice"
    }));
    let header = generate(&meta, raw_options(), &TracingWarnings).unwrap();
    assert!(header.contains("@name:en-GB Demo"));
}

#[test]
fn injected_hasher_supplies_auto_digests() {
    let meta = meta_from_json(json!({
        "name": "Test",
        "version": "1.0",
        "author": "Alice",
        "require": [{"id": "lib", "src": "lib.js", "url": "https://cdn.example/lib.js", "hash": ["auto", "md5"]}]
    }));
    let generator = Generator::new(raw_options()).with_hasher(FixedHasher);
    let header = generator.generate(&meta, &NoopWarnings).unwrap();
    assert!(header.contains("@require https://cdn.example/lib.js#md5=feed"));
    assert!(generator.options().include_block);
}

// ============================================================================
// SECTION: Comment Styles
// ============================================================================

#[test]
fn block_style_wraps_lines() {
    let meta = UserScriptMeta::new("Test", "1.0", "Alice");
    let header = generate(&meta, GeneratorOptions::default(), &NoopWarnings).unwrap();
    assert_eq!(
        header,
        "/*\n==UserScript==\n@name Test\n@version 1.0\n@author Alice\n==/UserScript==\n*/"
    );
}

#[test]
fn slashes_style_prefixes_lines() {
    let meta = UserScriptMeta::new("Test", "1.0", "Alice");
    let options = GeneratorOptions::default().with_comment_style(CommentStyle::Slashes);
    let header = generate(&meta, options, &NoopWarnings).unwrap();
    assert_eq!(
        header,
        "// ==UserScript==\n// @name Test\n// @version 1.0\n// @author Alice\n// ==/UserScript=="
    );
}

#[test]
fn block_comment_escapes_terminators_and_inlines_single_lines() {
    assert_eq!(block_comment(&["  a */ b  ".to_string()]), "/* a *\\/ b */");
    assert_eq!(block_comment(&[]), "/*  */");
}

#[test]
fn comment_style_labels_round_trip() {
    for style in [CommentStyle::Block, CommentStyle::Slashes, CommentStyle::None] {
        assert_eq!(style.as_str().parse::<CommentStyle>().unwrap(), style);
    }
    assert!("jsdoc".parse::<CommentStyle>().is_err());
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[test]
fn required_fields_must_be_present() {
    let cases = [
        (json!({"version": "1", "author": "A"}), "name"),
        (json!({"name": "N", "author": "A"}), "version"),
        (json!({"name": "N", "version": "1"}), "author"),
    ];
    for (record, tag) in cases {
        let err = generate(&meta_from_json(record), raw_options(), &NoopWarnings).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Validation(ValidationError::NullValue {
                tag: tag.to_string()
            })
        );
    }
}

#[test]
fn plain_anti_feature_reason_omits_the_type() {
    let meta = meta_from_json(json!({
        "name": "N", "version": "1", "author": "A",
        "antiFeatures": [["miner", "Mines coins"]]
    }));
    let header = render(&meta);
    assert!(header.contains("\n@antifeature Mines coins\n"), "{header}");
    assert!(!header.contains("miner"), "{header}");
}

#[test]
fn icon_strings_are_rejected() {
    let meta = meta_from_json(json!({
        "name": "Test", "version": "1.0", "author": "Alice", "icon": "https://example.com/i.png"
    }));
    let err = generate(&meta, raw_options(), &NoopWarnings).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::StringDisallowed { .. })));
}

#[test]
fn scalar_contributors_are_rejected() {
    let meta = meta_from_json(json!({
        "name": "Test", "version": "1.0", "author": "Alice", "contributors": "Bob"
    }));
    let err = generate(&meta, raw_options(), &NoopWarnings).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::NotArray { .. })));
}

#[test]
fn multiple_names_are_rejected() {
    let meta = meta_from_json(json!({
        "name": ["One", "Two"], "version": "1.0", "author": "Alice"
    }));
    let err = generate(&meta, raw_options(), &NoopWarnings).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::MultipleValues { .. })));
}

#[test]
fn custom_tag_failures_abort_generation() {
    let bad_value = meta_from_json(json!({
        "name": "Test", "version": "1.0", "author": "Alice", "customTags": {"list": ["a"]}
    }));
    let err = generate(&bad_value, raw_options(), &NoopWarnings).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::ArrayValue { .. })));

    let bad_name = meta_from_json(json!({
        "name": "Test", "version": "1.0", "author": "Alice", "customTags": {"bad tag": "x"}
    }));
    let err = generate(&bad_name, raw_options(), &NoopWarnings).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::IllegalTagName { .. })));
}

#[test]
fn newline_in_value_aborts_generation() {
    let meta = meta_from_json(json!({
        "name": "Test", "version": "1.0", "author": "Alice", "license": "MIT\nGPL"
    }));
    let err = generate(&meta, raw_options(), &NoopWarnings).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::IllegalValue { .. })));
}

// ============================================================================
// SECTION: Field Table
// ============================================================================

#[test]
fn field_order_matches_header_layout() {
    let tags: Vec<&str> = FIELD_ORDER.iter().map(|rule| rule.tag).collect();
    assert_eq!(
        tags,
        vec![
            "name",
            "description",
            "version",
            "author",
            "contributor",
            "namespace",
            "homepageURL",
            "license",
            "icon",
            "updateURL",
            "downloadURL",
            "supportURL",
            "include",
            "match",
            "exclude",
            "connect",
            "run-at",
            "grant",
            "antifeature",
            "noframes",
            "nocompat",
            "inject-into",
            "require",
            "resource",
            "",
        ]
    );
    let required: Vec<&str> =
        FIELD_ORDER.iter().filter(|rule| rule.required).map(|rule| rule.tag).collect();
    assert_eq!(required, vec!["name", "version", "author"]);
}

#[test]
fn table_rows_read_the_fields_they_name() {
    let full = meta_from_json(json!({
        "name": "N", "description": "D", "version": "1", "author": "A",
        "contributors": ["C"], "namespace": "ns", "homepage": "h", "license": "MIT",
        "icon": {"small": "i.png"}, "updateUrl": "u", "downloadUrl": "d",
        "supportUrl": "s", "include": ["*"], "match": "m", "exclude": ["e"],
        "connect": "c", "runAt": "document-end", "grant": "none",
        "antiFeatures": ["ads"], "noFrames": true, "noCompat": "chrome",
        "injectInto": "page", "require": "r.js", "resources": ["x r.css"],
        "customTags": {"sandbox": "raw"}
    }));
    let empty = UserScriptMeta::default();
    for rule in FIELD_ORDER {
        assert!(rule.expander.is_present(&full), "{} should be present", rule.key);
        assert!(!rule.expander.is_present(&empty), "{} should be absent", rule.key);
    }
}

#[test]
fn absent_optional_rows_emit_nothing() {
    let meta = UserScriptMeta::new("N", "1", "A");
    let present: Vec<&str> = FIELD_ORDER
        .iter()
        .filter(|rule| rule.expander.is_present(&meta))
        .map(|rule| rule.tag)
        .collect();
    assert_eq!(present, vec!["name", "version", "author"]);
    assert_eq!(render(&meta).lines().count(), 5);
}
