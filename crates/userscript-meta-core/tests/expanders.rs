// crates/userscript-meta-core/tests/expanders.rs
// ============================================================================
// Module: Tag Expander Tests
// Description: Primitive, multi-value, custom, and object-presented expansion.
// ============================================================================
//! ## Overview
//! Covers the line grammar enforced by the expanders: tag-name and value
//! validation, null handling, array handling, string policies, and the
//! transformer emission contract.

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

use serde_json::json;
use userscript_meta_core::GenerateError;
use userscript_meta_core::LineBuffer;
use userscript_meta_core::OneOrMany;
use userscript_meta_core::Presented;
use userscript_meta_core::UserDescriptor;
use userscript_meta_core::ValidationError;
use userscript_meta_core::expanders::Emit;
use userscript_meta_core::expanders::ObjectTagOptions;
use userscript_meta_core::expanders::StringsBehavior;
use userscript_meta_core::expanders::TagOptions;
use userscript_meta_core::expanders::expand_conditional_tag;
use userscript_meta_core::expanders::expand_custom_tag;
use userscript_meta_core::expanders::expand_multi_object_presented_tag;
use userscript_meta_core::expanders::expand_multi_tag;
use userscript_meta_core::expanders::expand_object_presented_tag;
use userscript_meta_core::expanders::expand_tag;

use crate::common::lines_of;

/// Transformer rendering users as `name <url>`.
fn signature(
    value: &Presented<UserDescriptor>,
    _tag: &str,
    _lines: &mut LineBuffer,
) -> Result<Emit, GenerateError> {
    Ok(match value {
        Presented::Text(text) => Emit::One(format!("text:{text}")),
        Presented::Object(user) => Emit::One(user.signature()),
    })
}

fn user(name: &str, url: Option<&str>) -> Presented<UserDescriptor> {
    Presented::Object(UserDescriptor {
        name: name.to_string(),
        email: None,
        url: url.map(str::to_string),
    })
}

// ============================================================================
// SECTION: Primitive Expander
// ============================================================================

#[test]
fn expand_tag_appends_name_and_value() {
    let mut lines = LineBuffer::new();
    expand_tag("version", Some("1.0"), &mut lines, TagOptions::default()).unwrap();
    expand_tag("run-at", Some("document-start"), &mut lines, TagOptions::default()).unwrap();
    assert_eq!(lines_of(&lines), vec!["@version 1.0", "@run-at document-start"]);
}

#[test]
fn expand_tag_rejects_illegal_names_without_emitting() {
    let mut lines = LineBuffer::new();
    for name in ["na me", "name!", "", "naïve", "tag\n"] {
        let err = expand_tag(name, Some("x"), &mut lines, TagOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IllegalTagName {
                tag: name.to_string()
            }
        );
    }
    assert!(lines.is_empty());
}

#[test]
fn expand_tag_accepts_colons_dashes_and_underscores() {
    let mut lines = LineBuffer::new();
    expand_tag("name:zh-Hant_X", Some("v"), &mut lines, TagOptions::default()).unwrap();
    assert_eq!(lines_of(&lines), vec!["@name:zh-Hant_X v"]);
}

#[test]
fn expand_tag_rejects_line_breaks_in_value() {
    let mut lines = LineBuffer::new();
    let err = expand_tag("description", Some("a\nb"), &mut lines, TagOptions::default())
        .unwrap_err();
    assert!(matches!(err, ValidationError::IllegalValue { .. }));
    assert!(err.to_string().contains("illegal characters in its value"));
    assert!(lines.is_empty());
}

#[test]
fn expand_tag_null_check_is_configurable() {
    let mut lines = LineBuffer::new();
    let err = expand_tag("version", None, &mut lines, TagOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::NullValue {
            tag: "version".to_string()
        }
    );
    expand_tag("unwrap", None, &mut lines, TagOptions::nullable()).unwrap();
    assert_eq!(lines_of(&lines), vec!["@unwrap"]);
}

#[test]
fn conditional_tag_emits_only_when_true() {
    let mut lines = LineBuffer::new();
    expand_conditional_tag("noframes", false, &mut lines).unwrap();
    assert!(lines.is_empty());
    expand_conditional_tag("noframes", true, &mut lines).unwrap();
    assert_eq!(lines_of(&lines), vec!["@noframes"]);
}

#[test]
fn conditional_tag_validates_name_even_when_false() {
    let mut lines = LineBuffer::new();
    let err = expand_conditional_tag("no frames", false, &mut lines).unwrap_err();
    assert!(matches!(err, ValidationError::IllegalTagName { .. }));
}

// ============================================================================
// SECTION: Multi-Value Expander
// ============================================================================

#[test]
fn multi_tag_keeps_array_order_and_duplicates() {
    let mut lines = LineBuffer::new();
    let value = OneOrMany::Many(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
    expand_multi_tag("match", &value, &mut lines).unwrap();
    assert_eq!(lines_of(&lines), vec!["@match a", "@match b", "@match a"]);
}

#[test]
fn multi_tag_delegates_scalars() {
    let mut lines = LineBuffer::new();
    expand_multi_tag("grant", &OneOrMany::One("none".to_string()), &mut lines).unwrap();
    assert_eq!(lines_of(&lines), vec!["@grant none"]);
}

#[test]
fn multi_tag_rejects_bad_name_for_empty_array() {
    let mut lines = LineBuffer::new();
    let err = expand_multi_tag("bad tag", &OneOrMany::Many(Vec::new()), &mut lines).unwrap_err();
    assert!(matches!(err, ValidationError::IllegalTagName { .. }));
}

// ============================================================================
// SECTION: Custom Tag Expander
// ============================================================================

#[test]
fn custom_tag_renders_scalars() {
    let mut lines = LineBuffer::new();
    expand_custom_tag("unwrap", &json!("yes"), &mut lines).unwrap();
    expand_custom_tag("priority", &json!(3), &mut lines).unwrap();
    expand_custom_tag("sandbox", &json!(true), &mut lines).unwrap();
    assert_eq!(lines_of(&lines), vec!["@unwrap yes", "@priority 3", "@sandbox true"]);
}

#[test]
fn custom_tag_rejects_null_arrays_and_objects() {
    let mut lines = LineBuffer::new();
    let null = expand_custom_tag("x", &json!(null), &mut lines).unwrap_err();
    assert!(matches!(null, ValidationError::NullValue { .. }));
    let array = expand_custom_tag("x", &json!(["a"]), &mut lines).unwrap_err();
    assert!(matches!(array, ValidationError::ArrayValue { .. }));
    let object = expand_custom_tag("x", &json!({"a": 1}), &mut lines).unwrap_err();
    assert!(matches!(object, ValidationError::UnsupportedValue { .. }));
    assert!(lines.is_empty());
}

// ============================================================================
// SECTION: Object-Presented Expanders
// ============================================================================

#[test]
fn object_presented_passthrough_emits_strings_directly() {
    let mut lines = LineBuffer::new();
    let value = Presented::Text("Alice".to_string());
    expand_object_presented_tag(
        "author",
        Some(&value),
        signature,
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap();
    assert_eq!(lines_of(&lines), vec!["@author Alice"]);
}

#[test]
fn object_presented_transform_routes_strings_through_transformer() {
    let mut lines = LineBuffer::new();
    let value = Presented::Text("Alice".to_string());
    expand_object_presented_tag(
        "author",
        Some(&value),
        signature,
        &mut lines,
        ObjectTagOptions::with_strings(StringsBehavior::Transform),
    )
    .unwrap();
    assert_eq!(lines_of(&lines), vec!["@author text:Alice"]);
}

#[test]
fn object_presented_disallow_rejects_strings() {
    let mut lines = LineBuffer::new();
    let value = Presented::Text("Alice".to_string());
    let err = expand_object_presented_tag(
        "author",
        Some(&value),
        signature,
        &mut lines,
        ObjectTagOptions::with_strings(StringsBehavior::Disallow),
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::StringDisallowed { .. })));
    assert!(lines.is_empty());
}

#[test]
fn object_presented_transforms_descriptors() {
    let mut lines = LineBuffer::new();
    let value = user("Bob", Some("https://bob.example"));
    expand_object_presented_tag(
        "author",
        Some(&value),
        signature,
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap();
    assert_eq!(lines_of(&lines), vec!["@author Bob <https://bob.example>"]);
}

#[test]
fn object_presented_emits_many_and_none() {
    let mut lines = LineBuffer::new();
    let value = user("Bob", None);
    expand_object_presented_tag(
        "grant",
        Some(&value),
        |_: &Presented<UserDescriptor>, _: &str, _: &mut LineBuffer| {
            Ok(Emit::Many(vec!["GM_getValue".to_string(), "GM_setValue".to_string()]))
        },
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap();
    expand_object_presented_tag(
        "icon",
        Some(&value),
        |_: &Presented<UserDescriptor>, _: &str, lines: &mut LineBuffer| {
            lines.push("@icon64 big.png");
            Ok(Emit::None)
        },
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap();
    assert_eq!(
        lines_of(&lines),
        vec!["@grant GM_getValue", "@grant GM_setValue", "@icon64 big.png"]
    );
}

#[test]
fn object_presented_null_follows_check_null() {
    let mut lines = LineBuffer::new();
    let err = expand_object_presented_tag::<UserDescriptor, _>(
        "author",
        None,
        signature,
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::NullValue { .. })));
}

#[test]
fn multi_object_presented_requires_an_array() {
    let mut lines = LineBuffer::new();
    let err = expand_multi_object_presented_tag(
        "contributor",
        &OneOrMany::One(user("Bob", None)),
        signature,
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::Validation(ValidationError::NotArray { .. })));
    assert!(err.to_string().contains("only accepts array values"));
}

#[test]
fn multi_object_presented_expands_each_element_in_order() {
    let mut lines = LineBuffer::new();
    let values = OneOrMany::Many(vec![
        Presented::Text("Carol".to_string()),
        user("Dave", Some("https://dave.example")),
    ]);
    expand_multi_object_presented_tag(
        "contributor",
        &values,
        signature,
        &mut lines,
        ObjectTagOptions::default(),
    )
    .unwrap();
    assert_eq!(
        lines_of(&lines),
        vec!["@contributor Carol", "@contributor Dave <https://dave.example>"]
    );
}
