//! Pathological inputs: deep nesting and unterminated constructs must come
//! back as typed errors, never as a hang or a stack overflow.

#![allow(clippy::unwrap_used)]

use xmlarbor::parser::{parse_str_with_options, ParseOptions};
use xmlarbor::Document;

fn nested(depth: usize) -> String {
    format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
}

#[test]
fn test_deeply_nested_elements_rejected() {
    // Run with a larger stack so debug builds do not overflow first.
    let result = std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| Document::parse_str(&nested(300)))
        .unwrap()
        .join()
        .unwrap();
    let err = result.unwrap_err();
    assert!(err.is_syntax());
    assert!(err.message().contains("depth"), "{err}");
}

#[test]
fn test_depth_limit_exact_boundary() {
    let opts = ParseOptions::default().max_depth(3);
    assert!(parse_str_with_options(&nested(3), &opts).is_ok());
    assert!(parse_str_with_options(&nested(4), &opts).is_err());
}

#[test]
fn test_unterminated_constructs() {
    for input in [
        "<a>",
        "<a",
        "<a x='1",
        "<a><!-- open",
        "<a><![CDATA[ open",
        "<!DOCTYPE a [ <!ELEMENT a ANY>",
        "<?xml version='1.0'",
        "<a></a",
    ] {
        let err = Document::parse_str(input).unwrap_err();
        assert!(err.is_syntax(), "{input:?} gave {err}");
    }
}

#[test]
fn test_garbage_inputs() {
    for input in ["<", "<<", "</>", "<1a/>", "<a/>>", "<a =''/>", "<a/ >", "text"] {
        let err = Document::parse_str(input).unwrap_err();
        assert!(err.is_syntax(), "{input:?} gave {err}");
    }
}
