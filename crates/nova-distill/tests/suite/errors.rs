use nova_core::{LineCol, SourceRange, Span};
use nova_distill::{
    convert_method_body, convert_method_body_with, ConversionOptions, ConvertError, DistillError,
    EntityType, SourceCodeEntity, Tree,
};
use pretty_assertions::assert_eq;

use super::method_source;

/// Distills a snippet that is expected to be rejected.
fn reject(snippet: &str) -> ConvertError {
    let source = method_source(snippet);
    match nova_distill::distill_method(&source, "method") {
        Err(DistillError::Convert(err)) => err,
        Err(other) => panic!("unexpected error for {snippet:?}: {other}"),
        Ok(tree) => panic!("{snippet:?} was accepted as {}", tree.tree_string()),
    }
}

/// A tree that already holds one converted statement.
fn seeded_tree() -> Tree {
    let mut tree = Tree::new(SourceCodeEntity::new("method", EntityType::Method, SourceRange::default()));
    let root = tree.root_id();
    tree.create_child(
        root,
        SourceCodeEntity::new("init();", EntityType::MethodInvocation, SourceRange::default()),
    );
    tree
}

#[test]
fn operator_expression_statements_are_unsupported() {
    let err = reject("a + b;");
    let ConvertError::Unsupported { kind, span, location } = err.clone() else {
        panic!("expected unsupported, got {err:?}");
    };
    assert_eq!(kind, "binary expression");
    assert_eq!(span, Span::new(42, 47));
    assert_eq!(location, LineCol { line: 0, col: 42 });
    assert_eq!(err.to_string(), "unsupported binary expression at 1:43");
}

#[test]
fn unparseable_statements_are_unsupported() {
    let err = reject("a(); ) b();");
    assert!(
        matches!(err, ConvertError::Unsupported { kind: "unparsed statement", .. }),
        "{err:?}"
    );
}

#[test]
fn incomplete_expressions_are_unsupported() {
    let err = reject("if (a + ) { b(); }");
    assert!(
        matches!(err, ConvertError::Unsupported { kind: "missing expression", .. }),
        "{err:?}"
    );
}

#[test]
fn error_location_is_reported_per_line() {
    let source = "class Foo {\n  void method() {\n    run();\n    x == y;\n  }\n}\n";
    let err = nova_distill::distill_method(source, "method").unwrap_err();
    let DistillError::Convert(ConvertError::Unsupported { location, .. }) = err else {
        panic!("expected unsupported, got {err:?}");
    };
    assert_eq!(location.to_string(), "4:5");
}

#[test]
fn failed_conversion_leaves_the_tree_untouched() {
    let source = method_source("a(); while (x) { b(); c(); } d + e;");
    let parse = nova_syntax::parse(&source);
    let method = parse.compilation_unit().find_method("method").expect("method");

    let mut tree = seeded_tree();
    let before = tree.clone();
    let root = tree.root_id();
    let err = convert_method_body(&mut tree, root, method, &source).unwrap_err();

    assert!(matches!(err, ConvertError::Unsupported { .. }));
    assert_eq!(tree, before);
    assert_eq!(tree.tree_string(), "method { init(); }");
}

#[test]
fn successful_conversion_appends_after_existing_children() {
    let source = method_source("a();");
    let parse = nova_syntax::parse(&source);
    let method = parse.compilation_unit().find_method("method").expect("method");

    let mut tree = seeded_tree();
    let root = tree.root_id();
    convert_method_body(&mut tree, root, method, &source).expect("convert");
    assert_eq!(tree.tree_string(), "method { init();,a(); }");
}

#[test]
fn ranges_outside_the_source_are_malformed() {
    let source = method_source("int value = compute();");
    let parse = nova_syntax::parse(&source);
    let method = parse.compilation_unit().find_method("method").expect("method");

    for verify_ranges in [true, false] {
        let mut tree = seeded_tree();
        let root = tree.root_id();
        let options = ConversionOptions { verify_ranges };
        let err = convert_method_body_with(&mut tree, root, method, "short", &options).unwrap_err();
        assert_eq!(
            err,
            ConvertError::MalformedRange {
                start: 42,
                end: 64,
                len: 5,
            }
        );
        assert_eq!(tree.len(), 2);
    }
}

#[test]
fn unknown_methods_are_reported() {
    let source = method_source("a();");
    let err = nova_distill::distill_method(&source, "missing").unwrap_err();
    assert!(matches!(&err, DistillError::MethodNotFound { name } if name == "missing"));
    assert_eq!(err.to_string(), "method `missing` not found");
}

#[test]
fn error_messages() {
    let mismatch = ConvertError::RangeMismatch {
        entity: EntityType::Assignment,
        expected: "a = 1;".to_owned(),
        actual: "a = 2;".to_owned(),
    };
    assert_eq!(
        mismatch.to_string(),
        "ASSIGNMENT value \"a = 1;\" does not match its source text \"a = 2;\""
    );

    let malformed = ConvertError::MalformedRange { start: 3, end: 3, len: 10 };
    assert_eq!(malformed.to_string(), "malformed source range 3..3 in a source of 10 bytes");
}
