use nova_distill::{Node, Tree};

mod config;
mod errors;
mod golden;
mod json;
mod navigation;
mod properties;

/// Wraps `snippet` as the body of `Foo.method()`.
pub(crate) fn method_source(snippet: &str) -> String {
    format!("public class Foo {{ public void method() {{ {snippet} }} }}")
}

/// Distills `Foo.method()` with `snippet` as its body.
pub(crate) fn distill_snippet(snippet: &str) -> (String, Tree) {
    let source = method_source(snippet);
    let tree = nova_distill::distill_method(&source, "method")
        .unwrap_or_else(|err| panic!("failed to distill {snippet:?}: {err}"));
    (source, tree)
}

/// Source text covered by `node`.
pub(crate) fn text_of<'s>(source: &'s str, node: Node<'_>) -> &'s str {
    node.source_range()
        .slice(source)
        .unwrap_or_else(|| panic!("range of {node:?} is outside the source"))
}
