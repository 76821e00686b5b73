use nova_distill::{EntityType, Node};
use pretty_assertions::assert_eq;

use super::{distill_snippet, text_of};

fn labels<'a>(nodes: impl Iterator<Item = Node<'a>>) -> Vec<EntityType> {
    nodes.map(Node::label).collect()
}

#[test]
fn statements_keep_source_order_under_the_root() {
    let (_, tree) = distill_snippet("int i = 0; i++; run(i); return;");
    let root = tree.root();
    assert!(root.is_root());
    assert_eq!(root.label(), EntityType::Method);
    assert_eq!(root.value(), "method");
    assert_eq!(
        labels(root.children()),
        vec![
            EntityType::VariableDeclarationStatement,
            EntityType::PostfixExpression,
            EntityType::MethodInvocation,
            EntityType::ReturnStatement,
        ]
    );
    assert_eq!(tree.tree_string(), "method { int i = 0;,i++;,run(i);, }");
}

#[test]
fn nested_blocks_and_empty_statements_are_flattened() {
    let (_, tree) = distill_snippet("{ a(); ; { b(); } } ;");
    assert_eq!(tree.tree_string(), "method { a();,b(); }");
}

#[test]
fn unbraced_branches_become_children() {
    let (_, tree) = distill_snippet("if (ok) run(); else while (busy) wait();");
    assert_eq!(tree.tree_string(), "method { ok { ok { run(); },ok { busy { wait(); } } } }");
}

#[test]
fn else_if_chains_nest_inside_else() {
    let (_, tree) = distill_snippet("if (a) x(); else if (b) y(); else z();");
    let outer = tree.root().first_child().expect("if");
    let otherwise = outer.last_child().expect("else");
    assert_eq!(otherwise.label(), EntityType::ElseStatement);
    let inner = otherwise.first_child().expect("nested if");
    assert_eq!(inner.label(), EntityType::IfStatement);
    assert_eq!(inner.value(), "b");
    assert_eq!(labels(inner.children()), vec![EntityType::ThenStatement, EntityType::ElseStatement]);
}

#[test]
fn then_and_else_share_the_if_range() {
    let snippet = "if (a) { x(); } else { y(); }";
    let (source, tree) = distill_snippet(snippet);
    let stmt = tree.root().first_child().expect("if");
    for branch in stmt.children() {
        assert_eq!(branch.source_range(), stmt.source_range());
        assert_eq!(text_of(&source, branch), snippet);
    }
}

#[test]
fn try_parts_cover_their_blocks() {
    let (source, tree) = distill_snippet(
        "try { a(); } catch (IOException | RuntimeException e) { b(); } catch (Exception e) { c(); } finally { d(); }",
    );
    let stmt = tree.root().first_child().expect("try");
    let parts: Vec<&str> = stmt.children().map(|node| text_of(&source, node)).collect();
    assert_eq!(
        parts,
        vec![
            "{ a(); }",
            "catch (IOException | RuntimeException e) { b(); } catch (Exception e) { c(); }",
            "{ d(); }",
        ]
    );

    let clauses = stmt.first_child().and_then(Node::next_sibling).expect("catch clauses");
    let clause_texts: Vec<&str> = clauses.children().map(|node| text_of(&source, node)).collect();
    assert_eq!(
        clause_texts,
        vec!["catch (IOException | RuntimeException e) { b(); }", "catch (Exception e) { c(); }"]
    );
    assert_eq!(clauses.first_child().map(Node::value), Some("IOException | RuntimeException"));
}

#[test]
fn try_with_resources_records_the_resources() {
    let (_, tree) = distill_snippet("try (InputStream in = open(); out) { copy(in); }");
    let stmt = tree.root().first_child().expect("try");
    assert_eq!(stmt.label(), EntityType::TryStatement);
    assert_eq!(stmt.value(), "InputStream in = open(); out");
    assert_eq!(tree.tree_string(), "method { InputStream in = open(); out {  { copy(in); } } }");
}

#[test]
fn switch_labels_are_flattened_with_their_statements() {
    let snippet = "switch (kind) { case A, B -> run(); case C: case D: stop(); break; default: }";
    let (source, tree) = distill_snippet(snippet);
    let stmt = tree.root().first_child().expect("switch");
    assert_eq!(stmt.value(), "kind");
    assert_eq!(
        labels(stmt.children()),
        vec![
            EntityType::SwitchCase,
            EntityType::MethodInvocation,
            EntityType::SwitchCase,
            EntityType::SwitchCase,
            EntityType::MethodInvocation,
            EntityType::BreakStatement,
            EntityType::SwitchCase,
        ]
    );
    let cases: Vec<&str> = stmt
        .children()
        .filter(|node| node.label() == EntityType::SwitchCase)
        .map(|node| text_of(&source, node))
        .collect();
    assert_eq!(cases, vec!["case A, B ->", "case C:", "case D:", "default:"]);
    assert_eq!(tree.tree_string(), "method { kind { A, B,run();,C,D,stop();,,default } }");
}

#[test]
fn siblings_and_parents_are_consistent() {
    let (_, tree) = distill_snippet("while (a) { b(); c(); d(); }");
    let stmt = tree.root().first_child().expect("while");
    let children: Vec<Node<'_>> = stmt.children().collect();
    assert_eq!(children.len(), 3);
    for (i, child) in children.iter().enumerate() {
        assert_eq!(child.parent(), Some(stmt));
        assert_eq!(child.previous_sibling(), i.checked_sub(1).map(|j| children[j]));
        assert_eq!(child.next_sibling(), children.get(i + 1).copied());
    }
}

#[test]
fn descendant_ranges_nest_inside_their_parents() {
    let (source, tree) = distill_snippet(
        "for (String s : names) { if (s.isEmpty()) { continue; } synchronized (lock) { seen.add(s); } }",
    );
    for node in tree.root().descendants().skip(1) {
        let parent = node.parent().expect("non-root node has a parent");
        if parent.is_root() {
            continue;
        }
        let range = node.source_range();
        let outer = parent.source_range();
        assert!(
            outer.start <= range.start && range.end <= outer.end,
            "{node:?} escapes {parent:?}"
        );
        assert!(text_of(&source, node).len() <= text_of(&source, parent).len());
    }
}

#[test]
fn local_classes_are_single_leaves() {
    let snippet = "class Local { void go() { run(); } }";
    let (source, tree) = distill_snippet(snippet);
    let leaf = tree.root().first_child().expect("local class");
    assert_eq!(leaf.label(), EntityType::TypeDeclarationStatement);
    assert!(leaf.is_leaf());
    assert_eq!(text_of(&source, leaf), snippet);
    assert_eq!(leaf.value(), snippet);
}

#[test]
fn abstract_methods_distill_to_a_bare_root() {
    let source = "abstract class Shape { abstract double area(); }";
    let tree = nova_distill::distill_method(source, "area").expect("abstract method");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.tree_string(), "area");
    assert_eq!(tree.root().source_range().slice(source), Some("abstract double area();"));
}

#[test]
fn constructors_are_found_by_name() {
    let source = "class Point { Point(int x) { this(x, 0); } Point(int x, int y) { super(); init(x, y); } }";
    let tree = nova_distill::distill_method(source, "Point").expect("constructor");
    assert_eq!(tree.tree_string(), "Point { this(x, 0); }");
    assert_eq!(
        tree.root().first_child().map(Node::label),
        Some(EntityType::ConstructorInvocation)
    );
}
