use nova_distill::EntityType;
use pretty_assertions::assert_eq;

use super::{distill_snippet, text_of};

/// The snippet becomes a single leaf whose value is the snippet itself.
#[track_caller]
fn assert_verbatim_leaf(snippet: &str, expected: EntityType) {
    let (source, tree) = distill_snippet(snippet);
    let leaf = tree.root().first_leaf();
    assert_eq!(leaf.label(), expected);
    assert_eq!(tree.tree_string(), format!("method {{ {snippet} }}"));
    assert_eq!(text_of(&source, leaf), snippet);
}

/// The snippet becomes a single leaf with a derived value.
#[track_caller]
fn assert_leaf(snippet: &str, expected: EntityType, tree_string: &str) {
    let (source, tree) = distill_snippet(snippet);
    let leaf = tree.root().first_leaf();
    assert_eq!(leaf.label(), expected);
    assert_eq!(tree.tree_string(), tree_string);
    assert_eq!(text_of(&source, leaf), snippet);
}

/// The snippet becomes one statement node with nested children.
#[track_caller]
fn assert_composite(snippet: &str, expected: EntityType, tree_string: &str) -> nova_distill::Tree {
    let (source, tree) = distill_snippet(snippet);
    let first = tree.root().first_child().expect("statement node");
    assert_eq!(first.label(), expected);
    assert_eq!(tree.tree_string(), tree_string);
    assert_eq!(text_of(&source, first), snippet);
    tree
}

#[test]
fn assignment() {
    assert_verbatim_leaf("b = foo.bar();", EntityType::Assignment);
}

#[test]
fn compound_assignment() {
    assert_verbatim_leaf("b += foo.bar();", EntityType::Assignment);
}

#[test]
fn postfix_expression() {
    assert_verbatim_leaf("b ++;", EntityType::PostfixExpression);
}

#[test]
fn prefix_expression() {
    assert_verbatim_leaf("++ b;", EntityType::PrefixExpression);
}

#[test]
fn allocation_expression() {
    assert_verbatim_leaf("new Foo(bar);", EntityType::ClassInstanceCreation);
}

#[test]
fn qualified_allocation_expression() {
    assert_verbatim_leaf("foo.new Bar();", EntityType::ClassInstanceCreation);
}

#[test]
fn explicit_constructor_call() {
    assert_verbatim_leaf("this(a);", EntityType::ConstructorInvocation);
}

#[test]
fn local_declaration() {
    assert_verbatim_leaf("float a = 24.0f;", EntityType::VariableDeclarationStatement);
}

#[test]
fn annotated_local_declaration() {
    assert_verbatim_leaf(
        "@SuppressWarnings(\"unchecked\") List<String> xs = f();",
        EntityType::VariableDeclarationStatement,
    );
}

#[test]
fn annotated_final_local_declaration() {
    assert_verbatim_leaf("final @A int x = 1;", EntityType::VariableDeclarationStatement);
}

#[test]
fn annotated_local_class() {
    assert_verbatim_leaf("@Deprecated class Local {}", EntityType::TypeDeclarationStatement);
}

#[test]
fn message_send() {
    assert_verbatim_leaf("foo.bar(anInteger);", EntityType::MethodInvocation);
}

#[test]
fn assert_without_message() {
    assert_leaf(
        "assert list.isEmpty();",
        EntityType::AssertStatement,
        "method { list.isEmpty() }",
    );
}

#[test]
fn assert_with_message() {
    assert_leaf(
        "assert list.isEmpty(): \"list not empty\";",
        EntityType::AssertStatement,
        "method { list.isEmpty():\"list not empty\" }",
    );
}

#[test]
fn break_without_label() {
    assert_leaf("break;", EntityType::BreakStatement, "method {  }");
}

#[test]
fn break_with_label() {
    assert_leaf("break foo;", EntityType::BreakStatement, "method { foo }");
}

#[test]
fn continue_without_label() {
    assert_leaf("continue;", EntityType::ContinueStatement, "method {  }");
}

#[test]
fn continue_with_label() {
    assert_leaf("continue foo;", EntityType::ContinueStatement, "method { foo }");
}

#[test]
fn empty_return() {
    assert_leaf("return;", EntityType::ReturnStatement, "method {  }");
}

#[test]
fn return_with_expression() {
    assert_leaf(
        "return Math.min(a, b);",
        EntityType::ReturnStatement,
        "method { Math.min(a, b); }",
    );
}

#[test]
fn throw_statement() {
    assert_composite(
        "throw new RuntimeException(e);",
        EntityType::ThrowStatement,
        "method { new RuntimeException(e); }",
    );
}

#[test]
fn do_statement() {
    assert_composite(
        "do { System.out.print('.'); } while (!list.isEmpty());",
        EntityType::DoStatement,
        "method { (! list.isEmpty()) { System.out.print('.'); } }",
    );
}

#[test]
fn foreach_statement() {
    assert_composite(
        "for (String st : list) { System.out.print('.'); }",
        EntityType::ForeachStatement,
        "method { String st:list { System.out.print('.'); } }",
    );
}

#[test]
fn for_statement_with_condition() {
    assert_composite(
        "for (int i = 0; i < list.size(); i++) { System.out.print('.'); }",
        EntityType::ForStatement,
        "method { (i < list.size()) { System.out.print('.'); } }",
    );
}

#[test]
fn for_statement_without_condition() {
    assert_composite(
        "for (;;) { System.out.print('.'); }",
        EntityType::ForStatement,
        "method {  { System.out.print('.'); } }",
    );
}

#[test]
fn if_statement() {
    let tree = assert_composite(
        "if (list.isEmpty()) { System.out.print(\"empty\"); } else { System.out.print(\"not empty\"); }",
        EntityType::IfStatement,
        "method { list.isEmpty() { list.isEmpty() { System.out.print(\"empty\"); },list.isEmpty() { System.out.print(\"not empty\"); } } }",
    );
    let stmt = tree.root().first_child().expect("if");
    assert_eq!(stmt.first_child().map(|n| n.label()), Some(EntityType::ThenStatement));
    assert_eq!(stmt.last_child().map(|n| n.label()), Some(EntityType::ElseStatement));
}

#[test]
fn if_statement_without_else() {
    let tree = assert_composite(
        "if (list.isEmpty()) { System.out.print(\"empty\"); }",
        EntityType::IfStatement,
        "method { list.isEmpty() { list.isEmpty() { System.out.print(\"empty\"); } } }",
    );
    let stmt = tree.root().first_child().expect("if");
    assert_eq!(stmt.child_count(), 1);
    assert_eq!(stmt.first_child().map(|n| n.label()), Some(EntityType::ThenStatement));
}

#[test]
fn labeled_statement() {
    assert_composite(
        "label: a = 24;",
        EntityType::LabeledStatement,
        "method { label { a = 24; } }",
    );
}

#[test]
fn switch_statement() {
    let tree = assert_composite(
        "switch (foo) { case ONE: a = 1; break; default: a = 2; }",
        EntityType::SwitchStatement,
        "method { foo { ONE,a = 1;,,default,a = 2; } }",
    );
    assert_eq!(tree.root().first_leaf().label(), EntityType::SwitchCase);
}

#[test]
fn synchronized_statement() {
    assert_composite(
        "synchronized(foo) { foo.bar(b); }",
        EntityType::SynchronizedStatement,
        "method { foo { foo.bar(b); } }",
    );
}

#[test]
fn try_statement() {
    let tree = assert_composite(
        "try { foo.bar(e); } catch (IOException e) { return 2; } catch (Exception e) { return 3; } finally { cleanup(); }",
        EntityType::TryStatement,
        "method {  {  { foo.bar(e); }, { IOException { 2; },Exception { 3; } }, { cleanup(); } } }",
    );
    let stmt = tree.root().first_child().expect("try");
    let body = stmt.first_child().expect("body");
    assert_eq!(body.label(), EntityType::Body);
    let clauses = body.next_sibling().expect("catch clauses");
    assert_eq!(clauses.label(), EntityType::CatchClauses);
    assert_eq!(clauses.first_child().map(|n| n.label()), Some(EntityType::CatchClause));
    assert_eq!(stmt.last_child().map(|n| n.label()), Some(EntityType::Finally));
}

#[test]
fn try_statement_without_catch_clauses() {
    let tree = assert_composite(
        "try { foo.bar(e); } finally { cleanup(); }",
        EntityType::TryStatement,
        "method {  {  { foo.bar(e); }, { cleanup(); } } }",
    );
    let stmt = tree.root().first_child().expect("try");
    assert_eq!(stmt.last_child().map(|n| n.label()), Some(EntityType::Finally));
}

#[test]
fn try_statement_without_finally() {
    let tree = assert_composite(
        "try { foo.bar(e); } catch (IOException e) { return 2; } catch (Exception e) { return 3; }",
        EntityType::TryStatement,
        "method {  {  { foo.bar(e); }, { IOException { 2; },Exception { 3; } } } }",
    );
    let stmt = tree.root().first_child().expect("try");
    let clauses = stmt.first_child().and_then(|n| n.next_sibling()).expect("catch clauses");
    assert_eq!(clauses.label(), EntityType::CatchClauses);
    assert_eq!(clauses.first_child().map(|n| n.label()), Some(EntityType::CatchClause));
}

#[test]
fn while_statement() {
    assert_composite(
        "while (i < a.length) { System.out.print('.'); }",
        EntityType::WhileStatement,
        "method { (i < a.length) { System.out.print('.'); } }",
    );
}
