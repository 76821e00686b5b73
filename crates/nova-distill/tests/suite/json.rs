use nova_distill::{EntityType, SourceCodeEntity};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::distill_snippet;

#[test]
fn tree_exports_nested_json() {
    let (_, tree) = distill_snippet("while (i < n) { i++; }");
    let value = serde_json::to_value(&tree).expect("serialize");
    assert_eq!(
        value,
        json!({
            "type": "METHOD",
            "value": "method",
            "start": 19,
            "end": 65,
            "children": [{
                "type": "WHILE_STATEMENT",
                "value": "(i < n)",
                "start": 42,
                "end": 63,
                "children": [{
                    "type": "POSTFIX_EXPRESSION",
                    "value": "i++;",
                    "start": 58,
                    "end": 61,
                    "children": [],
                }],
            }],
        })
    );
}

#[test]
fn pretty_json_matches_compact_json() {
    let (_, tree) = distill_snippet("if (a) { b(); } else { c(); }");
    let pretty = tree.to_json_pretty().expect("pretty");
    assert!(pretty.contains('\n'));
    let reparsed: serde_json::Value = serde_json::from_str(&pretty).expect("valid json");
    assert_eq!(reparsed, serde_json::to_value(&tree).expect("serialize"));
}

#[test]
fn subtrees_serialize_from_any_node() {
    let (_, tree) = distill_snippet("label: return;");
    let labeled = tree.root().first_child().expect("labeled");
    let value = serde_json::to_value(labeled).expect("serialize");
    assert_eq!(value["type"], "LABELED_STATEMENT");
    assert_eq!(value["value"], "label");
    assert_eq!(value["children"][0]["type"], "RETURN_STATEMENT");
    assert_eq!(value["children"][0]["value"], "");
}

#[test]
fn entities_round_trip_through_json() {
    let (_, tree) = distill_snippet("foo.bar(1);");
    let entity = tree.root().first_leaf().entity().clone();
    let text = serde_json::to_string(&entity).expect("serialize");
    assert_eq!(
        text,
        r#"{"value":"foo.bar(1);","type":"METHOD_INVOCATION","range":{"start":42,"end":52}}"#
    );
    let back: SourceCodeEntity = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, entity);
    assert_eq!(back.entity_type(), EntityType::MethodInvocation);
}
