use proptest::prelude::*;

use super::{method_source, text_of};

const PROPTEST_CASES: u32 = 64;

fn arb_simple_stmt() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "x = y + 1;",
        "count += 2;",
        "i++;",
        "--j;",
        "new Foo(a, b);",
        "foo.bar(baz);",
        "this.run();",
        "int[] values = {1, 2};",
        "String s = (String) o;",
        "Map<String, List<Integer>> m = new HashMap<>();",
        "return;",
        "return x ? a : b;",
        "throw new IllegalStateException(\"bad\");",
        "assert ok : \"message\";",
        "break;",
        "continue out;",
        ";",
        "list.forEach(item -> item.close());",
        "Runnable r = this::run;",
    ])
    .prop_map(str::to_owned)
}

fn arb_body(stmt: BoxedStrategy<String>) -> impl Strategy<Value = String> + Clone {
    prop::collection::vec(stmt, 0..4).prop_map(|stmts| stmts.join(" "))
}

fn arb_stmt() -> BoxedStrategy<String> {
    arb_simple_stmt().boxed().prop_recursive(3, 24, 4, |inner| {
        let body = arb_body(inner);
        prop_oneof![
            body.clone().prop_map(|b| format!("if (ready) {{ {b} }}")),
            (body.clone(), body.clone()).prop_map(|(a, b)| format!("if (a < b) {{ {a} }} else {{ {b} }}")),
            body.clone().prop_map(|b| format!("while (i < n) {{ {b} }}")),
            body.clone().prop_map(|b| format!("do {{ {b} }} while (!done);")),
            body.clone().prop_map(|b| format!("for (int i = 0; i < n; i++) {{ {b} }}")),
            body.clone().prop_map(|b| format!("for (String s : items) {{ {b} }}")),
            body.clone().prop_map(|b| format!("synchronized (lock) {{ {b} }}")),
            (body.clone(), body.clone())
                .prop_map(|(a, b)| format!("try {{ {a} }} catch (Exception e) {{ {b} }} finally {{ cleanup(); }}")),
            (body.clone(), body.clone()).prop_map(|(a, b)| format!("switch (k) {{ case 1: {a} default: {b} }}")),
            body.prop_map(|b| format!("out: {{ {b} }}")),
        ]
    })
    .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn distilling_is_deterministic(body in arb_body(arb_stmt())) {
        let source = method_source(&body);
        let first = nova_distill::distill_method(&source, "method").expect("distill");
        let second = nova_distill::distill_method(&source, "method").expect("distill");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranges_stay_inside_the_source_and_their_parents(body in arb_body(arb_stmt())) {
        let source = method_source(&body);
        let tree = nova_distill::distill_method(&source, "method").expect("distill");
        for node in tree.root().descendants() {
            let range = node.source_range();
            prop_assert!(range.start <= range.end);
            prop_assert!(range.is_within(source.len()), "{:?} escapes the source", node);
            if let Some(parent) = node.parent() {
                let outer = parent.source_range();
                prop_assert!(outer.start <= range.start && range.end <= outer.end, "{:?} escapes {:?}", node, parent);
            }
        }
    }

    #[test]
    fn verbatim_leaves_reproduce_their_source(body in arb_body(arb_stmt())) {
        let source = method_source(&body);
        let tree = nova_distill::distill_method(&source, "method").expect("distill");
        for node in tree.root().descendants() {
            if node.label().is_leaf() {
                prop_assert!(node.is_leaf(), "{:?} has children", node);
            }
            if node.label().is_verbatim() {
                prop_assert_eq!(node.value(), text_of(&source, node));
            }
        }
    }
}
