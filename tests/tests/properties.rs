//! Property tests over randomly shaped aggregate trees.

use aggraph_compiler::compile;
use aggraph_model::{AggregateNode, InheritVia, Member, ValueMember};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Shape of one aggregate: own key and plain scalars, then children.
#[derive(Debug, Clone)]
struct Shape {
    keys: usize,
    plain: usize,
    children: Vec<(bool, Shape)>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = (0usize..3, 0usize..2).prop_map(|(keys, plain)| Shape {
        keys,
        plain,
        children: Vec::new(),
    });
    leaf.prop_recursive(3, 16, 3, |inner| {
        (
            0usize..3,
            0usize..2,
            prop::collection::vec((any::<bool>(), inner), 0..3),
        )
            .prop_map(|(keys, plain, children)| Shape {
                keys,
                plain,
                children,
            })
    })
}

fn render_members(shape: &Shape, counter: &mut usize, out: &mut String) {
    for i in 0..shape.keys {
        out.push_str(&format!("K{} is=\"int key\"\n", i));
    }
    for i in 0..shape.plain {
        out.push_str(&format!("V{} is=\"word\"\n", i));
    }
    for (many, child) in &shape.children {
        *counter += 1;
        let n = *counter;
        let flag = if *many { "children" } else { "child" };
        out.push_str(&format!("C{} is=\"{}\" aggregate=\"A{}\" {{\n", n, flag, n));
        render_members(child, counter, out);
        out.push_str("}\n");
    }
}

fn render(roots: &[Shape]) -> String {
    let mut counter = 0;
    let mut out = String::from("App {\n");
    for root in roots {
        counter += 1;
        out.push_str(&format!("A{} {{\n", counter));
        render_members(root, &mut counter, &mut out);
        out.push_str("}\n");
    }
    out.push_str("}\n");
    out
}

fn names(members: &[ValueMember<'_>]) -> Vec<String> {
    members.iter().map(ValueMember::member_name).collect()
}

fn parent_inherited(aggregate: &AggregateNode<'_>) -> Vec<String> {
    aggregate
        .members()
        .iter()
        .filter_map(Member::as_value)
        .filter(|v| matches!(v.inherits().map(|i| &i.via), Some(InheritVia::Parent(_))))
        .map(ValueMember::member_name)
        .collect()
}

proptest! {
    #[test]
    fn prop_children_mirror_parent_keys_in_order(roots in prop::collection::vec(shape_strategy(), 1..3)) {
        let schema = compile(&render(&roots)).unwrap();

        for aggregate in schema.all_aggregates() {
            let Some(parent) = aggregate.parent() else {
                continue;
            };
            let expected: Vec<String> = parent
                .key_values()
                .iter()
                .map(|k| format!("{}_{}", parent.name(), k.member_name()))
                .collect();
            prop_assert_eq!(parent_inherited(&aggregate), expected);
        }
    }

    #[test]
    fn prop_ancestors_are_root_first_and_simple(roots in prop::collection::vec(shape_strategy(), 1..3)) {
        let schema = compile(&render(&roots)).unwrap();

        for aggregate in schema.all_aggregates() {
            let ancestors = aggregate.ancestors();
            let mut seen: Vec<_> = ancestors.iter().map(AggregateNode::id).collect();
            seen.push(aggregate.id());
            let count = seen.len();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), count);

            match ancestors.first() {
                Some(first) => prop_assert!(first.is_root()),
                None => prop_assert!(aggregate.is_root()),
            }
            prop_assert_eq!(ancestors.last().cloned(), aggregate.parent());
            prop_assert_eq!(aggregate.root(), aggregate.this_and_ancestors()[0].clone());
        }
    }

    #[test]
    fn prop_derivation_is_idempotent(roots in prop::collection::vec(shape_strategy(), 1..3)) {
        let schema = compile(&render(&roots)).unwrap();

        for aggregate in schema.all_aggregates() {
            let first: Vec<String> = aggregate.members().iter().map(Member::name).collect();
            let second: Vec<String> = aggregate.members().iter().map(Member::name).collect();
            prop_assert_eq!(first, second);
            prop_assert_eq!(names(&aggregate.key_values()), names(&aggregate.key_values()));
            prop_assert_eq!(
                names(&aggregate.display_members()),
                names(&aggregate.display_members())
            );
        }
    }
}

// ========== TEST: rendered_shape_compiles ==========
#[test]
fn test_rendered_shape_compiles() {
    // GIVEN a root with one key and repeated children holding one key
    let roots = vec![Shape {
        keys: 1,
        plain: 0,
        children: vec![(
            true,
            Shape {
                keys: 1,
                plain: 1,
                children: Vec::new(),
            },
        )],
    }];

    // WHEN rendered and compiled
    let schema = compile(&render(&roots)).unwrap();

    // THEN the child mirrors the root key before its own
    let child = schema.find_aggregate("A2").unwrap();
    assert_eq!(names(&child.key_values()), vec!["A1_K0", "K0"]);
    assert_eq!(parent_inherited(&child), vec!["A1_K0"]);
}
