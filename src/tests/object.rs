use super::*;
use crate::test_utils::setup;

#[test]
fn named_objects_are_hashconsed() {
    let (symbols, objects) = setup();
    let block = symbols.intern("block1");
    let a = objects.named(block);
    let b = objects.named(block);
    assert_eq!(a, b);
    assert_eq!(objects.len(), 1);
}

#[test]
fn named_and_int_are_distinct() {
    let (symbols, objects) = setup();
    let one = symbols.intern("1");
    assert_ne!(objects.named(one), objects.int(1));
}

#[test]
fn resolve_returns_interned_object() {
    let (symbols, objects) = setup();
    let table = symbols.intern("table");
    let id = objects.named(table);
    assert_eq!(objects.resolve(id), Some(Object::Named(table)));
}

#[test]
fn optimistic_identity_depends_on_inputs_and_output() {
    let (symbols, objects) = setup();
    let stream = symbols.intern("sample-grasp");
    let a = objects.named(symbols.intern("a"));
    let b = objects.named(symbols.intern("b"));

    let g0 = objects.optimistic(stream, &[a], 0);
    assert_eq!(g0, objects.optimistic(stream, &[a], 0));
    assert_ne!(g0, objects.optimistic(stream, &[b], 0));
    assert_ne!(g0, objects.optimistic(stream, &[a], 1));
    assert!(objects.is_optimistic(g0));
    assert!(!objects.is_optimistic(a));
}

#[test]
fn levels_grow_with_nesting() {
    let (symbols, objects) = setup();
    let stream = symbols.intern("plan-ik");
    let a = objects.named(symbols.intern("a"));
    let q1 = objects.optimistic(stream, &[a], 0);
    let q2 = objects.optimistic(stream, &[a, q1], 0);

    assert_eq!(objects.level(a), 0);
    assert_eq!(objects.level(q1), 1);
    assert_eq!(objects.level(q2), 2);
}

#[test]
fn format_nested_placeholder() {
    let (symbols, objects) = setup();
    let stream = symbols.intern("sample-grasp");
    let a = objects.named(symbols.intern("a"));
    let g = objects.optimistic(stream, &[a, objects.int(3)], 1);
    assert_eq!(format_object(g, &objects, &symbols), "#sample-grasp.1(a 3)");
}
