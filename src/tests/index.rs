use super::*;
use crate::stream::StreamDecl;
use crate::test_utils::Fixture;

fn index_for(decls: &[StreamDecl]) -> DomainIndex {
    DomainIndex::new(decls.iter().map(|d| d.domain.as_slice()))
}

// ========== ATOM TABLE ==========

#[test]
fn atom_table_assigns_ids_in_order() {
    let fx = Fixture::new();
    let mut table = AtomTable::new();
    let a = table.insert(fx.atom("Obj", &["a"])).unwrap();
    let b = table.insert(fx.atom("Obj", &["b"])).unwrap();

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(table.get(b), &fx.atom("Obj", &["b"]));
    assert_eq!(table.lookup(&fx.atom("Obj", &["a"])), Some(a));
}

#[test]
fn atom_table_rejects_known_head() {
    let fx = Fixture::new();
    let mut table = AtomTable::new();
    assert!(table.insert(fx.atom("Obj", &["a"])).is_some());
    assert!(table.insert(fx.atom("Obj", &["a"])).is_none());
    assert_eq!(table.len(), 1);
    assert!(table.contains(&fx.atom("Obj", &["a"])));
}

// ========== DOMAIN INDEX ==========

#[test]
fn matching_slots_follow_declaration_order() {
    let fx = Fixture::new();
    let decls = vec![
        fx.stream("s0", &["?x", "?y"], &[("Obj", &["?x"]), ("Obj", &["?y"])]),
        fx.stream("s1", &["?x"], &[("Obj", &["?x"])]),
    ];
    let index = index_for(&decls);

    let slots = index.matching_slots(&fx.atom("Obj", &["a"]));
    let addrs: Vec<(u32, usize)> = slots.iter().map(|s| (s.stream.0, s.slot)).collect();
    assert_eq!(addrs, vec![(0, 0), (0, 1), (1, 0)]);
}

#[test]
fn constant_slots_filter_candidates() {
    let fx = Fixture::new();
    let decls = vec![fx.stream("s", &["?x"], &[("On", &["?x", "table1"])])];
    let index = index_for(&decls);

    assert_eq!(index.matching_slots(&fx.atom("On", &["a", "table1"])).len(), 1);
    assert!(index.matching_slots(&fx.atom("On", &["a", "table2"])).is_empty());
}

#[test]
fn unknown_predicate_matches_nothing() {
    let fx = Fixture::new();
    let decls = vec![fx.stream("s", &["?x"], &[("Obj", &["?x"])])];
    let index = index_for(&decls);
    assert!(index.matching_slots(&fx.atom("Block", &["a"])).is_empty());
}

#[test]
fn push_appends_to_one_slot() {
    let fx = Fixture::new();
    let decls = vec![fx.stream("s", &["?x", "?y"], &[("Obj", &["?x"]), ("Obj", &["?y"])])];
    let mut index = index_for(&decls);
    let mut table = AtomTable::new();
    let a = table.insert(fx.atom("Obj", &["a"])).unwrap();

    let slot0 = SlotRef {
        stream: StreamId(0),
        slot: 0,
    };
    index.push(slot0, a);

    assert_eq!(index.slot(slot0), &[a]);
    assert!(index.stream_slots(StreamId(0))[1].is_empty());
    assert_eq!(index.len(), 1);
}
