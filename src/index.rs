//! Known-fact table and the per-(stream, slot) domain index.
//!
//! Both structures are append-only. Index lists hold `AtomId`s in acceptance
//! order, which keeps the combination search deterministic.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::atom::{Atom, Fact};
use crate::stream::StreamId;
use crate::symbol::Symbol;

/// Dense id of an accepted atom, in acceptance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(u32);

impl AtomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Set of known atom heads. Never shrinks.
#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: Vec<Atom>,
    ids: FxHashMap<Atom, AtomId>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an atom. Returns its new id, or None if it was already known.
    pub fn insert(&mut self, atom: Atom) -> Option<AtomId> {
        if self.ids.contains_key(&atom) {
            return None;
        }
        let id = AtomId(self.atoms.len() as u32);
        self.atoms.push(atom.clone());
        self.ids.insert(atom, id);
        Some(id)
    }

    pub fn get(&self, id: AtomId) -> &Atom {
        &self.atoms[id.index()]
    }

    pub fn lookup(&self, atom: &Atom) -> Option<AtomId> {
        self.ids.get(atom).copied()
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.ids.contains_key(atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Atoms in acceptance order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }
}

/// Address of one domain fact: the `slot`-th precondition of `stream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub stream: StreamId,
    pub slot: usize,
}

/// For every stream and every domain slot, the known atoms that fit the
/// slot's predicate and constant positions.
#[derive(Debug)]
pub struct DomainIndex {
    patterns: Vec<Vec<Fact>>,
    entries: Vec<Vec<Vec<AtomId>>>,
    /// Slots per predicate, in (stream, slot) declaration order.
    by_predicate: FxHashMap<Symbol, SmallVec<[SlotRef; 4]>>,
}

impl DomainIndex {
    /// Build an empty index over the given stream domains, in stream order.
    pub fn new<'a>(domains: impl IntoIterator<Item = &'a [Fact]>) -> Self {
        let patterns: Vec<Vec<Fact>> = domains.into_iter().map(<[Fact]>::to_vec).collect();
        let entries = patterns
            .iter()
            .map(|domain| vec![Vec::new(); domain.len()])
            .collect();

        let mut by_predicate: FxHashMap<Symbol, SmallVec<[SlotRef; 4]>> = FxHashMap::default();
        for (stream, domain) in patterns.iter().enumerate() {
            for (slot, fact) in domain.iter().enumerate() {
                by_predicate.entry(fact.predicate).or_default().push(SlotRef {
                    stream: StreamId(stream as u32),
                    slot,
                });
            }
        }

        Self {
            patterns,
            entries,
            by_predicate,
        }
    }

    /// Every slot that admits `atom`, in declaration order.
    pub fn matching_slots(&self, atom: &Atom) -> SmallVec<[SlotRef; 4]> {
        self.by_predicate
            .get(&atom.predicate)
            .map(|slots| {
                slots
                    .iter()
                    .copied()
                    .filter(|s| self.pattern(*s).admits(atom))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn pattern(&self, slot: SlotRef) -> &Fact {
        &self.patterns[slot.stream.index()][slot.slot]
    }

    pub fn push(&mut self, slot: SlotRef, atom: AtomId) {
        self.entries[slot.stream.index()][slot.slot].push(atom);
    }

    /// Atoms recorded for one slot, in acceptance order.
    pub fn slot(&self, slot: SlotRef) -> &[AtomId] {
        &self.entries[slot.stream.index()][slot.slot]
    }

    /// Per-slot lists of one stream.
    pub fn stream_slots(&self, stream: StreamId) -> &[Vec<AtomId>] {
        &self.entries[stream.index()]
    }

    /// Total number of recorded (slot, atom) entries.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|slots| slots.iter())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tests/index.rs"]
mod tests;
