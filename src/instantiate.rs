//! The stream instantiation engine.
//!
//! Each accepted fact is appended to every domain slot it fits, and for each
//! such slot the engine joins it against the current contents of the
//! stream's other slots (semi-naive: only tuples containing the new fact are
//! formed). Tuples that unify yield input bindings, which become stream
//! instances on the ready queue, at most once each.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::atom::{Atom, Fact};
use crate::index::{AtomId, AtomTable, DomainIndex, SlotRef};
use crate::object::ObjectId;
use crate::queue::ReadyQueue;
use crate::stats::InstantiationStats;
use crate::stream::{validate_streams, Stream, StreamDecl, StreamError, StreamId};
use crate::symbol::Symbol;
use crate::unify::unify;

#[cfg(feature = "tracing")]
use crate::trace::{debug, debug_span, trace};

/// Incremental instantiator for one planning attempt.
///
/// Owns every index it maintains; nothing is shared between engines.
pub struct Instantiator<S: Stream = StreamDecl> {
    streams: Vec<S>,
    arities: FxHashMap<Symbol, usize>,
    atoms: AtomTable,
    index: DomainIndex,
    queue: ReadyQueue<S::Instance>,
    stats: InstantiationStats,
}

impl<S: Stream> Instantiator<S> {
    /// Validate `streams`, enqueue every zero-input stream, then submit the
    /// initial facts in order.
    pub fn new(
        streams: Vec<S>,
        init: impl IntoIterator<Item = Atom>,
    ) -> Result<Self, StreamError> {
        let arities = validate_streams(streams.iter().map(Stream::decl))?;
        let index = DomainIndex::new(streams.iter().map(|s| s.decl().domain.as_slice()));

        let mut engine = Self {
            streams,
            arities,
            atoms: AtomTable::new(),
            index,
            queue: ReadyQueue::new(),
            stats: InstantiationStats::default(),
        };

        for i in 0..engine.streams.len() {
            if engine.streams[i].decl().is_zero_input() {
                engine.request(StreamId(i as u32), &[]);
            }
        }
        for atom in init {
            engine.submit(atom);
        }

        #[cfg(feature = "tracing")]
        debug!(
            streams = engine.streams.len(),
            facts = engine.atoms.len(),
            instances = engine.queue.num_seen(),
            "instantiator_ready"
        );

        Ok(engine)
    }

    /// Submit a fact that may not be ground. Non-ground facts are rejected
    /// without touching any state.
    pub fn submit_fact(&mut self, fact: &Fact) -> bool {
        match fact.ground() {
            Some(atom) => self.submit(atom),
            None => {
                self.stats.submitted += 1;
                self.stats.rejected += 1;
                false
            }
        }
    }

    /// Submit a ground fact. Returns true iff it is a new head.
    ///
    /// Facts whose predicate is declared with a different arity are rejected;
    /// facts already known are ignored. Either way the result is false and
    /// nothing changes.
    pub fn submit(&mut self, atom: Atom) -> bool {
        #[cfg(feature = "tracing")]
        let _span = debug_span!("submit", arity = atom.arity()).entered();

        self.stats.submitted += 1;

        if let Some(&arity) = self.arities.get(&atom.predicate) {
            if arity != atom.arity() {
                #[cfg(feature = "tracing")]
                trace!(expected = arity, found = atom.arity(), "submit_arity_mismatch");
                self.stats.rejected += 1;
                return false;
            }
        }

        let Some(id) = self.atoms.insert(atom) else {
            self.stats.duplicate_facts += 1;
            return false;
        };
        self.stats.accepted += 1;

        let slots = self.index.matching_slots(self.atoms.get(id));
        for slot in slots {
            self.index.push(slot, id);
            self.stats.slot_matches += 1;
            self.add_combinations(slot, id);
        }
        true
    }

    /// Submit several ground facts in order. Returns how many were new.
    pub fn submit_all(&mut self, atoms: impl IntoIterator<Item = Atom>) -> usize {
        atoms
            .into_iter()
            .map(|atom| self.submit(atom))
            .filter(|new| *new)
            .count()
    }

    /// Admit the instance of `stream` on `inputs`. Returns true iff it was
    /// not admitted before.
    ///
    /// `stream` must name one of the engine's streams and `inputs` must match
    /// its declared inputs one for one.
    pub fn request(&mut self, stream: StreamId, inputs: &[ObjectId]) -> bool {
        debug_assert!(
            stream.index() < self.streams.len(),
            "request for unknown stream {}",
            stream
        );
        debug_assert_eq!(
            inputs.len(),
            self.streams[stream.index()].decl().inputs.len(),
            "request input count mismatch for stream {}",
            stream
        );
        admit(
            &self.streams,
            &mut self.queue,
            &mut self.stats,
            stream,
            inputs,
        )
    }

    /// Join the newly indexed `atom` (fixed in `trigger`'s slot) against the
    /// current lists of the stream's other slots.
    fn add_combinations(&mut self, trigger: SlotRef, atom: AtomId) {
        let Self {
            streams,
            atoms,
            index,
            queue,
            stats,
            ..
        } = self;
        let decl = streams[trigger.stream.index()].decl();

        let lists: SmallVec<[&[AtomId]; 8]> = index
            .stream_slots(trigger.stream)
            .iter()
            .enumerate()
            .map(|(k, list)| {
                if k == trigger.slot {
                    std::slice::from_ref(&atom)
                } else {
                    list.as_slice()
                }
            })
            .collect();
        if lists.iter().any(|list| list.is_empty()) {
            return;
        }

        // Lexicographic product: first slot slowest, last slot fastest.
        let mut cursor: SmallVec<[usize; 8]> = smallvec![0; lists.len()];
        let mut combo: SmallVec<[&Atom; 8]> = SmallVec::with_capacity(lists.len());
        loop {
            combo.clear();
            combo.extend(
                lists
                    .iter()
                    .zip(cursor.iter())
                    .map(|(list, &k)| atoms.get(list[k])),
            );
            stats.combinations += 1;

            match unify(&decl.domain, &combo) {
                Some(mapping) => {
                    if let Some(inputs) = mapping.project(&decl.inputs) {
                        admit(streams, queue, stats, trigger.stream, &inputs);
                    }
                }
                None => stats.unify_failures += 1,
            }

            let mut k = lists.len();
            loop {
                if k == 0 {
                    return;
                }
                k -= 1;
                cursor[k] += 1;
                if cursor[k] < lists[k].len() {
                    break;
                }
                cursor[k] = 0;
            }
        }
    }

    /// Hand out the oldest pending instance.
    pub fn pop(&mut self) -> Option<S::Instance> {
        self.queue.pop()
    }

    pub fn peek(&self) -> Option<&S::Instance> {
        self.queue.peek()
    }

    /// Instances waiting to be handed out, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &S::Instance> {
        self.queue.iter()
    }

    /// Number of instances waiting to be handed out.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of instances ever created, handed out or not.
    pub fn num_instances(&self) -> usize {
        self.queue.num_seen()
    }

    pub fn contains_instance(&self, instance: &S::Instance) -> bool {
        self.queue.contains(instance)
    }

    pub fn is_known(&self, atom: &Atom) -> bool {
        self.atoms.contains(atom)
    }

    /// Known facts, in acceptance order.
    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    pub fn index(&self) -> &DomainIndex {
        &self.index
    }

    pub fn streams(&self) -> &[S] {
        &self.streams
    }

    pub fn stream(&self, id: StreamId) -> &S {
        &self.streams[id.index()]
    }

    /// Declared arity of a predicate, if any stream mentions it.
    pub fn arity(&self, predicate: Symbol) -> Option<usize> {
        self.arities.get(&predicate).copied()
    }

    pub fn stats(&self) -> &InstantiationStats {
        &self.stats
    }
}

fn admit<S: Stream>(
    streams: &[S],
    queue: &mut ReadyQueue<S::Instance>,
    stats: &mut InstantiationStats,
    stream: StreamId,
    inputs: &[ObjectId],
) -> bool {
    let instance = streams[stream.index()].get_instance(stream, inputs);
    if queue.push(instance) {
        #[cfg(feature = "tracing")]
        trace!(stream = stream.0, inputs = inputs.len(), "instance_admitted");
        stats.instances += 1;
        true
    } else {
        stats.duplicate_instances += 1;
        false
    }
}

impl<S: Stream> fmt::Debug for Instantiator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instantiator")
            .field("streams", &self.streams.len())
            .field("atoms", &self.atoms.len())
            .field("indexed", &self.index.len())
            .field("pending", &self.queue.len())
            .field("instances", &self.queue.num_seen())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/instantiate.rs"]
mod tests;
