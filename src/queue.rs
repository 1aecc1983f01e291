use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::hash::Hash;

/// FIFO backlog of stream instances with at-most-once admission.
///
/// The seen set outlives the backlog: an instance that has been popped is
/// still rejected if requested again.
#[derive(Debug, Clone)]
pub struct ReadyQueue<I> {
    pending: VecDeque<I>,
    seen: FxHashSet<I>,
}

impl<I: Clone + Eq + Hash> ReadyQueue<I> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Admit an instance. Returns false if it was ever admitted before.
    pub fn push(&mut self, instance: I) -> bool {
        if !self.seen.insert(instance.clone()) {
            return false;
        }
        self.pending.push_back(instance);
        true
    }

    /// Hand out the oldest pending instance.
    pub fn pop(&mut self) -> Option<I> {
        self.pending.pop_front()
    }

    pub fn peek(&self) -> Option<&I> {
        self.pending.front()
    }

    /// Number of instances waiting to be handed out.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the instance was ever admitted, pending or not.
    pub fn contains(&self, instance: &I) -> bool {
        self.seen.contains(instance)
    }

    /// Number of instances ever admitted.
    pub fn num_seen(&self) -> usize {
        self.seen.len()
    }

    /// Pending instances, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.pending.iter()
    }
}

impl<I: Clone + Eq + Hash> Default for ReadyQueue<I> {
    fn default() -> Self {
        Self::new()
    }
}
