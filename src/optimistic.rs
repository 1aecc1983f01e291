//! Optimistic stream evaluation.
//!
//! Instead of running a sampler, an instance is "evaluated" by minting one
//! placeholder object per declared output and certifying the declared facts
//! over them. Placeholders are hash-consed on (stream, inputs, output), so
//! evaluating the same instance twice yields the same facts.

use crate::atom::Atom;
use crate::mapping::Mapping;
use crate::object::{ObjectId, ObjectStore};
use crate::stream::StreamDecl;

pub struct OptimisticEvaluator<'a> {
    objects: &'a ObjectStore,
    max_level: Option<u32>,
}

impl<'a> OptimisticEvaluator<'a> {
    pub fn new(objects: &'a ObjectStore) -> Self {
        Self {
            objects,
            max_level: None,
        }
    }

    /// Refuse to mint placeholders deeper than `level`.
    pub fn with_max_level(mut self, level: u32) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Certified facts of `decl` applied to `inputs`.
    ///
    /// Returns nothing when the outputs would exceed the level bound. Streams
    /// without outputs (tests) always certify.
    pub fn evaluate(&self, decl: &StreamDecl, inputs: &[ObjectId]) -> Vec<Atom> {
        if let Some(max_level) = self.max_level {
            let level = 1 + inputs
                .iter()
                .map(|obj| self.objects.level(*obj))
                .max()
                .unwrap_or(0);
            if !decl.outputs.is_empty() && level > max_level {
                return Vec::new();
            }
        }

        let mut mapping = Mapping::with_capacity(decl.params.len());
        for (param, obj) in decl.inputs.iter().zip(inputs.iter()) {
            mapping.bind(*param, *obj);
        }
        for (k, param) in decl.outputs.iter().enumerate() {
            let placeholder = self.objects.optimistic(decl.name, inputs, k as u32);
            mapping.bind(*param, placeholder);
        }

        decl.certified
            .iter()
            .filter_map(|fact| mapping.apply(fact))
            .collect()
    }
}
