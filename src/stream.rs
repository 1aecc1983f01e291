//! Stream declarations and the instance factory the engine consumes.

use std::fmt;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use thiserror::Error;

use crate::atom::{Fact, Param};
use crate::object::{format_object, ObjectId, ObjectStore};
use crate::symbol::{Symbol, SymbolStore};

/// Position of a declaration in the engine's stream list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u32);

impl StreamId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contract violations in stream declarations. Found before an engine is
/// built, never on the submission path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("stream {stream}: input ?{param} does not appear in its domain")]
    InputNotInDomain { stream: String, param: String },

    #[error("stream {stream}: input ?{param} is declared twice")]
    DuplicateInput { stream: String, param: String },

    #[error("stream {stream}: output ?{param} is also an input")]
    OutputShadowsInput { stream: String, param: String },

    #[error("stream {stream}: output ?{param} is declared twice")]
    DuplicateOutput { stream: String, param: String },

    #[error("stream {stream}: certified fact mentions ?{param}, which is neither an input nor an output")]
    UnboundCertifiedParam { stream: String, param: String },

    #[error("stream {stream} is declared more than once")]
    DuplicateStream { stream: String },

    #[error("stream {stream}: {section} fact {position} has arity {found}, but stream {other} uses the same predicate with arity {expected}")]
    ArityConflict {
        stream: String,
        section: &'static str,
        position: usize,
        found: usize,
        other: String,
        expected: usize,
    },
}

/// A stream template: which facts must hold for the stream to apply, which
/// of their parameters form its inputs, and what an evaluation certifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDecl {
    pub name: Symbol,
    pub label: String,
    /// Display names, indexed by `Param`.
    pub params: Vec<String>,
    pub inputs: Vec<Param>,
    pub domain: Vec<Fact>,
    pub outputs: Vec<Param>,
    pub certified: Vec<Fact>,
}

impl StreamDecl {
    pub fn new(label: &str, symbols: &SymbolStore) -> Self {
        Self {
            name: symbols.intern(label),
            label: label.to_string(),
            params: Vec::new(),
            inputs: Vec::new(),
            domain: Vec::new(),
            outputs: Vec::new(),
            certified: Vec::new(),
        }
    }

    /// Look up a parameter by name, allocating the next index if new.
    pub fn param(&mut self, name: &str) -> Param {
        if let Some(idx) = self.params.iter().position(|p| p == name) {
            return Param(idx as u32);
        }
        self.params.push(name.to_string());
        Param((self.params.len() - 1) as u32)
    }

    pub fn param_name(&self, param: Param) -> &str {
        self.params
            .get(param.index())
            .map(String::as_str)
            .unwrap_or("_")
    }

    pub fn is_zero_input(&self) -> bool {
        self.inputs.is_empty()
    }

    fn error_param(&self, param: Param) -> (String, String) {
        (self.label.clone(), self.param_name(param).to_string())
    }

    /// Check the declaration's own invariants: every input is grounded by the
    /// domain, inputs and outputs are distinct, and certified facts only
    /// mention inputs and outputs.
    pub fn validate(&self) -> Result<(), StreamError> {
        for (i, input) in self.inputs.iter().enumerate() {
            if self.inputs[..i].contains(input) {
                let (stream, param) = self.error_param(*input);
                return Err(StreamError::DuplicateInput { stream, param });
            }
            if !self.domain.iter().any(|fact| fact.mentions(*input)) {
                let (stream, param) = self.error_param(*input);
                return Err(StreamError::InputNotInDomain { stream, param });
            }
        }
        for (i, output) in self.outputs.iter().enumerate() {
            if self.inputs.contains(output) {
                let (stream, param) = self.error_param(*output);
                return Err(StreamError::OutputShadowsInput { stream, param });
            }
            if self.outputs[..i].contains(output) {
                let (stream, param) = self.error_param(*output);
                return Err(StreamError::DuplicateOutput { stream, param });
            }
        }
        for fact in self.certified.iter() {
            if let Some(param) = fact
                .params()
                .find(|p| !self.inputs.contains(p) && !self.outputs.contains(p))
            {
                let (stream, param) = self.error_param(param);
                return Err(StreamError::UnboundCertifiedParam { stream, param });
            }
        }
        Ok(())
    }
}

/// Validate each declaration, then check that stream names are unique and
/// that every predicate is used with a single arity across all domains and
/// certified facts.
///
/// Names must be unique because optimistic placeholders are keyed on them.
///
/// Returns the arity table, keyed by predicate.
pub fn validate_streams<'a>(
    decls: impl IntoIterator<Item = &'a StreamDecl>,
) -> Result<FxHashMap<Symbol, usize>, StreamError> {
    let mut arities: FxHashMap<Symbol, (usize, &'a StreamDecl)> = FxHashMap::default();
    let mut names: FxHashSet<Symbol> = FxHashSet::default();
    for decl in decls {
        decl.validate()?;
        if !names.insert(decl.name) {
            return Err(StreamError::DuplicateStream {
                stream: decl.label.clone(),
            });
        }
        let sections = [("domain", &decl.domain), ("certified", &decl.certified)];
        for (section, facts) in sections {
            for (position, fact) in facts.iter().enumerate() {
                let (expected, owner) = *arities
                    .entry(fact.predicate)
                    .or_insert((fact.arity(), decl));
                if expected != fact.arity() {
                    return Err(StreamError::ArityConflict {
                        stream: decl.label.clone(),
                        section,
                        position,
                        found: fact.arity(),
                        other: owner.label.clone(),
                        expected,
                    });
                }
            }
        }
    }
    Ok(arities
        .into_iter()
        .map(|(predicate, (arity, _))| (predicate, arity))
        .collect())
}

/// One concrete application of a stream to input objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamInstance {
    pub stream: StreamId,
    pub inputs: SmallVec<[ObjectId; 4]>,
}

impl StreamInstance {
    pub fn new(stream: StreamId, inputs: &[ObjectId]) -> Self {
        Self {
            stream,
            inputs: SmallVec::from_slice(inputs),
        }
    }
}

/// The capability the engine needs from a stream: its declaration and a
/// factory for instances.
///
/// `get_instance` must return equal instances for equal arguments; the
/// engine deduplicates on that equality.
pub trait Stream {
    type Instance: Clone + Eq + Hash + fmt::Debug;

    fn decl(&self) -> &StreamDecl;

    fn get_instance(&self, id: StreamId, inputs: &[ObjectId]) -> Self::Instance;
}

impl Stream for StreamDecl {
    type Instance = StreamInstance;

    fn decl(&self) -> &StreamDecl {
        self
    }

    fn get_instance(&self, id: StreamId, inputs: &[ObjectId]) -> StreamInstance {
        StreamInstance::new(id, inputs)
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    type Instance = S::Instance;

    fn decl(&self) -> &StreamDecl {
        (**self).decl()
    }

    fn get_instance(&self, id: StreamId, inputs: &[ObjectId]) -> S::Instance {
        (**self).get_instance(id, inputs)
    }
}

/// Render an instance as `name(arg ...)`.
pub fn format_instance(
    instance: &StreamInstance,
    decl: &StreamDecl,
    objects: &ObjectStore,
    symbols: &SymbolStore,
) -> String {
    let args: Vec<String> = instance
        .inputs
        .iter()
        .map(|obj| format_object(*obj, objects, symbols))
        .collect();
    format!("{}({})", decl.label, args.join(" "))
}

#[cfg(test)]
#[path = "tests/stream.rs"]
mod tests;
