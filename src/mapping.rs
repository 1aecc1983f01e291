use crate::atom::{Arg, Atom, Fact, Param};
use crate::object::ObjectId;
use smallvec::SmallVec;

/// A partial binding of stream parameters to objects.
/// Uses Vec<Option<ObjectId>> since parameters are dense per declaration.
/// None means the parameter is unbound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapping {
    bindings: Vec<Option<ObjectId>>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Create a mapping with room for `n` parameters.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            bindings: vec![None; n],
        }
    }

    /// Bind a parameter to an object.
    /// Extends the mapping if needed. Overwrites an existing binding; callers
    /// that need consistency use [`Mapping::bind_consistent`].
    pub fn bind(&mut self, param: Param, obj: ObjectId) {
        let idx = param.index();
        if idx >= self.bindings.len() {
            self.bindings.resize(idx + 1, None);
        }
        self.bindings[idx] = Some(obj);
    }

    /// Bind `param` if unbound; if bound, require the same object.
    /// Returns false on a conflicting binding and leaves the mapping unchanged.
    pub fn bind_consistent(&mut self, param: Param, obj: ObjectId) -> bool {
        match self.get(param) {
            Some(existing) => existing == obj,
            None => {
                self.bind(param, obj);
                true
            }
        }
    }

    /// Get the binding for a parameter, if any.
    pub fn get(&self, param: Param) -> Option<ObjectId> {
        self.bindings.get(param.index()).copied().flatten()
    }

    /// Read off the objects bound to `params`, in order.
    /// Returns None if any of them is unbound.
    pub fn project(&self, params: &[Param]) -> Option<SmallVec<[ObjectId; 4]>> {
        params.iter().map(|p| self.get(*p)).collect()
    }

    /// Ground a fact pattern under this mapping.
    /// Returns None if the pattern mentions an unbound parameter.
    pub fn apply(&self, fact: &Fact) -> Option<Atom> {
        let args = fact
            .args
            .iter()
            .map(|arg| match arg {
                Arg::Const(obj) => Some(*obj),
                Arg::Param(p) => self.get(*p),
            })
            .collect::<Option<SmallVec<[ObjectId; 4]>>>()?;
        Some(Atom {
            predicate: fact.predicate,
            args,
        })
    }
}

#[cfg(test)]
#[path = "tests/mapping.rs"]
mod tests;
