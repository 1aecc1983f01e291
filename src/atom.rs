//! Facts: ground atoms and parameterized fact patterns.

use crate::object::{format_object, ObjectId, ObjectStore};
use crate::symbol::{Symbol, SymbolStore};
use smallvec::SmallVec;

/// A stream-local parameter (`?x`), numbered densely per declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Param(pub u32);

impl Param {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One argument position of a fact pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arg {
    Param(Param),
    Const(ObjectId),
}

/// A ground fact. The atom is its own head: two atoms are the same fact
/// iff predicate and arguments are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: Symbol,
    pub args: SmallVec<[ObjectId; 4]>,
}

impl Atom {
    pub fn new(predicate: Symbol, args: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            predicate,
            args: args.into_iter().collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A fact pattern whose arguments are parameters or constants.
///
/// Used for stream domains and certified facts, and as the input type of
/// submissions that may not be ground.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    pub predicate: Symbol,
    pub args: SmallVec<[Arg; 4]>,
}

impl Fact {
    pub fn new(predicate: Symbol, args: impl IntoIterator<Item = Arg>) -> Self {
        Self {
            predicate,
            args: args.into_iter().collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(|arg| matches!(arg, Arg::Const(_)))
    }

    /// Convert to an Atom if every argument is a constant.
    pub fn ground(&self) -> Option<Atom> {
        let args = self
            .args
            .iter()
            .map(|arg| match arg {
                Arg::Const(obj) => Some(*obj),
                Arg::Param(_) => None,
            })
            .collect::<Option<SmallVec<[ObjectId; 4]>>>()?;
        Some(Atom {
            predicate: self.predicate,
            args,
        })
    }

    /// Parameters in argument order, repeats included.
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.args.iter().filter_map(|arg| match arg {
            Arg::Param(p) => Some(*p),
            Arg::Const(_) => None,
        })
    }

    pub fn mentions(&self, param: Param) -> bool {
        self.params().any(|p| p == param)
    }

    /// Whether `atom` could fill this pattern: same predicate and arity, and
    /// every constant position agrees. Parameter positions are left to
    /// unification.
    pub fn admits(&self, atom: &Atom) -> bool {
        self.predicate == atom.predicate
            && self.args.len() == atom.args.len()
            && self.args.iter().zip(atom.args.iter()).all(|(arg, obj)| match arg {
                Arg::Const(c) => c == obj,
                Arg::Param(_) => true,
            })
    }
}

impl From<Atom> for Fact {
    fn from(atom: Atom) -> Self {
        Fact {
            predicate: atom.predicate,
            args: atom.args.into_iter().map(Arg::Const).collect(),
        }
    }
}

/// Render an atom as `(Pred a b)`.
pub fn format_atom(atom: &Atom, objects: &ObjectStore, symbols: &SymbolStore) -> String {
    let mut out = String::from("(");
    out.push_str(symbols.name(atom.predicate));
    for arg in atom.args.iter() {
        out.push(' ');
        out.push_str(&format_object(*arg, objects, symbols));
    }
    out.push(')');
    out
}

/// Render a fact pattern, naming parameters through `param_names`.
pub fn format_fact(
    fact: &Fact,
    param_names: &[String],
    objects: &ObjectStore,
    symbols: &SymbolStore,
) -> String {
    let mut out = String::from("(");
    out.push_str(symbols.name(fact.predicate));
    for arg in fact.args.iter() {
        out.push(' ');
        match arg {
            Arg::Param(p) => match param_names.get(p.index()) {
                Some(name) => {
                    out.push('?');
                    out.push_str(name);
                }
                None => {
                    out.push_str("?_");
                    out.push_str(&p.0.to_string());
                }
            },
            Arg::Const(obj) => out.push_str(&format_object(*obj, objects, symbols)),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
#[path = "tests/atom.rs"]
mod tests;
