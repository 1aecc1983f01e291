use crate::atom::{Arg, Atom, Fact};
use crate::mapping::Mapping;

#[cfg(feature = "tracing")]
use crate::trace::trace;

/// Bind the parameters of `domain` against positionally matching ground
/// facts, returning the combined mapping or None on any conflict.
///
/// `domain[i]` and `candidates[i]` must share a predicate and arity; the
/// domain index guarantees this, so a mismatch is a caller bug.
///
/// A constant position must match exactly. A parameter binds on first
/// occurrence and must agree on every later one, whether the repeat is in the
/// same fact or a different one. There is no backtracking: one bad position
/// rejects the whole combination.
pub fn unify(domain: &[Fact], candidates: &[&Atom]) -> Option<Mapping> {
    debug_assert_eq!(domain.len(), candidates.len(), "unify length mismatch");

    let mut mapping = Mapping::new();
    for (pattern, atom) in domain.iter().zip(candidates.iter()) {
        debug_assert_eq!(pattern.predicate, atom.predicate, "unify predicate mismatch");
        debug_assert_eq!(pattern.args.len(), atom.args.len(), "unify arity mismatch");

        for (arg, obj) in pattern.args.iter().zip(atom.args.iter()) {
            match arg {
                Arg::Const(c) => {
                    if c != obj {
                        #[cfg(feature = "tracing")]
                        trace!("unify_constant_mismatch");
                        return None;
                    }
                }
                Arg::Param(p) => {
                    if !mapping.bind_consistent(*p, *obj) {
                        #[cfg(feature = "tracing")]
                        trace!(param = p.0, "unify_binding_conflict");
                        return None;
                    }
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    trace!(facts = domain.len(), "unify_success");

    Some(mapping)
}

#[cfg(test)]
#[path = "tests/unify.rs"]
mod tests;
