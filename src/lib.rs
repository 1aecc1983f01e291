//! Incremental stream instantiation for stream-based task planning.

pub mod atom;
pub mod fixpoint;
pub mod index;
pub mod instantiate;
pub mod mapping;
pub mod object;
pub mod optimistic;
pub mod parser;
pub mod queue;
pub mod stats;
pub mod stream;
pub mod symbol;
pub mod trace;
pub mod unify;

#[cfg(test)]
pub(crate) mod test_utils;

pub use atom::{Arg, Atom, Fact, Param};
pub use instantiate::Instantiator;
pub use object::{Object, ObjectId, ObjectStore};
pub use stream::{Stream, StreamDecl, StreamError, StreamId, StreamInstance};
pub use symbol::{Symbol, SymbolStore};
