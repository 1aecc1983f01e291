use lasso::{Spur, ThreadedRodeo};

/// An interned name: a predicate, a stream, or a named constant.
/// Compared by value, so predicate dispatch is an integer comparison.
pub type Symbol = Spur;

/// Names seen in stream files and facts.
///
/// One store is shared by the parser, the engine's consumer and any
/// evaluator that mints objects, so interning takes `&self`. Predicate and
/// object names live in the same table; a name used as both gets one Symbol.
pub struct SymbolStore {
    rodeo: ThreadedRodeo,
}

impl SymbolStore {
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.rodeo.get_or_intern(name)
    }

    /// None for a Symbol minted by another store.
    pub fn resolve(&self, id: Symbol) -> Option<&str> {
        self.rodeo.try_resolve(&id)
    }

    /// Name for display. Foreign Symbols render as `<unknown>` rather than
    /// failing, since formatting never errors.
    pub fn name(&self, id: Symbol) -> &str {
        self.resolve(id).unwrap_or("<unknown>")
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolStore")
            .field("names", &self.rodeo.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/symbol.rs"]
mod tests;
