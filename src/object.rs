use crate::symbol::{Symbol, SymbolStore};
use hashbrown::HashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;

/// Handle to a hash-consed planning object.
/// Equal objects always share an ObjectId, so the engine compares ids only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Get the raw u32 value (for debugging/display).
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A planning-domain constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    /// A named constant such as `block1` or `table`.
    Named(Symbol),
    /// A numeric literal.
    Int(i64),
    /// Placeholder for the `output`-th result of a stream that has not been
    /// evaluated for real yet. Identified by stream name and input objects.
    Optimistic {
        stream: Symbol,
        inputs: SmallVec<[ObjectId; 4]>,
        output: u32,
    },
}

#[derive(Default)]
struct Table {
    objects: Vec<Object>,
    levels: Vec<u32>,
    ids: HashMap<Object, ObjectId>,
}

/// Hash-consing store for objects.
///
/// Interning takes `&self` so the store can be shared between the engine's
/// consumer and the evaluators that mint new objects.
pub struct ObjectStore {
    table: RwLock<Table>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }

    /// Intern an object, returning its ObjectId.
    /// If the object already exists, returns the existing ObjectId.
    pub fn intern(&self, object: Object) -> ObjectId {
        // Fast path: already interned (read lock)
        {
            let table = self.table.read();
            if let Some(&id) = table.ids.get(&object) {
                return id;
            }
        }

        let mut table = self.table.write();
        // Double-check after acquiring write lock
        if let Some(&id) = table.ids.get(&object) {
            return id;
        }

        let level = match &object {
            Object::Named(_) | Object::Int(_) => 0,
            Object::Optimistic { inputs, .. } => {
                1 + inputs
                    .iter()
                    .map(|id| table.levels.get(id.0 as usize).copied().unwrap_or(0))
                    .max()
                    .unwrap_or(0)
            }
        };
        let id = ObjectId(table.objects.len() as u32);
        table.objects.push(object.clone());
        table.levels.push(level);
        table.ids.insert(object, id);
        id
    }

    /// Intern a named constant.
    pub fn named(&self, name: Symbol) -> ObjectId {
        self.intern(Object::Named(name))
    }

    /// Intern an integer literal.
    pub fn int(&self, value: i64) -> ObjectId {
        self.intern(Object::Int(value))
    }

    /// Intern the placeholder for output `output` of `stream` applied to `inputs`.
    pub fn optimistic(&self, stream: Symbol, inputs: &[ObjectId], output: u32) -> ObjectId {
        self.intern(Object::Optimistic {
            stream,
            inputs: SmallVec::from_slice(inputs),
            output,
        })
    }

    /// Resolve an ObjectId to its object.
    /// Returns None if the ObjectId is not from this store.
    pub fn resolve(&self, id: ObjectId) -> Option<Object> {
        self.table.read().objects.get(id.0 as usize).cloned()
    }

    /// Optimistic nesting depth: 0 for real constants, one more than the
    /// deepest input for placeholders.
    pub fn level(&self, id: ObjectId) -> u32 {
        self.table
            .read()
            .levels
            .get(id.0 as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_optimistic(&self, id: ObjectId) -> bool {
        matches!(self.resolve(id), Some(Object::Optimistic { .. }))
    }

    pub fn len(&self) -> usize {
        self.table.read().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("len", &self.len())
            .finish()
    }
}

/// Render an object: named constants by name, placeholders as
/// `#stream.k(inputs...)`.
pub fn format_object(id: ObjectId, objects: &ObjectStore, symbols: &SymbolStore) -> String {
    fn render(id: ObjectId, objects: &ObjectStore, symbols: &SymbolStore, out: &mut String) {
        match objects.resolve(id) {
            Some(Object::Named(name)) => out.push_str(symbols.name(name)),
            Some(Object::Int(value)) => out.push_str(&value.to_string()),
            Some(Object::Optimistic {
                stream,
                inputs,
                output,
            }) => {
                out.push('#');
                out.push_str(symbols.name(stream));
                out.push('.');
                out.push_str(&output.to_string());
                out.push('(');
                for (i, input) in inputs.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    render(*input, objects, symbols, out);
                }
                out.push(')');
            }
            None => {
                out.push_str("<obj ");
                out.push_str(&id.raw().to_string());
                out.push('>');
            }
        }
    }

    let mut out = String::new();
    render(id, objects, symbols, &mut out);
    out
}

#[cfg(test)]
#[path = "tests/object.rs"]
mod tests;
