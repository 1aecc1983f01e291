use crate::atom::{Arg, Atom, Fact};
use crate::object::{ObjectId, ObjectStore};
use crate::stream::StreamDecl;
use crate::symbol::SymbolStore;

pub(crate) fn setup() -> (SymbolStore, ObjectStore) {
    (SymbolStore::new(), ObjectStore::new())
}

/// Stores plus shorthand constructors for facts and declarations.
///
/// Arguments written `?name` are parameters, everything else is a named
/// constant.
pub(crate) struct Fixture {
    pub symbols: SymbolStore,
    pub objects: ObjectStore,
}

impl Fixture {
    pub fn new() -> Self {
        let (symbols, objects) = setup();
        Self { symbols, objects }
    }

    pub fn obj(&self, name: &str) -> ObjectId {
        self.objects.named(self.symbols.intern(name))
    }

    pub fn atom(&self, predicate: &str, args: &[&str]) -> Atom {
        Atom::new(
            self.symbols.intern(predicate),
            args.iter().map(|a| self.obj(a)),
        )
    }

    /// Build a fact pattern, registering parameters on `decl`.
    pub fn fact(&self, decl: &mut StreamDecl, predicate: &str, args: &[&str]) -> Fact {
        let args: Vec<Arg> = args
            .iter()
            .map(|a| match a.strip_prefix('?') {
                Some(name) => Arg::Param(decl.param(name)),
                None => Arg::Const(self.obj(a)),
            })
            .collect();
        Fact::new(self.symbols.intern(predicate), args)
    }

    /// Declare a stream from inputs and `(predicate, args)` domain facts.
    pub fn stream(&self, name: &str, inputs: &[&str], domain: &[(&str, &[&str])]) -> StreamDecl {
        self.stream_with_outputs(name, inputs, domain, &[], &[])
    }

    pub fn stream_with_outputs(
        &self,
        name: &str,
        inputs: &[&str],
        domain: &[(&str, &[&str])],
        outputs: &[&str],
        certified: &[(&str, &[&str])],
    ) -> StreamDecl {
        let mut decl = StreamDecl::new(name, &self.symbols);
        for input in inputs {
            let param = decl.param(input.trim_start_matches('?'));
            decl.inputs.push(param);
        }
        for (predicate, args) in domain {
            let fact = self.fact(&mut decl, predicate, args);
            decl.domain.push(fact);
        }
        for output in outputs {
            let param = decl.param(output.trim_start_matches('?'));
            decl.outputs.push(param);
        }
        for (predicate, args) in certified {
            let fact = self.fact(&mut decl, predicate, args);
            decl.certified.push(fact);
        }
        decl
    }
}
