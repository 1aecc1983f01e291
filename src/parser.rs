//! Parser for stream declarations and fact lists.
//!
//! Syntax (PDDL stream files):
//! - `(define (stream NAME) (:stream ...) ...)` - a stream file; bare
//!   `(:stream ...)` forms at top level are accepted too
//! - `(:stream name :inputs (?x ...) :domain FACTS :outputs (?y ...) :certified FACTS)`
//!   - every key is optional
//!   - `FACTS` is one fact, `(and fact ...)`, or `()`
//! - `(Pred arg ...)` - a fact
//! - `?x` - parameter
//! - `42` - integer constant
//! - anything else - named constant
//! - `;` - comment to end of line
//!
//! Fact files are a sequence of facts, optionally wrapped in `(:init ...)`.

use crate::atom::{Arg, Fact, Param};
use crate::object::ObjectStore;
use crate::stream::StreamDecl;
use crate::symbol::SymbolStore;

/// Parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the input.
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at position {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parenthesized expression tree.
#[derive(Clone, Debug, PartialEq, Eq)]
enum SExpr {
    Atom { text: String, position: usize },
    List { items: Vec<SExpr>, position: usize },
}

impl SExpr {
    fn position(&self) -> usize {
        match self {
            SExpr::Atom { position, .. } | SExpr::List { position, .. } => *position,
        }
    }

    fn as_atom(&self) -> Option<&str> {
        match self {
            SExpr::Atom { text, .. } => Some(text),
            SExpr::List { .. } => None,
        }
    }

    fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List { items, .. } => Some(items),
            SExpr::Atom { .. } => None,
        }
    }

    /// The leading atom of a list, e.g. `and` in `(and ...)`.
    fn head(&self) -> Option<&str> {
        self.as_list()?.first()?.as_atom()
    }
}

fn skip_whitespace(input: &[u8], pos: &mut usize) {
    while *pos < input.len() {
        match input[*pos] {
            b';' => {
                while *pos < input.len() && input[*pos] != b'\n' {
                    *pos += 1;
                }
            }
            c if c.is_ascii_whitespace() => *pos += 1,
            _ => break,
        }
    }
}

fn parse_sexpr(input: &str, pos: &mut usize) -> Result<SExpr, ParseError> {
    let bytes = input.as_bytes();
    skip_whitespace(bytes, pos);

    if *pos >= bytes.len() {
        return Err(ParseError::new("Unexpected end of input", *pos));
    }

    let start = *pos;
    match bytes[*pos] {
        b'(' => {
            *pos += 1;
            let mut items = Vec::new();
            loop {
                skip_whitespace(bytes, pos);
                if *pos >= bytes.len() {
                    return Err(ParseError::new("Unclosed parenthesis", start));
                }
                if bytes[*pos] == b')' {
                    *pos += 1;
                    break;
                }
                items.push(parse_sexpr(input, pos)?);
            }
            Ok(SExpr::List {
                items,
                position: start,
            })
        }
        b')' => Err(ParseError::new("Unexpected ')'", start)),
        _ => {
            while *pos < bytes.len()
                && !bytes[*pos].is_ascii_whitespace()
                && !matches!(bytes[*pos], b'(' | b')' | b';')
            {
                *pos += 1;
            }
            Ok(SExpr::Atom {
                text: input[start..*pos].to_string(),
                position: start,
            })
        }
    }
}

fn parse_all(input: &str) -> Result<Vec<SExpr>, ParseError> {
    let mut pos = 0;
    let mut forms = Vec::new();
    loop {
        skip_whitespace(input.as_bytes(), &mut pos);
        if pos >= input.len() {
            return Ok(forms);
        }
        forms.push(parse_sexpr(input, &mut pos)?);
    }
}

/// Reads facts and declarations out of expression trees, interning names as
/// it goes.
struct Reader<'a> {
    symbols: &'a SymbolStore,
    objects: &'a ObjectStore,
}

impl Reader<'_> {
    fn parse_arg(
        &self,
        expr: &SExpr,
        param: &mut dyn FnMut(&str) -> Param,
    ) -> Result<Arg, ParseError> {
        let text = expr
            .as_atom()
            .ok_or_else(|| ParseError::new("Expected an argument, found a list", expr.position()))?;
        if let Some(name) = text.strip_prefix('?') {
            if name.is_empty() {
                return Err(ParseError::new("Empty parameter name", expr.position()));
            }
            return Ok(Arg::Param(param(name)));
        }
        let obj = match text.parse::<i64>() {
            Ok(value) => self.objects.int(value),
            Err(_) => self.objects.named(self.symbols.intern(text)),
        };
        Ok(Arg::Const(obj))
    }

    fn parse_fact(
        &self,
        expr: &SExpr,
        param: &mut dyn FnMut(&str) -> Param,
    ) -> Result<Fact, ParseError> {
        let items = expr
            .as_list()
            .ok_or_else(|| ParseError::new("Expected a fact", expr.position()))?;
        let (head, rest) = items
            .split_first()
            .ok_or_else(|| ParseError::new("Empty fact", expr.position()))?;
        let predicate = head
            .as_atom()
            .filter(|name| !name.starts_with('?') && !name.starts_with(':'))
            .ok_or_else(|| ParseError::new("Expected a predicate name", head.position()))?;

        let args = rest
            .iter()
            .map(|arg| self.parse_arg(arg, param))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Fact::new(self.symbols.intern(predicate), args))
    }

    /// One fact, `(and fact ...)`, or `()`.
    fn parse_conjunction(
        &self,
        expr: &SExpr,
        param: &mut dyn FnMut(&str) -> Param,
    ) -> Result<Vec<Fact>, ParseError> {
        match expr.as_list() {
            Some([]) => Ok(Vec::new()),
            Some(items) if expr.head() == Some("and") => items[1..]
                .iter()
                .map(|item| self.parse_fact(item, param))
                .collect(),
            _ => Ok(vec![self.parse_fact(expr, param)?]),
        }
    }

    fn parse_params(&self, expr: &SExpr, decl: &mut StreamDecl) -> Result<Vec<Param>, ParseError> {
        let items = expr
            .as_list()
            .ok_or_else(|| ParseError::new("Expected a parameter list", expr.position()))?;
        items
            .iter()
            .map(|item| match item.as_atom().and_then(|t| t.strip_prefix('?')) {
                Some(name) if !name.is_empty() => Ok(decl.param(name)),
                _ => Err(ParseError::new("Expected a ?parameter", item.position())),
            })
            .collect()
    }

    fn parse_stream(&self, expr: &SExpr) -> Result<StreamDecl, ParseError> {
        let items = expr.as_list().unwrap_or(&[]);
        let name = items
            .get(1)
            .and_then(SExpr::as_atom)
            .filter(|name| !name.starts_with(':'))
            .ok_or_else(|| ParseError::new("Expected a stream name", expr.position()))?;

        let mut sections: [Option<&SExpr>; 4] = [None; 4];
        let mut rest = items[2..].iter();
        while let Some(key) = rest.next() {
            let slot = match key.as_atom() {
                Some(":inputs") => 0,
                Some(":domain") => 1,
                Some(":outputs") => 2,
                Some(":certified") => 3,
                Some(other) => {
                    return Err(ParseError::new(
                        format!("Unknown stream key '{}'", other),
                        key.position(),
                    ))
                }
                None => return Err(ParseError::new("Expected a stream key", key.position())),
            };
            if sections[slot].is_some() {
                return Err(ParseError::new("Duplicate stream key", key.position()));
            }
            let value = rest
                .next()
                .ok_or_else(|| ParseError::new("Missing value for stream key", key.position()))?;
            sections[slot] = Some(value);
        }

        let mut decl = StreamDecl::new(name, self.symbols);
        if let Some(inputs) = sections[0] {
            let params = self.parse_params(inputs, &mut decl)?;
            decl.inputs = params;
        }
        if let Some(domain) = sections[1] {
            let facts = self.parse_conjunction(domain, &mut |n: &str| decl.param(n))?;
            decl.domain = facts;
        }
        if let Some(outputs) = sections[2] {
            let params = self.parse_params(outputs, &mut decl)?;
            decl.outputs = params;
        }
        if let Some(certified) = sections[3] {
            let facts = self.parse_conjunction(certified, &mut |n: &str| decl.param(n))?;
            decl.certified = facts;
        }
        Ok(decl)
    }
}

/// Index of `name` in `params`, appending it if new.
fn param_in(params: &mut Vec<String>, name: &str) -> Param {
    match params.iter().position(|p| p == name) {
        Some(idx) => Param(idx as u32),
        None => {
            params.push(name.to_string());
            Param((params.len() - 1) as u32)
        }
    }
}

/// Parse a stream file into declarations, in file order.
///
/// Declarations are not validated here; `Instantiator::new` does that.
pub fn parse_streams(
    input: &str,
    symbols: &SymbolStore,
    objects: &ObjectStore,
) -> Result<Vec<StreamDecl>, ParseError> {
    let reader = Reader { symbols, objects };
    let mut decls = Vec::new();

    for form in parse_all(input)? {
        match form.head() {
            Some("define") => {
                let items = form.as_list().unwrap_or(&[]);
                match items.get(1) {
                    Some(header) if header.head() == Some("stream") => {}
                    _ => {
                        return Err(ParseError::new(
                            "Expected (stream NAME) after define",
                            form.position(),
                        ))
                    }
                }
                for section in items[2..].iter() {
                    decls.push(read_section(&reader, section)?);
                }
            }
            Some(":stream") => decls.push(reader.parse_stream(&form)?),
            _ => {
                return Err(ParseError::new(
                    "Expected (define (stream ...)) or (:stream ...)",
                    form.position(),
                ))
            }
        }
    }
    Ok(decls)
}

fn read_section(reader: &Reader<'_>, section: &SExpr) -> Result<StreamDecl, ParseError> {
    match section.head() {
        Some(":stream") => reader.parse_stream(section),
        Some(other) => Err(ParseError::new(
            format!("Unsupported section '{}'", other),
            section.position(),
        )),
        None => Err(ParseError::new("Expected a (:stream ...) section", section.position())),
    }
}

/// Parse a fact file. Facts may mention `?params`; each fact gets its own
/// parameter numbering. Whether a fact is ground is for the caller to decide.
pub fn parse_facts(
    input: &str,
    symbols: &SymbolStore,
    objects: &ObjectStore,
) -> Result<Vec<Fact>, ParseError> {
    let reader = Reader { symbols, objects };
    let mut facts = Vec::new();

    for form in parse_all(input)? {
        let items = match form.head() {
            Some(":init") => form.as_list().map(|items| &items[1..]).unwrap_or(&[]),
            _ => std::slice::from_ref(&form),
        };
        for item in items {
            let mut params = Vec::new();
            facts.push(reader.parse_fact(item, &mut |n: &str| param_in(&mut params, n))?);
        }
    }
    Ok(facts)
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
