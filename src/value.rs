//! Literal argument values.
//!
//! A [`Value`] is anything the call-argument grammar can express: numbers,
//! strings, booleans, `None`, and nested lists/tuples/dicts of the same.
//! No callables, no side-effecting expressions.
//!
//! Display matters here: the deterministic naming scheme stringifies
//! arguments before sanitizing them, so `Display` follows the source
//! convention the scheme was built around (`True`, `[1, 2, 3]`,
//! `{'a': 1}`), and [`Value::repr`] quotes strings the way they would
//! appear inside a container.

use std::fmt;

/// A literal-expressible value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Entries keep insertion order.
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Quoted form, used for values nested inside containers.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('\'');
                for c in s.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        '\r' => out.push_str("\\r"),
                        c => out.push(c),
                    }
                }
                out.push('\'');
                out
            }
            other => other.to_string(),
        }
    }
}

fn join_reprs(items: &[Value]) -> String {
    items
        .iter()
        .map(Value::repr)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => {
                // Integral floats keep one decimal place ("1.0", not "1")
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write!(f, "[{}]", join_reprs(items)),
            Value::Tuple(items) => {
                if items.len() == 1 {
                    write!(f, "({},)", items[0].repr())
                } else {
                    write!(f, "({})", join_reprs(items))
                }
            }
            Value::Dict(entries) => {
                let body = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{body}}}")
            }
        }
    }
}

/// The evaluated argument list of one figure call: positional values in
/// order plus keyword values in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCall {
    pub args: Vec<Value>,
    pub kwargs: Vec<(String, Value)>,
}

impl ParsedCall {
    /// Look up a keyword argument by name.
    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}
