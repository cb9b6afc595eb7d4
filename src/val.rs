use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Runtime value exchanged between the host interpreter, the dispatch
/// wrapper, and compiled entry points.
///
/// Constants in a compilation unit are carried as `Val`s untouched; the
/// bridge never interprets them beyond cloning and equality. Interpretation
/// is the backend's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Val {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// String type, wrapped in Arc<str> for cheap cloning
    Str(Arc<str>),
    /// List type, stored as Arc<[Val]> for compact, immutable sharing
    List(Arc<[Val]>),
}

impl Val {
    /// Only `Nil` and `false` are falsey.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Val::Nil | Val::Bool(false))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Val::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Nil => "nil",
            Val::Bool(_) => "bool",
            Val::Int(_) => "int",
            Val::Float(_) => "float",
            Val::Str(_) => "str",
            Val::List(_) => "list",
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Nil => write!(f, "nil"),
            Val::Bool(b) => write!(f, "{}", b),
            Val::Int(n) => write!(f, "{}", n),
            Val::Float(x) => write!(f, "{}", x),
            Val::Str(s) => write!(f, "{}", s),
            Val::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Self {
        Val::Int(n)
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<f64> for Val {
    fn from(x: f64) -> Self {
        Val::Float(x)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Str(Arc::from(s))
    }
}
