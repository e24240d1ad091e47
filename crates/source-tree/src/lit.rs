use serde::{Deserialize, Serialize};
use std::fmt;

/// An identifier at a declaration or parameter site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An identifier at a use site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident(pub String);

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LitValue {
    Bool(bool),
    Num(f64),
    Str(String),
    Null,
    Undefined,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lit(pub LitValue);

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            LitValue::Bool(b) => b.fmt(f),
            LitValue::Num(n) => n.fmt(f),
            LitValue::Str(s) => write!(f, "{s:?}"),
            LitValue::Null => write!(f, "null"),
            LitValue::Undefined => write!(f, "undefined"),
        }
    }
}
