use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Number,
    String,
    Undefined,
}

impl Primitive {
    /// Whether an `addable` variable may resolve to this primitive.
    pub fn is_addable(&self) -> bool {
        matches!(self, Self::Number | Self::String)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}
