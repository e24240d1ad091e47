use serde::{Deserialize, Serialize};
use std::fmt;

use super::Type;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairType {
    pub head: Type,
    pub tail: Type,
}

impl PairType {
    pub fn new(head: Type, tail: Type) -> Self {
        Self { head, tail }
    }
}

impl fmt::Display for PairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pair<{}, {}>", self.head, self.tail)
    }
}
