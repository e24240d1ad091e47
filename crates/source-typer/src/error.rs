use thiserror::Error;

use crate::types::{Type, TypeVar};

/// A failure raised by the constraint store or the substitution walker.
///
/// Faults are caught at the inference rule that provoked them and converted
/// into structured diagnostics; they never escape to the caller of the
/// checker.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeFault {
    #[error("cannot unify `{expected}` with `{actual}`")]
    CannotUnify { expected: Type, actual: Type },
    #[error("`{var}` admits only number or string, not `{actual}`")]
    NotAddable { var: TypeVar, actual: Type },
    #[error("expected {expected} arguments but received {received}")]
    Arity { expected: usize, received: usize },
    #[error("`{var}` occurs in `{ty}`")]
    Cyclic { var: TypeVar, ty: Type },
}

impl TypeFault {
    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::Cyclic { .. })
    }

    pub fn is_arity(&self) -> bool {
        matches!(self, Self::Arity { .. })
    }
}
