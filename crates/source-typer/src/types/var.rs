use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind constraint carried by a type variable.
///
/// `None` admits any term; `Addable` admits only `number`, `string`, or
/// another variable, which is then tightened to `Addable` itself. Transfer
/// only ever widens, never loosens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VarKind {
    #[default]
    None,
    Addable,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::None => write!(f, "none"),
            VarKind::Addable => write!(f, "addable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeVar {
    id: u32,
    kind: VarKind,
}

impl TypeVar {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// A copy of this variable with its kind widened to `Addable`.
    pub fn tightened(self) -> Self {
        Self {
            id: self.id,
            kind: VarKind::Addable,
        }
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VarKind::None => write!(f, "'t{}", self.id),
            VarKind::Addable => write!(f, "'a{}", self.id),
        }
    }
}

/// The monotonic counter that mints every type variable of one check.
///
/// Owned by the top-level entry point and threaded by `&mut`, so two runs
/// over the same program produce identical variable names.
#[derive(Debug, Default)]
pub struct VarSupply {
    next: u32,
}

impl VarSupply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> TypeVar {
        self.fresh_kinded(VarKind::None)
    }

    pub fn fresh_kinded(&mut self, kind: VarKind) -> TypeVar {
        let id = self.next;
        self.next += 1;
        TypeVar { id, kind }
    }

    /// A fresh variable with the same kind as the given one.
    pub fn fresh_like(&mut self, var: &TypeVar) -> TypeVar {
        self.fresh_kinded(var.kind)
    }
}
