use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use source_tree::{Node, SyntaxTree};

use crate::types::{Type, VarSupply};

/// Where a node stands in the checking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Typability {
    Untypable,
    NotYetTyped,
    Typed,
}

/// The two type-annotation fields carried by every node, plus the extra
/// function type carried by function declarations (whose own inferred
/// type is always `undefined`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMeta {
    pub ty: Type,
    pub typability: Typability,
    pub func_ty: Option<Type>,
}

/// Per-node annotations, parallel to the node pool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotations(Vec<TypeMeta>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The decoration pre-pass: every node receives a fresh variable and
    /// starts out `NotYetTyped`; function declarations additionally
    /// receive a fresh variable for the function type itself.
    pub fn decorate(tree: &SyntaxTree, supply: &mut VarSupply) -> Self {
        let metas = tree
            .nodes
            .iter()
            .map(|node| {
                let ty = Type::Var(supply.fresh());
                let func_ty = match node {
                    Node::FuncDecl(_) => Some(Type::Var(supply.fresh())),
                    _ => None,
                };

                TypeMeta {
                    ty,
                    typability: Typability::NotYetTyped,
                    func_ty,
                }
            })
            .collect();

        Self(metas)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeMeta> {
        self.0.iter()
    }
}

impl Index<usize> for Annotations {
    type Output = TypeMeta;

    fn index(&self, idx: usize) -> &TypeMeta {
        &self.0[idx]
    }
}

impl IndexMut<usize> for Annotations {
    fn index_mut(&mut self, idx: usize) -> &mut TypeMeta {
        &mut self.0[idx]
    }
}
