use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{
    lit::{Ident, Lit, Name},
    node::NodeId,
    ops::{BinaryOp, LogicalOp, UnaryOp},
    stmt::Block,
};

/// A typed reference to any expression node.
#[derive(Clone, Copy, Debug, From, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprId {
    Lit(NodeId<Lit>),
    Ident(NodeId<Ident>),
    Unary(NodeId<Unary>),
    Binary(NodeId<Binary>),
    Logical(NodeId<Logical>),
    Call(NodeId<Call>),
    Cond(NodeId<Cond>),
    Arrow(NodeId<Arrow>),
    ArrayLit(NodeId<ArrayLit>),
    Member(NodeId<Member>),
    Assign(NodeId<Assign>),
}

impl ExprId {
    pub fn raw(&self) -> usize {
        match self {
            Self::Lit(id) => id.raw(),
            Self::Ident(id) => id.raw(),
            Self::Unary(id) => id.raw(),
            Self::Binary(id) => id.raw(),
            Self::Logical(id) => id.raw(),
            Self::Call(id) => id.raw(),
            Self::Cond(id) => id.raw(),
            Self::Arrow(id) => id.raw(),
            Self::ArrayLit(id) => id.raw(),
            Self::Member(id) => id.raw(),
            Self::Assign(id) => id.raw(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub op: UnaryOp,
    pub arg: ExprId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub op: BinaryOp,
    pub lhs: ExprId,
    pub rhs: ExprId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Logical {
    pub op: LogicalOp,
    pub lhs: ExprId,
    pub rhs: ExprId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub callee: ExprId,
    pub args: Vec<ExprId>,
}

/// A conditional expression `test ? cons : alt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cond {
    pub test: ExprId,
    pub cons: ExprId,
    pub alt: ExprId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrowBody {
    Expr(ExprId),
    Block(NodeId<Block>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub params: Vec<NodeId<Name>>,
    pub body: ArrowBody,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrayLit {
    pub elements: Vec<ExprId>,
}

/// Array indexing `object[index]`; the only member access the language has.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub object: ExprId,
    pub index: ExprId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignTarget {
    Ident(NodeId<Ident>),
    Member(NodeId<Member>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub target: AssignTarget,
    pub value: ExprId,
}
