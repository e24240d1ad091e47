use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{expr::ExprId, lit::Name, node::NodeId};

/// A typed reference to any statement node.
#[derive(Clone, Copy, Debug, From, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StmtId {
    Expr(NodeId<ExprStmt>),
    VarDecl(NodeId<VarDecl>),
    FuncDecl(NodeId<FuncDecl>),
    Return(NodeId<Return>),
    If(NodeId<If>),
    While(NodeId<While>),
    For(NodeId<For>),
    Block(NodeId<Block>),
}

impl StmtId {
    pub fn raw(&self) -> usize {
        match self {
            Self::Expr(id) => id.raw(),
            Self::VarDecl(id) => id.raw(),
            Self::FuncDecl(id) => id.raw(),
            Self::Return(id) => id.raw(),
            Self::If(id) => id.raw(),
            Self::While(id) => id.raw(),
            Self::For(id) => id.raw(),
            Self::Block(id) => id.raw(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: ExprId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Const,
    Let,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: DeclKind,
    pub name: NodeId<Name>,
    pub init: ExprId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: NodeId<Name>,
    pub params: Vec<NodeId<Name>>,
    pub body: NodeId<Block>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub arg: Option<ExprId>,
}

/// An if statement. Branches are blocks; `alt` may be another `If` for
/// `else if` chains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub test: ExprId,
    pub cons: NodeId<Block>,
    pub alt: Option<StmtId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub test: ExprId,
    pub body: NodeId<Block>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct For {
    pub init: StmtId,
    pub test: ExprId,
    pub update: ExprId,
    pub body: NodeId<Block>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<StmtId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<StmtId>,
}
