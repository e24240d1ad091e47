use derive_more::From;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::{
    expr::{Arrow, ArrayLit, Assign, Binary, Call, Cond, Logical, Member, Unary},
    lit::{Ident, Lit, Name},
    stmt::{Block, ExprStmt, For, FuncDecl, If, Program, Return, VarDecl, While},
};

pub trait TryAsRef<T> {
    fn try_as_ref(&self) -> Option<&T>;
}

pub trait TryAsMut<T> {
    fn try_as_mut(&mut self) -> Option<&mut T>;
}

/// A typed index into the [`NodePool`].
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeId<T> {
    id: u32,
    t: PhantomData<T>,
}

impl<T> PartialEq for NodeId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for NodeId<T> {}

impl<T> PartialOrd for NodeId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for NodeId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> std::hash::Hash for NodeId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Clone for NodeId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeId<T> {}

impl<T> NodeId<T> {
    pub(crate) fn new(id: u32) -> Self {
        Self { id, t: PhantomData }
    }

    pub fn raw(&self) -> usize {
        self.id as usize
    }

    pub fn get(self, pool: &NodePool) -> &T
    where
        Node: TryAsRef<T>,
    {
        pool.get(self)
    }

    pub fn get_mut(self, pool: &mut NodePool) -> &mut T
    where
        Node: TryAsMut<T>,
    {
        pool.get_mut(self)
    }
}

/// Append-only arena holding every node of one program.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get<T>(&self, id: NodeId<T>) -> &T
    where
        Node: TryAsRef<T>,
    {
        let node = &self.nodes[id.raw()];
        node.try_as_ref().expect("node kind mismatch")
    }

    pub fn get_mut<T>(&mut self, id: NodeId<T>) -> &mut T
    where
        Node: TryAsMut<T>,
    {
        let node = &mut self.nodes[id.raw()];
        node.try_as_mut().expect("node kind mismatch")
    }

    pub fn insert<T>(&mut self, node: T) -> NodeId<T>
    where
        T: Into<Node>,
    {
        let id = self.nodes.len();
        self.nodes.push(node.into());
        NodeId::new(id as u32)
    }

    pub fn raw(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

/// The closed sum of node kinds.
#[derive(Clone, Debug, From, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Name(Name),
    Lit(Lit),
    Ident(Ident),
    Unary(Unary),
    Binary(Binary),
    Logical(Logical),
    Call(Call),
    Cond(Cond),
    Arrow(Arrow),
    ArrayLit(ArrayLit),
    Member(Member),
    Assign(Assign),
    ExprStmt(ExprStmt),
    VarDecl(VarDecl),
    FuncDecl(FuncDecl),
    Return(Return),
    If(If),
    While(While),
    For(For),
    Block(Block),
    Program(Program),
}

macro_rules! impl_node_casts {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl TryAsRef<$ty> for Node {
                fn try_as_ref(&self) -> Option<&$ty> {
                    match self {
                        Self::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl TryAsMut<$ty> for Node {
                fn try_as_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        Self::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_node_casts!(
    Name => Name,
    Lit => Lit,
    Ident => Ident,
    Unary => Unary,
    Binary => Binary,
    Logical => Logical,
    Call => Call,
    Cond => Cond,
    Arrow => Arrow,
    ArrayLit => ArrayLit,
    Member => Member,
    Assign => Assign,
    ExprStmt => ExprStmt,
    VarDecl => VarDecl,
    FuncDecl => FuncDecl,
    Return => Return,
    If => If,
    While => While,
    For => For,
    Block => Block,
    Program => Program,
);
