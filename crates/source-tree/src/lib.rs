//! The abstract syntax tree consumed by the type checker.
//!
//! Nodes live in an append-only [`NodePool`]; child links are typed ids.
//! A parser in front of this crate is expected to produce a [`SyntaxTree`];
//! tests (and tools) construct one through [`build::TreeBuilder`].

pub mod build;
pub mod expr;
pub mod lit;
pub mod node;
pub mod ops;
pub mod stmt;
pub mod tree;

pub use build::TreeBuilder;
pub use expr::*;
pub use lit::*;
pub use node::{Node, NodeId, NodePool, TryAsMut, TryAsRef};
pub use ops::*;
pub use stmt::*;
pub use tree::SyntaxTree;
