use serde::{Deserialize, Serialize};
use source_span::Span;

use crate::node::{Node, NodeId, NodePool, TryAsMut, TryAsRef};

/// One parsed program: the node pool plus a parallel side-table of
/// optional source locations.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub nodes: NodePool,
    pub spans: Vec<Option<Span>>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert<T>(&mut self, node: T) -> NodeId<T>
    where
        T: Into<Node>,
    {
        let id = self.nodes.insert(node);
        self.spans.push(None);
        id
    }

    pub fn insert_at<T>(&mut self, node: T, span: Span) -> NodeId<T>
    where
        T: Into<Node>,
    {
        let id = self.nodes.insert(node);
        self.spans.push(Some(span));
        id
    }

    pub fn get<T>(&self, id: NodeId<T>) -> &T
    where
        Node: TryAsRef<T>,
    {
        self.nodes.get(id)
    }

    pub fn get_mut<T>(&mut self, id: NodeId<T>) -> &mut T
    where
        Node: TryAsMut<T>,
    {
        self.nodes.get_mut(id)
    }

    pub fn span(&self, idx: usize) -> Option<Span> {
        self.spans.get(idx).copied().flatten()
    }
}
