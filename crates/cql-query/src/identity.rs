//! Identity traversal: rebuilds a tree node by node.
//!
//! The result is a fresh tree equal to the input. Rewriting visitors with a [`Child`] output
//! use [`copy_text`] and [`copy_node`] as their `visit_text` and `combine`, then override only
//! the `visit_<kind>` methods for the kinds they change.

use crate::{
    ast::{Child, Node},
    visitor::Visitor,
};

/// Deep-copies a syntax tree.
#[derive(Debug, Clone, Copy)]
pub struct IdentityVisitor<'a> {
    /// Tree being copied.
    root: &'a Node,
}

impl<'a> IdentityVisitor<'a> {
    /// Creates a copying traversal over `root`.
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    /// Copies the tree.
    pub fn visit(&mut self) -> Node {
        let root = self.root;
        match root.accept(self) {
            Child::Node(node) => node,
            // A node never visits to a bare leaf; `combine` always wraps its children.
            Child::Text(_) => root.clone(),
        }
    }
}

/// Copies a text leaf.
pub fn copy_text(text: &str) -> Child {
    Child::Text(text.to_string())
}

/// Rebuilds `node` with the already visited `children`, keeping its kind.
pub fn copy_node(node: &Node, children: Vec<Child>) -> Child {
    Child::Node(Node::from_parts(node.kind(), children))
}

impl Visitor for IdentityVisitor<'_> {
    type Output = Child;

    fn visit_text(&mut self, text: &str) -> Child {
        copy_text(text)
    }

    fn combine(&mut self, node: &Node, children: Vec<Child>) -> Child {
        copy_node(node, children)
    }
}
