//! Double-dispatch traversal over the syntax tree.
//!
//! [`Node::accept`] picks the handler for the node's kind; each handler defaults to
//! [`Visitor::visit_children`], which visits every child in order and hands the results to
//! [`Visitor::combine`]. Concrete visitors override only the kinds they care about and still
//! handle every other kind through the default.

use crate::ast::{Child, Node};

/// A traversal over CQL syntax trees.
pub trait Visitor: Sized {
    /// Result of visiting one node or string leaf.
    type Output;

    /// Produces the result for a string leaf of a terminal node.
    fn visit_text(&mut self, text: &str) -> Self::Output;

    /// Combines the results of a node's children into the node's result.
    fn combine(&mut self, node: &Node, children: Vec<Self::Output>) -> Self::Output;

    /// Visits every child of `node` in order and combines the results.
    fn visit_children(&mut self, node: &Node) -> Self::Output {
        let results = node
            .children()
            .iter()
            .map(|child| match child {
                Child::Node(child) => child.accept(self),
                Child::Text(text) => self.visit_text(text),
            })
            .collect();
        self.combine(node, results)
    }

    /// Handles a `CqlQuery` node.
    fn visit_cql_query(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `ScopedClause` node.
    fn visit_scoped_clause(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `SearchClause` node.
    fn visit_search_clause(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `Boolean` node.
    fn visit_boolean(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `SearchTerm` node.
    fn visit_search_term(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles an `Index` node.
    fn visit_index(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `Relation` node.
    fn visit_relation(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `Comparitor` node.
    fn visit_comparitor(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `ModifierList` node.
    fn visit_modifier_list(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `Modifier` node.
    fn visit_modifier(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles a `Term` node.
    fn visit_term(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }

    /// Handles an `Identifier` node.
    fn visit_identifier(&mut self, node: &Node) -> Self::Output {
        self.visit_children(node)
    }
}
