//! Rendering syntax trees as Lucene query strings.
//!
//! `index = term` becomes `index:term`, a boost modifier becomes `^value`, and booleans are
//! printed as `AND`, `OR` and `NOT`. Lucene has no counterpart for the other CQL comparitors, so
//! a relation other than `=` is rejected.

use crate::{
    ast::{Node, NodeKind},
    error::UnsupportedCql,
    lexer::quote_term,
    visitor::Visitor,
};

/// Result type of the Lucene traversal.
type Rendered = Result<String, UnsupportedCql>;

/// Renders a syntax tree as a Lucene query string.
#[derive(Debug, Clone, Copy)]
pub struct LuceneVisitor<'a> {
    /// Tree being rendered.
    root: &'a Node,
}

impl<'a> LuceneVisitor<'a> {
    /// Creates a rendering traversal over `root`.
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    /// Renders the tree.
    pub fn visit(&mut self) -> Rendered {
        let root = self.root;
        root.accept(self)
    }
}

impl Visitor for LuceneVisitor<'_> {
    type Output = Rendered;

    fn visit_text(&mut self, text: &str) -> Rendered {
        Ok(text.to_string())
    }

    fn combine(&mut self, _node: &Node, children: Vec<Rendered>) -> Rendered {
        Ok(children.into_iter().collect::<Result<Vec<_>, _>>()?.join(" "))
    }

    fn visit_search_clause(&mut self, node: &Node) -> Rendered {
        let children: Vec<&Node> = node.child_nodes().collect();
        match children.as_slice() {
            [query] if query.kind() == NodeKind::CqlQuery => {
                Ok(format!("({})", query.accept(self)?))
            }
            [index, relation, search_term] => Ok(format!(
                "{}:{}{}",
                index.accept(self)?,
                search_term.accept(self)?,
                relation.accept(self)?
            )),
            _ => self.visit_children(node),
        }
    }

    fn visit_boolean(&mut self, node: &Node) -> Rendered {
        Ok(node.text().unwrap_or_default().to_uppercase())
    }

    /// Renders the boost suffix of a relation; the `:` is written by the search clause.
    fn visit_relation(&mut self, node: &Node) -> Rendered {
        let comparitor = node.child(0).and_then(Node::text).unwrap_or_default();
        if comparitor != "=" {
            return Err(UnsupportedCql::new(
                format!("relation '{comparitor}' in Lucene output"),
                Some(comparitor),
            ));
        }
        match node.child(1) {
            Some(modifiers) => modifiers.accept(self),
            None => Ok(String::new()),
        }
    }

    fn visit_modifier(&mut self, node: &Node) -> Rendered {
        let value = node.child(2).and_then(Node::text).unwrap_or_default();
        Ok(format!("^{value}"))
    }

    fn visit_term(&mut self, node: &Node) -> Rendered {
        Ok(quote_term(node.text().unwrap_or_default()).into_owned())
    }
}

/// Renders a syntax tree as a Lucene query string.
pub fn to_lucene_string(node: &Node) -> Result<String, UnsupportedCql> {
    LuceneVisitor::new(node).visit()
}
