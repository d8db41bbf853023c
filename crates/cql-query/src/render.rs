//! Rendering syntax trees back to CQL text.
//!
//! The output reparses to a tree equal to the input. Booleans are printed upper case, terms
//! are quoted when they need it, and a plain `=` relation is written without spaces
//! (`title=dune`).

use crate::{
    ast::{Node, NodeKind},
    lexer::quote_term,
    visitor::Visitor,
};

/// Renders a syntax tree as CQL text.
#[derive(Debug, Clone, Copy)]
pub struct CqlStringVisitor<'a> {
    /// Tree being rendered.
    root: &'a Node,
}

impl<'a> CqlStringVisitor<'a> {
    /// Creates a rendering traversal over `root`.
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    /// Renders the tree.
    pub fn visit(&mut self) -> String {
        let root = self.root;
        root.accept(self)
    }
}

impl Visitor for CqlStringVisitor<'_> {
    type Output = String;

    fn visit_text(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn combine(&mut self, _node: &Node, children: Vec<String>) -> String {
        children.join(" ")
    }

    fn visit_search_clause(&mut self, node: &Node) -> String {
        match node.child(0) {
            Some(query) if query.kind() == NodeKind::CqlQuery => {
                format!("({})", query.accept(self))
            }
            _ => node
                .child_nodes()
                .map(|child| child.accept(self))
                .collect::<String>(),
        }
    }

    fn visit_boolean(&mut self, node: &Node) -> String {
        node.text().unwrap_or_default().to_uppercase()
    }

    fn visit_relation(&mut self, node: &Node) -> String {
        let relation: String = node.child_nodes().map(|child| child.accept(self)).collect();
        if relation == "=" {
            relation
        } else {
            format!(" {relation} ")
        }
    }

    fn visit_modifier(&mut self, node: &Node) -> String {
        let modifier: String = node.child_nodes().map(|child| child.accept(self)).collect();
        format!("/{modifier}")
    }

    fn visit_comparitor(&mut self, node: &Node) -> String {
        node.text().unwrap_or_default().to_string()
    }

    fn visit_identifier(&mut self, node: &Node) -> String {
        node.text().unwrap_or_default().to_string()
    }

    fn visit_term(&mut self, node: &Node) -> String {
        quote_term(node.text().unwrap_or_default()).into_owned()
    }
}

/// Renders a syntax tree as CQL text.
pub fn to_cql_string(node: &Node) -> String {
    CqlStringVisitor::new(node).visit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    /// Asserts that `expected` renders unchanged and reparses.
    fn assert_cql(expected: &str) {
        assert_cql_from(expected, expected);
    }

    /// Asserts that `input` renders as `expected`, and that the rendering reparses to the same
    /// tree.
    fn assert_cql_from(input: &str, expected: &str) {
        let ast = parse(input).unwrap();
        let rendered = to_cql_string(&ast);
        assert_eq!(rendered, expected);
        assert_eq!(parse(&rendered).unwrap(), ast, "{input}");
    }

    #[test]
    fn terms() {
        assert_cql("term");
        assert_cql("\"term 2\"");
        assert_cql(r#""term \"two\"""#);
        assert_cql(r#""(some) braces""#);
    }

    #[test]
    fn booleans() {
        assert_cql("term1 AND term2");
        assert_cql("term1 AND term2 AND term3");
        assert_cql("term1 AND term2 AND term3 AND term4");
        assert_cql("(term1 AND term2) OR term3 AND term4");
        assert_cql("(term1 NOT term2) OR term3 AND term4");
        assert_cql_from("a and b or c", "a AND b OR c");
    }

    #[test]
    fn relations() {
        assert_cql("field1=term1");
        assert_cql("field1 exact term1");
        assert_cql("field1=term1 AND field2 exact term2");
        assert_cql("field1 > 3");
        assert_cql("field1 >= 3");
        assert_cql_from("field1 = term1", "field1=term1");
        assert_cql_from("title ANY \"x y\"", "title ANY \"x y\"");
    }

    #[test]
    fn parentheses() {
        assert_cql("field1=term1 AND (term2 OR term3)");
        assert_cql("((a))");
    }

    #[test]
    fn boost() {
        assert_cql("field0 =/boost=1.5 value");
    }

    #[test]
    fn unquoted_index_with_quoted_term() {
        assert_cql_from("title = \"a=b\"", "title=\"a=b\"");
    }
}
