//! Normalization of CQL syntax trees into query expressions.
//!
//! The normalizer is a [`Visitor`] that:
//!
//! - unwraps `CqlQuery` nodes and single-clause scoped clauses
//! - rewrites `a NOT b` to `a AND b` with `b` negated
//! - flattens operands that use the same operator and are not negated, so `a and b and c`
//!   becomes one AND node with three operands
//! - drops parentheses, which only affect grouping
//!
//! Leaves keep the index, comparitor text and boost of their search clause.

use log::trace;

use crate::{
    ast::{Node, NodeKind},
    error::{CqlError, ParseError},
    expression::{NestedExpression, Operator, QueryExpression, SearchTermExpression},
    parser::parse,
    visitor::Visitor,
};

/// Intermediate result of [`ExpressionVisitor`] for one node.
///
/// Callers that drive the visitor through [`Node::accept`] get a [`Fragment::Expression`] for
/// any clause or query node; the other variants only appear for a node's parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Text of a terminal node.
    Text(String),
    /// Comparitor text and optional boost of a relation.
    Relation {
        /// Comparitor as written.
        comparitor: String,
        /// Value of the boost modifier.
        boost: Option<f64>,
    },
    /// A finished expression.
    Expression(QueryExpression),
    /// Results of a node with several children.
    Sequence(Vec<Self>),
}

/// Result type of the normalizing traversal.
pub type Normalized = Result<Fragment, ParseError>;

/// Error for a hand-built tree that does not have a shape the parser produces.
fn malformed(node: &Node) -> ParseError {
    ParseError::new(format!("malformed {} node: {node}", node.kind()))
}

/// Builds a [`QueryExpression`] from a syntax tree.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionVisitor<'a> {
    /// Tree being normalized.
    root: &'a Node,
}

impl<'a> ExpressionVisitor<'a> {
    /// Creates a normalizing traversal over `root`.
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    /// Normalizes the tree.
    pub fn visit(&mut self) -> Result<QueryExpression, ParseError> {
        let root = self.root;
        self.expression(root)
    }

    /// Visits `node` and expects a finished expression.
    fn expression(&mut self, node: &Node) -> Result<QueryExpression, ParseError> {
        match node.accept(self)? {
            Fragment::Expression(expression) => Ok(expression),
            _ => Err(malformed(node)),
        }
    }

    /// Visits `node` and expects terminal text.
    fn text(&mut self, node: &Node) -> Result<String, ParseError> {
        match node.accept(self)? {
            Fragment::Text(text) => Ok(text),
            _ => Err(malformed(node)),
        }
    }

    /// Visits a relation and returns its comparitor and boost.
    fn relation(&mut self, node: &Node) -> Result<(String, Option<f64>), ParseError> {
        match node.accept(self)? {
            Fragment::Relation { comparitor, boost } => Ok((comparitor, boost)),
            _ => Err(malformed(node)),
        }
    }

    /// Joins two operands, applying the NOT rewrite and associative flattening.
    fn join(
        &mut self,
        lhs: &Node,
        boolean: &Node,
        rhs: &Node,
    ) -> Result<QueryExpression, ParseError> {
        let left = self.expression(lhs)?;
        let mut right = self.expression(rhs)?;
        let operator = match self.text(boolean)?.to_lowercase().as_str() {
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => {
                right.set_must_not(true);
                Operator::And
            }
            _ => return Err(malformed(boolean)),
        };

        let mut nested = NestedExpression {
            operator,
            operands: Vec::new(),
            must_not: false,
        };
        for side in [left, right] {
            match side {
                QueryExpression::Nested(inner) if inner.operator == operator && !inner.must_not => {
                    nested.operands.extend(inner.operands);
                }
                other => nested.operands.push(other),
            }
        }
        Ok(QueryExpression::Nested(nested))
    }
}

impl Visitor for ExpressionVisitor<'_> {
    type Output = Normalized;

    fn visit_text(&mut self, text: &str) -> Normalized {
        Ok(Fragment::Text(text.to_string()))
    }

    /// Single-child nodes pass their child's result through.
    fn combine(&mut self, _node: &Node, children: Vec<Normalized>) -> Normalized {
        let mut fragments = children.into_iter().collect::<Result<Vec<_>, _>>()?;
        if fragments.len() == 1 {
            return Ok(fragments.remove(0));
        }
        Ok(Fragment::Sequence(fragments))
    }

    fn visit_scoped_clause(&mut self, node: &Node) -> Normalized {
        match node.child_nodes().collect::<Vec<_>>().as_slice() {
            [clause] => Ok(Fragment::Expression(self.expression(clause)?)),
            [lhs, boolean, rhs] => Ok(Fragment::Expression(self.join(lhs, boolean, rhs)?)),
            _ => Err(malformed(node)),
        }
    }

    fn visit_search_clause(&mut self, node: &Node) -> Normalized {
        let children: Vec<&Node> = node.child_nodes().collect();
        let expression = match children.as_slice() {
            [query] if query.kind() == NodeKind::CqlQuery => self.expression(query)?,
            [search_term] if search_term.kind() == NodeKind::SearchTerm => {
                QueryExpression::searchterm(self.text(search_term)?)
            }
            [index, relation, search_term] if index.kind() == NodeKind::Index => {
                let (comparitor, boost) = self.relation(relation)?;
                QueryExpression::SearchTerm(SearchTermExpression {
                    index: Some(self.text(index)?),
                    relation: Some(comparitor),
                    term: self.text(search_term)?,
                    boost,
                    must_not: false,
                })
            }
            _ => return Err(malformed(node)),
        };
        trace!("normalized search clause to {expression}");
        Ok(Fragment::Expression(expression))
    }

    fn visit_relation(&mut self, node: &Node) -> Normalized {
        let comparitor = node
            .child(0)
            .ok_or_else(|| malformed(node))
            .and_then(|c| self.text(c))?;
        let boost = match node.child(1) {
            None => None,
            Some(modifiers) => {
                let value = match modifiers.child_nodes().collect::<Vec<_>>().as_slice() {
                    [modifier] => modifier.child(2),
                    _ => None,
                }
                    .ok_or_else(|| malformed(modifiers))
                    .and_then(|term| self.text(term))?;
                Some(value.parse::<f64>().map_err(|_| malformed(modifiers))?)
            }
        };
        Ok(Fragment::Relation { comparitor, boost })
    }
}

/// Types that can be turned into a [`QueryExpression`].
///
/// Text is parsed first; an existing expression is returned unchanged.
pub trait IntoQueryExpression {
    /// Converts `self` into a normalized query expression.
    fn into_query_expression(self) -> Result<QueryExpression, CqlError>;
}

impl IntoQueryExpression for &str {
    fn into_query_expression(self) -> Result<QueryExpression, CqlError> {
        parse(self)?.into_query_expression()
    }
}

impl IntoQueryExpression for &String {
    fn into_query_expression(self) -> Result<QueryExpression, CqlError> {
        self.as_str().into_query_expression()
    }
}

impl IntoQueryExpression for &Node {
    fn into_query_expression(self) -> Result<QueryExpression, CqlError> {
        Ok(ExpressionVisitor::new(self).visit()?)
    }
}

impl IntoQueryExpression for Node {
    fn into_query_expression(self) -> Result<QueryExpression, CqlError> {
        (&self).into_query_expression()
    }
}

impl IntoQueryExpression for QueryExpression {
    fn into_query_expression(self) -> Result<QueryExpression, CqlError> {
        Ok(self)
    }
}

/// Normalizes CQL text, a syntax tree or an existing expression into a [`QueryExpression`].
pub fn to_query_expression(input: impl IntoQueryExpression) -> Result<QueryExpression, CqlError> {
    input.into_query_expression()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(term: &str) -> QueryExpression {
        QueryExpression::searchterm(term)
    }

    fn and(operands: Vec<QueryExpression>) -> QueryExpression {
        operands
            .into_iter()
            .fold(QueryExpression::nested(Operator::And), QueryExpression::with_operand)
    }

    fn or(operands: Vec<QueryExpression>) -> QueryExpression {
        operands
            .into_iter()
            .fold(QueryExpression::nested(Operator::Or), QueryExpression::with_operand)
    }

    fn expr(query: &str) -> QueryExpression {
        to_query_expression(query).unwrap()
    }

    #[test]
    fn single_term() {
        assert_eq!(expr("term"), leaf("term"));
    }

    #[test]
    fn indexed_term() {
        assert_eq!(expr("title = dune"), QueryExpression::indexed("title", "=", "dune"));
        assert_eq!(
            expr("title EXACT dune"),
            QueryExpression::indexed("title", "EXACT", "dune")
        );
    }

    #[test]
    fn quoted_term_is_stripped() {
        assert_eq!(expr(r#""string \"quotes\"""#), leaf(r#"string "quotes""#));
    }

    #[test]
    fn boost_is_attached() {
        assert_eq!(
            expr("field0 =/boost=1.5 value"),
            QueryExpression::indexed("field0", "=", "value").with_boost(1.5)
        );
    }

    #[test]
    fn boost_mapping_keeps_decimal_value() {
        let mapping = expr("title =/boost=1.1 dune").as_mapping().unwrap();
        assert_eq!(mapping["boost"], serde_json::json!(1.1));
        assert_eq!(mapping["boost"].as_f64(), Some(1.1));
    }

    #[test]
    fn relation_with_two_modifiers_is_malformed() {
        let boost = |value: &str| {
            Node::modifier(Node::identifier("boost"), Node::comparitor("="), Node::term(value))
        };
        let node = Node::cql_query(Node::scoped(Node::indexed_search_clause(
            Node::index(Node::term("title")),
            Node::relation(
                Node::comparitor("="),
                Some(Node::modifier_list(vec![boost("1"), boost("2")])),
            ),
            Node::search_term(Node::term("dune")),
        )));
        let err = to_query_expression(&node).unwrap_err();
        assert!(err.message().contains("malformed"));
    }

    #[test]
    fn visitor_is_usable_through_accept() {
        let ast = parse("a or b").unwrap();
        let mut visitor = ExpressionVisitor::new(&ast);
        let fragment: Normalized = ast.accept(&mut visitor);
        assert_eq!(
            fragment.unwrap(),
            Fragment::Expression(or(vec![leaf("a"), leaf("b")]))
        );

        let relation = Node::relation(Node::comparitor("exact"), None);
        assert_eq!(
            relation.accept(&mut visitor).unwrap(),
            Fragment::Relation {
                comparitor: "exact".into(),
                boost: None
            }
        );
    }

    #[test]
    fn and_chain_is_flattened() {
        let result = expr("a and b and c and d");
        assert_eq!(result, and(vec![leaf("a"), leaf("b"), leaf("c"), leaf("d")]));
        assert_eq!(result.operands().len(), 4);
    }

    #[test]
    fn or_chain_is_flattened() {
        assert_eq!(expr("a or b or c"), or(vec![leaf("a"), leaf("b"), leaf("c")]));
    }

    #[test]
    fn not_becomes_negated_and() {
        assert_eq!(
            expr("term not thisterm"),
            and(vec![leaf("term"), leaf("thisterm").negated()])
        );
    }

    #[test]
    fn negated_operand_is_not_flattened() {
        assert_eq!(
            expr("a not (b and c)"),
            and(vec![leaf("a"), and(vec![leaf("b"), leaf("c")]).negated()])
        );
    }

    #[test]
    fn not_chain_with_and() {
        assert_eq!(
            expr("a not b and c or d"),
            or(vec![and(vec![leaf("a"), leaf("b").negated(), leaf("c")]), leaf("d")])
        );
    }

    #[test]
    fn precedence() {
        assert_eq!(
            expr("a or b and c or d"),
            or(vec![leaf("a"), and(vec![leaf("b"), leaf("c")]), leaf("d")])
        );
    }

    #[test]
    fn parentheses_only_group() {
        let expected = or(vec![and(vec![leaf("term"), leaf("term2")]), leaf("term3")]);
        assert_eq!(expr("(term and term2) or term3"), expected);
        assert_eq!(expr("term and term2 or term3"), expected);
        assert_eq!(expr("((term))"), leaf("term"));
    }

    #[test]
    fn group_with_same_operator_is_flattened() {
        assert_eq!(
            expr("a and (b and c)"),
            and(vec![leaf("a"), leaf("b"), leaf("c")])
        );
    }

    #[test]
    fn idempotent() {
        for query in ["a and b or c", "x not y", "title = dune", "(a or b) and c"] {
            let once = expr(query);
            assert_eq!(to_query_expression(once.clone()).unwrap(), once, "{query}");
        }
    }

    #[test]
    fn accepts_every_input_kind() {
        let text = String::from("a or b");
        let ast = parse(&text).unwrap();
        let expected = or(vec![leaf("a"), leaf("b")]);
        assert_eq!(to_query_expression(&text).unwrap(), expected);
        assert_eq!(to_query_expression(&ast).unwrap(), expected);
        assert_eq!(to_query_expression(ast).unwrap(), expected);
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(matches!(to_query_expression("a and"), Err(CqlError::Parse(_))));
        assert!(matches!(
            to_query_expression("a prox b"),
            Err(CqlError::Unsupported(_))
        ));
    }

    #[test]
    fn malformed_tree_is_rejected() {
        let node = Node::cql_query(Node::term("loose"));
        let err = to_query_expression(&node).unwrap_err();
        assert!(err.message().contains("malformed"));

        let bad_boolean = Node::cql_query(Node::scoped_clause(
            Node::search_clause(Node::search_term(Node::term("a"))),
            Node::boolean("xor"),
            Node::search_clause(Node::search_term(Node::term("b"))),
        ));
        assert!(to_query_expression(bad_boolean).is_err());
    }

    #[test]
    fn tree_is_not_modified() {
        let ast = parse("a not b").unwrap();
        let copy = ast.clone();
        let _expression = to_query_expression(&ast).unwrap();
        assert_eq!(ast, copy);
    }
}
