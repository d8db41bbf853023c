//! Query expressions: the canonical boolean tree produced from a CQL syntax tree.
//!
//! A [`QueryExpression`] is either a nested node (an operator over an ordered list of operands) or
//! a search term leaf. Either kind can be negated with `must_not`. The mapping form produced by
//! [`QueryExpression::as_mapping`] is a plain JSON value:
//!
//! ```text
//! {"operator": "AND", "operands": [...], "must_not": false}
//! {"index": "title", "relation": "=", "term": "dune", "boost": 1.5, "must_not": false}
//! ```
//!
//! Optional leaf fields that are absent are omitted from the mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexer::quote_term;

/// Boolean operator of a nested expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Every operand must match.
    And,
    /// At least one operand must match.
    Or,
}

impl Operator {
    /// The operator's upper case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator applied to an ordered list of operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedExpression {
    /// The boolean operator.
    pub operator: Operator,
    /// Operands in query order.
    #[serde(default)]
    pub operands: Vec<QueryExpression>,
    /// True if the whole expression is negated.
    #[serde(default)]
    pub must_not: bool,
}

/// A single search, optionally scoped to an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchTermExpression {
    /// Index (field) being searched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Comparitor text, as written in the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    /// The search term, unquoted.
    pub term: String,
    /// Relevance weight from a `boost` modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    /// True if matches must be excluded.
    #[serde(default)]
    pub must_not: bool,
}

impl SearchTermExpression {
    /// Renders `index relation term`, quoting the term where needed.
    fn label(&self) -> String {
        let term = quote_term(&self.term);
        [self.index.as_deref(), self.relation.as_deref(), Some(&*term)]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A normalized query: nested boolean operators over search term leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryExpression {
    /// An operator over operands.
    Nested(NestedExpression),
    /// A search term leaf.
    SearchTerm(SearchTermExpression),
}

impl QueryExpression {
    /// Creates a nested expression with no operands.
    pub fn nested(operator: Operator) -> Self {
        Self::Nested(NestedExpression {
            operator,
            operands: Vec::new(),
            must_not: false,
        })
    }

    /// Creates a leaf searching for `term` in any index.
    pub fn searchterm(term: impl Into<String>) -> Self {
        Self::SearchTerm(SearchTermExpression {
            index: None,
            relation: None,
            term: term.into(),
            boost: None,
            must_not: false,
        })
    }

    /// Creates a leaf of the form `index relation term`.
    pub fn indexed(
        index: impl Into<String>,
        relation: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self::SearchTerm(SearchTermExpression {
            index: Some(index.into()),
            relation: Some(relation.into()),
            term: term.into(),
            boost: None,
            must_not: false,
        })
    }

    /// Sets the boost of a leaf. Nested expressions carry no boost and are returned unchanged.
    pub fn with_boost(mut self, boost: f64) -> Self {
        if let Self::SearchTerm(leaf) = &mut self {
            leaf.boost = Some(boost);
        }
        self
    }

    /// Marks the expression as negated.
    pub fn negated(mut self) -> Self {
        self.set_must_not(true);
        self
    }

    /// Appends an operand to a nested expression. A leaf is returned unchanged.
    pub fn with_operand(mut self, operand: Self) -> Self {
        if let Self::Nested(nested) = &mut self {
            nested.operands.push(operand);
        }
        self
    }

    /// Returns true for nested expressions.
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// Returns true for search term leaves.
    pub fn is_searchterm(&self) -> bool {
        matches!(self, Self::SearchTerm(_))
    }

    /// The nested expression, if this is one.
    pub fn as_nested(&self) -> Option<&NestedExpression> {
        match self {
            Self::Nested(nested) => Some(nested),
            Self::SearchTerm(_) => None,
        }
    }

    /// The search term leaf, if this is one.
    pub fn as_searchterm(&self) -> Option<&SearchTermExpression> {
        match self {
            Self::Nested(_) => None,
            Self::SearchTerm(leaf) => Some(leaf),
        }
    }

    /// The operator of a nested expression.
    pub fn operator(&self) -> Option<Operator> {
        self.as_nested().map(|nested| nested.operator)
    }

    /// The operands of a nested expression; empty for a leaf.
    pub fn operands(&self) -> &[Self] {
        match self {
            Self::Nested(nested) => &nested.operands,
            Self::SearchTerm(_) => &[],
        }
    }

    /// True if the expression is negated.
    pub fn must_not(&self) -> bool {
        match self {
            Self::Nested(nested) => nested.must_not,
            Self::SearchTerm(leaf) => leaf.must_not,
        }
    }

    /// Sets or clears the negation flag.
    pub fn set_must_not(&mut self, must_not: bool) {
        match self {
            Self::Nested(nested) => nested.must_not = must_not,
            Self::SearchTerm(leaf) => leaf.must_not = must_not,
        }
    }

    /// Iterates over this expression and all descendants in pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Calls `f` on this expression and all descendants in pre-order.
    ///
    /// Children are visited after `f` has run on their parent, so a parent replaced through
    /// [`replace_with`](Self::replace_with) has its new operands visited.
    pub fn for_each_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Self),
    {
        f(self);
        if let Self::Nested(nested) = self {
            for operand in &mut nested.operands {
                operand.for_each_mut(f);
            }
        }
    }

    /// Overwrites this expression in place with `other`.
    pub fn replace_with(&mut self, other: Self) {
        *self = other;
    }

    /// Converts the expression to its mapping form.
    pub fn as_mapping(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuilds an expression from its mapping form.
    pub fn from_mapping(mapping: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(mapping)
    }

    /// Renders the expression as an indented tree (`pretty`) or on a single line.
    pub fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        if pretty {
            self.write_tree(&mut out, 0);
        } else {
            self.write_compact(&mut out);
        }
        out
    }

    /// Appends the tree form, indenting operands four spaces per level.
    fn write_tree(&self, out: &mut String, depth: usize) {
        if self.must_not() {
            out.push('!');
        }
        match self {
            Self::Nested(nested) => {
                out.push_str(nested.operator.as_str());
                let spaces = " ".repeat((depth + 1) * 4);
                for operand in &nested.operands {
                    out.push('\n');
                    out.push_str(&spaces);
                    operand.write_tree(out, depth + 1);
                }
            }
            Self::SearchTerm(leaf) => out.push_str(&leaf.label()),
        }
    }

    /// Appends the single-line `OP[a, b]` form.
    fn write_compact(&self, out: &mut String) {
        if self.must_not() {
            out.push('!');
        }
        match self {
            Self::Nested(nested) => {
                out.push_str(nested.operator.as_str());
                out.push('[');
                for (i, operand) in nested.operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    operand.write_compact(out);
                }
                out.push(']');
            }
            Self::SearchTerm(leaf) => out.push_str(&leaf.label()),
        }
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl<'a> IntoIterator for &'a QueryExpression {
    type Item = &'a QueryExpression;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Pre-order iterator over a query expression, see [`QueryExpression::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Expressions still to be yielded, next one last.
    stack: Vec<&'a QueryExpression>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a QueryExpression;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.operands().iter().rev());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> QueryExpression {
        QueryExpression::nested(Operator::Or)
            .with_operand(
                QueryExpression::nested(Operator::And)
                    .with_operand(QueryExpression::searchterm("a"))
                    .with_operand(QueryExpression::searchterm("b").negated()),
            )
            .with_operand(QueryExpression::indexed("title", "=", "dune").with_boost(1.5))
    }

    #[test]
    fn equality_is_order_sensitive() {
        let ab = QueryExpression::nested(Operator::And)
            .with_operand(QueryExpression::searchterm("a"))
            .with_operand(QueryExpression::searchterm("b"));
        let ba = QueryExpression::nested(Operator::And)
            .with_operand(QueryExpression::searchterm("b"))
            .with_operand(QueryExpression::searchterm("a"));
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
        assert_ne!(
            QueryExpression::searchterm("a"),
            QueryExpression::searchterm("a").negated()
        );
    }

    #[test]
    fn builders_ignore_the_wrong_kind() {
        assert_eq!(
            QueryExpression::searchterm("a").with_operand(QueryExpression::searchterm("b")),
            QueryExpression::searchterm("a")
        );
        assert_eq!(
            QueryExpression::nested(Operator::And).with_boost(2.0),
            QueryExpression::nested(Operator::And)
        );
    }

    #[test]
    fn iter_is_pre_order() {
        let expr = sample();
        let labels: Vec<String> = expr.iter().map(|e| e.render(false)).collect();
        assert_eq!(
            labels,
            [
                "OR[AND[a, !b], title = dune]",
                "AND[a, !b]",
                "a",
                "!b",
                "title = dune",
            ]
        );
        // Restartable.
        assert_eq!(expr.iter().count(), 5);
        assert_eq!((&expr).into_iter().count(), 5);
    }

    #[test]
    fn replace_with_substitutes_in_place() {
        let mut expr = sample();
        expr.for_each_mut(&mut |e| {
            if e.as_searchterm().is_some_and(|leaf| leaf.term == "b") {
                e.replace_with(
                    QueryExpression::nested(Operator::Or)
                        .with_operand(QueryExpression::searchterm("b1"))
                        .with_operand(QueryExpression::searchterm("b2")),
                );
            }
        });
        assert_eq!(expr.to_string(), "OR[AND[a, OR[b1, b2]], title = dune]");
    }

    #[test]
    fn mapping_form() {
        let mapping = sample().as_mapping().unwrap();
        assert_eq!(
            mapping,
            json!({
                "operator": "OR",
                "operands": [
                    {
                        "operator": "AND",
                        "operands": [
                            {"term": "a", "must_not": false},
                            {"term": "b", "must_not": true},
                        ],
                        "must_not": false,
                    },
                    {"index": "title", "relation": "=", "term": "dune", "boost": 1.5, "must_not": false},
                ],
                "must_not": false,
            })
        );
    }

    #[test]
    fn mapping_round_trip() {
        let expr = sample();
        let back = QueryExpression::from_mapping(expr.as_mapping().unwrap()).unwrap();
        assert_eq!(back, expr);
    }

    #[test]
    fn mapping_defaults_and_rejections() {
        let leaf = QueryExpression::from_mapping(json!({"term": "x"})).unwrap();
        assert_eq!(leaf, QueryExpression::searchterm("x"));

        assert!(QueryExpression::from_mapping(json!({"term": "x", "colour": "red"})).is_err());
        assert!(QueryExpression::from_mapping(json!({"operator": "XOR", "operands": []})).is_err());
        assert!(QueryExpression::from_mapping(json!({"operands": []})).is_err());
    }

    #[test]
    fn compact_rendering_quotes_terms() {
        let expr = QueryExpression::nested(Operator::And)
            .with_operand(QueryExpression::searchterm("two words"))
            .with_operand(QueryExpression::indexed("title", "exact", "say \"hi\""))
            .with_operand(QueryExpression::searchterm(""));
        assert_eq!(
            expr.render(false),
            r#"AND["two words", title exact "say \"hi\"", ""]"#
        );
    }

    #[test]
    fn pretty_rendering() {
        let expected = "\
OR
    AND
        a
        !b
    title = dune";
        assert_eq!(sample().render(true), expected);

        let negated = QueryExpression::nested(Operator::And)
            .with_operand(QueryExpression::searchterm("x"))
            .negated();
        assert_eq!(negated.render(true), "!AND\n    x");
    }
}
