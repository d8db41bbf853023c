//! CQL abstract syntax tree.
//!
//! Every node has a [`NodeKind`] from a closed set and an ordered list of children. Terminal
//! kinds (`Boolean`, `Comparitor`, `Term`, `Identifier`) hold exactly one string leaf; every
//! other kind holds one to three child nodes. Equality and hashing are structural.
//!
//! The constructors below produce the shapes the parser builds:
//!
//! ```text
//! CqlQuery      (ScopedClause)
//! ScopedClause  (SearchClause | ScopedClause)
//!             | (SearchClause | ScopedClause, Boolean, SearchClause | ScopedClause)
//! SearchClause  (SearchTerm) | (CqlQuery) | (Index, Relation, SearchTerm)
//! SearchTerm    (Term)
//! Index         (Term)
//! Relation      (Comparitor) | (Comparitor, ModifierList)
//! ModifierList  (Modifier+)
//! Modifier      (Identifier, Comparitor, Term)
//! ```

use std::fmt;

use crate::visitor::Visitor;

/// The kind of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A complete query; wraps exactly one scoped clause.
    CqlQuery,
    /// One search clause, or two operands joined by a boolean.
    ScopedClause,
    /// A bare search term, an indexed search, or a parenthesized sub-query.
    SearchClause,
    /// `and`, `or` or `not` (stored lower case).
    Boolean,
    /// The term being searched for.
    SearchTerm,
    /// The index (field) being searched.
    Index,
    /// A comparitor with optional modifiers.
    Relation,
    /// A comparitor symbol or name such as `=` or `exact`.
    Comparitor,
    /// One or more modifiers on a relation.
    ModifierList,
    /// A `/name=value` modifier.
    Modifier,
    /// A plain string term.
    Term,
    /// A modifier name.
    Identifier,
}

impl NodeKind {
    /// Returns the kind's name.
    pub fn name(self) -> &'static str {
        match self {
            Self::CqlQuery => "CqlQuery",
            Self::ScopedClause => "ScopedClause",
            Self::SearchClause => "SearchClause",
            Self::Boolean => "Boolean",
            Self::SearchTerm => "SearchTerm",
            Self::Index => "Index",
            Self::Relation => "Relation",
            Self::Comparitor => "Comparitor",
            Self::ModifierList => "ModifierList",
            Self::Modifier => "Modifier",
            Self::Term => "Term",
            Self::Identifier => "Identifier",
        }
    }

    /// Returns true for kinds that hold a single string leaf.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Comparitor | Self::Term | Self::Identifier
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A child of an AST node: either a nested node or a raw string leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Child {
    /// A nested node.
    Node(Node),
    /// A string leaf of a terminal node.
    Text(String),
}

impl Child {
    /// Returns the nested node, if this child is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }

    /// Returns the string leaf, if this child is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Node(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// A node in the CQL syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// Kind discriminant.
    kind: NodeKind,
    /// Ordered children.
    children: Vec<Child>,
}

impl Node {
    /// Builds a node from raw parts.
    ///
    /// Crate-internal: the public constructors guarantee the grammar shapes.
    pub(crate) fn from_parts(kind: NodeKind, children: Vec<Child>) -> Self {
        Self { kind, children }
    }

    /// Builds a non-terminal node from child nodes.
    fn with_nodes(kind: NodeKind, nodes: impl IntoIterator<Item = Self>) -> Self {
        Self::from_parts(kind, nodes.into_iter().map(Child::Node).collect())
    }

    /// Builds a terminal node holding a single string.
    fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Self::from_parts(kind, vec![Child::Text(text.into())])
    }

    /// `CqlQuery(clause)`.
    pub fn cql_query(clause: Self) -> Self {
        Self::with_nodes(NodeKind::CqlQuery, [clause])
    }

    /// A scoped clause holding a single clause.
    pub fn scoped(clause: Self) -> Self {
        Self::with_nodes(NodeKind::ScopedClause, [clause])
    }

    /// A scoped clause joining two operands with a boolean.
    pub fn scoped_clause(left: Self, boolean: Self, right: Self) -> Self {
        Self::with_nodes(NodeKind::ScopedClause, [left, boolean, right])
    }

    /// A search clause holding a bare search term.
    pub fn search_clause(search_term: Self) -> Self {
        Self::with_nodes(NodeKind::SearchClause, [search_term])
    }

    /// A search clause of the form `index relation searchTerm`.
    pub fn indexed_search_clause(index: Self, relation: Self, search_term: Self) -> Self {
        Self::with_nodes(NodeKind::SearchClause, [index, relation, search_term])
    }

    /// A search clause wrapping a parenthesized sub-query.
    pub fn group(query: Self) -> Self {
        Self::with_nodes(NodeKind::SearchClause, [query])
    }

    /// A boolean operator; the text is stored lower case.
    pub fn boolean(operator: &str) -> Self {
        Self::leaf(NodeKind::Boolean, operator.to_lowercase())
    }

    /// `SearchTerm(term)`.
    pub fn search_term(term: Self) -> Self {
        Self::with_nodes(NodeKind::SearchTerm, [term])
    }

    /// `Index(term)`.
    pub fn index(term: Self) -> Self {
        Self::with_nodes(NodeKind::Index, [term])
    }

    /// A relation with an optional modifier list.
    pub fn relation(comparitor: Self, modifiers: Option<Self>) -> Self {
        Self::with_nodes(NodeKind::Relation, [comparitor].into_iter().chain(modifiers))
    }

    /// A comparitor, stored as written.
    pub fn comparitor(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Comparitor, text)
    }

    /// A list of modifiers.
    pub fn modifier_list(modifiers: Vec<Self>) -> Self {
        Self::with_nodes(NodeKind::ModifierList, modifiers)
    }

    /// `Modifier(Identifier(name), comparitor, Term(value))`.
    pub fn modifier(name: Self, comparitor: Self, value: Self) -> Self {
        Self::with_nodes(NodeKind::Modifier, [name, comparitor, value])
    }

    /// A term; the text is stored unquoted and unescaped.
    pub fn term(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Term, text)
    }

    /// A modifier name.
    pub fn identifier(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Identifier, text)
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// All children, in order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// The child at `index`, if it is a node.
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index).and_then(Child::as_node)
    }

    /// Iterates over the children that are nodes.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Child::as_node)
    }

    /// The string leaf of a terminal node.
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Child::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// The text of the term below this node, descending through single-child wrappers.
    ///
    /// For `Index(Term("title"))` and `SearchTerm(Term("x"))` this is the term text.
    pub fn term_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Child::Text(text)] => Some(text),
            [Child::Node(node)] => node.term_text(),
            _ => None,
        }
    }

    /// Dispatches to the visitor method for this node's kind.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self.kind {
            NodeKind::CqlQuery => visitor.visit_cql_query(self),
            NodeKind::ScopedClause => visitor.visit_scoped_clause(self),
            NodeKind::SearchClause => visitor.visit_search_clause(self),
            NodeKind::Boolean => visitor.visit_boolean(self),
            NodeKind::SearchTerm => visitor.visit_search_term(self),
            NodeKind::Index => visitor.visit_index(self),
            NodeKind::Relation => visitor.visit_relation(self),
            NodeKind::Comparitor => visitor.visit_comparitor(self),
            NodeKind::ModifierList => visitor.visit_modifier_list(self),
            NodeKind::Modifier => visitor.visit_modifier(self),
            NodeKind::Term => visitor.visit_term(self),
            NodeKind::Identifier => visitor.visit_identifier(self),
        }
    }

    /// Renders the tree with one node per line, indented four spaces per level.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    /// Appends the pretty form of this node at the given depth.
    fn write_pretty(&self, out: &mut String, depth: usize) {
        let spaces = " ".repeat(depth * 4);
        if let Some(text) = self.text() {
            out.push_str(&format!("{spaces}{}({text:?})", self.kind));
            return;
        }
        out.push_str(&format!("{spaces}{}(\n", self.kind));
        let mut first = true;
        for node in self.child_nodes() {
            if !first {
                out.push_str(",\n");
            }
            first = false;
            node.write_pretty(out, depth + 1);
        }
        out.push_str(&format!("\n{spaces})"));
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match child {
                Child::Node(node) => write!(f, "{node}")?,
                Child::Text(text) => write!(f, "{text:?}")?,
            }
        }
        f.write_str(")")
    }
}
