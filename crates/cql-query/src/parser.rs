//! CQL parser.
//!
//! Parses a token stream into a syntax tree using backtracking recursive descent.
//!
//! # Grammar
//!
//! ```text
//! cqlQuery      → '>' prefixAssignment cqlQuery | scopedClause
//! scopedClause  → searchClause (booleanGroup scopedClause)?
//! booleanGroup  → boolean
//! boolean       → 'and' | 'or' | 'not'
//! searchClause  → '(' cqlQuery ')' | index relation searchTerm | searchTerm
//! relation      → comparitor ('/' modifierList)?
//! modifierList  → modifier
//! modifier      → '/' name '=' value
//! index | term  → any token not starting with ( ) > = < /
//! ```
//!
//! Prefix assignments, `prox`, modifier lists on booleans, comparitors outside the configured
//! set, modifiers other than `boost` and a second modifier on one relation are rejected with [`UnsupportedCql`], which aborts the
//! parse. Any other mismatch makes the production return `None` so the caller can revert its
//! bookmark and try the next alternative.
//!
//! # Precedence
//!
//! The grammar is right-recursive, which read literally makes `a and b or c` mean
//! `a and (b or c)`. A scoped clause is instead read as a flat chain of search clauses and
//! booleans, then folded in one pass: runs joined by AND or NOT become left-associated clauses,
//! and those runs are joined by OR from the right, giving `(a and b) or c`.

use log::{debug, trace};

use crate::{
    ast::Node,
    cursor::TokenCursor,
    error::{CqlError, ParseError, UnsupportedCql},
    lexer::{Token, tokenize},
    options::{BOOST_MODIFIER, ParserOptions},
};

/// Result of a grammar production.
///
/// `Ok(None)` is a recoverable mismatch; `Err` is a capability rejection.
type Production = Result<Option<Node>, UnsupportedCql>;

/// Backtracking recursive descent parser over one token sequence.
struct Parser<'a> {
    /// Token stream with bookmark support.
    tokens: TokenCursor<'a>,
    /// Enabled comparitors and modifier names.
    options: &'a ParserOptions,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token<'a>>, options: &'a ParserOptions) -> Self {
        Self {
            tokens: TokenCursor::new(tokens),
            options,
        }
    }

    /// Parses the whole token stream into a `CqlQuery` node.
    fn parse(mut self) -> Result<Node, CqlError> {
        if !self.tokens.has_next() {
            return Err(ParseError::new("no tokens found, at least one token expected").into());
        }

        let Some(query) = self.cql_query()? else {
            return Err(self.mismatch_error().into());
        };

        if let Some(token) = self.tokens.safe_next() {
            let index = self.tokens.position() - 1;
            return Err(ParseError::at_token(
                format!("unexpected token '{token}' after query"),
                token.as_str(),
                index,
            )
            .with_partial(query)
            .into());
        }

        Ok(query)
    }

    /// Builds the error for input that no production matched.
    fn mismatch_error(&self) -> ParseError {
        let index = self.tokens.furthest();
        match self.tokens.get(index) {
            Some(token) => {
                ParseError::at_token(format!("unexpected token '{token}'"), token.as_str(), index)
            }
            None => ParseError::new("unexpected end of query"),
        }
    }

    /// Creates a capability rejection.
    fn unsupported(&self, feature: String, token: Token<'_>) -> UnsupportedCql {
        debug!(
            "rejecting unsupported CQL at token {}: {feature}",
            self.tokens.position()
        );
        UnsupportedCql::new(feature, Some(token.as_str()))
    }

    /// Parses: cqlQuery → '>' prefixAssignment cqlQuery | scopedClause
    fn cql_query(&mut self) -> Production {
        if self.peek_is(">") {
            self.prefix_assignment()?;
            return Ok(None);
        }
        Ok(self.scoped_clause()?.map(Node::cql_query))
    }

    /// Parses: prefixAssignment → '>' prefix '=' uri | '>' uri
    ///
    /// Context sets are not supported, so a recognized prefix assignment is always rejected.
    fn prefix_assignment(&mut self) -> Result<(), UnsupportedCql> {
        self.tokens.bookmark();
        let marker = self.tokens.safe_next();
        if let Some(marker) = marker
            && self.term().is_some()
        {
            return Err(self.unsupported("prefix assignment (>)".into(), marker));
        }
        self.tokens.revert_to_bookmark();
        Ok(())
    }

    /// Parses: scopedClause → searchClause (booleanGroup scopedClause)?
    ///
    /// The right recursion is unrolled into a loop over `booleanGroup searchClause` pairs.
    fn scoped_clause(&mut self) -> Production {
        let Some(head) = self.search_clause()? else {
            return Ok(None);
        };

        let mut links = Vec::new();
        loop {
            self.tokens.bookmark();
            if let Some(boolean) = self.boolean_group()?
                && let Some(clause) = self.search_clause()?
            {
                self.tokens.drop_bookmark();
                links.push((boolean, clause));
            } else {
                self.tokens.revert_to_bookmark();
                break;
            }
        }

        Ok(Some(fold_chain(head, links)))
    }

    /// Parses: booleanGroup → boolean
    ///
    /// A modifier list after the boolean is valid CQL but rejected.
    fn boolean_group(&mut self) -> Production {
        let Some(boolean) = self.boolean()? else {
            return Ok(None);
        };
        if let Some(slash) = self.tokens.safe_peek()
            && slash == "/"
        {
            return Err(self.unsupported("modifier lists on boolean groups".into(), slash));
        }
        Ok(Some(boolean))
    }

    /// Parses: boolean → 'and' | 'or' | 'not' (case-insensitive)
    fn boolean(&mut self) -> Production {
        let Some(token) = self.tokens.safe_peek() else {
            return Ok(None);
        };
        let operator = token.as_str().to_lowercase();
        match operator.as_str() {
            "prox" => Err(self.unsupported("boolean 'prox'".into(), token)),
            "and" | "or" | "not" => {
                self.tokens.safe_next();
                Ok(Some(Node::boolean(&operator)))
            }
            _ => Ok(None),
        }
    }

    /// Parses: searchClause → '(' cqlQuery ')' | index relation searchTerm | searchTerm
    fn search_clause(&mut self) -> Production {
        if self.peek_is("(") {
            self.tokens.bookmark();
            self.tokens.safe_next();
            if let Some(query) = self.cql_query()?
                && self.next_is(")")
            {
                self.tokens.drop_bookmark();
                return Ok(Some(Node::group(query)));
            }
            self.tokens.revert_to_bookmark();
            return Ok(None);
        }

        self.tokens.bookmark();
        if let Some(index) = self.index()
            && let Some(relation) = self.relation()?
            && let Some(search_term) = self.search_term()
        {
            self.tokens.drop_bookmark();
            return Ok(Some(Node::indexed_search_clause(index, relation, search_term)));
        }
        self.tokens.revert_to_bookmark();

        Ok(self.search_term().map(Node::search_clause))
    }

    /// Parses: relation → comparitor ('/' modifierList)?
    fn relation(&mut self) -> Production {
        let Some(comparitor) = self.comparitor()? else {
            return Ok(None);
        };
        if !self.peek_is("/") {
            return Ok(Some(Node::relation(comparitor, None)));
        }
        Ok(self
            .modifier_list()?
            .map(|modifiers| Node::relation(comparitor, Some(modifiers))))
    }

    /// Parses a comparitor symbol or name.
    ///
    /// Tokens outside the CQL comparitor set are a mismatch; CQL comparitors that are not
    /// enabled in the options are rejected.
    fn comparitor(&mut self) -> Production {
        let Some(token) = self.tokens.safe_peek() else {
            return Ok(None);
        };
        if !ParserOptions::is_cql_comparitor(token.as_str()) {
            return Ok(None);
        }
        if !self.options.supports_comparitor(token.as_str()) {
            return Err(self.unsupported(format!("comparitor '{token}'"), token));
        }
        self.tokens.safe_next();
        Ok(Some(Node::comparitor(token.as_str())))
    }

    /// Parses: modifierList → modifier
    ///
    /// CQL allows several modifiers on a relation; only a single one is supported.
    fn modifier_list(&mut self) -> Production {
        let Some(modifier) = self.modifier()? else {
            return Ok(None);
        };
        if let Some(slash) = self.tokens.safe_peek()
            && slash == "/"
        {
            return Err(self.unsupported("more than one modifier on a relation".into(), slash));
        }
        Ok(Some(Node::modifier_list(vec![modifier])))
    }

    /// Parses: modifier → '/' name '=' value
    ///
    /// Only `boost` with a non-negative number is understood.
    fn modifier(&mut self) -> Production {
        if !self.next_is("/") {
            return Ok(None);
        }
        let Some(name) = self.tokens.safe_peek() else {
            return Ok(None);
        };
        if name.starts_with_structural() {
            return Ok(None);
        }
        if !self.options.supports_modifier_name(name.as_str()) {
            return Err(self.unsupported(format!("modifier name '{name}'"), name));
        }
        if name.as_str() != BOOST_MODIFIER {
            return Err(self.unsupported(format!("modifier '{name}'"), name));
        }
        self.tokens.safe_next();

        if !self.next_is("=") {
            return Ok(None);
        }
        let Some(value) = self.term() else {
            return Ok(None);
        };
        if !value.text().is_some_and(is_boost_value) {
            return Ok(None);
        }

        Ok(Some(Node::modifier(
            Node::identifier(name.as_str()),
            Node::comparitor("="),
            value,
        )))
    }

    /// Parses: index → term
    fn index(&mut self) -> Option<Node> {
        self.term().map(Node::index)
    }

    /// Parses: searchTerm → term
    fn search_term(&mut self) -> Option<Node> {
        self.term().map(Node::search_term)
    }

    /// Parses a term, stripping quotes and unescaping `\"`.
    ///
    /// Consumes nothing if the current token cannot start a term.
    fn term(&mut self) -> Option<Node> {
        let token = self.tokens.safe_peek()?;
        if token.starts_with_structural() {
            return None;
        }
        self.tokens.safe_next();
        Some(Node::term(unquote(token)))
    }

    /// Checks if the current token is exactly `text`, without consuming it.
    fn peek_is(&mut self, text: &str) -> bool {
        self.tokens.safe_peek().is_some_and(|t| t.as_str() == text)
    }

    /// Consumes the current token and checks that it is exactly `text`.
    fn next_is(&mut self, text: &str) -> bool {
        self.tokens.safe_next().is_some_and(|t| t.as_str() == text)
    }
}

/// Folds `head (boolean clause)*` into scoped clauses with AND/NOT binding tighter than OR.
///
/// Each run of AND/NOT links becomes a left-associated chain, and runs are joined by OR
/// right-associatively: `a and b or c not d` is `(a and b) or ((c not d))`. The last clause
/// is wrapped in a single-child scoped clause, as the grammar's innermost `scopedClause` is.
fn fold_chain(head: Node, links: Vec<(Node, Node)>) -> Node {
    let last = links.len();
    let mut runs = Vec::new();
    let mut run = head;
    for (i, (boolean, clause)) in links.into_iter().enumerate() {
        let clause = if i + 1 == last {
            Node::scoped(clause)
        } else {
            clause
        };
        if boolean.text() == Some("or") {
            runs.push((run, boolean));
            run = clause;
        } else {
            run = Node::scoped_clause(run, boolean, clause);
        }
    }
    if last == 0 {
        return Node::scoped(run);
    }

    trace!("folding {} boolean links into {} OR runs", last, runs.len() + 1);
    runs.into_iter()
        .rev()
        .fold(run, |tail, (left, or)| Node::scoped_clause(left, or, tail))
}

/// Strips surrounding quotes and unescapes `\"` on a quoted token.
fn unquote(token: Token<'_>) -> String {
    let text = token.as_str();
    if token.is_quoted() {
        text[1..text.len() - 1].replace("\\\"", "\"")
    } else {
        text.to_string()
    }
}

/// Checks that a boost value is a non-negative, finite number literal.
fn is_boost_value(value: &str) -> bool {
    value.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && value.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Parses a CQL query string using the default options.
pub fn parse(input: &str) -> Result<Node, CqlError> {
    parse_with(input, &ParserOptions::default())
}

/// Parses a CQL query string with explicit options.
pub fn parse_with(input: &str, options: &ParserOptions) -> Result<Node, CqlError> {
    trace!("parsing CQL query {input:?}");
    let tokens = tokenize(input)?;
    Parser::new(tokens, options).parse()
}
