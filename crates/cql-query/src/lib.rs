//! Parsing, syntax trees and normalization for the Contextual Query Language (CQL).
//!
//! This crate turns CQL text into a syntax tree and then into a canonical boolean query
//! expression:
//!
//! - **Terms**: `dune`, `"two words"`, `"say \"hi\""`
//! - **Indexes and relations**: `title = dune`, `year >= 1965`, `title exact "Dune"`
//! - **Booleans**: `and`, `or`, `not` (case-insensitive; AND and NOT bind tighter than OR)
//! - **Grouping**: `(a or b) and c`
//! - **Boosting**: `title =/boost=2.5 dune`
//!
//! Prefix assignments (`> dc = "..."`), `prox` and modifiers other than `boost` are valid CQL but
//! rejected with [`UnsupportedCql`].
//!
//! # Example
//!
//! ```
//! use cql_query::{Operator, parse, to_cql_string, to_query_expression};
//!
//! let ast = parse("title = dune and author = herbert or frank").unwrap();
//! assert_eq!(to_cql_string(&ast), "title=dune AND author=herbert OR frank");
//!
//! let expr = to_query_expression(&ast).unwrap();
//! assert_eq!(expr.operator(), Some(Operator::Or));
//! assert_eq!(expr.to_string(), "OR[AND[title = dune, author = herbert], frank]");
//! ```

#![warn(missing_docs)]

mod ast;
mod cursor;
mod error;
mod expression;
mod identity;
mod lexer;
mod lucene;
mod normalize;
mod options;
mod parser;
mod render;
mod visitor;

pub use ast::{Child, Node, NodeKind};
pub use cursor::TokenCursor;
pub use error::{CqlError, ParseError, TokenizerError, UnsupportedCql};
pub use expression::{
    Iter, NestedExpression, Operator, QueryExpression, SearchTermExpression,
};
pub use identity::{IdentityVisitor, copy_node, copy_text};
pub use lexer::{Token, tokenize};
pub use lucene::{LuceneVisitor, to_lucene_string};
pub use normalize::{
    ExpressionVisitor, Fragment, IntoQueryExpression, Normalized, to_query_expression,
};
pub use options::{AllowList, BOOST_MODIFIER, DEFAULT_COMPARITORS, ParserOptions};
pub use parser::{parse, parse_with};
pub use render::{CqlStringVisitor, to_cql_string};
pub use visitor::Visitor;
