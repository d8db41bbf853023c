//! Parser configuration: which comparitors and modifier names are accepted.

use std::collections::BTreeSet;

/// Every comparitor that is part of CQL.
///
/// A token outside this set is never treated as a comparitor.
pub const DEFAULT_COMPARITORS: [&str; 13] = [
    "=", ">", "<", ">=", "<=", "<>", "==", "any", "all", "adj", "within", "encloses", "exact",
];

/// The only modifier the parser understands.
pub const BOOST_MODIFIER: &str = "boost";

/// A set of accepted names, or a wildcard that accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowList {
    /// Every name is accepted.
    #[default]
    Any,
    /// Only these names (lower case) are accepted.
    Only(BTreeSet<String>),
}

impl AllowList {
    /// Builds a restricted list from names; matching is case-insensitive.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Only(names.into_iter().map(|n| n.as_ref().to_lowercase()).collect())
    }

    /// Returns true if `name` is accepted.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(names) => names.contains(&name.to_lowercase()),
        }
    }
}

/// Immutable configuration handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Comparitors that may appear in a relation (lower case).
    supported_comparitors: BTreeSet<String>,
    /// Modifier names that may appear in a modifier list.
    supported_modifier_names: AllowList,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            supported_comparitors: DEFAULT_COMPARITORS.iter().map(|c| c.to_string()).collect(),
            supported_modifier_names: AllowList::Any,
        }
    }
}

impl ParserOptions {
    /// Restricts the supported comparitors.
    ///
    /// Comparitors outside [`DEFAULT_COMPARITORS`] are never recognized, so listing them here has
    /// no effect.
    pub fn with_comparitors<I, S>(mut self, comparitors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_comparitors = comparitors
            .into_iter()
            .map(|c| c.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Sets the accepted modifier names.
    pub fn with_modifier_names(mut self, names: AllowList) -> Self {
        self.supported_modifier_names = names;
        self
    }

    /// Returns true if `comparitor` is one of the CQL comparitors.
    pub fn is_cql_comparitor(comparitor: &str) -> bool {
        let lower = comparitor.to_lowercase();
        DEFAULT_COMPARITORS.contains(&lower.as_str())
    }

    /// Returns true if `comparitor` is enabled in this configuration.
    pub fn supports_comparitor(&self, comparitor: &str) -> bool {
        self.supported_comparitors
            .contains(&comparitor.to_lowercase())
    }

    /// Returns true if the modifier `name` is enabled in this configuration.
    pub fn supports_modifier_name(&self, name: &str) -> bool {
        self.supported_modifier_names.contains(name)
    }

    /// The supported comparitors, sorted.
    pub fn comparitors(&self) -> impl Iterator<Item = &str> {
        self.supported_comparitors.iter().map(String::as_str)
    }

    /// The accepted modifier names.
    pub fn modifier_names(&self) -> &AllowList {
        &self.supported_modifier_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_every_cql_comparitor() {
        let options = ParserOptions::default();
        for comparitor in DEFAULT_COMPARITORS {
            assert!(options.supports_comparitor(comparitor));
        }
        assert!(options.supports_comparitor("EXACT"));
        assert!(options.supports_modifier_name("anything"));
    }

    #[test]
    fn restricted_comparitors() {
        let options = ParserOptions::default().with_comparitors(["=", "Exact"]);
        assert!(options.supports_comparitor("="));
        assert!(options.supports_comparitor("exact"));
        assert!(!options.supports_comparitor("any"));
        assert_eq!(options.comparitors().collect::<Vec<_>>(), vec!["=", "exact"]);
    }

    #[test]
    fn cql_comparitor_set() {
        assert!(ParserOptions::is_cql_comparitor("ANY"));
        assert!(ParserOptions::is_cql_comparitor("<>"));
        assert!(!ParserOptions::is_cql_comparitor("=<"));
        assert!(!ParserOptions::is_cql_comparitor("prox"));
    }

    #[test]
    fn allow_list() {
        let names = AllowList::only(["Boost"]);
        assert!(names.contains("boost"));
        assert!(names.contains("BOOST"));
        assert!(!names.contains("relevant"));
        assert!(AllowList::Any.contains("relevant"));
    }
}
