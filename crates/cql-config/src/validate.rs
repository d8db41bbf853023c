//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for settings that parse but cannot
//! have the intended effect.

use std::fmt;

use cql_query::BOOST_MODIFIER;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `boost` is missing from the modifier allow-list, so every modifier will be rejected.
    BoostNotAllowed,
    /// A modifier name is allowed but the parser only understands `boost`.
    ModifierNeverAccepted {
        /// The allowed name.
        name: String,
    },
    /// `=` is disabled, so boost modifiers cannot be written and Lucene output is impossible.
    EqualsDisabled,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoostNotAllowed => {
                write!(
                    f,
                    "modifier_names does not include '{BOOST_MODIFIER}'; every modifier will be rejected"
                )
            }
            Self::ModifierNeverAccepted { name } => {
                write!(
                    f,
                    "modifier '{name}' is allowed but only '{BOOST_MODIFIER}' is supported"
                )
            }
            Self::EqualsDisabled => {
                write!(f, "comparitor '=' is disabled; queries cannot be converted to Lucene")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if let Some(ref names) = config.parser.modifier_names {
        if !names.iter().any(|n| n == BOOST_MODIFIER) {
            warnings.push(ConfigWarning::BoostNotAllowed);
        }
        warnings.extend(
            names
                .iter()
                .filter(|n| *n != BOOST_MODIFIER)
                .map(|name| ConfigWarning::ModifierNeverAccepted { name: name.clone() }),
        );
    }

    if !config.parser.comparitors.iter().any(|c| c == "=") {
        warnings.push(ConfigWarning::EqualsDisabled);
    }

    warnings
}
