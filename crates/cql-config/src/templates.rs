//! Configuration template for `cql init`.
//!
//! The template is valid TOML and is returned as a commented-out example configuration.

/// Default configuration template (valid TOML).
const TEMPLATE: &str = r#"# Configuration for the cql query tool.

# Stop looking for .cql.toml files in parent directories and ignore ~/.cql.toml.
root = false

[parser]
# Comparitors accepted in relations. Any other CQL comparitor is rejected as unsupported.
comparitors = ["=", ">", "<", ">=", "<=", "<>", "==", "any", "all", "adj", "within", "encloses", "exact"]

# Modifier names accepted on relations. Leave unset to allow any name; only "boost" is understood.
modifier_names = ["boost"]

[output]
# How `cql expr` prints query expressions: "pretty", "compact" or "json".
format = "pretty"
"#;

/// Returns the configuration template as a commented-out example.
pub fn config_template() -> String {
    comment_template(TEMPLATE)
}

/// Converts a valid TOML template into a commented-out example config.
///
/// Lines that are already comments are preserved as-is. Non-comment, non-empty
/// lines get a "# " prefix. Empty lines are preserved.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
