//! CLI integration tests for cql commands.
//!
//! These tests focus on exit codes and the plain (non-terminal) output of each command.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a cql command.
fn cql() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("cql").unwrap()
}

/// Helper to run `cql` in `dir` with HOME isolated to `dir/home`.
fn cql_in(dir: &Path) -> Command {
    let mut cmd = cql();
    cmd.env("HOME", dir.join("home"))
        .env_remove("RUST_LOG")
        .current_dir(dir);
    cmd
}

/// Writes a root `.cql.toml` with the given body.
fn write_root_config(dir: &Path, body: &str) {
    fs::write(dir.join(".cql.toml"), format!("root = true\n{body}")).unwrap();
}

mod parse {
    use super::*;

    #[test]
    fn prints_syntax_tree() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["parse", "title = dune"])
            .assert()
            .success()
            .stdout(predicate::str::contains("CqlQuery("))
            .stdout(predicate::str::contains("Index("))
            .stdout(predicate::str::contains("Term(\"dune\")"));
    }

    #[test]
    fn unclosed_group_is_parse_error() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["parse", "(a and b"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error:"))
            .stderr(predicate::str::contains("hint:"));
    }

    #[test]
    fn unterminated_quote_is_tokenizer_error() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["parse", "a \"open"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("^"))
            .stderr(predicate::str::contains("closing quote"));
    }

    #[test]
    fn prox_is_unsupported() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["parse", "a prox b"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unsupported CQL"));
    }

    #[test]
    fn prefix_assignment_is_unsupported() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["parse", "> dc = \"http://purl.org/dc\" title = dune"])
            .assert()
            .code(2);
    }
}

mod expr {
    use super::*;

    #[test]
    fn pretty_by_default() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["expr", "a not b"])
            .assert()
            .success()
            .stdout("AND\n    a\n    !b\n");
    }

    #[test]
    fn compact_flag() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["expr", "--compact", "a and b or c"])
            .assert()
            .success()
            .stdout("OR[AND[a, b], c]\n");
    }

    #[test]
    fn json_flag_outputs_mapping() {
        let dir = temp_dir();
        let output = cql_in(dir.path())
            .args(["expr", "--json", "title =/boost=2 dune"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["index"], "title");
        assert_eq!(value["relation"], "=");
        assert_eq!(value["term"], "dune");
        assert_eq!(value["boost"].as_f64(), Some(2.0));
        assert_eq!(value["must_not"], false);
    }

    #[test]
    fn configured_format_is_default() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[output]\nformat = \"compact\"\n");
        cql_in(dir.path())
            .args(["expr", "a or b or c"])
            .assert()
            .success()
            .stdout("OR[a, b, c]\n");
    }

    #[test]
    fn rejects_json_with_compact() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["expr", "--json", "--compact", "a"])
            .assert()
            .failure();
    }
}

mod format {
    use super::*;

    #[test]
    fn prints_canonical_cql() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["format", "title = dune and author = herbert or frank"])
            .assert()
            .success()
            .stdout("title=dune AND author=herbert OR frank\n");
    }

    #[test]
    fn keeps_groups_and_quotes() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["format", "(a or \"b c\") not d"])
            .assert()
            .success()
            .stdout("(a OR \"b c\") NOT d\n");
    }
}

mod lucene {
    use super::*;

    #[test]
    fn converts_fields_and_boost() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["lucene", "title =/boost=1.5 dune or frank"])
            .assert()
            .success()
            .stdout("title:dune^1.5 OR frank\n");
    }

    #[test]
    fn rejects_non_equals_relation() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["lucene", "year > 1965"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Lucene"));
    }
}

mod config {
    use super::*;

    #[test]
    fn disabled_comparitor_is_unsupported() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[parser]\ncomparitors = [\"=\"]\n");

        cql_in(dir.path())
            .args(["parse", "title = dune"])
            .assert()
            .success();
        cql_in(dir.path())
            .args(["parse", "title exact dune"])
            .assert()
            .code(2);
    }

    #[test]
    fn invalid_config_exits_with_config_status() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[parser]\ncomparitors = [\"~\"]\n");

        cql_in(dir.path())
            .args(["parse", "a"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains(".cql.toml"));
    }

    #[test]
    fn explicit_config_replaces_discovery() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[parser]\ncomparitors = [\"~\"]\n");
        let explicit = dir.path().join("strict.toml");
        fs::write(&explicit, "[parser]\nmodifier_names = [\"boost\"]\n").unwrap();

        cql_in(dir.path())
            .args(["parse", "title =/boost=2 dune", "--config"])
            .arg(&explicit)
            .assert()
            .success();
        cql_in(dir.path())
            .args(["parse", "title =/relevant dune", "--config"])
            .arg(&explicit)
            .assert()
            .code(2);
    }

    #[test]
    fn missing_explicit_config() {
        let dir = temp_dir();
        cql_in(dir.path())
            .args(["--config", "missing.toml", "parse", "a"])
            .assert()
            .code(3);
    }
}

mod check {
    use super::*;

    #[test]
    fn without_config_files() {
        let dir = temp_dir();
        cql_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found"))
            .stdout(predicate::str::contains("[parser]"));
    }

    #[test]
    fn lists_files_and_settings() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[parser]\ncomparitors = [\"=\", \"ANY\"]\n");

        cql_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains(".cql.toml"))
            .stdout(predicate::str::contains("(local)"))
            .stdout(predicate::str::contains("No issues found."))
            .stdout(predicate::str::contains("\"any\""));
    }

    #[test]
    fn reports_warnings_without_failing() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[parser]\nmodifier_names = [\"relevance\"]\n");

        cql_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Warnings (2):"))
            .stdout(predicate::str::contains("Hints:"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        write_root_config(dir.path(), "[parser\n");

        cql_in(dir.path()).arg("check").assert().code(3);
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        let work = dir.path().join("project");
        fs::create_dir(&work).unwrap();

        cql()
            .env("HOME", dir.path())
            .current_dir(&work)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let contents = fs::read_to_string(work.join(".cql.toml")).unwrap();
        assert!(contents.contains("# [parser]"));
    }

    #[test]
    fn created_config_is_usable() {
        let dir = temp_dir();
        cql_in(dir.path()).arg("init").assert().success();
        cql_in(dir.path()).arg("check").assert().success();
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".cql.toml"), "existing").unwrap();

        cql_in(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites_invalid_config() {
        let dir = temp_dir();
        fs::write(dir.path().join(".cql.toml"), "[parser\n").unwrap();

        cql_in(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".cql.toml")).unwrap();
        assert!(contents.contains("# comparitors"));
    }

    #[test]
    fn global_writes_to_home() {
        let home = temp_dir();
        let work = temp_dir();

        cql()
            .env("HOME", home.path())
            .current_dir(work.path())
            .args(["init", "--global"])
            .assert()
            .success();

        assert!(home.path().join(".cql.toml").exists());
        assert!(!work.path().join(".cql.toml").exists());
    }
}
