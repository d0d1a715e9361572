//! MySQL / MariaDB dialect rules.

use super::{Delimiter, DialectRules, LockStrategy, RulesSpec};

const HISTORY_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS {table} (
    installed_rank INT NOT NULL PRIMARY KEY,
    version VARCHAR(50),
    description VARCHAR(200) NOT NULL,
    type VARCHAR(20) NOT NULL,
    script VARCHAR(1000) NOT NULL,
    checksum VARCHAR(64),
    installed_by VARCHAR(100) NOT NULL,
    installed_on DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    execution_time INT NOT NULL,
    success BOOL NOT NULL
) ENGINE=InnoDB";

/// Returns the MySQL/MariaDB capability set.
///
/// Procedure bodies are not quoted, so block tracking carries the weight
/// here; the `DELIMITER` client directive is honored as well. Locking uses
/// the named-lock RPC (`GET_LOCK`).
#[must_use]
pub fn rules() -> DialectRules {
    RulesSpec {
        name: "MySQL",
        default_delimiter: Delimiter::new(";"),
        identifier_quotes: &['`'],
        bracket_identifiers: false,
        string_quotes: &['\'', '"'],
        backslash_escapes: true,
        dollar_quoting: false,
        line_comment_markers: &["--", "#"],
        nested_block_comments: false,
        delimiter_directive: true,
        block_open_keywords: &["BEGIN", "CASE", "IF", "LOOP", "REPEAT", "WHILE"],
        block_patterns: &[
            r"^CREATE\b.*\b(PROCEDURE|FUNCTION|TRIGGER|EVENT)\b",
            r"^BEGIN\b",
        ],
        non_transactional_patterns: &[
            r"^CREATE DATABASE\b",
            r"^DROP DATABASE\b",
            r"^ALTER DATABASE\b",
        ],
        lock: LockStrategy::NamedLock {
            acquire_sql: "SELECT GET_LOCK('{key}', 0)",
            release_sql: "SELECT RELEASE_LOCK('{key}')",
        },
        history_table_ddl: HISTORY_TABLE_DDL,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definer_procedure_is_block_capable() {
        let rules = rules();
        assert!(rules.is_block_statement("CREATE DEFINER ADMIN LOCALHOST PROCEDURE P"));
        assert!(rules.is_block_statement("CREATE TRIGGER T"));
        assert!(!rules.is_block_statement("CREATE TABLE T"));
    }

    #[test]
    fn test_loop_keywords_open_blocks() {
        let rules = rules();
        assert!(rules.is_block_open_keyword("REPEAT"));
        assert!(rules.is_block_open_keyword("while"));
    }
}
