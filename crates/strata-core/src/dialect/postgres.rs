//! PostgreSQL dialect rules.

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
    installed_on TIMESTAMP NOT NULL DEFAULT now(),
    execution_time INT NOT NULL,
    success BOOLEAN NOT NULL
)";

/// Returns the PostgreSQL capability set.
///
/// Function bodies are normally dollar-quoted and therefore opaque to the
/// splitter; block tracking matters for SQL-standard `BEGIN ATOMIC` bodies.
/// Advisory locking uses session-level advisory locks.
#[must_use]
pub fn rules() -> DialectRules {
    RulesSpec {
        name: "PostgreSQL",
        default_delimiter: Delimiter::new(";"),
        identifier_quotes: &['"'],
        bracket_identifiers: false,
        string_quotes: &['\''],
        backslash_escapes: false,
        dollar_quoting: true,
        line_comment_markers: &["--"],
        nested_block_comments: true,
        delimiter_directive: false,
        block_open_keywords: &["BEGIN", "CASE", "IF", "LOOP"],
        block_patterns: &[
            r"^CREATE (OR REPLACE )?FUNCTION\b",
            r"^CREATE (OR REPLACE )?PROCEDURE\b",
            r"^DO\b",
            r"^BEGIN ATOMIC\b",
        ],
        non_transactional_patterns: &[
            r"^CREATE (UNIQUE )?INDEX CONCURRENTLY\b",
            r"^DROP INDEX CONCURRENTLY\b",
            r"^REINDEX .*CONCURRENTLY\b",
            r"^VACUUM\b",
            r"^CREATE DATABASE\b",
            r"^DROP DATABASE\b",
            r"^CREATE TABLESPACE\b",
            r"^DROP TABLESPACE\b",
            r"^ALTER SYSTEM\b",
            r"^ALTER TYPE .* ADD VALUE\b",
        ],
        lock: LockStrategy::Advisory {
            try_lock_sql: "SELECT pg_try_advisory_lock({id})::int",
            unlock_sql: "SELECT pg_advisory_unlock({id})::int",
        },
        history_table_ddl: HISTORY_TABLE_DDL,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrent_index_is_non_transactional() {
        let rules = rules();
        assert!(rules.is_non_transactional("CREATE UNIQUE INDEX CONCURRENTLY IDX ON T"));
        assert!(!rules.is_non_transactional("CREATE UNIQUE INDEX IDX ON T"));
    }

    #[test]
    fn test_do_block_is_block_capable() {
        let rules = rules();
        assert!(rules.is_block_statement("DO"));
        assert!(rules.is_block_statement("BEGIN ATOMIC"));
        assert!(!rules.is_block_statement("BEGIN"));
    }
}
