//! SQLite dialect rules.

use super::{Delimiter, DialectRules, LockStrategy, RulesSpec};

const HISTORY_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS {table} (
    installed_rank INTEGER NOT NULL PRIMARY KEY,
    version TEXT,
    description TEXT NOT NULL,
    type TEXT NOT NULL,
    script TEXT NOT NULL,
    checksum TEXT,
    installed_by TEXT NOT NULL,
    installed_on TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    execution_time INTEGER NOT NULL,
    success BOOLEAN NOT NULL
)";

/// Returns the SQLite capability set.
///
/// SQLite is single-writer per database file, so the lock strategy is a
/// documented no-op; trigger bodies are the only block construct.
#[must_use]
pub fn rules() -> DialectRules {
    RulesSpec {
        name: "SQLite",
        default_delimiter: Delimiter::new(";"),
        identifier_quotes: &['"', '`'],
        bracket_identifiers: true,
        string_quotes: &['\''],
        backslash_escapes: false,
        dollar_quoting: false,
        line_comment_markers: &["--"],
        nested_block_comments: false,
        delimiter_directive: false,
        block_open_keywords: &["BEGIN", "CASE"],
        block_patterns: &[r"^CREATE (TEMP |TEMPORARY )?TRIGGER\b"],
        non_transactional_patterns: &[r"^VACUUM\b", r"^ATTACH\b", r"^DETACH\b"],
        lock: LockStrategy::None,
        history_table_ddl: HISTORY_TABLE_DDL,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_block_capable() {
        let rules = rules();
        assert!(rules.is_block_statement("CREATE TRIGGER AFTER INSERT ON T"));
        assert!(rules.is_block_statement("CREATE TEMP TRIGGER T"));
        assert!(!rules.is_block_statement("CREATE TABLE T"));
    }

    #[test]
    fn test_lock_is_noop() {
        assert_eq!(rules().lock, LockStrategy::None);
    }
}
