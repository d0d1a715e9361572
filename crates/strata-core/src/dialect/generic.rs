//! Fallback dialect rules for unrecognized databases.

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
    installed_on TIMESTAMP NOT NULL,
    execution_time INT NOT NULL,
    success BOOLEAN NOT NULL
)";

/// Reserved rank of the sentinel lock row; real migrations always get
/// positive ranks, so the row can never collide with history.
pub const SENTINEL_RANK: i32 = -100;

/// Returns the ANSI-flavored fallback capability set.
///
/// Used when connection metadata matches no registered dialect. Without a
/// native lock primitive the dialect falls back to the emulated sentinel-row
/// lock inside the schema-history table.
#[must_use]
pub fn rules() -> DialectRules {
    RulesSpec {
        name: "Generic",
        default_delimiter: Delimiter::new(";"),
        identifier_quotes: &['"'],
        bracket_identifiers: false,
        string_quotes: &['\''],
        backslash_escapes: false,
        dollar_quoting: false,
        line_comment_markers: &["--"],
        nested_block_comments: false,
        delimiter_directive: false,
        block_open_keywords: &["BEGIN", "CASE", "IF", "LOOP"],
        block_patterns: &[
            r"^CREATE (OR REPLACE )?(PROCEDURE|FUNCTION|TRIGGER)\b",
            r"^BEGIN\b",
            r"^DECLARE\b",
        ],
        non_transactional_patterns: &[],
        lock: LockStrategy::SentinelRow {
            delete_stale_sql: "DELETE FROM {table} \
                               WHERE installed_rank = -100 AND installed_on < '{stale_before}'",
            insert_sql: "INSERT INTO {table} \
                         (installed_rank, version, description, type, script, checksum, installed_by, installed_on, execution_time, success) \
                         SELECT -100, NULL, '{key}', 'LOCK', '', NULL, '{owner}', '{now}', 0, TRUE \
                         WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE installed_rank = -100)",
            refresh_sql: "UPDATE {table} SET installed_on = '{now}' \
                          WHERE installed_rank = -100 AND installed_by = '{owner}'",
            delete_sql: "DELETE FROM {table} \
                         WHERE installed_rank = -100 AND installed_by = '{owner}'",
        },
        history_table_ddl: HISTORY_TABLE_DDL,
    }
    .into()
}
