//! SQL Server dialect rules.

use super::{Delimiter, DialectRules, LockStrategy, RulesSpec};

const HISTORY_TABLE_DDL: &str = "\
IF OBJECT_ID(N'{table}', N'U') IS NULL CREATE TABLE {table} (
    installed_rank INT NOT NULL PRIMARY KEY,
    version NVARCHAR(50),
    description NVARCHAR(200) NOT NULL,
    type NVARCHAR(20) NOT NULL,
    script NVARCHAR(1000) NOT NULL,
    checksum NVARCHAR(64),
    installed_by NVARCHAR(100) NOT NULL,
    installed_on DATETIME2 NOT NULL DEFAULT GETDATE(),
    execution_time INT NOT NULL,
    success BIT NOT NULL
)";

/// Returns the SQL Server capability set.
///
/// Batches are separated by `GO` on its own line, which takes precedence
/// over any block structure a batch contains. Locking goes through the
/// application-lock RPC scoped to the session.
#[must_use]
pub fn rules() -> DialectRules {
    RulesSpec {
        name: "SQL Server",
        default_delimiter: Delimiter::alone_on_line("GO"),
        identifier_quotes: &['"'],
        bracket_identifiers: true,
        string_quotes: &['\''],
        backslash_escapes: false,
        dollar_quoting: false,
        line_comment_markers: &["--"],
        nested_block_comments: true,
        delimiter_directive: false,
        block_open_keywords: &["BEGIN", "CASE"],
        block_patterns: &[r"^CREATE (OR ALTER )?(PROC|PROCEDURE|FUNCTION|TRIGGER)\b"],
        non_transactional_patterns: &[
            r"^CREATE DATABASE\b",
            r"^DROP DATABASE\b",
            r"^ALTER DATABASE\b",
            r"^BACKUP\b",
            r"^RESTORE\b",
        ],
        lock: LockStrategy::NamedLock {
            acquire_sql: "DECLARE @result INT; \
                          EXEC @result = sp_getapplock @Resource = '{key}', @LockMode = 'Exclusive', @LockOwner = 'Session', @LockTimeout = 0; \
                          SELECT CASE WHEN @result >= 0 THEN 1 ELSE 0 END",
            release_sql: "DECLARE @result INT; \
                          EXEC @result = sp_releaseapplock @Resource = '{key}', @LockOwner = 'Session'; \
                          SELECT CASE WHEN @result >= 0 THEN 1 ELSE 0 END",
        },
        history_table_ddl: HISTORY_TABLE_DDL,
    }
    .into()
}
