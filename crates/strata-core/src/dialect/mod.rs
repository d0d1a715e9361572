//! Database dialect capability sets.
//!
//! Each dialect is described by a [`DialectRules`] value instead of a type
//! hierarchy: quoting and comment rules for the splitter, block-trigger
//! patterns, the lock primitive the dialect exposes, and the schema-history
//! DDL template. Rules are plain data plus small predicate functions; the
//! splitter and the lock coordinator stay generic over them.
//!
//! Rules are selected through a priority-ordered [`DialectRegistry`] matched
//! against connection metadata, or built directly via the per-dialect
//! modules (e.g. [`postgres::rules`]).

pub mod generic;
pub mod mysql;
pub mod postgres;
mod registry;
pub mod sqlite;
pub mod sqlserver;

pub use registry::{ConnectionInfo, DialectRegistry};

use regex::Regex;

/// A statement delimiter.
///
/// Most dialects use a symbol (`;`), but some use a word that is only valid
/// on its own line (SQL Server's `GO`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    token: String,
    alone_on_line: bool,
}

impl Delimiter {
    /// Creates a delimiter recognized anywhere outside strings, comments,
    /// parentheses and blocks.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            alone_on_line: false,
        }
    }

    /// Creates a delimiter only recognized as the first token on its line.
    #[must_use]
    pub fn alone_on_line(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            alone_on_line: true,
        }
    }

    /// The delimiter text, e.g. `";"` or `"GO"`.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether this delimiter must be the first token on its line.
    #[must_use]
    pub const fn is_alone_on_line(&self) -> bool {
        self.alone_on_line
    }

    /// Whether the delimiter is word-like and needs word-boundary
    /// confirmation (`GO` must not match inside `GOTO`).
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.token
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl core::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.token)
    }
}

/// The cross-process lock primitive a dialect exposes.
///
/// SQL templates use `{placeholder}` substitution performed by the lock
/// coordinator: `{id}` is a signed 64-bit advisory lock identifier, `{key}`
/// a lock name, `{table}` the qualified schema-history table, `{owner}` the
/// acquiring process identity, `{now}` and `{stale_before}` timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockStrategy {
    /// Native advisory/session lock (e.g. Postgres advisory locks). The
    /// try-lock statement must yield 1 on success and 0 when held elsewhere.
    Advisory {
        /// Non-blocking acquire, yields 1/0.
        try_lock_sql: &'static str,
        /// Release, yields 1/0.
        unlock_sql: &'static str,
    },
    /// Named-lock RPC (e.g. MySQL `GET_LOCK`), same 1/0 contract.
    NamedLock {
        /// Non-blocking acquire, yields 1/0.
        acquire_sql: &'static str,
        /// Release, yields 1/0.
        release_sql: &'static str,
    },
    /// Emulated lock: a sentinel row in the schema-history table with a
    /// heartbeat timestamp. Stale rows from crashed holders are swept before
    /// each insert attempt.
    SentinelRow {
        /// Removes sentinel rows with a heartbeat older than `{stale_before}`.
        delete_stale_sql: &'static str,
        /// Conditional insert; zero rows affected means the lock is held.
        insert_sql: &'static str,
        /// Refreshes the heartbeat after a successful acquisition.
        refresh_sql: &'static str,
        /// Removes this process's sentinel row.
        delete_sql: &'static str,
    },
    /// Explicit table lock statement, released with the enclosing
    /// transaction.
    TableLock {
        /// The lock statement.
        lock_sql: &'static str,
    },
    /// Single-writer/embedded engines serialize schema mutation themselves.
    None,
}

/// The capability set of one database dialect.
///
/// Pure data plus small predicates; construction happens in the per-dialect
/// modules and nothing here talks to a database.
#[derive(Debug, Clone)]
pub struct DialectRules {
    /// Human-readable dialect name.
    pub name: &'static str,
    /// Delimiter in effect at the start of every script.
    pub default_delimiter: Delimiter,
    /// Characters opening a quoted identifier (closed by the same character,
    /// doubled to escape).
    pub identifier_quotes: &'static [char],
    /// Whether `[bracketed]` identifiers are recognized.
    pub bracket_identifiers: bool,
    /// Characters opening a string literal (closed by the same character,
    /// doubled to escape).
    pub string_quotes: &'static [char],
    /// Whether backslash escapes are honored inside string literals.
    pub backslash_escapes: bool,
    /// Whether `$tag$ … $tag$` dollar-quoted strings are recognized.
    pub dollar_quoting: bool,
    /// Markers starting a comment that runs to end of line.
    pub line_comment_markers: &'static [&'static str],
    /// Whether `/* … */` comments nest.
    pub nested_block_comments: bool,
    /// Whether a `DELIMITER <token>` directive line changes the active
    /// delimiter (MySQL client convention).
    pub delimiter_directive: bool,
    /// Keywords that open a procedural block inside a block-capable
    /// statement.
    pub block_open_keywords: &'static [&'static str],
    /// Patterns marking a statement head as block-capable, matched against
    /// the simplified, literal-collapsed statement form.
    block_patterns: Vec<Regex>,
    /// Patterns for statements that must run outside a transaction.
    non_transactional_patterns: Vec<Regex>,
    /// The lock primitive this dialect exposes.
    pub lock: LockStrategy,
    /// Schema-history table DDL with a `{table}` placeholder.
    pub history_table_ddl: &'static str,
}

impl DialectRules {
    fn compile_set(patterns: &[&str]) -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("dialect pattern must compile"))
            .collect()
    }

    /// Whether the simplified statement head marks a block-capable statement.
    #[must_use]
    pub fn is_block_statement(&self, simplified: &str) -> bool {
        self.block_patterns.iter().any(|re| re.is_match(simplified))
    }

    /// Whether the simplified statement head must run outside a transaction.
    #[must_use]
    pub fn is_non_transactional(&self, simplified: &str) -> bool {
        self.non_transactional_patterns
            .iter()
            .any(|re| re.is_match(simplified))
    }

    /// Whether `word` opens a procedural block in this dialect.
    #[must_use]
    pub fn is_block_open_keyword(&self, word: &str) -> bool {
        self.block_open_keywords
            .iter()
            .any(|kw| kw.eq_ignore_ascii_case(word))
    }

    /// Renders the schema-history DDL for a concrete table name.
    #[must_use]
    pub fn history_ddl(&self, table: &str) -> String {
        self.history_table_ddl.replace("{table}", table)
    }
}

/// Shared constructor used by the per-dialect modules.
pub(crate) struct RulesSpec {
    pub name: &'static str,
    pub default_delimiter: Delimiter,
    pub identifier_quotes: &'static [char],
    pub bracket_identifiers: bool,
    pub string_quotes: &'static [char],
    pub backslash_escapes: bool,
    pub dollar_quoting: bool,
    pub line_comment_markers: &'static [&'static str],
    pub nested_block_comments: bool,
    pub delimiter_directive: bool,
    pub block_open_keywords: &'static [&'static str],
    pub block_patterns: &'static [&'static str],
    pub non_transactional_patterns: &'static [&'static str],
    pub lock: LockStrategy,
    pub history_table_ddl: &'static str,
}

impl From<RulesSpec> for DialectRules {
    fn from(spec: RulesSpec) -> Self {
        let block_patterns = Self::compile_set(spec.block_patterns);
        let non_transactional_patterns = Self::compile_set(spec.non_transactional_patterns);
        Self {
            name: spec.name,
            default_delimiter: spec.default_delimiter,
            identifier_quotes: spec.identifier_quotes,
            bracket_identifiers: spec.bracket_identifiers,
            string_quotes: spec.string_quotes,
            backslash_escapes: spec.backslash_escapes,
            dollar_quoting: spec.dollar_quoting,
            line_comment_markers: spec.line_comment_markers,
            nested_block_comments: spec.nested_block_comments,
            delimiter_directive: spec.delimiter_directive,
            block_open_keywords: spec.block_open_keywords,
            block_patterns,
            non_transactional_patterns,
            lock: spec.lock,
            history_table_ddl: spec.history_table_ddl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_word_detection() {
        assert!(Delimiter::alone_on_line("GO").is_word());
        assert!(!Delimiter::new(";").is_word());
        assert!(!Delimiter::new("//").is_word());
    }

    #[test]
    fn test_block_predicates() {
        let rules = postgres::rules();
        assert!(rules.is_block_statement("CREATE OR REPLACE FUNCTION F"));
        assert!(rules.is_block_statement("create function f"));
        assert!(!rules.is_block_statement("CREATE TABLE T"));
        assert!(rules.is_block_open_keyword("begin"));
        assert!(!rules.is_block_open_keyword("select"));
    }

    #[test]
    fn test_non_transactional_predicates() {
        let rules = postgres::rules();
        assert!(rules.is_non_transactional("CREATE INDEX CONCURRENTLY IDX ON T"));
        assert!(rules.is_non_transactional("VACUUM FULL"));
        assert!(!rules.is_non_transactional("CREATE INDEX IDX ON T"));
    }

    #[test]
    fn test_history_ddl_substitution() {
        let rules = sqlite::rules();
        let ddl = rules.history_ddl("main.strata_schema_history");
        assert!(ddl.contains("main.strata_schema_history"));
        assert!(!ddl.contains("{table}"));
    }
}
