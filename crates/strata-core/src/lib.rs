//! # strata-core
//!
//! Dialect-aware SQL statement splitting for the strata migration engine.
//!
//! This crate provides:
//! - A capability-set description of each database dialect ([`DialectRules`]):
//!   delimiters, quoting rules, block-trigger patterns and the lock primitive
//!   the dialect exposes
//! - A streaming statement splitter ([`StatementTokenizer`]) that cuts a raw
//!   migration script into individually executable statements, tracking
//!   string literals, comments, parenthesis nesting and procedural block
//!   depth so that delimiters inside a `BEGIN … END` body never split
//!
//! The splitter classifies just enough to find statement boundaries; it is
//! not a SQL parser and never rejects syntax it does not recognize.
//!
//! ```rust
//! use strata_core::dialect::postgres;
//! use strata_core::splitter::StatementTokenizer;
//!
//! let rules = postgres::rules();
//! let statements: Vec<_> = StatementTokenizer::new("SELECT 1; SELECT 2;", &rules)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(statements.len(), 2);
//! ```

pub mod dialect;
pub mod splitter;

pub use dialect::{ConnectionInfo, Delimiter, DialectRegistry, DialectRules, LockStrategy};
pub use splitter::{SplitError, SqlStatement, StatementTokenizer};
