//! Engine configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Migration engine settings.
///
/// This is the in-memory configuration value; discovering and reading
/// configuration files is the embedding application's concern. The defaults
/// match the conventional `V1__description.sql` layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Qualified name of the schema-history table.
    pub table: String,
    /// Prefix of versioned migrations.
    pub sql_migration_prefix: String,
    /// Prefix of baseline migrations.
    pub baseline_migration_prefix: String,
    /// Prefix of undo migrations.
    pub undo_migration_prefix: String,
    /// Prefix of repeatable migrations.
    pub repeatable_migration_prefix: String,
    /// Separator between version (or prefix) and description.
    pub sql_migration_separator: String,
    /// Recognized script suffixes.
    pub sql_migration_suffixes: Vec<String>,
    /// Placeholder values substituted into scripts.
    pub placeholders: BTreeMap<String, String>,
    /// Opening marker of a placeholder.
    pub placeholder_prefix: String,
    /// Closing marker of a placeholder.
    pub placeholder_suffix: String,
    /// Whether placeholders are substituted at all.
    pub placeholder_replacement: bool,
    /// Invalid resource names: hard error (false) or warn-and-skip (true).
    pub ignore_invalid_names: bool,
    /// How many times to poll for the migration lock before giving up.
    pub lock_retry_count: u32,
    /// Milliseconds between lock polls.
    pub lock_poll_interval_ms: u64,
    /// Identity recorded as the lock owner and `installed_by`; defaults to a
    /// process-derived identity.
    pub installed_by: Option<String>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            table: String::from("strata_schema_history"),
            sql_migration_prefix: String::from("V"),
            baseline_migration_prefix: String::from("B"),
            undo_migration_prefix: String::from("U"),
            repeatable_migration_prefix: String::from("R"),
            sql_migration_separator: String::from("__"),
            sql_migration_suffixes: vec![String::from(".sql")],
            placeholders: BTreeMap::new(),
            placeholder_prefix: String::from("${"),
            placeholder_suffix: String::from("}"),
            placeholder_replacement: true,
            ignore_invalid_names: false,
            lock_retry_count: 50,
            lock_poll_interval_ms: 1000,
            installed_by: None,
        }
    }
}

impl MigrateConfig {
    /// Parses a JSON configuration document produced by an embedder.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrateConfig::default();
        assert_eq!(config.sql_migration_prefix, "V");
        assert_eq!(config.sql_migration_separator, "__");
        assert_eq!(config.sql_migration_suffixes, vec![String::from(".sql")]);
        assert!(config.placeholder_replacement);
        assert_eq!(config.lock_retry_count, 50);
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = MigrateConfig::from_json(
            r#"{"table": "app_history", "lock_retry_count": 3, "placeholders": {"schema": "app"}}"#,
        )
        .unwrap();
        assert_eq!(config.table, "app_history");
        assert_eq!(config.lock_retry_count, 3);
        assert_eq!(config.placeholders.get("schema").map(String::as_str), Some("app"));
        assert_eq!(config.sql_migration_prefix, "V");
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        assert!(MigrateConfig::from_json("{not json").is_err());
    }
}
