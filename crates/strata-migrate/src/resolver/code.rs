//! Programmatic migration source.

use std::sync::Arc;

use crate::error::Result;
use crate::migration::{ExecutorKind, MigrationType, ResolvedMigration};
use crate::version::MigrationVersion;

use super::MigrationSource;

/// A migration implemented in Rust code rather than a script.
///
/// Code migrations enter the catalog alongside script migrations and obey
/// the same ordering and conflict rules.
pub trait ProgrammaticMigration: Send + Sync {
    /// Version; `None` makes the migration repeatable.
    fn version(&self) -> Option<MigrationVersion>;

    /// Human-readable description.
    fn description(&self) -> String;

    /// Optional fingerprint. Code migrations without one are exempt from
    /// drift detection.
    fn checksum(&self) -> Option<String> {
        None
    }

    /// Whether this is a baseline marker.
    fn is_baseline(&self) -> bool {
        false
    }

    /// Script identifier recorded in the history table.
    fn script(&self) -> String {
        match self.version() {
            Some(version) => format!("code:V{version}"),
            None => format!("code:R__{}", self.description()),
        }
    }
}

/// A source backed by compiled [`ProgrammaticMigration`] objects.
#[derive(Default)]
pub struct CodeMigrationSource {
    migrations: Vec<Arc<dyn ProgrammaticMigration>>,
}

impl CodeMigrationSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a migration object.
    #[must_use]
    pub fn add(mut self, migration: Arc<dyn ProgrammaticMigration>) -> Self {
        self.migrations.push(migration);
        self
    }
}

impl MigrationSource for CodeMigrationSource {
    fn name(&self) -> &str {
        "code"
    }

    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        Ok(self
            .migrations
            .iter()
            .map(|migration| {
                let migration_type = if migration.is_baseline() {
                    MigrationType::ProgrammaticBaseline
                } else {
                    MigrationType::Programmatic
                };
                let script = migration.script();
                ResolvedMigration {
                    version: migration.version(),
                    description: migration.description(),
                    physical_location: script.clone(),
                    script,
                    checksum: migration.checksum(),
                    equivalent_checksum: None,
                    migration_type,
                    executor: ExecutorKind::Code,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AddUsersTable;

    impl ProgrammaticMigration for AddUsersTable {
        fn version(&self) -> Option<MigrationVersion> {
            Some(MigrationVersion::parse("3").unwrap())
        }

        fn description(&self) -> String {
            String::from("add users table")
        }

        fn checksum(&self) -> Option<String> {
            Some(String::from("code-fingerprint"))
        }
    }

    struct RebuildSearchIndex;

    impl ProgrammaticMigration for RebuildSearchIndex {
        fn version(&self) -> Option<MigrationVersion> {
            None
        }

        fn description(&self) -> String {
            String::from("rebuild search index")
        }
    }

    #[test]
    fn test_code_migrations_resolve() {
        let source = CodeMigrationSource::new()
            .add(Arc::new(AddUsersTable))
            .add(Arc::new(RebuildSearchIndex));
        let resolved = source.resolve().unwrap();
        assert_eq!(resolved.len(), 2);

        let versioned = &resolved[0];
        assert_eq!(versioned.script, "code:V3");
        assert_eq!(versioned.migration_type, MigrationType::Programmatic);
        assert_eq!(versioned.executor, ExecutorKind::Code);
        assert_eq!(versioned.checksum.as_deref(), Some("code-fingerprint"));

        let repeatable = &resolved[1];
        assert!(repeatable.is_repeatable());
        assert_eq!(repeatable.checksum, None);
    }
}
