//! Migration catalog resolution.
//!
//! Migrations come from pluggable sources (filesystem scripts, compiled
//! code, fixed in-memory sets). The resolver unions them with value-equality
//! dedup, sorts by version ordering and rejects conflicting entries, leaving
//! a catalog the executor consumes as-is.

mod code;
mod fixed;
mod sql;

pub use code::{CodeMigrationSource, ProgrammaticMigration};
pub use fixed::FixedMigrationSource;
pub use sql::{load_statements, SqlMigrationSource};

use tracing::{debug, info};

use crate::error::{MigrateError, Result};
use crate::migration::ResolvedMigration;

/// A pluggable origin of resolved migrations.
pub trait MigrationSource: Send + Sync {
    /// Human-readable tag for diagnostics.
    fn name(&self) -> &str;

    /// Produces every migration this source knows about, in any order.
    fn resolve(&self) -> Result<Vec<ResolvedMigration>>;
}

/// Aggregates migrations from all registered sources into one catalog.
#[derive(Default)]
pub struct MigrationResolver {
    sources: Vec<Box<dyn MigrationSource>>,
}

impl MigrationResolver {
    /// Creates a resolver with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source.
    #[must_use]
    pub fn add_source(mut self, source: Box<dyn MigrationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Resolves the full catalog: union, dedup, order, conflict-check.
    ///
    /// # Errors
    ///
    /// Fails when any source fails, or when two non-baseline migrations of
    /// the same family collide on version (or description, for
    /// repeatables); the error names both locations.
    pub fn resolve(&self) -> Result<MigrationCatalog> {
        let mut migrations = Vec::new();
        for source in &self.sources {
            let found = source.resolve()?;
            debug!(source = source.name(), count = found.len(), "Source resolved");
            migrations.extend(found);
        }

        migrations.sort_by(ResolvedMigration::catalog_cmp);
        migrations.dedup_by(|a, b| a == b);

        for pair in migrations.windows(2) {
            check_conflict(&pair[0], &pair[1])?;
        }

        info!(count = migrations.len(), "Resolved migration catalog");
        Ok(MigrationCatalog { migrations })
    }
}

/// Adjacent catalog entries occupying the same slot are a fatal conflict,
/// unless one of them is a baseline or they belong to different families
/// (an undo legitimately shares its target's version).
fn check_conflict(first: &ResolvedMigration, second: &ResolvedMigration) -> Result<()> {
    if !first.same_slot(second)
        || first.migration_type.is_baseline()
        || second.migration_type.is_baseline()
        || first.migration_type.is_undo() != second.migration_type.is_undo()
    {
        return Ok(());
    }
    Err(match &first.version {
        Some(version) => MigrateError::DuplicateVersion {
            version: version.display_text().to_string(),
            first: first.physical_location.clone(),
            second: second.physical_location.clone(),
        },
        None => MigrateError::DuplicateDescription {
            description: first.description.clone(),
            first: first.physical_location.clone(),
            second: second.physical_location.clone(),
        },
    })
}

/// The ordered, validated set of resolved migrations.
///
/// Read-only and idempotent once built; safe to share across readers.
#[derive(Debug, Clone)]
pub struct MigrationCatalog {
    migrations: Vec<ResolvedMigration>,
}

impl MigrationCatalog {
    /// All migrations in catalog order.
    pub fn iter(&self) -> core::slice::Iter<'_, ResolvedMigration> {
        self.migrations.iter()
    }

    /// Number of migrations in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// The non-baseline, non-undo migration at `version`, if any.
    #[must_use]
    pub fn get(&self, version: &crate::version::MigrationVersion) -> Option<&ResolvedMigration> {
        self.migrations.iter().find(|m| {
            m.version.as_ref() == Some(version)
                && !m.migration_type.is_baseline()
                && !m.migration_type.is_undo()
        })
    }

    /// The repeatable migration with `description`, if any.
    #[must_use]
    pub fn repeatable(&self, description: &str) -> Option<&ResolvedMigration> {
        self.migrations
            .iter()
            .find(|m| m.is_repeatable() && m.description == description)
    }
}

impl<'a> IntoIterator for &'a MigrationCatalog {
    type Item = &'a ResolvedMigration;
    type IntoIter = core::slice::Iter<'a, ResolvedMigration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::{ExecutorKind, MigrationType};
    use crate::version::MigrationVersion;

    fn entry(
        version: Option<&str>,
        description: &str,
        script: &str,
        checksum: &str,
        migration_type: MigrationType,
    ) -> ResolvedMigration {
        ResolvedMigration {
            version: version.map(|v| MigrationVersion::parse(v).unwrap()),
            description: description.to_string(),
            script: script.to_string(),
            checksum: Some(checksum.to_string()),
            equivalent_checksum: None,
            migration_type,
            physical_location: format!("fs:{script}"),
            executor: ExecutorKind::SqlScript,
        }
    }

    fn resolver_of(sets: Vec<Vec<ResolvedMigration>>) -> MigrationResolver {
        sets.into_iter()
            .enumerate()
            .fold(MigrationResolver::new(), |resolver, (i, set)| {
                resolver.add_source(Box::new(FixedMigrationSource::new(
                    format!("fixed-{i}"),
                    set,
                )))
            })
    }

    #[test]
    fn test_catalog_order_and_lookup() {
        let catalog = resolver_of(vec![vec![
            entry(Some("2"), "two", "V2__two.sql", "c2", MigrationType::Sql),
            entry(None, "b view", "R__b_view.sql", "cr2", MigrationType::Sql),
            entry(Some("1"), "one", "V1__one.sql", "c1", MigrationType::Sql),
            entry(None, "a view", "R__a_view.sql", "cr1", MigrationType::Sql),
            entry(Some("10"), "ten", "V10__ten.sql", "c10", MigrationType::Sql),
        ]])
        .resolve()
        .unwrap();

        let scripts: Vec<&str> = catalog.iter().map(|m| m.script.as_str()).collect();
        assert_eq!(
            scripts,
            vec![
                "V1__one.sql",
                "V2__two.sql",
                "V10__ten.sql",
                "R__a_view.sql",
                "R__b_view.sql",
            ]
        );
        let version = MigrationVersion::parse("2").unwrap();
        assert_eq!(catalog.get(&version).map(|m| m.script.as_str()), Some("V2__two.sql"));
        assert!(catalog.repeatable("a view").is_some());
        assert!(catalog.repeatable("missing").is_none());
    }

    #[test]
    fn test_identical_entries_from_two_sources_dedup() {
        let a = entry(Some("1"), "init", "V1__init.sql", "same", MigrationType::Sql);
        let b = entry(Some("1"), "init", "V1__init.sql", "same", MigrationType::Sql);
        let catalog = resolver_of(vec![vec![a], vec![b]]).resolve().unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_version_is_fatal_and_names_both_locations() {
        let err = resolver_of(vec![
            vec![entry(Some("1"), "init", "V1__init.sql", "aa", MigrationType::Sql)],
            vec![entry(Some("1.0"), "init again", "V1.0__init_again.sql", "bb", MigrationType::Sql)],
        ])
        .resolve()
        .unwrap_err();
        match err {
            MigrateError::DuplicateVersion { version, first, second } => {
                assert_eq!(version, "1");
                assert!(first.contains("V1__init.sql"));
                assert!(second.contains("V1.0__init_again.sql"));
            }
            other => panic!("expected DuplicateVersion, got {other}"),
        }
    }

    #[test]
    fn test_duplicate_repeatable_description_is_fatal() {
        let err = resolver_of(vec![vec![
            entry(None, "refresh view", "R__refresh_view.sql", "aa", MigrationType::Sql),
            entry(None, "refresh view", "R__refresh_view2.sql", "bb", MigrationType::Sql),
        ]])
        .resolve()
        .unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateDescription { .. }));
    }

    #[test]
    fn test_baseline_and_versioned_share_a_version() {
        let catalog = resolver_of(vec![vec![
            entry(Some("1"), "existing", "B1__x.sql", "aa", MigrationType::SqlBaseline),
            entry(Some("1"), "real", "V1__y.sql", "bb", MigrationType::Sql),
        ]])
        .resolve()
        .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_undo_and_versioned_share_a_version() {
        let catalog = resolver_of(vec![vec![
            entry(Some("1"), "drop users", "U1__drop_users.sql", "aa", MigrationType::SqlUndo),
            entry(Some("1"), "create users", "V1__create_users.sql", "bb", MigrationType::Sql),
        ]])
        .resolve()
        .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_two_undos_for_one_version_conflict() {
        let err = resolver_of(vec![vec![
            entry(Some("1"), "undo a", "U1__undo_a.sql", "aa", MigrationType::SqlUndo),
            entry(Some("1"), "undo b", "U1__undo_b.sql", "bb", MigrationType::SqlUndo),
        ]])
        .resolve()
        .unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateVersion { .. }));
    }
}
