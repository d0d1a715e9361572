//! Fixed in-memory migration source.

use crate::error::Result;
use crate::migration::ResolvedMigration;

use super::MigrationSource;

/// A source backed by a fixed set of already-resolved migrations.
///
/// Useful for embedders that assemble migrations programmatically and for
/// tests.
pub struct FixedMigrationSource {
    name: String,
    migrations: Vec<ResolvedMigration>,
}

impl FixedMigrationSource {
    /// Creates a source that always resolves to `migrations`.
    #[must_use]
    pub fn new(name: impl Into<String>, migrations: Vec<ResolvedMigration>) -> Self {
        Self {
            name: name.into(),
            migrations,
        }
    }
}

impl MigrationSource for FixedMigrationSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        Ok(self.migrations.clone())
    }
}
