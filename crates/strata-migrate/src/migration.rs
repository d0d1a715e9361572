//! Resolved migration model.

use std::cmp::Ordering;

use crate::version::MigrationVersion;

/// How a migration entered the catalog and how it must be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationType {
    /// Versioned or repeatable SQL script.
    Sql,
    /// SQL baseline marker.
    SqlBaseline,
    /// SQL undo script.
    SqlUndo,
    /// Migration implemented in Rust code.
    Programmatic,
    /// Programmatic baseline marker.
    ProgrammaticBaseline,
}

impl MigrationType {
    /// Baselines are exempt from version-conflict checks against real
    /// migrations.
    #[must_use]
    pub const fn is_baseline(self) -> bool {
        matches!(self, Self::SqlBaseline | Self::ProgrammaticBaseline)
    }

    /// Undo migrations share the version of the migration they compensate.
    #[must_use]
    pub const fn is_undo(self) -> bool {
        matches!(self, Self::SqlUndo)
    }

    /// The type code recorded in the schema-history table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sql => "SQL",
            Self::SqlBaseline => "SQL_BASELINE",
            Self::SqlUndo => "SQL_UNDO",
            Self::Programmatic => "CODE",
            Self::ProgrammaticBaseline => "CODE_BASELINE",
        }
    }
}

/// Which executor runs a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorKind {
    /// Split the script and run its statements.
    SqlScript,
    /// Invoke the programmatic migration object.
    Code,
}

/// A migration as produced by resolution, before any execution.
///
/// Equality is value-equality over checksum, equivalent checksum,
/// description, script and type; version and physical location are
/// deliberately not part of identity, so the same migration discovered
/// through two paths deduplicates.
#[derive(Debug, Clone)]
pub struct ResolvedMigration {
    /// Version; `None` for repeatable migrations.
    pub version: Option<MigrationVersion>,
    /// Human-readable description.
    pub description: String,
    /// Script identifier (file name or code tag).
    pub script: String,
    /// Fingerprint of the executable content.
    pub checksum: Option<String>,
    /// Repeatable-only fingerprint of the pre-placeholder-substitution
    /// content; either checksum matching counts as unchanged.
    pub equivalent_checksum: Option<String>,
    /// How this migration is classified.
    pub migration_type: MigrationType,
    /// Where the migration physically lives, for diagnostics.
    pub physical_location: String,
    /// Which executor runs it.
    pub executor: ExecutorKind,
}

impl PartialEq for ResolvedMigration {
    fn eq(&self, other: &Self) -> bool {
        self.checksum == other.checksum
            && self.equivalent_checksum == other.equivalent_checksum
            && self.description == other.description
            && self.script == other.script
            && self.migration_type == other.migration_type
    }
}

impl Eq for ResolvedMigration {}

impl ResolvedMigration {
    /// Repeatable migrations carry no version.
    #[must_use]
    pub const fn is_repeatable(&self) -> bool {
        self.version.is_none()
    }

    /// Catalog order: versioned migrations ascending by version, then
    /// repeatable migrations by description. Ties break on type rank before
    /// description so that entries competing for the same version land
    /// adjacent, with baselines and undos grouped apart from real
    /// migrations.
    #[must_use]
    pub fn catalog_cmp(&self, other: &Self) -> Ordering {
        match (&self.version, &other.version) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| type_rank(self.migration_type).cmp(&type_rank(other.migration_type)))
        .then_with(|| self.description.cmp(&other.description))
        .then_with(|| self.script.cmp(&other.script))
        .then_with(|| self.checksum.cmp(&other.checksum))
    }

    /// Whether two catalog entries occupy the same slot: the same version
    /// for versioned migrations, the same description for repeatables.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        match (&self.version, &other.version) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.description == other.description,
            _ => false,
        }
    }
}

const fn type_rank(migration_type: MigrationType) -> u8 {
    match migration_type {
        MigrationType::SqlBaseline | MigrationType::ProgrammaticBaseline => 0,
        MigrationType::SqlUndo => 1,
        MigrationType::Sql | MigrationType::Programmatic => 2,
    }
}
