//! Filesystem script migration source.

use std::fs;
use std::path::{Path, PathBuf};

use strata_core::dialect::DialectRules;
use strata_core::splitter::{SqlStatement, StatementTokenizer};
use tracing::{debug, warn};

use crate::checksum;
use crate::config::MigrateConfig;
use crate::error::{MigrateError, Result};
use crate::migration::{ExecutorKind, MigrationType, ResolvedMigration};
use crate::name::{NameKind, ResourceName, ResourceNameParser};
use crate::placeholder::PlaceholderReplacer;
use crate::version::MigrationVersion;

use super::MigrationSource;

/// Discovers script migrations under a directory, recursively.
///
/// Scripts are read as UTF-8; checksums are computed over the
/// placeholder-substituted content, with the pre-substitution equivalent
/// kept for repeatables. Callback scripts are recognized and excluded from
/// the catalog.
pub struct SqlMigrationSource {
    name: String,
    location: PathBuf,
    config: MigrateConfig,
}

impl SqlMigrationSource {
    /// Creates a source scanning `location`.
    #[must_use]
    pub fn new(location: impl Into<PathBuf>, config: MigrateConfig) -> Self {
        let location = location.into();
        Self {
            name: format!("sql:{}", location.display()),
            location,
            config,
        }
    }

    fn resolve_file(
        &self,
        replacer: &PlaceholderReplacer,
        path: &Path,
        name: &ResourceName,
    ) -> Result<Option<ResolvedMigration>> {
        if !name.is_valid() {
            let message = name
                .validity_message()
                .unwrap_or("name violates the naming convention")
                .to_string();
            if self.config.ignore_invalid_names {
                warn!(path = %path.display(), message, "Skipping invalidly named resource");
                return Ok(None);
            }
            return Err(MigrateError::InvalidName {
                path: path.to_path_buf(),
                message,
            });
        }
        let Some(kind) = name.kind() else {
            return Ok(None);
        };
        if let NameKind::Callback(event) = kind {
            debug!(path = %path.display(), event = event.name(), "Callback script excluded from catalog");
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let substituted = if self.config.placeholder_replacement {
            replacer.replace(&raw)
        } else {
            raw.clone()
        };

        let version = name
            .version()
            .map(MigrationVersion::parse)
            .transpose()?;
        let migration_type = match kind {
            NameKind::Baseline => MigrationType::SqlBaseline,
            NameKind::Undo => MigrationType::SqlUndo,
            NameKind::Versioned | NameKind::Repeatable | NameKind::Callback(_) => {
                MigrationType::Sql
            }
        };
        let equivalent_checksum = matches!(kind, NameKind::Repeatable)
            .then(|| checksum::checksum(&raw));

        Ok(Some(ResolvedMigration {
            version,
            description: name.description().to_string(),
            script: name.file_name(),
            checksum: Some(checksum::checksum(&substituted)),
            equivalent_checksum,
            migration_type,
            physical_location: path.display().to_string(),
            executor: ExecutorKind::SqlScript,
        }))
    }
}

impl MigrationSource for SqlMigrationSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        let parser = ResourceNameParser::new(&self.config);
        let replacer = PlaceholderReplacer::new(&self.config);

        let mut paths = Vec::new();
        collect_scripts(
            &self.location,
            &self.config.sql_migration_suffixes,
            &mut paths,
        )?;
        paths.sort();

        let mut migrations = Vec::new();
        for path in &paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = parser.parse(file_name);
            if let Some(migration) = self.resolve_file(&replacer, path, &name)? {
                migrations.push(migration);
            }
        }
        Ok(migrations)
    }
}

fn collect_scripts(dir: &Path, suffixes: &[String], out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_scripts(&path, suffixes, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| has_suffix(n, suffixes))
        {
            out.push(path);
        } else {
            debug!(path = %path.display(), "Ignoring non-script file");
        }
    }
    Ok(())
}

fn has_suffix(file_name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| {
        file_name
            .len()
            .checked_sub(suffix.len())
            .and_then(|start| file_name.get(start..))
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
    })
}

/// Reads a resolved SQL migration and splits it into executable statements,
/// with placeholders substituted the same way the checksum saw them.
///
/// # Errors
///
/// Fails on IO errors and on malformed scripts; splitter errors are wrapped
/// with the script identifier.
pub fn load_statements(
    migration: &ResolvedMigration,
    rules: &DialectRules,
    config: &MigrateConfig,
) -> Result<Vec<SqlStatement>> {
    let raw = fs::read_to_string(Path::new(&migration.physical_location))?;
    let content = if config.placeholder_replacement {
        PlaceholderReplacer::new(config).replace(&raw)
    } else {
        raw
    };
    StatementTokenizer::new(&content, rules)
        .collect::<core::result::Result<Vec<_>, _>>()
        .map_err(|source| MigrateError::Parse {
            script: migration.script.clone(),
            source,
        })
}
