//! Schema-history model.
//!
//! The schema-history table is the durable ledger of applied migrations.
//! This module models its rows and the predicates the external validator
//! builds on; writing rows is the executor's job.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::migration::ResolvedMigration;
use crate::version::MigrationVersion;

/// One row of the schema-history table.
///
/// `installed_rank` is a monotonically increasing counter assigned at
/// insert. It reflects application order, which is not necessarily version
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Insert sequence number; the table's primary key.
    pub installed_rank: i32,
    /// Version text; `None` for repeatable migrations.
    pub version: Option<String>,
    /// Description as recorded at application time.
    pub description: String,
    /// Type code (`SQL`, `SQL_BASELINE`, …) as recorded.
    pub migration_type: String,
    /// Script identifier as recorded.
    pub script: String,
    /// Checksum recorded at application time, if any.
    pub checksum: Option<String>,
    /// Who applied it.
    pub installed_by: String,
    /// When it was applied.
    pub installed_on: DateTime<Utc>,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: i32,
    /// Whether the run succeeded.
    pub success: bool,
}

// Ordering is by installed_rank alone: rank is a historical sequence
// number, not identity, so two rows can compare Equal while differing in
// every other field. Kept inconsistent with `Eq` on purpose.
impl PartialOrd for AppliedMigration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AppliedMigration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.installed_rank.cmp(&other.installed_rank)
    }
}

/// Whether the resolved content still matches what was applied.
///
/// For repeatables, either the primary checksum or the
/// pre-placeholder-substitution equivalent counting as a match means
/// "unchanged". This is the drift predicate the external validator turns
/// into an error; it is never raised here.
#[must_use]
pub fn checksum_matches(resolved: &ResolvedMigration, applied: &AppliedMigration) -> bool {
    applied.checksum.as_ref().map_or_else(
        || resolved.checksum.is_none(),
        |recorded| {
            resolved.checksum.as_ref() == Some(recorded)
                || resolved.equivalent_checksum.as_ref() == Some(recorded)
        },
    )
}

/// Applied versioned migrations whose version precedes one that was already
/// applied at a lower rank: evidence of out-of-order application.
#[must_use]
pub fn out_of_order(applied: &[AppliedMigration]) -> Vec<&AppliedMigration> {
    let mut rows: Vec<&AppliedMigration> = applied.iter().collect();
    rows.sort();

    let mut max_seen: Option<MigrationVersion> = None;
    let mut out = Vec::new();
    for row in rows {
        let Some(version) = row
            .version
            .as_deref()
            .and_then(|raw| MigrationVersion::parse(raw).ok())
        else {
            continue;
        };
        match max_seen.as_ref().map(|max| version.cmp(max)) {
            Some(Ordering::Less) => out.push(row),
            Some(Ordering::Greater) | None => max_seen = Some(version),
            Some(Ordering::Equal) => {}
        }
    }
    out
}
