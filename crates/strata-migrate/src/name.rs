//! Migration resource name parsing.
//!
//! Names follow `<prefix><version><separator><description><suffix>` for
//! versioned migrations (`V1.2__create_users.sql`) and
//! `<prefix><separator><description><suffix>` for repeatable ones
//! (`R__refresh_view.sql`). Callback scripts share the grammar but are
//! recognized by their event-name prefix.

use crate::callback::CallbackEvent;
use crate::config::MigrateConfig;
use crate::version::MigrationVersion;

/// What a valid resource name designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Ordered migration, applied at most once.
    Versioned,
    /// Marker that the schema is assumed to already be at this version.
    Baseline,
    /// Compensating script for a versioned migration.
    Undo,
    /// Unversioned migration, re-applied when its checksum changes.
    Repeatable,
    /// Lifecycle callback script; never part of the catalog.
    Callback(CallbackEvent),
}

/// A migration filename decomposed per the naming convention.
///
/// Underscores in the description become spaces on load; the raw
/// description is kept so [`ResourceName::file_name`] round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    prefix: String,
    version: Option<String>,
    description: String,
    raw_description: String,
    suffix: String,
    separator: String,
    kind: Option<NameKind>,
    valid: bool,
    message: Option<String>,
}

impl ResourceName {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            version: None,
            description: String::new(),
            raw_description: String::new(),
            suffix: String::new(),
            separator: String::new(),
            kind: None,
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Whether the name satisfies the convention.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Why the name is invalid, if it is.
    #[must_use]
    pub fn validity_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The matched prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The raw version text; only present on versioned-family names.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The description with underscores replaced by spaces.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The description exactly as written in the filename.
    #[must_use]
    pub fn raw_description(&self) -> &str {
        &self.raw_description
    }

    /// The matched suffix, including the dot.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// What the name designates; `None` for invalid names.
    #[must_use]
    pub const fn kind(&self) -> Option<NameKind> {
        self.kind
    }

    /// Reconstructs the filename this name was parsed from.
    #[must_use]
    pub fn file_name(&self) -> String {
        let mut out = self.prefix.clone();
        if let Some(version) = &self.version {
            out.push_str(version);
        }
        if !self.raw_description.is_empty() {
            out.push_str(&self.separator);
            out.push_str(&self.raw_description);
        }
        out.push_str(&self.suffix);
        out
    }
}

/// Parses resource names against the configured prefixes, separator and
/// suffixes, matching the longest prefix first so callback names never
/// masquerade as migrations.
pub struct ResourceNameParser {
    prefixes: Vec<(String, NameKind)>,
    separator: String,
    suffixes: Vec<String>,
}

impl ResourceNameParser {
    /// Builds a parser from the configured naming convention plus every
    /// known callback event prefix.
    #[must_use]
    pub fn new(config: &MigrateConfig) -> Self {
        let mut prefixes = vec![
            (config.sql_migration_prefix.clone(), NameKind::Versioned),
            (config.baseline_migration_prefix.clone(), NameKind::Baseline),
            (config.undo_migration_prefix.clone(), NameKind::Undo),
            (config.repeatable_migration_prefix.clone(), NameKind::Repeatable),
        ];
        for event in CallbackEvent::ALL {
            prefixes.push((event.name().to_string(), NameKind::Callback(event)));
        }
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self {
            prefixes,
            separator: config.sql_migration_separator.clone(),
            suffixes: config.sql_migration_suffixes.clone(),
        }
    }

    /// Decomposes `file_name`; failures yield an invalid [`ResourceName`]
    /// carrying the diagnostic rather than an error.
    #[must_use]
    pub fn parse(&self, file_name: &str) -> ResourceName {
        let Some(suffix) = self.matched_suffix(file_name) else {
            return ResourceName::invalid(format!(
                "name does not end with a recognized suffix ({})",
                self.suffixes.join(", ")
            ));
        };
        let stem = &file_name[..file_name.len() - suffix.len()];

        let Some((prefix, kind)) = self
            .prefixes
            .iter()
            .find(|(prefix, _)| !prefix.is_empty() && stem.starts_with(prefix.as_str()))
        else {
            return ResourceName::invalid(format!(
                "name does not start with a recognized prefix ({})",
                self.prefixes
                    .iter()
                    .map(|(p, _)| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        };
        let rest = &stem[prefix.len()..];

        let (version_part, raw_description) = rest
            .split_once(self.separator.as_str())
            .unwrap_or((rest, ""));

        let version = match kind {
            NameKind::Versioned | NameKind::Baseline | NameKind::Undo => {
                if version_part.is_empty() {
                    return ResourceName::invalid(format!(
                        "'{prefix}'-prefixed migrations require a version"
                    ));
                }
                if let Err(err) = MigrationVersion::parse(version_part) {
                    return ResourceName::invalid(err.to_string());
                }
                Some(version_part.to_string())
            }
            NameKind::Repeatable | NameKind::Callback(_) => {
                if !version_part.is_empty() {
                    return ResourceName::invalid(format!(
                        "'{prefix}'-prefixed resources must not carry a version"
                    ));
                }
                None
            }
        };

        ResourceName {
            prefix: prefix.clone(),
            version,
            description: raw_description.replace('_', " "),
            raw_description: raw_description.to_string(),
            suffix: suffix.to_string(),
            separator: self.separator.clone(),
            kind: Some(*kind),
            valid: true,
            message: None,
        }
    }

    /// The longest configured suffix matching `file_name`, returned as the
    /// slice actually written so reconstruction preserves case.
    fn matched_suffix<'b>(&self, file_name: &'b str) -> Option<&'b str> {
        self.suffixes
            .iter()
            .filter_map(|suffix| {
                file_name
                    .len()
                    .checked_sub(suffix.len())
                    .and_then(|start| file_name.get(start..))
                    .filter(|tail| tail.eq_ignore_ascii_case(suffix))
            })
            .max_by_key(|tail| tail.len())
    }
}
