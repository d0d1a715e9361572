//! Dialect selection by connection metadata.
//!
//! A priority-ordered table of (predicate, constructor) entries replaces
//! per-database type hierarchies: the first entry whose predicate matches
//! the connection metadata wins, and unrecognized databases fall back to the
//! generic rules.

use super::{generic, mysql, postgres, sqlite, sqlserver, DialectRules};

/// Connection metadata a dialect predicate can match on.
///
/// Either field may be absent; predicates match on whatever is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Connection URL, e.g. `postgres://localhost/app`.
    pub url: Option<String>,
    /// Database product name as reported by the driver.
    pub product_name: Option<String>,
}

impl ConnectionInfo {
    /// Builds metadata from a connection URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            product_name: None,
        }
    }

    /// Builds metadata from a driver-reported product name.
    #[must_use]
    pub fn from_product(name: impl Into<String>) -> Self {
        Self {
            url: None,
            product_name: Some(name.into()),
        }
    }

    fn url_has_scheme(&self, schemes: &[&str]) -> bool {
        self.url.as_deref().is_some_and(|url| {
            let url = url.to_ascii_lowercase();
            schemes.iter().any(|s| url.starts_with(s))
        })
    }

    fn product_contains(&self, needles: &[&str]) -> bool {
        self.product_name.as_deref().is_some_and(|name| {
            let name = name.to_ascii_lowercase();
            needles.iter().any(|n| name.contains(n))
        })
    }
}

/// One registry entry: a named predicate plus a rules constructor.
struct DialectEntry {
    name: &'static str,
    matches: fn(&ConnectionInfo) -> bool,
    build: fn() -> DialectRules,
}

/// Priority-ordered dialect table.
pub struct DialectRegistry {
    entries: Vec<DialectEntry>,
}

impl DialectRegistry {
    /// Returns the registry with the built-in dialects, most specific first.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: vec![
                DialectEntry {
                    name: "PostgreSQL",
                    matches: |info| {
                        info.url_has_scheme(&["postgres://", "postgresql://"])
                            || info.product_contains(&["postgres"])
                    },
                    build: postgres::rules,
                },
                DialectEntry {
                    name: "MySQL",
                    matches: |info| {
                        info.url_has_scheme(&["mysql://", "mariadb://"])
                            || info.product_contains(&["mysql", "mariadb"])
                    },
                    build: mysql::rules,
                },
                DialectEntry {
                    name: "SQL Server",
                    matches: |info| {
                        info.url_has_scheme(&["mssql://", "sqlserver://", "jdbc:sqlserver://"])
                            || info.product_contains(&["sql server", "microsoft"])
                    },
                    build: sqlserver::rules,
                },
                DialectEntry {
                    name: "SQLite",
                    matches: |info| {
                        info.url_has_scheme(&["sqlite:", "sqlite://"])
                            || info.product_contains(&["sqlite"])
                    },
                    build: sqlite::rules,
                },
            ],
        }
    }

    /// Registers a custom dialect ahead of the built-ins.
    pub fn register(
        &mut self,
        name: &'static str,
        matches: fn(&ConnectionInfo) -> bool,
        build: fn() -> DialectRules,
    ) {
        self.entries.insert(
            0,
            DialectEntry {
                name,
                matches,
                build,
            },
        );
    }

    /// Selects rules for the given connection metadata, falling back to the
    /// generic dialect when nothing matches.
    #[must_use]
    pub fn detect(&self, info: &ConnectionInfo) -> DialectRules {
        self.entries
            .iter()
            .find(|entry| (entry.matches)(info))
            .map_or_else(generic::rules, |entry| (entry.build)())
    }

    /// Looks a dialect up by name, case-insensitively.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<DialectRules> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| (entry.build)())
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_url() {
        let registry = DialectRegistry::standard();
        let rules = registry.detect(&ConnectionInfo::from_url("postgres://localhost/app"));
        assert_eq!(rules.name, "PostgreSQL");
        let rules = registry.detect(&ConnectionInfo::from_url("mariadb://localhost/app"));
        assert_eq!(rules.name, "MySQL");
    }

    #[test]
    fn test_detect_by_product_name() {
        let registry = DialectRegistry::standard();
        let rules = registry.detect(&ConnectionInfo::from_product("Microsoft SQL Server"));
        assert_eq!(rules.name, "SQL Server");
    }

    #[test]
    fn test_detect_falls_back_to_generic() {
        let registry = DialectRegistry::standard();
        let rules = registry.detect(&ConnectionInfo::from_product("CockroachDB"));
        assert_eq!(rules.name, "Generic");
    }

    #[test]
    fn test_custom_dialect_takes_priority() {
        let mut registry = DialectRegistry::standard();
        registry.register(
            "CockroachDB",
            |info| info.product_contains(&["cockroach"]),
            super::super::postgres::rules,
        );
        let rules = registry.detect(&ConnectionInfo::from_product("CockroachDB"));
        assert_eq!(rules.name, "PostgreSQL");
    }

    #[test]
    fn test_by_name() {
        let registry = DialectRegistry::standard();
        assert!(registry.by_name("sqlite").is_some());
        assert!(registry.by_name("db2").is_none());
    }
}
