//! Migration version numbers.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::MigrateError;

/// A dot-separated numeric migration version such as `1`, `1.2` or
/// `2024.10.1`.
///
/// Comparison is segment-wise numeric with missing segments treated as
/// zero, so `1 < 1.1 < 2 < 10` and `1.0` equals `1`. Underscores are
/// accepted as segment separators on input. The original text is kept for
/// display and filename round-trips.
#[derive(Debug, Clone)]
pub struct MigrationVersion {
    display: String,
    segments: Vec<u64>,
}

impl MigrationVersion {
    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidVersion`] when the input is empty or
    /// any segment is not a non-negative integer.
    pub fn parse(raw: &str) -> Result<Self, MigrateError> {
        if raw.is_empty() {
            return Err(MigrateError::InvalidVersion {
                version: String::new(),
                message: String::from("version must not be empty"),
            });
        }
        let segments = raw
            .replace('_', ".")
            .split('.')
            .map(|segment| {
                segment.parse::<u64>().map_err(|_| MigrateError::InvalidVersion {
                    version: raw.to_string(),
                    message: format!("'{segment}' is not a non-negative integer segment"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            display: raw.to_string(),
            segments,
        })
    }

    /// The version exactly as written.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// Segments with trailing zeros stripped; the canonical identity used
    /// by `Eq` and `Hash`.
    fn canonical(&self) -> &[u64] {
        let end = self
            .segments
            .iter()
            .rposition(|&segment| segment != 0)
            .map_or(0, |i| i + 1);
        &self.segments[..end]
    }
}

impl FromStr for MigrationVersion {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display)
    }
}

impl PartialEq for MigrationVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MigrationVersion {}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl Hash for MigrationVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> MigrationVersion {
        MigrationVersion::parse(raw).unwrap()
    }

    #[test]
    fn test_numeric_segment_ordering() {
        assert!(v("1") < v("1.1"));
        assert!(v("1.1") < v("2"));
        assert!(v("2") < v("10"));
        assert!(v("1.2") < v("1.10"));
    }

    #[test]
    fn test_ordering_laws() {
        let versions = [v("1"), v("1.1"), v("2"), v("10")];
        for a in &versions {
            for b in &versions {
                // antisymmetry
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                for c in &versions {
                    // transitivity
                    if a < b && b < c {
                        assert!(a < c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(v("1"), v("1.0"));
        assert_eq!(v("1.0.0"), v("1"));
        assert_ne!(v("1"), v("1.0.1"));
    }

    #[test]
    fn test_underscore_separators() {
        assert_eq!(v("1_2"), v("1.2"));
        assert_eq!(v("1_2").display_text(), "1_2");
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(v("1.2").to_string(), "1.2");
        assert_eq!(v("007").to_string(), "007");
        assert_eq!(v("007"), v("7"));
    }

    #[test]
    fn test_invalid_versions() {
        assert!(MigrationVersion::parse("").is_err());
        assert!(MigrationVersion::parse("1.a").is_err());
        assert!(MigrationVersion::parse("1..2").is_err());
        assert!(MigrationVersion::parse("-1").is_err());
        assert!(MigrationVersion::parse("1.").is_err());
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(v("1.0"));
        assert!(set.contains(&v("1")));
        assert!(!set.contains(&v("1.1")));
    }
}
