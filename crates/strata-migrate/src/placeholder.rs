//! Script placeholder substitution.

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::MigrateConfig;

/// Replaces `${key}` occurrences in script text with configured values.
///
/// Unknown placeholders are logged and left verbatim so that scripts using
/// the marker syntax for something else (e.g. shell snippets in comments)
/// still resolve.
pub struct PlaceholderReplacer {
    prefix: String,
    suffix: String,
    values: BTreeMap<String, String>,
}

impl PlaceholderReplacer {
    /// Builds a replacer from the configured markers and values.
    #[must_use]
    pub fn new(config: &MigrateConfig) -> Self {
        Self {
            prefix: config.placeholder_prefix.clone(),
            suffix: config.placeholder_suffix.clone(),
            values: config.placeholders.clone(),
        }
    }

    /// Substitutes every known placeholder in `input`.
    #[must_use]
    pub fn replace(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find(&self.prefix) {
            out.push_str(&rest[..start]);
            let after_prefix = &rest[start + self.prefix.len()..];
            match after_prefix.find(&self.suffix) {
                Some(end) => {
                    let key = &after_prefix[..end];
                    if let Some(value) = self.values.get(key) {
                        out.push_str(value);
                    } else {
                        warn!(placeholder = key, "No value configured for placeholder, leaving it verbatim");
                        out.push_str(&rest[start..start + self.prefix.len() + end + self.suffix.len()]);
                    }
                    rest = &after_prefix[end + self.suffix.len()..];
                }
                None => {
                    // opening marker without a closer; keep the tail as-is
                    out.push_str(&rest[start..]);
                    return out;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
