//! Error types for the migration engine.
//!
//! Variants are tagged so callers can tell configuration problems
//! (`InvalidName`, `InvalidVersion`), data-integrity problems
//! (`DuplicateVersion`, `DuplicateDescription`, `Parse`) and transient
//! coordination problems (`LockTimeout`, `Cancelled`, `Database`) apart.

use std::path::PathBuf;

use strata_core::SplitError;

/// Errors that can occur while resolving or coordinating migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A script could not be split into statements.
    #[error("Failed to parse migration script '{script}': {source}")]
    Parse {
        /// Script identifier (file name).
        script: String,
        /// The underlying splitter error, with line and column.
        #[source]
        source: SplitError,
    },

    /// A resource name violates the configured naming convention.
    #[error("Invalid migration resource name '{}': {message}", .path.display())]
    InvalidName {
        /// Path of the offending resource.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A version string is not a dot-separated sequence of non-negative
    /// integers.
    #[error("Invalid migration version '{version}': {message}")]
    InvalidVersion {
        /// The raw version text.
        version: String,
        /// What is wrong with it.
        message: String,
    },

    /// Two non-baseline migrations resolved to the same version.
    #[error("Found more than one migration with version {version} ({first} and {second})")]
    DuplicateVersion {
        /// The colliding version.
        version: String,
        /// Location of the first offender.
        first: String,
        /// Location of the second offender.
        second: String,
    },

    /// Two repeatable migrations resolved to the same description.
    #[error("Found more than one repeatable migration with description '{description}' ({first} and {second})")]
    DuplicateDescription {
        /// The colliding description.
        description: String,
        /// Location of the first offender.
        first: String,
        /// Location of the second offender.
        second: String,
    },

    /// Lock polls were exhausted without acquiring the migration lock.
    #[error(
        "Failed to acquire migration lock '{key}' after {retries} attempts; \
         another migration run is likely in progress (see the lock_retry_count setting)"
    )]
    LockTimeout {
        /// The lock key.
        key: String,
        /// How many polls were made.
        retries: u32,
    },

    /// The migration lock could not be released after successful work; its
    /// state is unknown and may need manual cleanup.
    #[error("Failed to release migration lock '{key}'; lock state is unknown")]
    LockRelease {
        /// The lock key.
        key: String,
    },

    /// The caller cancelled the wait for the migration lock.
    #[error("Migration lock acquisition cancelled")]
    Cancelled,

    /// Database error from the session layer.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error reading migration resources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
