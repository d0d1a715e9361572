//! Schema-migration engine core.
//!
//! `strata-migrate` decides what needs to run and keeps concurrent runs
//! safe; executing statements against a live database is the embedding
//! executor's job. The engine consists of:
//!
//! - **Resolution** - pluggable sources ([`resolver::SqlMigrationSource`],
//!   [`resolver::CodeMigrationSource`], custom ones) merged into a single
//!   ordered, conflict-checked [`resolver::MigrationCatalog`]
//! - **Naming and versioning** - `V1.2__create_users.sql`-style name
//!   parsing and dot-segment numeric version ordering
//! - **Checksums** - line-ending independent content fingerprints for
//!   drift detection, with pre-substitution equivalents for repeatables
//! - **History** - the schema-history row model and the predicates
//!   validators build on
//! - **Locking** - cross-process mutual exclusion over schema mutation via
//!   the dialect's lock primitive, with retry, reentrancy and cancellation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use strata_core::dialect::{ConnectionInfo, DialectRegistry};
//! use strata_migrate::prelude::*;
//!
//! let config = MigrateConfig::default();
//! let rules = DialectRegistry::standard()
//!     .detect(&ConnectionInfo::from_url("postgres://localhost/app"));
//!
//! let catalog = MigrationResolver::new()
//!     .add_source(Box::new(SqlMigrationSource::new("migrations", config.clone())))
//!     .resolve()?;
//!
//! let pool = sqlx::PgPool::connect("postgres://localhost/app").await?;
//! let coordinator = LockCoordinator::new(Arc::new(pool), &rules, &config);
//! coordinator
//!     .with_lock(&CancelToken::new(), async {
//!         // apply pending migrations from `catalog` here
//!         Ok(())
//!     })
//!     .await?;
//! ```

pub mod callback;
pub mod checksum;
pub mod config;
pub mod error;
pub mod history;
pub mod lock;
pub mod migration;
pub mod name;
pub mod placeholder;
pub mod resolver;
pub mod session;
pub mod version;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::callback::CallbackEvent;
    pub use crate::config::MigrateConfig;
    pub use crate::error::{MigrateError, Result};
    pub use crate::history::AppliedMigration;
    pub use crate::lock::{CancelToken, Clock, LockCoordinator, SystemClock};
    pub use crate::migration::{ExecutorKind, MigrationType, ResolvedMigration};
    pub use crate::name::{NameKind, ResourceName, ResourceNameParser};
    pub use crate::placeholder::PlaceholderReplacer;
    pub use crate::resolver::{
        CodeMigrationSource, FixedMigrationSource, MigrationCatalog, MigrationResolver,
        MigrationSource, ProgrammaticMigration, SqlMigrationSource,
    };
    pub use crate::session::Session;
    pub use crate::version::MigrationVersion;
}
