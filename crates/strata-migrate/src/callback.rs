//! Lifecycle callback events.

/// Events whose script resources are recognized by name and kept out of the
/// migration catalog.
///
/// A script such as `beforeMigrate.sql` or `afterMigrate__vacuum.sql` is a
/// callback, not a migration, even though its name parses the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackEvent {
    BeforeMigrate,
    BeforeEachMigrate,
    AfterEachMigrate,
    AfterMigrate,
    BeforeClean,
    AfterClean,
    BeforeValidate,
    AfterValidate,
}

impl CallbackEvent {
    /// Every known event.
    pub const ALL: [Self; 8] = [
        Self::BeforeMigrate,
        Self::BeforeEachMigrate,
        Self::AfterEachMigrate,
        Self::AfterMigrate,
        Self::BeforeClean,
        Self::AfterClean,
        Self::BeforeValidate,
        Self::AfterValidate,
    ];

    /// The filename prefix announcing this event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeMigrate => "beforeMigrate",
            Self::BeforeEachMigrate => "beforeEachMigrate",
            Self::AfterEachMigrate => "afterEachMigrate",
            Self::AfterMigrate => "afterMigrate",
            Self::BeforeClean => "beforeClean",
            Self::AfterClean => "afterClean",
            Self::BeforeValidate => "beforeValidate",
            Self::AfterValidate => "afterValidate",
        }
    }

    /// Looks an event up by its filename prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }
}
