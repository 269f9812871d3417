//! Entity records on top of `badgeville-api`.
//!
//! This crate owns the caller-facing semantics of the Berlin client:
//!
//! - **[`Record<T>`]**: one entity (site, user, player, activity, activity
//!   definition, reward definition, reward) plus the validation messages
//!   from its last save. [`save()`](Record::save) creates or updates
//!   depending on identity and answers `Ok(false)` when the server rejects
//!   the attributes; [`find()`](Record::find) and
//!   [`find_all()`](Record::find_all) read back from the server.
//!
//! - **[`ClientConfig`]**: host, API key, and connection tuning. Passed in
//!   explicitly; there is no process-wide configuration.
//!
//! - **[`CoreError`]**: hard failures (transport, auth, not found). Remote
//!   validation failures are data on the record, not errors.

pub mod config;
pub mod error;
pub mod record;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ClientConfig;
pub use error::CoreError;
pub use record::Record;

// Re-export the wire model at the crate root for ergonomics.
pub use badgeville_api::{
    Activity, ActivityDefinition, Adjustment, BerlinClient, EntityId, Player, Query, Resource,
    ResourceKind, Reward, RewardComponent, RewardDefinition, RewardTemplate, Site, TlsMode, User,
    ValidationErrors,
};
