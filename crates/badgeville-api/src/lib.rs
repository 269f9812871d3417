// badgeville-api: Async Rust client for the Badgeville Berlin REST API

pub mod client;
pub mod error;
pub mod model;
pub mod query;
pub mod resource;
pub mod transport;
pub mod validation;

pub use client::{BerlinClient, Page, Paging};
pub use error::Error;
pub use model::{
    Activity, ActivityDefinition, Adjustment, EntityId, Player, Reward, RewardComponent,
    RewardDefinition, RewardTemplate, Site, User,
};
pub use query::Query;
pub use resource::{Resource, ResourceKind};
pub use transport::{TlsMode, TransportConfig};
pub use validation::ValidationErrors;
