// Berlin API wire models
//
// One typed record per remote entity. Attributes the client knows about are
// explicit fields; anything else the server returns lands in `extra` and is
// sent back untouched on update. Optional everywhere: the server is the only
// authority on which attributes are required.

pub mod activity;
pub mod activity_definition;
pub mod entity_id;
pub mod json_text;
pub mod player;
pub mod reward;
pub mod reward_definition;
pub mod site;
pub mod user;

pub use activity::Activity;
pub use activity_definition::{ActivityDefinition, Adjustment};
pub use entity_id::EntityId;
pub use player::Player;
pub use reward::Reward;
pub use reward_definition::{RewardComponent, RewardDefinition, RewardTemplate};
pub use site::Site;
pub use user::User;

/// Catch-all for attributes without a typed field.
pub type Extra = serde_json::Map<String, serde_json::Value>;
