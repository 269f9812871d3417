// ── RewardDefinition ──
//
// A rule granting a reward once every component is satisfied by a
// player's activity history. Components are evaluated remotely.

use serde::{Deserialize, Serialize};

use super::{EntityId, Extra, json_text};
use crate::resource::{ResourceKind, impl_resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        with = "json_text::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reward_template: Option<RewardTemplate>,
    #[serde(
        default,
        with = "json_text::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub components: Option<Vec<RewardComponent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl RewardDefinition {
    pub fn new(site_id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            site_id: Some(site_id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Presentation of a granted reward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl RewardTemplate {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            extra: Extra::new(),
        }
    }
}

/// One eligibility condition, e.g. "count of comments by this player >= 1":
///
/// ```json
/// {"command": "count", "where": {"verb": "comment", "player_id": "%player_id"}, "comparator": {"$gte": 1}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Extra>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Extra>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl RewardComponent {
    /// Placeholder the server substitutes with the evaluated player's id.
    pub const PLAYER_PLACEHOLDER: &'static str = "%player_id";

    /// Satisfied once the player has performed `verb` at least `at_least` times.
    pub fn count_at_least(verb: impl Into<String>, at_least: u64) -> Self {
        let mut conditions = Extra::new();
        conditions.insert("verb".into(), serde_json::Value::String(verb.into()));
        conditions.insert(
            "player_id".into(),
            serde_json::Value::String(Self::PLAYER_PLACEHOLDER.into()),
        );
        let mut comparator = Extra::new();
        comparator.insert("$gte".into(), serde_json::Value::from(at_least));
        Self {
            command: Some("count".into()),
            conditions: Some(conditions),
            comparator: Some(comparator),
            extra: Extra::new(),
        }
    }
}

impl_resource!(RewardDefinition, ResourceKind::RewardDefinitions);
