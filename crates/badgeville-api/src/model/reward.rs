// ── Reward ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Extra};
use crate::resource::{ResourceKind, impl_resource};

/// A grant materialized by the server when a reward definition's
/// components are satisfied. Usually listed by `player_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Copied from the reward definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl_resource!(Reward, ResourceKind::Rewards);
