// ── Activity ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Extra};
use crate::resource::{ResourceKind, impl_resource};

/// One recorded behavior ("verb") performed by a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<EntityId>,
    /// Points the server awarded for this activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Activity {
    pub fn new(verb: impl Into<String>, player_id: impl Into<EntityId>) -> Self {
        Self {
            verb: Some(verb.into()),
            player_id: Some(player_id.into()),
            ..Self::default()
        }
    }
}

impl_resource!(Activity, ResourceKind::Activities);
