// ── Player ──

use serde::{Deserialize, Serialize};

use super::{EntityId, Extra};
use crate::resource::{ResourceKind, impl_resource};

/// A user's participation record within one site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Copied from the user by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Lifetime points, maintained server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_all: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Player {
    pub fn new(
        site_id: impl Into<EntityId>,
        user_id: impl Into<EntityId>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            site_id: Some(site_id.into()),
            user_id: Some(user_id.into()),
            display_name: Some(display_name.into()),
            ..Self::default()
        }
    }
}

impl_resource!(Player, ResourceKind::Players);
