// ── Site ──

use serde::{Deserialize, Serialize};

use super::{EntityId, Extra};
use crate::resource::{ResourceKind, impl_resource};

/// A tenant boundary on the platform. Players, activity definitions and
/// reward definitions are all scoped to a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Domain the site is served from (e.g. `mydomain.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Site {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        network_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
            network_id: Some(network_id.into()),
            ..Self::default()
        }
    }
}

impl_resource!(Site, ResourceKind::Sites);
