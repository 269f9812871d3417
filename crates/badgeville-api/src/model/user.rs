// ── User ──

use serde::{Deserialize, Serialize};

use super::{EntityId, Extra};
use crate::resource::{ResourceKind, impl_resource};

/// A network-wide identity. Email addresses are unique per network; the
/// server rejects duplicates with an `email` validation error.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Write-only; the server never echoes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        network_id: impl Into<EntityId>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            network_id: Some(network_id.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }
}

// Manual impl keeps the password out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("network_id", &self.network_id)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("extra", &self.extra)
            .finish()
    }
}

impl_resource!(User, ResourceKind::Users);
