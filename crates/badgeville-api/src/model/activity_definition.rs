// ── ActivityDefinition ──
//
// Maps matching activities to point adjustments. Rate limiting is a token
// bucket described by two numbers; the bucket itself runs server-side.

use serde::{Deserialize, Serialize};

use super::{EntityId, Extra, json_text};
use crate::resource::{ResourceKind, impl_resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
    /// Match pattern against activity attributes, e.g. `{"verb": "comment"}`.
    #[serde(
        default,
        with = "json_text::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub selector: Option<Extra>,
    /// Derived by the server from `selector`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(
        default,
        with = "json_text::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub adjustment: Option<Adjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_rate_limiting: Option<bool>,
    /// Seconds per token drained from the bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_drain_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_max_capacity: Option<u32>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ActivityDefinition {
    /// A definition matching activities whose `verb` equals `verb`.
    pub fn for_verb(
        site_id: impl Into<EntityId>,
        name: impl Into<String>,
        verb: impl Into<String>,
        points: i64,
    ) -> Self {
        let mut selector = Extra::new();
        selector.insert("verb".into(), serde_json::Value::String(verb.into()));
        Self {
            name: Some(name.into()),
            site_id: Some(site_id.into()),
            selector: Some(selector),
            adjustment: Some(Adjustment::points(points)),
            ..Self::default()
        }
    }

    /// Turn on the server-side token bucket.
    pub fn rate_limit(&mut self, drain_rate: u32, max_capacity: u32) {
        self.enable_rate_limiting = Some(true);
        self.bucket_drain_rate = Some(drain_rate);
        self.bucket_max_capacity = Some(max_capacity);
    }
}

/// Point rule applied when a definition matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Adjustment {
    pub fn points(points: i64) -> Self {
        Self {
            points: Some(points),
            extra: Extra::new(),
        }
    }
}

impl_resource!(ActivityDefinition, ResourceKind::ActivityDefinitions);
