// Resource naming conventions
//
// Every entity lives in a plural collection (`/users.json`) and is wrapped
// in a singular root key when sent (`{"user": {...}}`). `ResourceKind`
// owns both names; `Resource` ties a model type to its kind.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::EntityId;

/// The remote collections exposed by the Berlin API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Sites,
    Users,
    Players,
    Activities,
    ActivityDefinitions,
    RewardDefinitions,
    Rewards,
}

impl ResourceKind {
    /// Plural path segment, e.g. `activity_definitions`.
    pub fn collection(self) -> &'static str {
        self.into()
    }

    /// Singular root key wrapping request bodies, e.g. `activity_definition`.
    pub fn element(self) -> &'static str {
        match self {
            Self::Sites => "site",
            Self::Users => "user",
            Self::Players => "player",
            Self::Activities => "activity",
            Self::ActivityDefinitions => "activity_definition",
            Self::RewardDefinitions => "reward_definition",
            Self::Rewards => "reward",
        }
    }
}

/// A model type stored in one remote collection.
///
/// Identity is assigned by the server; a value without one has never been
/// persisted.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    const KIND: ResourceKind;

    fn id(&self) -> Option<&EntityId>;

    fn set_id(&mut self, id: Option<EntityId>);
}

/// Implements [`Resource`] for a model with an `id: Option<EntityId>` field.
macro_rules! impl_resource {
    ($ty:ty, $kind:expr) => {
        impl $crate::resource::Resource for $ty {
            const KIND: $crate::resource::ResourceKind = $kind;

            fn id(&self) -> Option<&$crate::model::EntityId> {
                self.id.as_ref()
            }

            fn set_id(&mut self, id: Option<$crate::model::EntityId>) {
                self.id = id;
            }
        }
    };
}

pub(crate) use impl_resource;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn collection_names_are_snake_case() {
        assert_eq!(
            ResourceKind::ActivityDefinitions.collection(),
            "activity_definitions"
        );
        for kind in ResourceKind::iter() {
            assert_eq!(kind.to_string(), kind.collection());
        }
    }

    #[test]
    fn element_names_are_singular() {
        assert_eq!(ResourceKind::Activities.element(), "activity");
        assert_eq!(
            ResourceKind::RewardDefinitions.element(),
            "reward_definition"
        );
        for kind in ResourceKind::iter() {
            assert!(kind.collection().starts_with(&kind.element()[..3]));
        }
    }
}
