// ── Entity records ──
//
// `Record<T>` is the caller-facing handle for one remote entity. It moves
// through unsaved -> saved (has id) -> updated, and optionally destroyed.
// Saves report remote validation failures as `Ok(false)` with the field
// messages attached; only transport-level problems are `Err`.

use std::ops::{Deref, DerefMut};

use badgeville_api::{BerlinClient, EntityId, Query, Resource, ValidationErrors};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::CoreError;

/// A typed entity plus the validation messages from its last save.
///
/// Derefs to the wrapped model, so attributes read and write directly:
///
/// ```no_run
/// # async fn demo(client: &badgeville_api::BerlinClient) -> Result<(), badgeville_core::CoreError> {
/// use badgeville_core::{Record, User};
///
/// let mut user = Record::new(User::new("visitor1", "4d5dc61ed0c0b32b79000001", "v1@example.com", "pw"));
/// if !user.save(client).await? {
///     eprintln!("email: {:?}", user.errors().get("email"));
/// }
/// user.email = Some("v2@example.com".into());
/// user.save(client).await?; // issues an update: the record now has an id
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    attributes: T,
    errors: ValidationErrors,
}

impl<T: Resource> Record<T> {
    /// Wrap attributes in an unsaved record. No network call, no checks.
    pub fn new(attributes: T) -> Self {
        Self {
            attributes,
            errors: ValidationErrors::new(),
        }
    }

    pub fn id(&self) -> Option<&EntityId> {
        self.attributes.id()
    }

    /// `true` until the server has assigned an id.
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Messages from the most recent failed save; empty after a success.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn attributes(&self) -> &T {
        &self.attributes
    }

    pub fn into_inner(self) -> T {
        self.attributes
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Create or update depending on whether the record has an id.
    pub async fn save(&mut self, client: &BerlinClient) -> Result<bool, CoreError> {
        if self.is_new() {
            self.create(client).await
        } else {
            self.update(client).await
        }
    }

    /// `POST` the record, even if it already has an id.
    pub async fn create(&mut self, client: &BerlinClient) -> Result<bool, CoreError> {
        debug!(kind = %T::KIND, "creating record");
        let outcome = client.create(&self.attributes).await;
        self.absorb(outcome)
    }

    /// `PUT` the record's current attributes to its id.
    pub async fn update(&mut self, client: &BerlinClient) -> Result<bool, CoreError> {
        let id = self.require_id()?;
        debug!(kind = %T::KIND, %id, "updating record");
        let outcome = client.update(&id, &self.attributes).await;
        self.absorb(outcome)
    }

    /// Delete the remote entity. The record keeps its attributes but loses
    /// its id, so a later save would create a fresh entity.
    pub async fn destroy(&mut self, client: &BerlinClient) -> Result<(), CoreError> {
        let id = self.require_id()?;
        debug!(kind = %T::KIND, %id, "destroying record");
        client
            .delete::<T>(&id)
            .await
            .map_err(|e| not_found_as(T::KIND.collection(), &id, e))?;
        self.attributes.set_id(None);
        Ok(())
    }

    /// Replace local attributes with the server's current copy.
    pub async fn reload(&mut self, client: &BerlinClient) -> Result<(), CoreError> {
        let id = self.require_id()?;
        trace!(kind = %T::KIND, %id, "reloading record");
        self.attributes = client
            .get::<T>(&id)
            .await
            .map_err(|e| not_found_as(T::KIND.collection(), &id, e))?;
        self.errors.clear();
        Ok(())
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Fetch one entity by id.
    pub async fn find(client: &BerlinClient, id: &EntityId) -> Result<Self, CoreError> {
        debug!(kind = %T::KIND, %id, "finding record");
        let attributes = client
            .get::<T>(id)
            .await
            .map_err(|e| not_found_as(T::KIND.collection(), id, e))?;
        Ok(Self::new(attributes))
    }

    /// Fetch every entity matching `query`, in server order.
    pub async fn find_all(client: &BerlinClient, query: &Query) -> Result<Vec<Self>, CoreError> {
        debug!(kind = %T::KIND, params = ?query.params(), "finding records");
        let items = client.list::<T>(query).await?;
        Ok(items.into_iter().map(Self::new).collect())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn require_id(&self) -> Result<EntityId, CoreError> {
        self.id().cloned().ok_or_else(|| CoreError::MissingIdentity {
            entity_type: T::KIND.element().to_owned(),
        })
    }

    /// Fold a create/update outcome into the record.
    fn absorb(&mut self, outcome: Result<T, badgeville_api::Error>) -> Result<bool, CoreError> {
        match outcome {
            Ok(remote) => {
                self.merge(&remote)?;
                self.errors.clear();
                trace!(kind = %T::KIND, id = ?self.id(), "record saved");
                Ok(true)
            }
            Err(badgeville_api::Error::Validation(errors)) => {
                warn!(kind = %T::KIND, %errors, "save rejected");
                self.errors = errors;
                Ok(false)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Overlay the server's attributes onto the local ones.
    ///
    /// Server values win; attributes the server leaves out (write-only
    /// fields such as passwords) keep their local value.
    fn merge(&mut self, remote: &T) -> Result<(), CoreError> {
        let mut local = serde_json::to_value(&self.attributes)?;
        let remote = serde_json::to_value(remote)?;
        overlay(&mut local, remote);
        self.attributes = serde_json::from_value(local)?;
        Ok(())
    }
}

/// Shallow object merge: every top-level key in `remote` replaces `local`'s.
fn overlay(local: &mut Value, remote: Value) {
    match (local, remote) {
        (Value::Object(local), Value::Object(remote)) => {
            for (key, value) in remote {
                local.insert(key, value);
            }
        }
        (local, remote) => *local = remote,
    }
}

/// Attach the entity kind and id to not-found errors from a member request.
fn not_found_as(collection: &str, id: &EntityId, err: badgeville_api::Error) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: collection.to_owned(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.attributes
    }
}

impl<T> DerefMut for Record<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.attributes
    }
}

impl<T: Resource> From<T> for Record<T> {
    fn from(attributes: T) -> Self {
        Self::new(attributes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use badgeville_api::{ActivityDefinition, Adjustment, User};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn new_record_is_unsaved_and_clean() {
        let record = Record::new(User::new("v", "4d5dc61ed0c0b32b79000001", "v@e.com", "pw"));
        assert!(record.is_new());
        assert!(record.errors().is_empty());
        assert_eq!(record.name.as_deref(), Some("v"));
    }

    #[test]
    fn merge_keeps_fields_the_server_omits() {
        let mut record = Record::new(User::new("v", "4d5dc61ed0c0b32b79000001", "v@e.com", "pw"));
        let remote: User = serde_json::from_value(json!({
            "id": "4f0b53c4a768656d4f000001",
            "name": "v",
            "email": "v@e.com",
            "created_at": "2012-01-09T12:00:00-08:00"
        }))
        .unwrap();

        record.merge(&remote).unwrap();

        assert_eq!(record.id().unwrap().as_str(), "4f0b53c4a768656d4f000001");
        assert_eq!(record.password.as_deref(), Some("pw"));
        assert_eq!(
            record.extra.get("created_at"),
            Some(&json!("2012-01-09T12:00:00-08:00"))
        );
    }

    #[test]
    fn merge_takes_server_values_for_structured_fields() {
        let mut record = Record::new(ActivityDefinition::for_verb(
            "4f0b53c4a768656d4f000002",
            "Comment",
            "comment",
            4,
        ));
        let remote = ActivityDefinition {
            id: Some("4f0b53c4a768656d4f000003".into()),
            adjustment: Some(Adjustment::points(3)),
            verb: Some("comment".into()),
            ..ActivityDefinition::default()
        };

        record.merge(&remote).unwrap();

        assert_eq!(record.adjustment.as_ref().unwrap().points, Some(3));
        assert_eq!(record.verb.as_deref(), Some("comment"));
        assert_eq!(record.name.as_deref(), Some("Comment"));
        assert_eq!(
            record.selector.as_ref().unwrap().get("verb"),
            Some(&json!("comment"))
        );
    }

    #[test]
    fn absorb_validation_failure_attaches_errors() {
        let mut record = Record::new(User::new("v", "4d5dc61ed0c0b32b79000001", "v@e.com", "pw"));
        let errors: ValidationErrors = [("email", "user email is already taken")]
            .into_iter()
            .collect();

        let saved = record
            .absorb(Err(badgeville_api::Error::Validation(errors.clone())))
            .unwrap();

        assert!(!saved);
        assert_eq!(record.errors(), &errors);
        assert!(record.is_new());
    }

    #[test]
    fn absorb_success_clears_previous_errors() {
        let mut record = Record::new(User::new("v", "4d5dc61ed0c0b32b79000001", "v@e.com", "pw"));
        record.errors.add("email", "user email is already taken");

        let remote = User {
            id: Some("4f0b53c4a768656d4f000001".into()),
            ..User::default()
        };
        assert!(record.absorb(Ok(remote)).unwrap());
        assert!(record.errors().is_empty());
        assert!(!record.is_new());
    }

    #[test]
    fn absorb_transport_failure_is_an_error() {
        let mut record = Record::new(User::default());
        let result = record.absorb(Err(badgeville_api::Error::Timeout { timeout_secs: 30 }));
        assert!(matches!(result, Err(CoreError::Timeout { timeout_secs: 30 })));
    }

    #[test]
    fn overlay_replaces_non_objects() {
        let mut local = json!(1);
        overlay(&mut local, json!({"a": 1}));
        assert_eq!(local, json!({"a": 1}));
    }
}
