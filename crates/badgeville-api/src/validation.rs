// Field-scoped validation messages reported by the server
//
// The Berlin API answers a rejected create/update with an `errors` member.
// Two shapes occur in the wild:
//
//   {"errors": {"email": ["user email is already taken"]}}
//   {"errors": [["email", "user email is already taken"], "base message"]}
//
// Both collapse into the same ordered field -> messages mapping. Bare
// strings with no field land under `base`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Field name used for messages that are not tied to an attribute.
pub const BASE_FIELD: &str = "base";

/// Ordered mapping from attribute name to the server's messages for it.
///
/// Field order and message order are preserved exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields carrying at least one message.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Messages for one attribute. Empty if the attribute has none.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Append a message to a field, keeping insertion order.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// The raw mapping.
    pub fn as_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.fields
    }

    /// Flattened `"<field> <message>"` lines; `base` messages stand alone.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| {
                    if field == BASE_FIELD {
                        message.clone()
                    } else {
                        format!("{field} {message}")
                    }
                })
            })
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no errors");
        }
        f.write_str(&self.full_messages().join("; "))
    }
}

impl<K, V> FromIterator<(K, V)> for ValidationErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

impl From<IndexMap<String, Vec<String>>> for ValidationErrors {
    fn from(fields: IndexMap<String, Vec<String>>) -> Self {
        Self { fields }
    }
}

// ── Wire decoding ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawErrors {
    Fields(IndexMap<String, OneOrMany>),
    Entries(Vec<RawEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Pair(String, String),
    Message(String),
}

impl<'de> Deserialize<'de> for ValidationErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut errors = Self::new();
        match RawErrors::deserialize(deserializer)? {
            RawErrors::Fields(fields) => {
                for (field, messages) in fields {
                    match messages {
                        OneOrMany::One(message) => errors.add(field, message),
                        OneOrMany::Many(messages) => {
                            for message in messages {
                                errors.add(field.clone(), message);
                            }
                        }
                    }
                }
            }
            RawErrors::Entries(entries) => {
                for entry in entries {
                    match entry {
                        RawEntry::Pair(field, message) => errors.add(field, message),
                        RawEntry::Message(message) => errors.add(BASE_FIELD, message),
                    }
                }
            }
        }
        Ok(errors)
    }
}
