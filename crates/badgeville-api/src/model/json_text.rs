// Structured attributes carried as JSON text
//
// Selectors, adjustments, reward templates and reward components are JSON
// documents, but the Berlin API takes them as string-valued parameters
// (`"adjustment": "{\"points\":4}"`). Responses echo them back either as
// the same text or as inline JSON depending on the endpoint, so decoding
// accepts both. Use with `#[serde(with = "json_text")]` or
// `#[serde(with = "json_text::option")]`.

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Text(String),
    Inline(serde_json::Value),
}

impl Payload {
    fn decode<T: DeserializeOwned, E: serde::de::Error>(self) -> Result<T, E> {
        match self {
            Self::Text(text) => serde_json::from_str(&text).map_err(E::custom),
            Self::Inline(value) => serde_json::from_value(value).map_err(E::custom),
        }
    }
}

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let text = serde_json::to_string(value).map_err(S::Error::custom)?;
    serializer.serialize_str(&text)
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    Payload::deserialize(deserializer)?.decode()
}

pub mod option {
    use super::{DeserializeOwned, Deserialize, Deserializer, Payload, Serialize, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        Option::<Payload>::deserialize(deserializer)?
            .map(Payload::decode)
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Points {
        points: i64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super")]
        rule: Points,
        #[serde(default, with = "super::option", skip_serializing_if = "Option::is_none")]
        extra: Option<Points>,
    }

    #[test]
    fn encodes_as_text() {
        let holder = Holder {
            rule: Points { points: 4 },
            extra: None,
        };
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            json!({"rule": "{\"points\":4}"})
        );
    }

    #[test]
    fn decodes_text_or_inline() {
        let from_text: Holder =
            serde_json::from_value(json!({"rule": "{\"points\":3}"})).unwrap();
        let from_inline: Holder = serde_json::from_value(json!({
            "rule": {"points": 3},
            "extra": {"points": 1}
        }))
        .unwrap();

        assert_eq!(from_text.rule, Points { points: 3 });
        assert_eq!(from_inline.rule, Points { points: 3 });
        assert_eq!(from_inline.extra, Some(Points { points: 1 }));
    }

    #[test]
    fn null_decodes_to_none() {
        let holder: Holder =
            serde_json::from_value(json!({"rule": {"points": 1}, "extra": null})).unwrap();
        assert_eq!(holder.extra, None);
    }

    #[test]
    fn malformed_text_is_an_error() {
        let result = serde_json::from_value::<Holder>(json!({"rule": "{points"}));
        assert!(result.is_err());
    }
}
