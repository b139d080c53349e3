use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

pub(crate) mod auth;
pub(crate) mod class;
pub(crate) mod lesson;
pub(crate) mod question;
pub(crate) mod unit;

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteResponse {
    pub(crate) success: bool,
    pub(crate) message: &'static str,
}

/// Accept ids both as JSON numbers and as numeric strings; the admin client
/// submits `<select>` values, which arrive as strings.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => {
            value.trim().parse::<i64>().map_err(serde::de::Error::custom)
        }
    }
}

pub(crate) fn lenient_i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeNumber {
        Number(i64),
        String(String),
        Null,
    }

    match Option::<MaybeNumber>::deserialize(deserializer)? {
        None | Some(MaybeNumber::Null) => Ok(None),
        Some(MaybeNumber::Number(value)) => Ok(Some(value)),
        Some(MaybeNumber::String(value)) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed.parse::<i64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "super::lenient_i64")]
        id: i64,
        #[serde(default, deserialize_with = "super::lenient_i64_opt")]
        parent_id: Option<i64>,
    }

    #[test]
    fn lenient_i64_accepts_numbers_and_strings() {
        let numeric: Payload = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(numeric.id, 3);

        let stringy: Payload = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(stringy.id, 7);

        assert!(serde_json::from_str::<Payload>(r#"{"id": "abc"}"#).is_err());
    }

    #[test]
    fn lenient_i64_opt_treats_empty_as_missing() {
        let missing: Payload = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(missing.parent_id, None);

        let empty: Payload = serde_json::from_str(r#"{"id": 1, "parent_id": ""}"#).unwrap();
        assert_eq!(empty.parent_id, None);

        let given: Payload = serde_json::from_str(r#"{"id": 1, "parent_id": "5"}"#).unwrap();
        assert_eq!(given.parent_id, Some(5));
    }
}
