//! Serde helper functions for request payload deserialization.
//!
//! HTML forms and loosely typed clients submit empty strings for fields the
//! user left blank; these helpers fold those into `None`.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
    }

    #[test]
    fn test_empty_string_becomes_none() {
        let result: TestStruct = serde_json::from_str(r#"{"string_field": ""}"#).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_whitespace_becomes_none() {
        let result: TestStruct = serde_json::from_str(r#"{"string_field": "   "}"#).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_value_is_kept() {
        let result: TestStruct = serde_json::from_str(r#"{"string_field": "hello"}"#).unwrap();
        assert_eq!(result.string_field, Some("hello".to_string()));
    }

    #[test]
    fn test_missing_field_is_none() {
        let result: TestStruct = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(result.string_field, None);
    }
}
