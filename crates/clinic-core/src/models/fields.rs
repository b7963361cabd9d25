//! Serde helpers for the persisted JSON layout.
//!
//! Older stored data writes blank form fields as `""` and durations as
//! strings, so deserialization is lenient about both.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Map blank or whitespace-only text to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Deserialize an optional string, treating `""` as absent.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(normalize_optional(value))
}

/// Deserialize an optional value from its string form, treating `""` as absent.
pub(crate) fn blank_as_none_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match normalize_optional(value) {
        Some(s) => s.trim().parse().map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u32),
    Text(String),
}

/// Deserialize a minute count stored either as a number or a numeric string.
///
/// A blank string falls back to `default`.
pub(crate) fn minutes_with_default<'de, D>(deserializer: D, default: u32) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) if s.trim().is_empty() => Ok(default),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid minute count: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("".into())), None);
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(
            normalize_optional(Some("ann@example.com".into())),
            Some("ann@example.com".into())
        );
    }

    #[derive(Deserialize)]
    struct Minutes {
        #[serde(deserialize_with = "thirty_by_default")]
        value: u32,
    }

    fn thirty_by_default<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        minutes_with_default(d, 30)
    }

    #[test]
    fn test_minutes_number_or_string() {
        let m: Minutes = serde_json::from_str(r#"{"value": 45}"#).unwrap();
        assert_eq!(m.value, 45);

        let m: Minutes = serde_json::from_str(r#"{"value": "60"}"#).unwrap();
        assert_eq!(m.value, 60);

        let m: Minutes = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert_eq!(m.value, 30);

        assert!(serde_json::from_str::<Minutes>(r#"{"value": "soon"}"#).is_err());
    }
}
