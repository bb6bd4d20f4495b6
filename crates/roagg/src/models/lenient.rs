//! Forgiving field deserializers for registry JSON.
//!
//! Registries are loose with types: years arrive as `2021` or `"2021"`,
//! counters as numbers or strings, lists as `null`, nested objects as bare
//! strings. A field that cannot be read becomes absent rather than failing
//! the whole record; a list keeps the elements it can read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Optional integer from a number or a numeric string.
pub fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64).and_then(|n| i32::try_from(n).ok()))
}

/// Optional non-negative integer from a number or a numeric string.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64).and_then(|n| u32::try_from(n).ok()))
}

/// Optional counter from a number or a numeric string.
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64).and_then(|n| u64::try_from(n).ok()))
}

/// Optional string; numbers are stringified, blanks and other types dropped.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// List that may be `null` or not a list at all. Unreadable elements are dropped.
pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect())
}

/// Optional nested object; a value of the wrong shape becomes `None`.
pub fn opt_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Pair {
        key: String,
    }

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "super::opt_i32")]
        year: Option<i32>,
        #[serde(default, deserialize_with = "super::opt_u64")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "super::opt_string")]
        label: Option<String>,
        #[serde(default, deserialize_with = "super::vec")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "super::vec")]
        pairs: Vec<Pair>,
        #[serde(default, deserialize_with = "super::opt_struct")]
        nested: Option<Pair>,
    }

    fn fields(json: serde_json::Value) -> Fields {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        let p = fields(serde_json::json!({"year": "2021", "count": 42}));
        assert_eq!(p.year, Some(2021));
        assert_eq!(p.count, Some(42));
    }

    #[test]
    fn test_garbage_becomes_absent() {
        let p = fields(serde_json::json!({"year": "n/a", "count": -1, "label": "  ", "items": null}));
        assert_eq!(p.year, None);
        assert_eq!(p.count, None);
        assert_eq!(p.label, None);
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let p = fields(serde_json::json!({}));
        assert!(p.year.is_none() && p.count.is_none() && p.label.is_none());
        assert!(p.pairs.is_empty() && p.nested.is_none());
    }

    #[test]
    fn test_list_keeps_readable_elements() {
        let p = fields(serde_json::json!({
            "items": ["a", 7, null, "b"],
            "pairs": [{"key": "x"}, "garbage", {"other": 1}, {"key": "y"}]
        }));
        assert_eq!(p.items, vec!["a", "b"]);
        let keys: Vec<&str> = p.pairs.iter().map(|pair| pair.key.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_wrong_shapes_become_absent() {
        let p = fields(serde_json::json!({"items": "a", "pairs": {"key": "x"}, "nested": "Dataset"}));
        assert!(p.items.is_empty());
        assert!(p.pairs.is_empty());
        assert!(p.nested.is_none());

        let p = fields(serde_json::json!({"nested": {"key": "x"}}));
        assert_eq!(p.nested.map(|pair| pair.key).as_deref(), Some("x"));
    }
}
