//! Tolerant readers for numeric fields that older records stored as text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON number or a numeric string; anything else reads as `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Like [`number`], for non-negative whole counts.
pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        ph: Option<f64>,
        #[serde(default, deserialize_with = "count")]
        clones: Option<u32>,
    }

    fn probe(value: Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_numbers_and_numeric_strings() {
        assert_eq!(probe(json!({ "ph": 6.2 })).ph, Some(6.2));
        assert_eq!(probe(json!({ "ph": " 5.8 " })).ph, Some(5.8));
    }

    #[test]
    fn null_missing_and_garbage_read_as_none() {
        assert_eq!(probe(json!({ "ph": null })).ph, None);
        assert_eq!(probe(json!({})).ph, None);
        assert_eq!(probe(json!({ "ph": "" })).ph, None);
        assert_eq!(probe(json!({ "ph": true })).ph, None);
    }

    #[test]
    fn counts_reject_fractions_and_negatives() {
        assert_eq!(probe(json!({ "clones": "12" })).clones, Some(12));
        assert_eq!(probe(json!({ "clones": 2.5 })).clones, None);
        assert_eq!(probe(json!({ "clones": -1 })).clones, None);
    }
}
