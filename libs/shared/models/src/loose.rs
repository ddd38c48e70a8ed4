use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reads an explicit `null` the same way as a missing field. Pair with
/// `#[serde(default, deserialize_with = "null_as_default")]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A field the backend sends as text in some records and as a number (or a
/// small object) in others, e.g. `fees`, `experience`, `address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Text(String),
    Number(f64),
    Other(Value),
}

impl LooseValue {
    pub fn is_blank(&self) -> bool {
        match self {
            LooseValue::Text(s) => s.trim().is_empty(),
            LooseValue::Number(_) => false,
            LooseValue::Other(v) => v.is_null(),
        }
    }
}

impl fmt::Display for LooseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseValue::Text(s) => write!(f, "{}", s),
            LooseValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            LooseValue::Number(n) => write!(f, "{}", n),
            LooseValue::Other(Value::Object(map)) => {
                let parts: Vec<String> = map
                    .values()
                    .filter_map(|v| match v {
                        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
            LooseValue::Other(Value::Null) => Ok(()),
            LooseValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for LooseValue {
    fn from(s: &str) -> Self {
        LooseValue::Text(s.to_string())
    }
}
