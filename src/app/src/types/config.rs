use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key under which the device reports its firmware version.
///
/// It is read-only metadata and never part of the form.
pub const VERSION_KEY: &str = "version";

/// A single configuration value: one string or an ordered list of strings
/// (e.g. the four octets of a static IP address).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConfigValue {
    Single(String),
    Multiple(Vec<String>),
}

impl ConfigValue {
    /// Value as shown in a single text field.
    ///
    /// Lists are joined with commas, the way a browser stringifies them.
    pub fn as_text(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.join(","),
        }
    }

    /// Value for the `index`-th field sharing this name.
    pub fn at(&self, index: usize) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.get(index).cloned().unwrap_or_default(),
        }
    }

    /// Whether a checkbox/radio with the given declared value is selected.
    pub fn selects(&self, declared: &str) -> bool {
        match self {
            Self::Single(value) => value == declared,
            Self::Multiple(values) => values.iter().any(|v| v == declared),
        }
    }

    /// Append a value, turning a single value into a list.
    pub fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => *self = Self::Multiple(vec![std::mem::take(first), value]),
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Multiple(items.into_iter().map(scalar_text).collect()),
            other => Self::Single(scalar_text(other)),
        }
    }
}

// The device mixes strings, numbers and booleans in its JSON.
impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Device configuration: field name to value.
///
/// Submitted wholesale, never partially.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Configuration(BTreeMap<String, ConfigValue>);

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Firmware version reported alongside the configuration.
    pub fn version(&self) -> Option<String> {
        self.get(VERSION_KEY)
            .map(ConfigValue::as_text)
            .filter(|v| !v.is_empty())
    }

    /// Editable fields, i.e. everything except the version metadata.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.iter().filter(|(name, _)| name.as_str() != VERSION_KEY)
    }
}

impl FromIterator<(String, ConfigValue)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Configuration synchronization state
///
/// ```text
/// Idle -> Loading -> Loaded -> Submitting -> AwaitingRestart -> Reconnecting -> Idle
///                      ^           |
///                      +-----------+  (validation or request failure)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Submitting,
    AwaitingRestart,
    Reconnecting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_scalars_are_normalised_to_strings() {
        let config: Configuration = serde_json::from_str(
            r#"{"port": 2101, "active": true, "off": false, "host": "caster", "none": null,
                "ip": [192, "168", 4, 1], "version": "1.2.3"}"#,
        )
        .unwrap();

        assert_eq!(config.get("port"), Some(&ConfigValue::from("2101")));
        assert_eq!(config.get("active"), Some(&ConfigValue::from("1")));
        assert_eq!(config.get("off"), Some(&ConfigValue::from("0")));
        assert_eq!(config.get("none"), Some(&ConfigValue::from("")));
        assert_eq!(
            config.get("ip"),
            Some(&ConfigValue::Multiple(vec![
                "192".into(),
                "168".into(),
                "4".into(),
                "1".into()
            ]))
        );
        assert_eq!(config.version().as_deref(), Some("1.2.3"));
        assert_eq!(config.fields().count(), 6);
    }

    #[test]
    fn serializes_as_flat_map() {
        let mut config = Configuration::new();
        config.insert("w_ap_active", "0");
        config.insert(
            "w_sta_ip",
            ConfigValue::Multiple(vec!["10".into(), "0".into(), "0".into(), "2".into()]),
        );

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"w_ap_active": "0", "w_sta_ip": ["10", "0", "0", "2"]})
        );
    }

    #[test]
    fn push_turns_single_into_list() {
        let mut value = ConfigValue::from("a");
        value.push("b".to_string());
        value.push("c".to_string());
        assert_eq!(
            value,
            ConfigValue::Multiple(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(value.at(1), "b");
        assert_eq!(value.at(5), "");
        assert!(value.selects("c"));
    }
}
