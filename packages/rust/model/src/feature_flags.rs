//! Feature-flag entries and their merged key/value view.
//!
//! A feature-flag entry carries typed lists (`boolean_config`,
//! `numbers_config`, `strings_configs`, `string_lists`, plus the structured
//! `single_object` and `json_list`). Consumers only see the flat
//! `mergedConfig` map built from the first four; the raw lists are accepted on
//! input and never serialized back out.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::debug;

/// Flat view of every keyed config value.
pub type MergedConfig = BTreeMap<String, ConfigValue>;

/// One merged value. Numbers stay as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
    Null,
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Typed list items
// ---------------------------------------------------------------------------
//
// Upstream is loose about scalar types: numbers arrive as strings or bare
// numbers, booleans occasionally as strings, lists with null holes. Each value
// decodes leniently so one odd element never fails the whole entry.

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BooleanConfig {
    pub key: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub value: Option<bool>,
}

/// The value keeps the exact token text, so `1.50` stays `"1.50"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumberConfig {
    pub key: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StringConfig {
    pub key: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StringListConfig {
    pub key: Option<String>,
    /// Null items are dropped.
    #[serde(deserialize_with = "text_list")]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryItem {
    pub key: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleObjectConfig {
    pub key: Option<String>,
    pub category: Option<Vec<CategoryItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonListItem {
    pub key: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonListConfig {
    pub key: Option<String>,
    pub list_items: Option<Vec<JsonListItem>>,
}

/// Raw config lists of a feature-flag entry. Null list elements are kept
/// as `None` and skipped when merging.
///
/// Scalars are captured as raw JSON tokens, so these types decode from JSON
/// text (`serde_json::from_str`/`from_slice`), not from a `serde_json::Value`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigLists {
    pub boolean_config: Option<Vec<Option<BooleanConfig>>>,
    pub numbers_config: Option<Vec<Option<NumberConfig>>>,
    pub strings_configs: Option<Vec<Option<StringConfig>>>,
    pub string_lists: Option<Vec<Option<StringListConfig>>>,
    pub single_object: Option<Vec<Option<SingleObjectConfig>>>,
    pub json_list: Option<Vec<Option<JsonListConfig>>>,
}

// ---------------------------------------------------------------------------
// Lenient scalars
// ---------------------------------------------------------------------------

/// One scalar token as text; `None` for null.
struct ScalarText(Option<String>);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Some(raw) = Option::<Box<RawValue>>::deserialize(deserializer)? else {
            return Ok(ScalarText(None));
        };
        let token = raw.get().trim();
        match token.as_bytes().first() {
            Some(b'"') => serde_json::from_str(token)
                .map(|text| ScalarText(Some(text)))
                .map_err(D::Error::custom),
            Some(b'{' | b'[') => Err(D::Error::custom(format!(
                "expected a string, number or boolean, found {token}"
            ))),
            Some(_) => Ok(ScalarText(Some(token.to_string()))),
            None => Ok(ScalarText(None)),
        }
    }
}

/// Accept a string, number or boolean and keep its literal text.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    ScalarText::deserialize(deserializer).map(|scalar| scalar.0)
}

fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    let items = Option::<Vec<ScalarText>>::deserialize(deserializer)?;
    Ok(items.map(|items| items.into_iter().filter_map(|item| item.0).collect()))
}

/// Booleans, `"true"`/`"false"` in any case, `0`/`1`. Blank strings are null.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.trim() {
            "" => Ok(None),
            t if t.eq_ignore_ascii_case("true") => Ok(Some(true)),
            t if t.eq_ignore_ascii_case("false") => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("expected a boolean, found {s:?}"))),
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(D::Error::custom(format!("expected a boolean, found {n}"))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a boolean, found {other}"))),
    }
}

fn present<T>(list: &Option<Vec<Option<T>>>) -> impl Iterator<Item = &T> {
    list.iter().flatten().flatten()
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Fold the four flat lists into one map.
///
/// Kinds are applied boolean, number, string, string-list; entries within a
/// kind in list order. A key seen twice keeps the last value. Entries without
/// a key are skipped; entries without a value store [`ConfigValue::Null`].
pub fn merge(lists: &ConfigLists) -> MergedConfig {
    let booleans = present(&lists.boolean_config).map(|c| {
        let value = c.value.map_or(ConfigValue::Null, ConfigValue::Bool);
        (c.key.as_deref(), value)
    });
    let numbers = present(&lists.numbers_config).map(|c| (c.key.as_deref(), text_value(&c.value)));
    let strings = present(&lists.strings_configs).map(|c| (c.key.as_deref(), text_value(&c.value)));
    let string_lists = present(&lists.string_lists).map(|c| {
        let value = c.values.clone().map_or(ConfigValue::Null, ConfigValue::List);
        (c.key.as_deref(), value)
    });

    let mut merged = MergedConfig::new();
    for (key, value) in booleans.chain(numbers).chain(strings).chain(string_lists) {
        if let Some(key) = key {
            merged.insert(key.to_string(), value);
        }
    }

    debug!(keys = merged.len(), "merged feature flag config");
    merged
}

fn text_value(value: &Option<String>) -> ConfigValue {
    value.clone().map_or(ConfigValue::Null, ConfigValue::Text)
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A feature-flag entry. Serializes as `{"mergedConfig": {...}}` only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "ConfigLists")]
pub struct FeatureFlagConfig {
    lists: ConfigLists,
    merged: OnceLock<MergedConfig>,
}

impl From<ConfigLists> for FeatureFlagConfig {
    fn from(lists: ConfigLists) -> Self {
        Self {
            lists,
            merged: OnceLock::new(),
        }
    }
}

impl FeatureFlagConfig {
    pub fn lists(&self) -> &ConfigLists {
        &self.lists
    }

    /// The merged view, computed on first access and shared afterwards.
    pub fn merged_config(&self) -> &MergedConfig {
        self.merged.get_or_init(|| merge(&self.lists))
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.merged_config().get(key)
    }

    /// Boolean flag value; `None` when absent, null or not a boolean.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn single_objects(&self) -> impl Iterator<Item = &SingleObjectConfig> {
        present(&self.lists.single_object)
    }

    pub fn json_lists(&self) -> impl Iterator<Item = &JsonListConfig> {
        present(&self.lists.json_list)
    }
}

impl Serialize for FeatureFlagConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FeatureFlagConfig", 1)?;
        state.serialize_field("mergedConfig", self.merged_config())?;
        state.end()
    }
}
