use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Object within the `dataLayer`.
///
/// An open key/value record; the optional `event` key names the GTM custom event it triggers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataLayerObject(Map<String, Value>);

impl DataLayerObject {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Creates a record whose `event` key is set to `event`.
    pub fn event_named(event: impl Into<String>) -> Self {
        let mut object = Self::new();
        object.set_event(event);
        object
    }

    /// Builds a record from a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn event(&self) -> Option<&str> {
        self.0.get("event").and_then(Value::as_str)
    }

    pub fn set_event(&mut self, event: impl Into<String>) {
        self.0.insert("event".to_string(), Value::String(event.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder flavour of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Copies every entry of `other` into this record, overwriting existing keys.
    pub fn extend(&mut self, other: Map<String, Value>) {
        self.0.extend(other);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for DataLayerObject {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl From<DataLayerObject> for Value {
    fn from(value: DataLayerObject) -> Self {
        Value::Object(value.0)
    }
}

impl<K, V> FromIterator<(K, V)> for DataLayerObject
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
