use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_TRACK_EVENT, DEFAULT_TRACK_VIEW_EVENT};
use crate::data_layer::DataLayerObject;

/// Fields of an interaction event sent through
/// [`GtmSupport::track_event`](crate::support::GtmSupport::track_event).
///
/// Keys that are not one of the named fields go to `rest` and are copied into the record last,
/// so they override the generated keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackEventOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Pushed as `target`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    /// Pushed as `target-properties`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Pushed as `interaction-type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noninteraction: Option<bool>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl TrackEventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<Value>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<Value>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<Value>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_noninteraction(mut self, noninteraction: bool) -> Self {
        self.noninteraction = Some(noninteraction);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rest.insert(key.into(), value.into());
        self
    }

    /// The fields as passed in, for debug output.
    pub(crate) fn debug_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert(
            "event".into(),
            self.event.clone().map(Value::String).unwrap_or(Value::Null),
        );
        payload.insert("category".into(), or_null(&self.category));
        payload.insert("action".into(), or_null(&self.action));
        payload.insert("label".into(), or_null(&self.label));
        payload.insert("value".into(), or_null(&self.value));
        payload.extend(self.rest.clone());
        Value::Object(payload)
    }

    /// The record pushed to the data layer.
    pub(crate) fn into_record(self) -> DataLayerObject {
        let mut record = DataLayerObject::event_named(
            self.event.unwrap_or_else(|| DEFAULT_TRACK_EVENT.to_string()),
        )
        .with("target", self.category.unwrap_or(Value::Null))
        .with("action", self.action.unwrap_or(Value::Null))
        .with("target-properties", self.label.unwrap_or(Value::Null))
        .with("value", self.value.unwrap_or(Value::Null))
        .with("interaction-type", self.noninteraction.unwrap_or(false));
        record.extend(self.rest);
        record
    }
}

fn or_null(value: &Option<Value>) -> Value {
    value.clone().unwrap_or(Value::Null)
}

/// Builds a `track_view` record; `event`, `content-name` and `content-view-name` always win
/// over `additional`.
pub(crate) fn view_record(
    screen_name: &str,
    path: &str,
    additional: Option<DataLayerObject>,
    event: Option<&str>,
) -> DataLayerObject {
    let mut record = additional.unwrap_or_default();
    record.set_event(event.unwrap_or(DEFAULT_TRACK_VIEW_EVENT));
    record.insert("content-name", path);
    record.insert("content-view-name", screen_name);
    record
}
