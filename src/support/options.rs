//! Options accepted by [`GtmSupport`](crate::support::GtmSupport).
//!
//! [`GtmSupportOptions`] mirrors the options object of the JavaScript plugin, with the same
//! camelCase keys when deserialized, so a configuration can be shared between a JS front-end and
//! a Rust one. [`GtmSupportSettings`] is the resolved form with every default applied.

use std::env;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_DATA_LAYER_NAME, OPTIONS_ENV_VAR};
use crate::container::{ContainerIds, GtmQueryParams};
use crate::error::{invalid_options, GtmError, GtmResult};
use crate::script::LoadScriptOptions;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmSupportOptions {
    /// A container id, a list of ids, or a list of `{ id, queryParams }` entries.
    pub id: ContainerIds,
    /// Query parameters for every plain id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<GtmQueryParams>,
    /// Load with `defer` instead of `async`. Defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer: Option<bool>,
    /// Add `defer` next to `async` for old browsers. Defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Script URL, useful for server-side GTM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// MIME type for the injected script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
    /// Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Log every dispatched event. Defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    /// Inject the GTM script on `enable`. Turn off when GTM is included by other means but the
    /// data layer is still needed. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_script: Option<bool>,
    /// Defaults to `dataLayer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_layer_name: Option<String>,
    /// `event` value used by `track_view`. Defaults to `content-view`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_view_event_property: Option<String>,
}

impl GtmSupportOptions {
    pub fn new(id: impl Into<ContainerIds>) -> Self {
        Self {
            id: id.into(),
            query_params: None,
            defer: None,
            compatibility: None,
            nonce: None,
            source: None,
            script_type: None,
            enabled: None,
            debug: None,
            load_script: None,
            data_layer_name: None,
            track_view_event_property: None,
        }
    }

    /// Parses options from a JSON object using the JavaScript option names.
    ///
    /// Ids of the wrong type or shape fail with `gtm/invalid-id`; any other mismatch fails with
    /// `gtm/invalid-options`.
    pub fn from_json(raw: &str) -> GtmResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(parse_error)?;
        if let Some(id) = value.get("id") {
            ContainerIds::assert_value(id)?;
        }
        serde_json::from_value(value).map_err(parse_error)
    }

    /// Reads options from the JSON object in `GTM_SUPPORT_OPTIONS`.
    ///
    /// Returns `Ok(None)` when the variable is unset or blank.
    pub fn from_env() -> GtmResult<Option<Self>> {
        match env::var(OPTIONS_ENV_VAR) {
            Ok(raw) if !raw.trim().is_empty() => Self::from_json(&raw).map(Some),
            _ => Ok(None),
        }
    }

    pub fn with_query_params(mut self, params: GtmQueryParams) -> Self {
        self.query_params = Some(params);
        self
    }

    pub fn with_defer(mut self, defer: bool) -> Self {
        self.defer = Some(defer);
        self
    }

    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = Some(compatibility);
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_script_type(mut self, script_type: impl Into<String>) -> Self {
        self.script_type = Some(script_type.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_load_script(mut self, load_script: bool) -> Self {
        self.load_script = Some(load_script);
        self
    }

    pub fn with_data_layer_name(mut self, name: impl Into<String>) -> Self {
        self.data_layer_name = Some(name.into());
        self
    }

    pub fn with_track_view_event_property(mut self, event: impl Into<String>) -> Self {
        self.track_view_event_property = Some(event.into());
        self
    }

    /// Splits the options into the container ids and the resolved settings.
    pub(crate) fn resolve(self) -> (ContainerIds, GtmSupportSettings) {
        let settings = GtmSupportSettings {
            enabled: self.enabled.unwrap_or(true),
            debug: self.debug.unwrap_or(false),
            load_script: self.load_script.unwrap_or(true),
            defer: self.defer.unwrap_or(false),
            compatibility: self.compatibility.unwrap_or(false),
            data_layer_name: self
                .data_layer_name
                .unwrap_or_else(|| DEFAULT_DATA_LAYER_NAME.to_string()),
            query_params: self.query_params,
            nonce: self.nonce,
            source: self.source,
            script_type: self.script_type,
            track_view_event_property: self.track_view_event_property,
        };
        (self.id, settings)
    }
}

fn parse_error(err: serde_json::Error) -> GtmError {
    invalid_options(format!("Failed to parse GTM options: {err}"))
}

/// Options with defaults applied, minus the container ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GtmSupportSettings {
    pub enabled: bool,
    pub debug: bool,
    pub load_script: bool,
    pub defer: bool,
    pub compatibility: bool,
    pub data_layer_name: String,
    pub query_params: Option<GtmQueryParams>,
    pub nonce: Option<String>,
    pub source: Option<String>,
    pub script_type: Option<String>,
    pub track_view_event_property: Option<String>,
}

impl GtmSupportSettings {
    /// Script options for one container loaded with `query_params`.
    pub(crate) fn load_script_options(
        &self,
        query_params: Option<GtmQueryParams>,
    ) -> LoadScriptOptions {
        LoadScriptOptions {
            query_params,
            defer: self.defer,
            compatibility: self.compatibility,
            script_type: self.script_type.clone(),
            nonce: self.nonce.clone(),
            parent_element: None,
            source: self.source.clone(),
            on_ready: None,
            data_layer_name: Some(self.data_layer_name.clone()),
        }
    }
}
