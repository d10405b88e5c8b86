//! Injection of the GTM loader script.

mod options;

pub use options::{LoadScriptOptions, OnReady, OnReadyOptions};

use chrono::Utc;
use url::form_urlencoded;

use crate::constants::{DEFAULT_DATA_LAYER_NAME, DEFAULT_SOURCE, GTM_START_EVENT, GTM_START_KEY};
use crate::container::GtmQueryParams;
use crate::data_layer::{get_or_initialize_data_layer, DataLayerObject};
use crate::dom::ScriptElement;
use crate::error::{invalid_parent_element, GtmResult};
use crate::host::Host;

/// Loads the GTM script for container `id`.
///
/// The event queue is created if needed and receives the `gtm.js` start event even when `id`
/// is empty; in that case the returned script is inert (no `src`, not attached). Otherwise the
/// script is appended under `options.parent_element`, or the body when unset.
///
/// Fails with `gtm/invalid-parent-element` when the insertion point cannot take children or the
/// document has no body.
pub fn load_script(host: &Host, id: &str, options: &LoadScriptOptions) -> GtmResult<ScriptElement> {
    let document = host.document();
    let script = document.create_script()?;

    if let Some(on_ready) = options.on_ready.clone() {
        let id = id.to_string();
        script.set_load_listener(Box::new(move |script: &ScriptElement| {
            on_ready(&OnReadyOptions {
                id,
                script: script.clone(),
            });
        }));
    }

    let data_layer_name = options
        .data_layer_name
        .as_deref()
        .unwrap_or(DEFAULT_DATA_LAYER_NAME);
    let data_layer = get_or_initialize_data_layer(host.global(), Some(data_layer_name));
    data_layer.push(
        DataLayerObject::event_named(GTM_START_EVENT)
            .with(GTM_START_KEY, Utc::now().timestamp_millis()),
    );

    if id.is_empty() {
        return Ok(script);
    }

    script.set_async(!options.defer);
    script.set_defer(options.defer || options.compatibility);

    if let Some(nonce) = options.nonce.as_deref().filter(|nonce| !nonce.is_empty()) {
        script.set_nonce(nonce);
    }

    if let Some(script_type) = options
        .script_type
        .as_deref()
        .filter(|script_type| !script_type.is_empty())
    {
        script.set_script_type(script_type);
    }

    let source = options.source.as_deref().unwrap_or(DEFAULT_SOURCE);
    script.set_src(&build_source_url(
        source,
        id,
        data_layer_name,
        options.query_params.as_ref(),
    ));

    let parent = match options.parent_element.clone() {
        Some(parent) => parent,
        None => document
            .body()
            .ok_or_else(|| invalid_parent_element("parentElement must be a DOM element"))?,
    };
    parent.append_child(&script)?;

    log::debug!("injected GTM script {}", script.src());
    Ok(script)
}

/// Builds `{source}?id={id}&l={data_layer_name}&{query params}`, form-encoding every value.
pub fn build_source_url(
    source: &str,
    id: &str,
    data_layer_name: &str,
    query_params: Option<&GtmQueryParams>,
) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("id", id);
    query.append_pair("l", data_layer_name);
    if let Some(params) = query_params {
        for (key, value) in params.pairs() {
            query.append_pair(key, value);
        }
    }
    format!("{source}?{}", query.finish())
}

/// Checks whether a script whose `src` contains `source` is in the document.
///
/// `source` defaults to `https://www.googletagmanager.com/gtm.js`.
pub fn has_script(host: &Host, source: Option<&str>) -> bool {
    let source = source.unwrap_or(DEFAULT_SOURCE);
    host.document()
        .scripts()
        .iter()
        .any(|script| script.src().contains(source))
}
