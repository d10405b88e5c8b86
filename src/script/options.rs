use std::fmt;
use std::rc::Rc;

use crate::container::GtmQueryParams;
use crate::dom::{Element, ScriptElement};

/// Passed to the `on_ready` hook once a container script has loaded.
#[derive(Clone, Debug)]
pub struct OnReadyOptions {
    /// The GTM id.
    pub id: String,
    /// The script element.
    pub script: ScriptElement,
}

pub type OnReady = Rc<dyn Fn(&OnReadyOptions)>;

/// Options for [`load_script`](crate::script::load_script).
#[derive(Clone, Default)]
pub struct LoadScriptOptions {
    /// Extra query parameters for `gtm.js`.
    pub query_params: Option<GtmQueryParams>,
    /// Load with `defer` instead of `async`.
    pub defer: bool,
    /// Set `defer` in addition to `async` for browsers without `async` support.
    pub compatibility: bool,
    /// MIME type written to the `type` attribute.
    pub script_type: Option<String>,
    /// CSP nonce written to the `nonce` attribute.
    pub nonce: Option<String>,
    /// Where to append the script element. Defaults to the document body.
    pub parent_element: Option<Element>,
    /// Script URL, for server-side GTM. Defaults to `https://www.googletagmanager.com/gtm.js`.
    pub source: Option<String>,
    /// Called once the script has loaded.
    pub on_ready: Option<OnReady>,
    /// Name of the event queue. Defaults to `dataLayer`.
    pub data_layer_name: Option<String>,
}

impl LoadScriptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defer(mut self, defer: bool) -> Self {
        self.defer = defer;
        self
    }

    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn with_query_params(mut self, params: GtmQueryParams) -> Self {
        self.query_params = Some(params);
        self
    }

    pub fn with_script_type(mut self, script_type: impl Into<String>) -> Self {
        self.script_type = Some(script_type.into());
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_parent_element(mut self, parent: Element) -> Self {
        self.parent_element = Some(parent);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_on_ready<F>(mut self, on_ready: F) -> Self
    where
        F: Fn(&OnReadyOptions) + 'static,
    {
        self.on_ready = Some(Rc::new(on_ready));
        self
    }

    pub fn with_data_layer_name(mut self, name: impl Into<String>) -> Self {
        self.data_layer_name = Some(name.into());
        self
    }
}

impl fmt::Debug for LoadScriptOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadScriptOptions")
            .field("query_params", &self.query_params)
            .field("defer", &self.defer)
            .field("compatibility", &self.compatibility)
            .field("script_type", &self.script_type)
            .field("nonce", &self.nonce)
            .field("parent_element", &self.parent_element)
            .field("source", &self.source)
            .field("on_ready", &self.on_ready.is_some())
            .field("data_layer_name", &self.data_layer_name)
            .finish()
    }
}
