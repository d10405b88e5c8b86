//! The [`GtmSupport`] facade: validated configuration, script injection on `enable`, and gated
//! event dispatch to the data layer.

mod options;
mod track;

pub use options::{GtmSupportOptions, GtmSupportSettings};
pub use track::TrackEventOptions;

use std::fmt;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::constants::LOGGER_NAME;
use crate::container::{ContainerIds, ContainerTarget};
use crate::data_layer::{DataLayer, DataLayerObject};
use crate::dom::ScriptElement;
use crate::error::GtmResult;
use crate::host::Host;
use crate::logger::Logger;
use crate::script::{has_script, load_script};

type BrowserContextCheck = Rc<dyn Fn() -> bool>;

/// Google Tag Manager integration for one set of containers.
///
/// Holds `Rc` handles into the host document, so it is neither `Send` nor `Sync`.
pub struct GtmSupport {
    id: ContainerIds,
    targets: Vec<ContainerTarget>,
    settings: GtmSupportSettings,
    script_elements: Vec<ScriptElement>,
    host: Option<Host>,
    browser_context_check: Option<BrowserContextCheck>,
    logger: Logger,
}

impl GtmSupport {
    /// Validates every configured id and binds the host of the current runtime, if any.
    ///
    /// Fails with `gtm/invalid-id` for the first id that does not look like `GTM-XXXX` or
    /// `G-XXXX`.
    pub fn new(options: GtmSupportOptions) -> GtmResult<Self> {
        Self::build(options, Host::detect())
    }

    /// Like [`GtmSupport::new`], operating on `host` instead of the detected one.
    pub fn with_host(options: GtmSupportOptions, host: Host) -> GtmResult<Self> {
        Self::build(options, Some(host))
    }

    fn build(options: GtmSupportOptions, host: Option<Host>) -> GtmResult<Self> {
        let (id, settings) = options.resolve();
        let targets = id.targets(settings.query_params.as_ref())?;
        Ok(Self {
            id,
            targets,
            settings,
            script_elements: Vec::new(),
            host,
            browser_context_check: None,
            logger: Logger::new(LOGGER_NAME),
        })
    }

    /// The container id(s) as configured.
    pub fn id(&self) -> &ContainerIds {
        &self.id
    }

    pub fn options(&self) -> &GtmSupportSettings {
        &self.settings
    }

    /// Scripts injected by [`GtmSupport::enable`], in configuration order.
    pub fn script_elements(&self) -> &[ScriptElement] {
        &self.script_elements
    }

    pub fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Whether the facade runs inside a page. By default, whether a host is bound.
    pub fn is_in_browser_context(&self) -> bool {
        match &self.browser_context_check {
            Some(check) => check(),
            None => self.host.is_some(),
        }
    }

    /// Replaces the strategy behind [`GtmSupport::is_in_browser_context`].
    ///
    /// Returning `true` without a bound host still leaves every operation a no-op.
    pub fn set_browser_context_check<F>(&mut self, check: F)
    where
        F: Fn() -> bool + 'static,
    {
        self.browser_context_check = Some(Rc::new(check));
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Enables or disables dispatching.
    ///
    /// Enabling also injects one script per configured container when running in a page, when
    /// no script whose URL contains `source` (default `gtm.js` on googletagmanager.com) is
    /// present yet, and when `load_script` is on.
    pub fn enable(&mut self, enabled: bool, source: Option<&str>) -> GtmResult<()> {
        self.settings.enabled = enabled;

        if !(self.is_in_browser_context() && enabled && self.settings.load_script) {
            return Ok(());
        }
        let Some(host) = self.host.clone() else {
            return Ok(());
        };
        if has_script(&host, source) {
            return Ok(());
        }

        for target in &self.targets {
            let options = self
                .settings
                .load_script_options(target.query_params.clone());
            let script = load_script(&host, target.id.as_str(), &options)?;
            self.script_elements.push(script);
        }
        Ok(())
    }

    pub fn debug_enabled(&self) -> bool {
        self.settings.debug
    }

    pub fn debug(&mut self, enable: bool) {
        self.settings.debug = enable;
    }

    /// The event queue, when running in a page with dispatching enabled.
    pub fn data_layer(&self) -> Option<DataLayer> {
        self.active_host().map(|host| {
            host.global()
                .get_or_initialize_data_layer(&self.settings.data_layer_name)
        })
    }

    /// Pushes a page view.
    ///
    /// `event`, `content-name` and `content-view-name` always override the same keys in
    /// `additional`.
    pub fn track_view(&self, screen_name: &str, path: &str, additional: Option<DataLayerObject>) {
        self.log_dispatch(
            "Dispatching TrackView",
            json!({ "screenName": screen_name, "path": path }),
        );
        if let Some(data_layer) = self.data_layer() {
            data_layer.push(track::view_record(
                screen_name,
                path,
                additional,
                self.settings.track_view_event_property.as_deref(),
            ));
        }
    }

    /// Pushes an interaction event; see [`TrackEventOptions`] for the record layout.
    pub fn track_event(&self, options: TrackEventOptions) {
        self.log_dispatch("Dispatching event", options.debug_payload());
        if let Some(data_layer) = self.data_layer() {
            data_layer.push(options.into_record());
        }
    }

    /// Pushes `data` to the data layer as-is.
    pub fn push(&self, data: DataLayerObject) {
        self.log_dispatch("Dispatching event", data.to_value());
        if let Some(data_layer) = self.data_layer() {
            data_layer.push(data);
        }
    }

    fn active_host(&self) -> Option<&Host> {
        if self.is_in_browser_context() && self.settings.enabled {
            self.host.as_ref()
        } else {
            None
        }
    }

    fn log_dispatch(&self, what: &str, payload: Value) {
        if !self.settings.debug {
            return;
        }
        let state = if self.active_host().is_some() {
            ""
        } else {
            "(disabled)"
        };
        self.logger
            .info_with(format!("[GTM-Support{state}]: {what}"), payload);
    }
}

impl fmt::Debug for GtmSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GtmSupport")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .field("script_elements", &self.script_elements.len())
            .field("host", &self.host)
            .finish()
    }
}
