/// Canonical location of the Tag Manager loader script.
pub const DEFAULT_SOURCE: &str = "https://www.googletagmanager.com/gtm.js";

/// Name of the global event queue GTM reads unless told otherwise through the `l` parameter.
pub const DEFAULT_DATA_LAYER_NAME: &str = "dataLayer";

/// Event pushed when a container starts loading.
pub const GTM_START_EVENT: &str = "gtm.js";
pub const GTM_START_KEY: &str = "gtm.start";

pub const DEFAULT_TRACK_VIEW_EVENT: &str = "content-view";
pub const DEFAULT_TRACK_EVENT: &str = "interaction";

/// Environment variable consulted by `GtmSupportOptions::from_env`.
pub const OPTIONS_ENV_VAR: &str = "GTM_SUPPORT_OPTIONS";

pub const LOGGER_NAME: &str = "@gtm-support";
