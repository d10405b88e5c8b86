#![doc = include_str!("RUSTDOC.md")]

pub mod constants;
pub mod container;
pub mod data_layer;
pub mod dom;
pub mod error;
pub mod host;
pub mod logger;
pub mod script;
pub mod support;

pub use container::{assert_is_gtm_id, is_gtm_id, ContainerIds, GtmId, GtmIdContainer, GtmQueryParams};
pub use data_layer::{get_or_initialize_data_layer, DataLayer, DataLayerObject};
pub use error::{GtmError, GtmErrorCode, GtmResult};
pub use host::Host;
pub use script::{has_script, load_script, LoadScriptOptions, OnReadyOptions};
pub use support::{GtmSupport, GtmSupportOptions, TrackEventOptions};
