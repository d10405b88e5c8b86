mod id;
mod types;

pub use id::{
    assert_is_gtm_id, assert_is_gtm_id_value, is_gtm_id, GtmId, GTM_ID_PATTERN,
    GTM_ID_PATTERN_SOURCE,
};
pub use types::{ContainerIds, ContainerTarget, GtmIdContainer, GtmQueryParams};
