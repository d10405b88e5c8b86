use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::container::id::{assert_is_gtm_id_value, GtmId};
use crate::error::GtmResult;

/// Query parameters forwarded to `gtm.js`, used to load a specific GTM environment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtmQueryParams {
    /// GTM auth environment parameter.
    pub gtm_auth: String,
    /// GTM preview environment parameter.
    pub gtm_preview: String,
    /// GTM cookies win environment parameter.
    pub gtm_cookies_win: String,
    /// Any additional parameters, appended after the environment parameters.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl GtmQueryParams {
    pub fn new(
        gtm_auth: impl Into<String>,
        gtm_preview: impl Into<String>,
        gtm_cookies_win: impl Into<String>,
    ) -> Self {
        Self {
            gtm_auth: gtm_auth.into(),
            gtm_preview: gtm_preview.into(),
            gtm_cookies_win: gtm_cookies_win.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Key/value pairs in the order they are written to the query string.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = vec![
            ("gtm_auth", self.gtm_auth.as_str()),
            ("gtm_preview", self.gtm_preview.as_str()),
            ("gtm_cookies_win", self.gtm_cookies_win.as_str()),
        ];
        pairs.extend(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        pairs
    }
}

/// A container ID paired with its own query parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmIdContainer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<GtmQueryParams>,
}

impl GtmIdContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query_params: None,
        }
    }

    pub fn with_query_params(mut self, params: GtmQueryParams) -> Self {
        self.query_params = Some(params);
        self
    }
}

/// The containers a [`GtmSupport`](crate::support::GtmSupport) instance loads.
///
/// Deserializes from a string, an array of strings or an array of `{ id, queryParams }`
/// objects, matching the shapes accepted by the JavaScript plugin options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContainerIds {
    Single(String),
    Multiple(Vec<String>),
    Containers(Vec<GtmIdContainer>),
}

impl ContainerIds {
    /// Number of configured containers.
    pub fn len(&self) -> usize {
        match self {
            ContainerIds::Single(_) => 1,
            ContainerIds::Multiple(ids) => ids.len(),
            ContainerIds::Containers(containers) => containers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates the ids in an untyped `id` option before it is deserialized, so a non-string id
    /// is reported as `gtm/invalid-id` with the offending value.
    ///
    /// Container objects without an `id` key are left for deserialization to reject.
    pub fn assert_value(value: &Value) -> GtmResult<()> {
        match value {
            Value::Array(items) => items.iter().try_for_each(|item| match item {
                Value::Object(container) => container
                    .get("id")
                    .map_or(Ok(()), assert_is_gtm_id_value),
                other => assert_is_gtm_id_value(other),
            }),
            other => assert_is_gtm_id_value(other),
        }
    }

    /// Validates every id and resolves the query parameters each container loads with.
    ///
    /// Plain ids inherit `fallback`; `{ id, queryParams }` entries only ever use their own
    /// parameters.
    pub fn targets(&self, fallback: Option<&GtmQueryParams>) -> GtmResult<Vec<ContainerTarget>> {
        match self {
            ContainerIds::Single(id) => Ok(vec![ContainerTarget {
                id: GtmId::parse(id.as_str())?,
                query_params: fallback.cloned(),
            }]),
            ContainerIds::Multiple(ids) => ids
                .iter()
                .map(|id| {
                    Ok(ContainerTarget {
                        id: GtmId::parse(id.as_str())?,
                        query_params: fallback.cloned(),
                    })
                })
                .collect(),
            ContainerIds::Containers(containers) => containers
                .iter()
                .map(|container| {
                    Ok(ContainerTarget {
                        id: GtmId::parse(container.id.as_str())?,
                        query_params: container.query_params.clone(),
                    })
                })
                .collect(),
        }
    }
}

impl From<&str> for ContainerIds {
    fn from(value: &str) -> Self {
        ContainerIds::Single(value.to_string())
    }
}

impl From<String> for ContainerIds {
    fn from(value: String) -> Self {
        ContainerIds::Single(value)
    }
}

impl From<Vec<String>> for ContainerIds {
    fn from(value: Vec<String>) -> Self {
        ContainerIds::Multiple(value)
    }
}

impl From<Vec<&str>> for ContainerIds {
    fn from(value: Vec<&str>) -> Self {
        ContainerIds::Multiple(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ContainerIds {
    fn from(value: [&str; N]) -> Self {
        ContainerIds::Multiple(value.iter().map(|id| id.to_string()).collect())
    }
}

impl From<Vec<GtmIdContainer>> for ContainerIds {
    fn from(value: Vec<GtmIdContainer>) -> Self {
        ContainerIds::Containers(value)
    }
}

/// A validated container together with the query parameters it is loaded with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerTarget {
    pub id: GtmId,
    pub query_params: Option<GtmQueryParams>,
}
