//! Container ID validation.
//!
//! Tag Manager web containers are named `GTM-XXXXXX`, Google tags (GA4 measurement IDs) are named
//! `G-XXXXXXXXXX`. Both are accepted; the suffix must be upper-case alphanumerics.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{invalid_id, GtmError, GtmResult};

/// Source of [`GTM_ID_PATTERN`], as shown in validation messages.
pub const GTM_ID_PATTERN_SOURCE: &str = r"^(GTM|G)-[0-9A-Z]+$";

/// GTM Container ID pattern.
pub static GTM_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GTM_ID_PATTERN_SOURCE).expect("valid container id pattern"));

static SUGGESTION_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*-|[^0-9A-Z]").expect("valid suggestion pattern"));

/// Returns `true` when `id` matches [`GTM_ID_PATTERN`].
pub fn is_gtm_id(id: &str) -> bool {
    GTM_ID_PATTERN.is_match(id)
}

/// Asserts that the given id is a valid GTM Container ID.
///
/// The error message embeds the offending value and, when one can be derived, a corrected
/// suggestion (`'gtm-abc'` suggests `GTM-ABC` or `G-ABC`).
pub fn assert_is_gtm_id(id: &str) -> GtmResult<()> {
    if is_gtm_id(id) {
        return Ok(());
    }
    Err(invalid_id_error(id))
}

/// Same as [`assert_is_gtm_id`] for untyped input such as parsed JSON configuration.
///
/// Anything that is not a JSON string is rejected; its JSON text is used in the message.
pub fn assert_is_gtm_id_value(value: &Value) -> GtmResult<()> {
    match value {
        Value::String(id) => assert_is_gtm_id(id),
        other => Err(invalid_id_error(&render_value(other))),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn invalid_id_error(rendered: &str) -> GtmError {
    let suggestion = suggest(rendered);
    let suggestion_text = if suggestion.is_empty() {
        String::new()
    } else {
        format!(" Did you mean 'GTM-{suggestion}' or 'G-{suggestion}'?")
    };
    invalid_id(format!(
        "'{rendered}' is not a valid GTM-ID (/{GTM_ID_PATTERN_SOURCE}/).{suggestion_text}"
    ))
}

fn suggest(raw: &str) -> String {
    SUGGESTION_STRIP
        .replace_all(&raw.to_uppercase(), "")
        .into_owned()
}

/// A container ID that passed [`assert_is_gtm_id`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GtmId(String);

impl GtmId {
    pub fn parse(id: impl Into<String>) -> GtmResult<Self> {
        let id = id.into();
        assert_is_gtm_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GtmId {
    type Error = GtmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GtmId::parse(value)
    }
}

impl From<GtmId> for String {
    fn from(value: GtmId) -> Self {
        value.0
    }
}

impl AsRef<str> for GtmId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GtmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GtmErrorCode;
    use serde_json::json;

    #[test]
    fn accepts_container_and_tag_ids() {
        for id in ["GTM-DEMO", "GTM-K3X9Q2", "G-1234567890", "G-ABC"] {
            assert!(assert_is_gtm_id(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn rejects_wrong_prefix() {
        let err = assert_is_gtm_id("GA-DEMO").unwrap_err();
        assert_eq!(err.code, GtmErrorCode::InvalidId);
        assert_eq!(
            err.message(),
            "'GA-DEMO' is not a valid GTM-ID (/^(GTM|G)-[0-9A-Z]+$/). \
             Did you mean 'GTM-DEMO' or 'G-DEMO'?"
        );
    }

    #[test]
    fn rejects_empty_string_without_suggestion() {
        let err = assert_is_gtm_id("").unwrap_err();
        assert_eq!(
            err.message(),
            "'' is not a valid GTM-ID (/^(GTM|G)-[0-9A-Z]+$/)."
        );
    }

    #[test]
    fn rejects_lowercase_and_punctuation() {
        let err = assert_is_gtm_id("gtm-ab_c").unwrap_err();
        assert!(err.message().starts_with("'gtm-ab_c' is not a valid GTM-ID"));
        assert!(err.message().ends_with("Did you mean 'GTM-ABC' or 'G-ABC'?"));

        assert!(assert_is_gtm_id("GTM-").is_err());
        assert!(assert_is_gtm_id("GTM-DEMO ").is_err());
        assert!(assert_is_gtm_id("GTMM-DEMO").is_err());
    }

    #[test]
    fn suggestion_uses_text_after_last_dash() {
        let err = assert_is_gtm_id("my-gtm-x1y2").unwrap_err();
        assert!(err.message().ends_with("Did you mean 'GTM-X1Y2' or 'G-X1Y2'?"));
    }

    #[test]
    fn non_string_values_are_rejected() {
        let err = assert_is_gtm_id_value(&Value::Null).unwrap_err();
        assert!(err.message().starts_with("'null' is not a valid GTM-ID"));

        let err = assert_is_gtm_id_value(&json!(42)).unwrap_err();
        assert!(err.message().starts_with("'42' is not a valid GTM-ID"));
        assert!(err.message().ends_with("Did you mean 'GTM-42' or 'G-42'?"));

        assert!(assert_is_gtm_id_value(&json!("GTM-DEMO")).is_ok());
    }

    #[test]
    fn gtm_id_parses_and_deserializes() {
        let id = GtmId::parse("GTM-DEMO").unwrap();
        assert_eq!(id.as_str(), "GTM-DEMO");
        assert_eq!(id.to_string(), "GTM-DEMO");

        let parsed: GtmId = serde_json::from_value(json!("G-TEST1")).unwrap();
        assert_eq!(parsed.as_str(), "G-TEST1");
        assert!(serde_json::from_value::<GtmId>(json!("UA-1234")).is_err());
    }
}
