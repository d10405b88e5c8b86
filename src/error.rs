use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GtmErrorCode {
    InvalidId,
    InvalidParentElement,
    InvalidOptions,
    Internal,
}

impl GtmErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GtmErrorCode::InvalidId => "gtm/invalid-id",
            GtmErrorCode::InvalidParentElement => "gtm/invalid-parent-element",
            GtmErrorCode::InvalidOptions => "gtm/invalid-options",
            GtmErrorCode::Internal => "gtm/internal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GtmError {
    pub code: GtmErrorCode,
    message: String,
}

impl GtmError {
    pub fn new(code: GtmErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for GtmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for GtmError {}

pub type GtmResult<T> = Result<T, GtmError>;

pub fn invalid_id(message: impl Into<String>) -> GtmError {
    GtmError::new(GtmErrorCode::InvalidId, message)
}

pub fn invalid_parent_element(message: impl Into<String>) -> GtmError {
    GtmError::new(GtmErrorCode::InvalidParentElement, message)
}

pub fn invalid_options(message: impl Into<String>) -> GtmError {
    GtmError::new(GtmErrorCode::InvalidOptions, message)
}

pub fn internal_error(message: impl Into<String>) -> GtmError {
    GtmError::new(GtmErrorCode::Internal, message)
}
