//! Client-facing rendering of rejected filters (RFC 7644 Section 3.12).

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use super::{expression::FilterError, field::InvalidFilterSyntax, types::SCHEMA_ERROR};

/// Body of a SCIM error response.
///
/// ```json
/// {
///   "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
///   "status": "400",
///   "scimType": "invalidFilter",
///   "detail": "Unable to parse field or extension from employeeNumber"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimErrorResponse {
    pub schemas: Vec<String>,
    /// Status code, as a decimal string per the SCIM wire format
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<ScimErrorType>,
    pub detail: String,
}

impl ScimErrorResponse {
    /// `400 invalidFilter` with the given detail.
    pub fn invalid_filter(detail: impl Into<String>) -> Self {
        Self {
            schemas: vec![SCHEMA_ERROR.to_string()],
            status: StatusCode::BAD_REQUEST.as_str().to_string(),
            scim_type: Some(ScimErrorType::InvalidFilter),
            detail: detail.into(),
        }
    }

    /// Parsed `status`; a body that arrived with a garbled status maps to 500.
    pub fn status_code(&self) -> StatusCode {
        self.status
            .parse::<u16>()
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<InvalidFilterSyntax> for ScimErrorResponse {
    fn from(err: InvalidFilterSyntax) -> Self {
        Self::invalid_filter(err.message)
    }
}

impl From<FilterError> for ScimErrorResponse {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::Parse(parse) => Self::invalid_filter(parse.to_string()),
            FilterError::Syntax(syntax) => syntax.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScimErrorType {
    /// The filter is malformed or names an attribute that cannot be resolved
    InvalidFilter,
}

impl fmt::Display for ScimErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidFilter => "invalidFilter",
        })
    }
}

pub type ScimResult<T> = Result<T, ScimErrorResponse>;
