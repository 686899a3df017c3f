//! SCIM 2.0 Schema URIs and Resource Types
//!
//! Schema identifiers per RFC 7643 Section 8.7 and the resource types whose
//! core attributes can be addressed in a filter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Core User schema (RFC 7643 Section 4.1).
pub const SCHEMA_USER: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Core Group schema (RFC 7643 Section 4.2).
pub const SCHEMA_GROUP: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// Enterprise User extension (RFC 7643 Section 4.3); the most common
/// extension namespace seen in filters.
pub const SCHEMA_ENTERPRISE_USER: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Message schema carried by every error body.
pub const SCHEMA_ERROR: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

/// SCIM resource type a filter is evaluated against.
///
/// Determines the core schema URN and which core attribute registry is
/// consulted when resolving attribute tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ScimResourceType {
    #[default]
    User,
    Group,
}

impl ScimResourceType {
    /// Canonical URN of the core schema for this resource type.
    pub fn core_schema_urn(&self) -> &'static str {
        match self {
            ScimResourceType::User => SCHEMA_USER,
            ScimResourceType::Group => SCHEMA_GROUP,
        }
    }
}

impl fmt::Display for ScimResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "User",
            Self::Group => "Group",
        })
    }
}
