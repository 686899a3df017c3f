//! SCIM 2.0 Filter Attribute Resolution
//!
//! This module turns SCIM filter expressions (RFC 7644 Section 3.4.2) into
//! trees whose attributes are bound either to a core-schema field or to an
//! extension attribute (namespace URN plus local name).
//!
//! ## RFC References
//!
//! - RFC 7643: SCIM Core Schema
//! - RFC 7644: SCIM Protocol
//!
//! ## Module Structure
//!
//! - [`types`]: Schema URIs and resource types
//! - [`error`]: SCIM error responses per RFC 7644
//! - [`filter`]: SCIM filter expression parser
//! - [`field`]: Attribute token resolution
//! - [`urn`]: Extension namespace splitting
//! - [`registry`]: Core User and Group attribute registries
//! - [`diagnostics`]: Deprecation notice sinks
//! - [`expression`]: Filters with resolved attributes

pub mod diagnostics;
pub mod error;
pub mod expression;
pub mod field;
pub mod filter;
pub mod registry;
pub mod types;
pub mod urn;

pub use diagnostics::{DiagnosticSink, NoopSink, RecordingSink, TracingSink};
pub use error::*;
pub use expression::{
    FilterError, FilterExpression, ResolveContext, build_filter, parse_group_filter,
    parse_user_filter,
};
pub use field::{CoreFieldRegistry, FieldDescriptor, InvalidFilterSyntax, resolve_field};
pub use filter::{CompareOp, Filter, FilterLimits, FilterParseError, FilterValue, parse_filter};
pub use registry::{GroupQueryField, GroupRegistry, UserQueryField, UserRegistry};
pub use types::*;
pub use urn::{ExtensionSplit, split_extension_urn};
