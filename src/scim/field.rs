//! SCIM Filter Attribute Resolution
//!
//! Resolves the raw attribute token of a filter expression into a
//! [`FieldDescriptor`]: either a known core-schema attribute or an extension
//! attribute identified by its namespace URN and local name.
//!
//! ## Accepted Forms
//!
//! ```text
//! userName                                               core, bare
//! urn:ietf:params:scim:schemas:core:2.0:User:userName    core, URN-prefixed
//! urn:example:extension:2.0:Custom:employeeNumber        extension, colon
//! extension.employeeNumber                               extension, legacy period
//! ```
//!
//! Core names are case-folded to lower case. Extension names keep the casing
//! of the original token, because the namespace split always runs on the
//! untouched input.

use std::{collections::HashMap, fmt};

use serde::Serialize;

use super::{diagnostics::DiagnosticSink, urn::split_extension_urn};

/// A filter attribute token that cannot be bound to a field.
///
/// Rendered to clients as a SCIM `invalidFilter` error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InvalidFilterSyntax {
    /// Human-readable description of the problem
    pub message: String,
    /// The attribute token as it appeared in the filter
    pub raw_field: String,
}

impl InvalidFilterSyntax {
    pub(crate) fn new(message: impl Into<String>, raw_field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw_field: raw_field.into(),
        }
    }
}

/// Lookup of core-schema attributes by lower-cased name.
///
/// Implementations must be side-effect free; the resolver may call them from
/// any thread.
pub trait CoreFieldRegistry {
    /// Opaque handle identifying a core attribute.
    type Field: Clone + fmt::Debug + PartialEq;

    /// Find the core attribute registered under `name` (already lower-cased).
    fn from_string(&self, name: &str) -> Option<Self::Field>;
}

impl<F> CoreFieldRegistry for HashMap<String, F>
where
    F: Clone + fmt::Debug + PartialEq,
{
    type Field = F;

    fn from_string(&self, name: &str) -> Option<F> {
        self.get(name).cloned()
    }
}

/// Where a filter attribute token points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDescriptor<F> {
    /// A recognized core-schema attribute.
    Core {
        /// The core schema URN
        urn: String,
        /// Lower-cased attribute name
        name: String,
        /// Registry handle for the attribute
        field: F,
    },
    /// An attribute of an extension schema.
    Extension {
        /// Extension namespace
        urn: String,
        /// Attribute name in its original casing
        name: String,
    },
}

impl<F> FieldDescriptor<F> {
    pub fn urn(&self) -> &str {
        match self {
            FieldDescriptor::Core { urn, .. } | FieldDescriptor::Extension { urn, .. } => urn,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldDescriptor::Core { name, .. } | FieldDescriptor::Extension { name, .. } => name,
        }
    }

    /// The registry handle, present only for core attributes.
    pub fn query_field(&self) -> Option<&F> {
        match self {
            FieldDescriptor::Core { field, .. } => Some(field),
            FieldDescriptor::Extension { .. } => None,
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, FieldDescriptor::Extension { .. })
    }
}

impl<F> fmt::Display for FieldDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.urn(), self.name())
    }
}

/// Resolve a raw filter attribute token.
///
/// A token starting with `core_schema_urn` (ASCII case-insensitive) must
/// continue with `:`; the remainder is looked up as a core attribute. Any
/// other token is looked up as a whole. Tokens the registry does not know are
/// split into an extension URN and name at their last `:` or `.`, whichever
/// comes later. The period form is deprecated and reported to `sink`.
///
/// An empty `core_schema_urn` disables prefix matching; bare tokens are still
/// looked up in `registry`.
///
/// # Errors
///
/// Returns [`InvalidFilterSyntax`] if:
/// - The schema prefix is followed by anything other than `:`
/// - An unknown token contains neither `:` nor `.`
/// - Splitting leaves an empty namespace or attribute name
pub fn resolve_field<R, S>(
    raw_field: &str,
    core_schema_urn: &str,
    registry: &R,
    sink: &S,
) -> Result<FieldDescriptor<R::Field>, InvalidFilterSyntax>
where
    R: CoreFieldRegistry + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let candidate = match strip_schema_prefix(raw_field, core_schema_urn) {
        Some(rest) => match rest.as_bytes().first() {
            Some(b':') => rest[1..].to_ascii_lowercase(),
            Some(b'.') => {
                return Err(InvalidFilterSyntax::new(
                    format!("Period (.) is not a valid field separator after the schema prefix: {raw_field}"),
                    raw_field,
                ));
            }
            Some(_) => {
                return Err(InvalidFilterSyntax::new(
                    format!("Expected ':' after the schema prefix: {raw_field}"),
                    raw_field,
                ));
            }
            None => {
                return Err(InvalidFilterSyntax::new(
                    format!("Missing attribute name after the schema prefix: {raw_field}"),
                    raw_field,
                ));
            }
        },
        None => raw_field.to_ascii_lowercase(),
    };

    if let Some(field) = registry.from_string(&candidate) {
        tracing::trace!(raw_field, name = %candidate, "Resolved core attribute");
        return Ok(FieldDescriptor::Core {
            urn: core_schema_urn.to_string(),
            name: candidate,
            field,
        });
    }

    // Split the untouched token so the extension name keeps its casing.
    let split = split_extension_urn(raw_field)?;
    if split.legacy {
        sink.warn(&format!(
            "Period (.) used as field separator in {raw_field}. \
             This form is not SCIM compliant and is deprecated."
        ));
    }
    tracing::trace!(
        raw_field,
        urn = split.urn,
        name = split.name,
        legacy = split.legacy,
        "Resolved extension attribute"
    );

    Ok(FieldDescriptor::Extension {
        urn: split.urn.to_string(),
        name: split.name.to_string(),
    })
}

/// Remainder of `raw` after `prefix`, compared ASCII case-insensitively.
///
/// An empty prefix never matches.
fn strip_schema_prefix<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let head = raw.as_bytes().get(..prefix.len())?;
    // Non-ASCII bytes must match exactly, so the split lands on a char boundary.
    head.eq_ignore_ascii_case(prefix.as_bytes())
        .then(|| &raw[prefix.len()..])
}

// =============================================================================
// Tests
// =============================================================================
