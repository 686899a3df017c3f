//! Resolution of SCIM filter attribute tokens.
//!
//! A filter such as
//!
//! ```text
//! urn:ietf:params:scim:schemas:core:2.0:User:userName sw "j" and extension.costCenter pr
//! ```
//!
//! names attributes in several historical forms. [`scim::resolve_field`]
//! binds each token either to a core-schema attribute or to an extension
//! attribute (namespace URN plus name), and [`scim::FilterExpression`] carries
//! the resolved fields for query construction.

pub mod config;
#[cfg(feature = "cli")]
pub mod observability;
pub mod scim;

#[cfg(test)]
mod tests;
