//! Resolved SCIM filter expressions.
//!
//! Binds every attribute token of a parsed [`Filter`] to a
//! [`FieldDescriptor`], producing the tree consumed by query construction.

use serde::Serialize;

use super::{
    diagnostics::DiagnosticSink,
    field::{CoreFieldRegistry, FieldDescriptor, InvalidFilterSyntax, resolve_field},
    filter::{CompareOp, Filter, FilterLimits, FilterParseError, FilterValue, parse_filter_with_limits},
    registry::{GroupQueryField, GroupRegistry, UserQueryField, UserRegistry},
    types::{SCHEMA_GROUP, SCHEMA_USER},
};

/// Errors from parsing and resolving a filter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid filter: {0}")]
    Parse(#[from] FilterParseError),

    #[error("Invalid filter attribute: {0}")]
    Syntax(#[from] InvalidFilterSyntax),
}

/// Everything attribute resolution needs besides the token itself.
#[derive(Debug)]
pub struct ResolveContext<'a, R: ?Sized, S: ?Sized> {
    pub core_schema_urn: &'a str,
    pub registry: &'a R,
    pub sink: &'a S,
}

impl<'a, R, S> ResolveContext<'a, R, S>
where
    R: CoreFieldRegistry + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    pub fn new(core_schema_urn: &'a str, registry: &'a R, sink: &'a S) -> Self {
        Self {
            core_schema_urn,
            registry,
            sink,
        }
    }

    pub fn resolve(&self, raw_field: &str) -> Result<FieldDescriptor<R::Field>, InvalidFilterSyntax> {
        resolve_field(raw_field, self.core_schema_urn, self.registry, self.sink)
    }
}

/// A filter whose attributes have been resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterExpression<F> {
    /// Attribute comparison
    Constraint {
        field: FieldDescriptor<F>,
        op: CompareOp,
        value: FilterValue,
    },
    /// Attribute presence check
    Present { field: FieldDescriptor<F> },
    And {
        left: Box<FilterExpression<F>>,
        right: Box<FilterExpression<F>>,
    },
    Or {
        left: Box<FilterExpression<F>>,
        right: Box<FilterExpression<F>>,
    },
    Not { inner: Box<FilterExpression<F>> },
}

impl<F> FilterExpression<F> {
    /// Resolve every attribute of `filter`, left to right.
    ///
    /// Stops at the first attribute that cannot be resolved.
    pub fn build<R, S>(filter: &Filter, ctx: &ResolveContext<'_, R, S>) -> Result<Self, InvalidFilterSyntax>
    where
        R: CoreFieldRegistry<Field = F> + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        Ok(match filter {
            Filter::Compare { attr, op, value } => FilterExpression::Constraint {
                field: ctx.resolve(attr)?,
                op: *op,
                value: value.clone(),
            },
            Filter::Present { attr } => FilterExpression::Present {
                field: ctx.resolve(attr)?,
            },
            Filter::And(left, right) => FilterExpression::And {
                left: Box::new(Self::build(left, ctx)?),
                right: Box::new(Self::build(right, ctx)?),
            },
            Filter::Or(left, right) => FilterExpression::Or {
                left: Box::new(Self::build(left, ctx)?),
                right: Box::new(Self::build(right, ctx)?),
            },
            Filter::Not(inner) => FilterExpression::Not {
                inner: Box::new(Self::build(inner, ctx)?),
            },
        })
    }

    /// All resolved fields, in the order they appear in the filter.
    pub fn fields(&self) -> Vec<&FieldDescriptor<F>> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a FieldDescriptor<F>>) {
        match self {
            FilterExpression::Constraint { field, .. } | FilterExpression::Present { field } => {
                out.push(field)
            }
            FilterExpression::And { left, right } | FilterExpression::Or { left, right } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
            FilterExpression::Not { inner } => inner.collect_fields(out),
        }
    }

    /// Whether any attribute lives in an extension schema.
    pub fn references_extensions(&self) -> bool {
        self.fields().iter().any(|field| field.is_extension())
    }
}

/// Parse `input` and resolve its attributes against `ctx`.
pub fn build_filter<R, S>(
    input: &str,
    limits: &FilterLimits,
    ctx: &ResolveContext<'_, R, S>,
) -> Result<FilterExpression<R::Field>, FilterError>
where
    R: CoreFieldRegistry + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let filter = parse_filter_with_limits(input, limits)?;
    Ok(FilterExpression::build(&filter, ctx)?)
}

/// Parse a filter over SCIM User resources.
///
/// # Examples
///
/// ```
/// use scim_fields::scim::{NoopSink, UserQueryField, parse_user_filter};
///
/// let expr = parse_user_filter("userName eq \"bjensen\"", &NoopSink).unwrap();
/// assert_eq!(expr.fields()[0].query_field(), Some(&UserQueryField::UserName));
/// ```
pub fn parse_user_filter<S>(
    input: &str,
    sink: &S,
) -> Result<FilterExpression<UserQueryField>, FilterError>
where
    S: DiagnosticSink + ?Sized,
{
    let ctx = ResolveContext::new(SCHEMA_USER, &UserRegistry, sink);
    build_filter(input, &FilterLimits::default(), &ctx)
}

/// Parse a filter over SCIM Group resources.
pub fn parse_group_filter<S>(
    input: &str,
    sink: &S,
) -> Result<FilterExpression<GroupQueryField>, FilterError>
where
    S: DiagnosticSink + ?Sized,
{
    let ctx = ResolveContext::new(SCHEMA_GROUP, &GroupRegistry, sink);
    build_filter(input, &FilterLimits::default(), &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scim::diagnostics::RecordingSink;

    #[test]
    fn test_user_filter_core_fields() {
        let sink = RecordingSink::new();
        let expr = parse_user_filter(
            r#"userName eq "bjensen" and urn:ietf:params:scim:schemas:core:2.0:User:active eq true"#,
            &sink,
        )
        .unwrap();

        let fields: Vec<_> = expr.fields().into_iter().map(|f| f.query_field().copied()).collect();
        assert_eq!(
            fields,
            vec![Some(UserQueryField::UserName), Some(UserQueryField::Active)]
        );
        assert!(!expr.references_extensions());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_constraint_keeps_operator_and_value() {
        let expr = parse_user_filter(r#"title co "Eng""#, &RecordingSink::new()).unwrap();
        match expr {
            FilterExpression::Constraint { field, op, value } => {
                assert_eq!(field.query_field(), Some(&UserQueryField::Title));
                assert_eq!(op, CompareOp::Co);
                assert_eq!(value, FilterValue::String("Eng".to_string()));
            }
            _ => panic!("Expected Constraint"),
        }
    }

    #[test]
    fn test_extension_fields_and_legacy_warning() {
        let sink = RecordingSink::new();
        let expr = parse_user_filter(
            r#"urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:employeeNumber eq "701984" or extension.costCenter pr"#,
            &sink,
        )
        .unwrap();

        let fields = expr.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(
            fields[0].urn(),
            "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"
        );
        assert_eq!(fields[0].name(), "employeeNumber");
        assert_eq!(fields[1].urn(), "extension");
        assert_eq!(fields[1].name(), "costCenter");
        assert!(expr.references_extensions());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_not_expression() {
        let expr = parse_user_filter("not (active eq false)", &RecordingSink::new()).unwrap();
        match expr {
            FilterExpression::Not { inner } => {
                assert!(matches!(*inner, FilterExpression::Constraint { .. }));
            }
            _ => panic!("Expected Not"),
        }
    }

    #[test]
    fn test_unresolvable_attribute() {
        let err = parse_user_filter(r#"userName eq "a" and bogus eq "b""#, &RecordingSink::new())
            .unwrap_err();
        match err {
            FilterError::Syntax(inner) => assert_eq!(inner.raw_field, "bogus"),
            _ => panic!("Expected Syntax error"),
        }
    }

    #[test]
    fn test_period_after_schema_prefix_is_filter_error() {
        let err = parse_user_filter(
            r#"urn:ietf:params:scim:schemas:core:2.0:User.userName eq "a""#,
            &RecordingSink::new(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid filter attribute: Period (.)"));
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = parse_user_filter("userName eq", &RecordingSink::new()).unwrap_err();
        assert!(matches!(err, FilterError::Parse(_)));
    }

    #[test]
    fn test_group_filter() {
        let expr = parse_group_filter(r#"displayName eq "Engineering""#, &RecordingSink::new())
            .unwrap();
        assert_eq!(
            expr.fields()[0].query_field(),
            Some(&GroupQueryField::DisplayName)
        );

        // Not a Group attribute, and no separator to split on
        let err = parse_group_filter(r#"userName eq "x""#, &RecordingSink::new()).unwrap_err();
        assert!(matches!(err, FilterError::Syntax(_)));
    }

    #[test]
    fn test_serialize_expression() {
        let expr = parse_user_filter("title pr", &RecordingSink::new()).unwrap();
        let json = serde_json::to_value(&expr).unwrap();

        assert_eq!(json["type"], "present");
        assert_eq!(json["field"]["kind"], "core");
        assert_eq!(json["field"]["field"], "title");
    }
}
