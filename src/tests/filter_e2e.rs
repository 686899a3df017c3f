//! Configuration-driven filter resolution across resource types.

use rstest::rstest;

use crate::{
    config::ScimFieldsConfig,
    scim::{
        CoreFieldRegistry, FieldDescriptor, FilterError, FilterExpression, GroupRegistry,
        RecordingSink, ResolveContext, SCHEMA_ENTERPRISE_USER, SCHEMA_USER, ScimErrorResponse, ScimResourceType,
        UserQueryField, UserRegistry, build_filter, resolve_field,
    },
};

fn user_fields(filter: &str, sink: &RecordingSink) -> Result<Vec<(String, String, bool)>, FilterError> {
    let config = ScimFieldsConfig::default();
    let ctx = ResolveContext::new(config.schema.core_schema_urn(), &UserRegistry, sink);
    let expr = build_filter(filter, &config.filter, &ctx)?;

    Ok(expr
        .fields()
        .into_iter()
        .map(|f| (f.urn().to_string(), f.name().to_string(), f.is_extension()))
        .collect())
}

#[rstest]
#[case::bare_core(r#"userName eq "a""#, SCHEMA_USER, "username", false)]
#[case::prefixed_core(
    r#"urn:ietf:params:scim:schemas:core:2.0:User:name.givenName sw "B""#,
    SCHEMA_USER,
    "name.givenname",
    false
)]
#[case::enterprise_extension(
    r#"urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:costCenter eq "4130""#,
    SCHEMA_ENTERPRISE_USER,
    "costCenter",
    true
)]
#[case::legacy_extension(
    r#"extension.employeeNumber eq "701984""#,
    "extension",
    "employeeNumber",
    true
)]
fn test_single_attribute_outcomes(
    #[case] filter: &str,
    #[case] urn: &str,
    #[case] name: &str,
    #[case] extension: bool,
) {
    let sink = RecordingSink::new();
    let fields = user_fields(filter, &sink).unwrap();
    assert_eq!(fields, vec![(urn.to_string(), name.to_string(), extension)]);
}

#[test]
fn test_only_legacy_form_warns() {
    let sink = RecordingSink::new();
    user_fields(
        r#"userName eq "a" and urn:example:2.0:Custom:badge pr and legacy.badge pr and other.badge pr"#,
        &sink,
    )
    .unwrap();

    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("legacy.badge"));
    assert!(messages[1].contains("other.badge"));
}

#[test]
fn test_error_renders_as_scim_invalid_filter() {
    let sink = RecordingSink::new();
    let err = user_fields(r#"urn:ietf:params:scim:schemas:core:2.0:User.userName eq "a""#, &sink)
        .unwrap_err();

    let response = ScimErrorResponse::from(err);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "400");
    assert_eq!(json["scimType"], "invalidFilter");
    assert!(json["detail"].as_str().unwrap().contains("Period (.)"));
}

#[test]
fn test_config_limits_apply() {
    let config = ScimFieldsConfig::from_str("[filter]\nmax_depth = 1").unwrap();
    let sink = RecordingSink::new();
    let ctx = ResolveContext::new(config.schema.core_schema_urn(), &UserRegistry, &sink);

    let err = build_filter("((userName pr))", &config.filter, &ctx).unwrap_err();
    assert!(matches!(err, FilterError::Parse(_)));
}

#[test]
fn test_core_urn_override() {
    let config = ScimFieldsConfig::from_str(
        r#"
        [schema]
        core_urn = "urn:scim:schemas:core:1.0"
    "#,
    )
    .unwrap();
    let sink = RecordingSink::new();
    let ctx = ResolveContext::new(config.schema.core_schema_urn(), &UserRegistry, &sink);

    let field = ctx.resolve("urn:scim:schemas:core:1.0:userName").unwrap();
    assert_eq!(
        field,
        FieldDescriptor::Core {
            urn: "urn:scim:schemas:core:1.0".to_string(),
            name: "username".to_string(),
            field: UserQueryField::UserName,
        }
    );
}

#[test]
fn test_group_resource_from_config() {
    let config = ScimFieldsConfig::from_str("[schema]\nresource = \"group\"").unwrap();
    assert_eq!(config.schema.resource, ScimResourceType::Group);

    let sink = RecordingSink::new();
    let ctx = ResolveContext::new(config.schema.core_schema_urn(), &GroupRegistry, &sink);
    let expr: FilterExpression<_> = build_filter(
        r#"urn:ietf:params:scim:schemas:core:2.0:Group:members.value eq "u-1""#,
        &config.filter,
        &ctx,
    )
    .unwrap();

    assert_eq!(
        expr.fields()[0].query_field().map(|f| f.as_str()),
        Some("members.value")
    );
}

#[test]
fn test_concurrent_resolution_is_consistent() {
    let sink = RecordingSink::new();
    let tokens = [
        "userName",
        "urn:ietf:params:scim:schemas:core:2.0:User:userName",
        "urn:example:2.0:Custom:badge",
        "legacy.badge",
    ];
    let expected: Vec<_> = tokens
        .iter()
        .map(|t| resolve_field(t, SCHEMA_USER, &UserRegistry, &RecordingSink::new()).unwrap())
        .collect();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for (token, expected) in tokens.iter().zip(&expected) {
                    let field = resolve_field(token, SCHEMA_USER, &UserRegistry, &sink).unwrap();
                    assert_eq!(&field, expected);
                }
            });
        }
    });

    // One legacy token per thread
    assert_eq!(sink.len(), 4);
    assert_eq!(UserRegistry.from_string("username"), Some(UserQueryField::UserName));
}
