//! Extension attribute URN splitting.
//!
//! An extension attribute token carries its namespace and attribute name in
//! one string. RFC 7644 separates them with a colon
//! (`urn:example:2.0:Custom:employeeNumber`); older clients use a period
//! (`extension.employeeNumber`), which is still accepted but deprecated.

use super::field::InvalidFilterSyntax;

/// An extension token split into namespace and attribute name.
///
/// Both parts borrow from the original token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionSplit<'a> {
    pub urn: &'a str,
    pub name: &'a str,
    /// Split on the deprecated period separator
    pub legacy: bool,
}

/// Split `raw_field` at its last separator.
///
/// Whichever of the last `.` and the last `:` comes later wins, so
/// `urn:example:2.0:Custom:employeeNumber` splits at the final colon while the
/// `2.0` version segment is left inside the namespace.
pub fn split_extension_urn(raw_field: &str) -> Result<ExtensionSplit<'_>, InvalidFilterSyntax> {
    let (index, legacy) = match (raw_field.rfind('.'), raw_field.rfind(':')) {
        (Some(period), Some(colon)) if period > colon => (period, true),
        (Some(period), None) => (period, true),
        (_, Some(colon)) => (colon, false),
        (None, None) => {
            return Err(InvalidFilterSyntax::new(
                format!("Unable to parse field or extension from {raw_field}"),
                raw_field,
            ));
        }
    };

    let urn = &raw_field[..index];
    let name = &raw_field[index + 1..];

    if urn.is_empty() {
        return Err(InvalidFilterSyntax::new(
            format!("Missing extension namespace in {raw_field}"),
            raw_field,
        ));
    }
    if name.is_empty() {
        return Err(InvalidFilterSyntax::new(
            format!("Missing extension attribute name in {raw_field}"),
            raw_field,
        ));
    }

    Ok(ExtensionSplit { urn, name, legacy })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("extension:employeeNumber", "extension", "employeeNumber", false)]
    #[case("extension.employeeNumber", "extension", "employeeNumber", true)]
    #[case(
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:employeeNumber",
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
        "employeeNumber",
        false
    )]
    #[case("urn:example:2.0:Custom.costCenter", "urn:example:2.0:Custom", "costCenter", true)]
    #[case("a.b:c", "a.b", "c", false)]
    #[case("a:b.c", "a:b", "c", true)]
    fn test_split(
        #[case] raw: &str,
        #[case] urn: &str,
        #[case] name: &str,
        #[case] legacy: bool,
    ) {
        let split = split_extension_urn(raw).unwrap();
        assert_eq!(split, ExtensionSplit { urn, name, legacy });
    }

    #[test]
    fn test_name_keeps_casing() {
        let split = split_extension_urn("Ext:EmployeeNUMBER").unwrap();
        assert_eq!(split.urn, "Ext");
        assert_eq!(split.name, "EmployeeNUMBER");
    }

    #[test]
    fn test_no_separator() {
        let err = split_extension_urn("employeeNumber").unwrap_err();
        assert_eq!(
            err.message,
            "Unable to parse field or extension from employeeNumber"
        );
        assert_eq!(err.raw_field, "employeeNumber");
    }

    #[rstest]
    #[case(":employeeNumber")]
    #[case(".employeeNumber")]
    fn test_empty_namespace(#[case] raw: &str) {
        let err = split_extension_urn(raw).unwrap_err();
        assert!(err.message.contains("Missing extension namespace"));
    }

    #[rstest]
    #[case("extension:")]
    #[case("extension.")]
    fn test_empty_name(#[case] raw: &str) {
        let err = split_extension_urn(raw).unwrap_err();
        assert!(err.message.contains("Missing extension attribute name"));
    }

    #[test]
    fn test_non_ascii_around_separator() {
        let split = split_extension_urn("ñamespace:ñame").unwrap();
        assert_eq!(split.urn, "ñamespace");
        assert_eq!(split.name, "ñame");
    }
}
