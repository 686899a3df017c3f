//! Core attribute registries for the SCIM User and Group schemas.
//!
//! Attribute names follow RFC 7643 Sections 4.1 and 4.2, lower-cased, with
//! sub-attributes addressed as `attribute.subattribute`.

use std::fmt;

use serde::{Serialize, Serializer};

use super::field::CoreFieldRegistry;

/// Declares a query field enum together with its lower-case attribute names.
macro_rules! query_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $attr:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            /// Every attribute of the schema, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Lower-case attribute name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $attr),+
                }
            }

            /// Look up an attribute by its lower-case name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($attr => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

query_fields! {
    /// Filterable attributes of the SCIM core User schema.
    pub enum UserQueryField {
        Id => "id",
        ExternalId => "externalid",
        MetaCreated => "meta.created",
        MetaLastModified => "meta.lastmodified",
        MetaLocation => "meta.location",
        MetaVersion => "meta.version",
        MetaResourceType => "meta.resourcetype",
        UserName => "username",
        NameFormatted => "name.formatted",
        NameFamilyName => "name.familyname",
        NameGivenName => "name.givenname",
        NameMiddleName => "name.middlename",
        NameHonorificPrefix => "name.honorificprefix",
        NameHonorificSuffix => "name.honorificsuffix",
        DisplayName => "displayname",
        NickName => "nickname",
        ProfileUrl => "profileurl",
        Title => "title",
        UserType => "usertype",
        PreferredLanguage => "preferredlanguage",
        Locale => "locale",
        Timezone => "timezone",
        Active => "active",
        Emails => "emails",
        EmailsValue => "emails.value",
        EmailsType => "emails.type",
        EmailsPrimary => "emails.primary",
        PhoneNumbers => "phonenumbers",
        PhoneNumbersValue => "phonenumbers.value",
        PhoneNumbersType => "phonenumbers.type",
        PhoneNumbersPrimary => "phonenumbers.primary",
        Ims => "ims",
        ImsValue => "ims.value",
        ImsType => "ims.type",
        ImsPrimary => "ims.primary",
        Photos => "photos",
        PhotosValue => "photos.value",
        PhotosType => "photos.type",
        PhotosPrimary => "photos.primary",
        Addresses => "addresses",
        AddressesFormatted => "addresses.formatted",
        AddressesStreetAddress => "addresses.streetaddress",
        AddressesLocality => "addresses.locality",
        AddressesRegion => "addresses.region",
        AddressesPostalCode => "addresses.postalcode",
        AddressesCountry => "addresses.country",
        AddressesType => "addresses.type",
        AddressesPrimary => "addresses.primary",
        Groups => "groups",
        GroupsValue => "groups.value",
        GroupsDisplay => "groups.display",
        GroupsType => "groups.type",
        Entitlements => "entitlements",
        EntitlementsValue => "entitlements.value",
        EntitlementsType => "entitlements.type",
        EntitlementsPrimary => "entitlements.primary",
        Roles => "roles",
        RolesValue => "roles.value",
        RolesType => "roles.type",
        RolesPrimary => "roles.primary",
        X509Certificates => "x509certificates",
        X509CertificatesValue => "x509certificates.value",
        X509CertificatesType => "x509certificates.type",
        X509CertificatesPrimary => "x509certificates.primary",
    }
}

query_fields! {
    /// Filterable attributes of the SCIM core Group schema.
    pub enum GroupQueryField {
        Id => "id",
        ExternalId => "externalid",
        MetaCreated => "meta.created",
        MetaLastModified => "meta.lastmodified",
        MetaLocation => "meta.location",
        MetaVersion => "meta.version",
        MetaResourceType => "meta.resourcetype",
        DisplayName => "displayname",
        Members => "members",
        MembersValue => "members.value",
        MembersDisplay => "members.display",
        MembersType => "members.type",
    }
}

/// Registry of [`UserQueryField`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRegistry;

impl CoreFieldRegistry for UserRegistry {
    type Field = UserQueryField;

    fn from_string(&self, name: &str) -> Option<UserQueryField> {
        UserQueryField::from_name(name)
    }
}

/// Registry of [`GroupQueryField`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupRegistry;

impl CoreFieldRegistry for GroupRegistry {
    type Field = GroupQueryField;

    fn from_string(&self, name: &str) -> Option<GroupQueryField> {
        GroupQueryField::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_lookup() {
        assert_eq!(UserRegistry.from_string("username"), Some(UserQueryField::UserName));
        assert_eq!(
            UserRegistry.from_string("name.familyname"),
            Some(UserQueryField::NameFamilyName)
        );
        assert_eq!(UserRegistry.from_string("members"), None);
    }

    #[test]
    fn test_lookup_expects_lower_case() {
        assert_eq!(UserRegistry.from_string("userName"), None);
        assert_eq!(GroupRegistry.from_string("displayName"), None);
    }

    #[test]
    fn test_group_lookup() {
        assert_eq!(
            GroupRegistry.from_string("displayname"),
            Some(GroupQueryField::DisplayName)
        );
        assert_eq!(GroupRegistry.from_string("username"), None);
    }

    #[test]
    fn test_names_are_lower_case_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for field in UserQueryField::ALL {
            let name = field.as_str();
            assert_eq!(name, name.to_ascii_lowercase(), "{field:?}");
            assert!(seen.insert(name), "duplicate attribute name {name}");
            assert_eq!(UserQueryField::from_name(name), Some(*field));
        }
    }

    #[test]
    fn test_serializes_as_attribute_name() {
        let json = serde_json::to_string(&UserQueryField::EmailsPrimary).unwrap();
        assert_eq!(json, "\"emails.primary\"");
        assert_eq!(GroupQueryField::MembersValue.to_string(), "members.value");
    }
}
