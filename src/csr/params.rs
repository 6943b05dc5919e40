use std::fmt;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{Any, Ia5StringRef, SetOfVec};
use der::{Tag, Tagged};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use crate::error::{CsrError, Result};

/// Country placed in every generated subject.
pub const DEFAULT_COUNTRY: &str = "RS";

/// commonName (2.5.4.3)
pub const CN_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// organizationName (2.5.4.10)
pub const ORG_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// countryName (2.5.4.6)
pub const COUNTRY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");

/// PKCS#9 emailAddress (1.2.840.113549.1.9.1)
pub const EMAIL_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");

/// Identity a certificate is requested for.
///
/// # Fields
/// * `common_name` - The common name (CN). Required.
/// * `organization` - The organization (O). Required.
/// * `email` - An optional PKCS#9 email address.
///
/// The country (C) is not supplied by the caller; every request carries
/// [`DEFAULT_COUNTRY`].
#[derive(Clone, Debug, Builder, PartialEq, Eq)]
pub struct SubjectIdentity {
    #[builder(into)]
    pub common_name: String,
    #[builder(into)]
    pub organization: String,
    #[builder(into)]
    pub email: Option<String>,
}

impl SubjectIdentity {
    /// Returns a copy with surrounding whitespace removed and a blank email
    /// dropped, or the first validation failure.
    ///
    /// Nothing here touches key material, so callers can fail fast.
    pub fn normalized(&self) -> Result<Self> {
        let common_name = self.common_name.trim();
        if common_name.is_empty() {
            return Err(CsrError::ValidationError(
                "Common Name is required".to_string(),
            ));
        }

        let organization = self.organization.trim();
        if organization.is_empty() {
            return Err(CsrError::ValidationError(
                "Organization is required".to_string(),
            ));
        }

        let email = match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                if !email.is_ascii() {
                    return Err(CsrError::ValidationError(
                        "Email must contain only ASCII characters".to_string(),
                    ));
                }
                Some(email.to_string())
            }
            _ => None,
        };

        Ok(SubjectIdentity {
            common_name: common_name.to_string(),
            organization: organization.to_string(),
            email,
        })
    }

    /// Builds the subject `Name`: CN, O, C and optionally emailAddress, each
    /// in its own single-valued RDN and in that order.
    ///
    /// Values are encoded as-is; call [`SubjectIdentity::normalized`] first.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut rdns = vec![
            single_rdn(CN_OID, Tag::Utf8String, &self.common_name)?,
            single_rdn(ORG_OID, Tag::Utf8String, &self.organization)?,
            single_rdn(COUNTRY_OID, Tag::PrintableString, DEFAULT_COUNTRY)?,
        ];

        if let Some(email) = &self.email {
            Ia5StringRef::new(email).map_err(|_| {
                CsrError::ValidationError("Email must contain only ASCII characters".to_string())
            })?;
            rdns.push(single_rdn(EMAIL_OID, Tag::Ia5String, email)?);
        }

        Ok(RdnSequence(rdns))
    }
}

fn single_rdn(oid: ObjectIdentifier, tag: Tag, value: &str) -> Result<RelativeDistinguishedName> {
    let value = Any::new(tag, value.as_bytes())
        .map_err(|e| CsrError::EncodingError(e.to_string()))?;
    let set = SetOfVec::try_from(vec![AttributeTypeAndValue { oid, value }])
        .map_err(|e| CsrError::EncodingError(e.to_string()))?;
    Ok(RelativeDistinguishedName(set))
}

/// Subject attributes read back from an encoded request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: Option<String>,
    pub organization: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
}

impl DistinguishedName {
    /// Extracts the attributes this crate writes from an X.509 name.
    ///
    /// Unknown attribute types are skipped. A known attribute whose value is
    /// not a character string is a decoding error.
    pub fn from_x509_name(x509dn: &Name) -> Result<Self> {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let slot = match attr.oid {
                    CN_OID => &mut dn.common_name,
                    ORG_OID => &mut dn.organization,
                    COUNTRY_OID => &mut dn.country,
                    EMAIL_OID => &mut dn.email,
                    _ => continue,
                };
                *slot = Some(attribute_string(attr)?);
            }
        }

        Ok(dn)
    }
}

fn attribute_string(attr: &AttributeTypeAndValue) -> Result<String> {
    match attr.value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::TeletexString => {
            std::str::from_utf8(attr.value.value())
                .map(str::to_string)
                .map_err(|e| CsrError::DecodingError(format!("attribute {}: {e}", attr.oid)))
        }
        tag => Err(CsrError::DecodingError(format!(
            "attribute {} has non-string value {tag}",
            attr.oid
        ))),
    }
}

impl fmt::Display for DistinguishedName {
    /// Writes `CN=..,O=..,C=..,emailAddress=..` in subject order, skipping
    /// absent attributes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("CN", &self.common_name),
            ("O", &self.organization),
            ("C", &self.country),
            ("emailAddress", &self.email),
        ];
        let mut first = true;
        for (key, value) in parts {
            if let Some(value) = value {
                if !first {
                    f.write_str(",")?;
                }
                write!(f, "{key}={value}")?;
                first = false;
            }
        }
        Ok(())
    }
}
