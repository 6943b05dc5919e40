//! Checks applied to a certification request before it is submitted for
//! issuance: proof of possession, subject extraction and template matching.

use der::Encode;
use log::{debug, warn};
use regex::Regex;

use super::params::DistinguishedName;
use super::{CertificationRequest, SignatureAlgorithm};
use crate::error::{CsrError, Result};
use crate::key::PublicKey;

impl CertificationRequest {
    /// Verifies the request's signature with the public key it carries.
    ///
    /// A valid signature proves the requester holds the matching private key.
    pub fn verify_signature(&self) -> Result<()> {
        // Decoding already rejects versions other than v1.
        self.signature_algorithm()?;

        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            CsrError::SignatureVerificationError(
                "signature bit string has unused bits".to_string(),
            )
        })?;
        let body = self.inner.info.to_der()?;

        self.public_key()?.verify(&body, signature).inspect_err(|e| {
            warn!("request signature rejected: {e}");
        })
    }

    /// The signature algorithm named in the request.
    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm> {
        SignatureAlgorithm::from_algorithm_identifier(&self.inner.algorithm)
    }

    /// Subject attributes of the request.
    pub fn subject(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.info.subject)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.info.public_key)
    }

    /// DER encoding of the embedded `SubjectPublicKeyInfo`.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        self.inner
            .info
            .public_key
            .to_der()
            .map_err(|e| CsrError::EncodingError(e.to_string()))
    }

    /// Checks the common name against a certificate template pattern.
    ///
    /// The pattern must match the whole common name. No pattern, or an empty
    /// one, accepts every request.
    pub fn matches_template(&self, cn_pattern: Option<&str>) -> Result<bool> {
        let pattern = match cn_pattern {
            Some(pattern) if !pattern.is_empty() => pattern,
            _ => return Ok(true),
        };
        let re = Regex::new(&format!("^(?:{pattern})$"))?;

        let subject = self.subject()?;
        let Some(common_name) = subject.common_name.as_deref() else {
            debug!("request has no common name to match against {pattern}");
            return Ok(false);
        };

        let matched = re.is_match(common_name);
        if !matched {
            debug!("common name {common_name} does not match template pattern {pattern}");
        }
        Ok(matched)
    }
}
