pub mod params;
pub mod validator;

use std::fmt;
use std::sync::Arc;

use bon::Builder;
use der::asn1::{AnyRef, BitString};
use der::{Decode, Encode};
use log::{debug, error};
use x509_cert::attr::Attributes;
use x509_cert::request::{CertReq, CertReqInfo, Version};
use zeroize::Zeroizing;

use crate::error::{CsrError, Result};
use crate::key::{DEFAULT_KEY_BITS, KeyGenerator, KeyPair, RsaKeyGenerator};
use crate::pem_utils::{CSR_LABEL, LEGACY_CSR_LABEL, der_to_pem, pem_to_der};
use params::SubjectIdentity;

/// Represents the supported signature algorithms for certification requests.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (RSASSA-PKCS1-v1_5).
    Sha256WithRSA,
}

impl SignatureAlgorithm {
    /// Looks up the algorithm named by an `AlgorithmIdentifier`.
    pub fn from_algorithm_identifier(
        algorithm: &x509_cert::spki::AlgorithmIdentifierOwned,
    ) -> Result<Self> {
        match algorithm.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Ok(Self::Sha256WithRSA),
            oid => Err(CsrError::DecodingError(format!(
                "Unsupported signature algorithm {oid}"
            ))),
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// PKCS#1 signature algorithms carry an explicit NULL parameter.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(AnyRef::NULL.into()),
            },
        }
    }
}

/// A PKCS#10 certification request.
///
/// Parsing and checking an existing request lives in [`validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequest {
    /// The inner representation of the request.
    pub inner: CertReq,
}

impl CertificationRequest {
    /// Decodes a request from strict DER.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self> {
        let inner = CertReq::from_der(der_bytes)?;
        Ok(CertificationRequest { inner })
    }

    /// Decodes a request from a `CERTIFICATE REQUEST` PEM block.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let (label, der_bytes) = pem_to_der(pem_str)?;
        if label != CSR_LABEL && label != LEGACY_CSR_LABEL {
            return Err(CsrError::DecodingError(format!(
                "expected a {CSR_LABEL} PEM block, found {label}"
            )));
        }
        Self::from_der(&der_bytes)
    }

    /// Encodes the request into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CsrError::EncodingError(e.to_string()))
    }

    /// Encodes the request into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        Ok(der_to_pem(&self.to_der()?, CSR_LABEL))
    }
}

/// A freshly generated request and the private key that signed it.
///
/// The two PEM blocks are a matched pair. The private key is zeroized when
/// this value is dropped.
#[derive(Clone)]
pub struct GeneratedCsr {
    pub csr_pem: String,
    pub private_key_pem: Zeroizing<String>,
}

impl fmt::Debug for GeneratedCsr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedCsr")
            .field("csr_pem", &self.csr_pem)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

/// Generates a CSR and a fresh 2048-bit RSA key for `identity`.
///
/// Shorthand for [`CsrBuilder::generate`] with the default configuration.
pub fn generate_csr(identity: &SubjectIdentity) -> Result<GeneratedCsr> {
    CsrBuilder::default().generate(identity)
}

/// Generates certification requests.
///
/// # Fields
/// * `key_bits` - RSA modulus length of generated keys. Defaults to 2048.
/// * `key_generator` - Overrides where key pairs come from. When set,
///   `key_bits` is not consulted.
#[derive(Clone, Builder)]
pub struct CsrBuilder {
    #[builder(default = DEFAULT_KEY_BITS)]
    key_bits: usize,
    key_generator: Option<Arc<dyn KeyGenerator>>,
}

impl Default for CsrBuilder {
    fn default() -> Self {
        CsrBuilder::builder().build()
    }
}

impl fmt::Debug for CsrBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrBuilder")
            .field("key_bits", &self.key_bits)
            .field("custom_key_generator", &self.key_generator.is_some())
            .finish()
    }
}

impl CsrBuilder {
    /// Builds, signs and self-verifies a PKCS#10 request for `identity`.
    ///
    /// Input is validated before any key is generated. A request whose
    /// signature does not verify after encoding is never returned.
    pub fn generate(&self, identity: &SubjectIdentity) -> Result<GeneratedCsr> {
        let identity = identity.normalized()?;
        let key_pair = self.generate_key_pair()?;

        let subject = identity.as_x509_name()?;
        let public_key = key_pair.public_key().to_spki()?;

        let info = CertReqInfo {
            version: Version::V1,
            subject,
            public_key,
            attributes: Attributes::new(),
        };
        let info_der = info
            .to_der()
            .map_err(|e| CsrError::EncodingError(e.to_string()))?;
        debug!(
            "encoded CertificationRequestInfo for CN={} ({} bytes)",
            identity.common_name,
            info_der.len()
        );

        let signature = key_pair.sign_data(&info_der)?;

        let request = CertificationRequest {
            inner: CertReq {
                info,
                algorithm: SignatureAlgorithm::Sha256WithRSA.into(),
                signature: BitString::from_bytes(&signature)
                    .map_err(|e| CsrError::EncodingError(e.to_string()))?,
            },
        };
        let request_der = request.to_der()?;

        self_verify(&request_der, &info_der).inspect_err(|e| {
            error!(
                "generated request for CN={} failed self-verification: {e}",
                identity.common_name
            );
        })?;
        debug!("request for CN={} passed self-verification", identity.common_name);

        Ok(GeneratedCsr {
            csr_pem: der_to_pem(&request_der, CSR_LABEL),
            private_key_pem: key_pair.to_pkcs8_pem()?,
        })
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        match &self.key_generator {
            Some(generator) => generator.generate(),
            None => RsaKeyGenerator {
                bits: self.key_bits,
            }
            .generate(),
        }
    }
}

/// Decodes the final encoding and checks its signature against the embedded
/// public key. The decoded info must re-encode to exactly the signed bytes.
fn self_verify(request_der: &[u8], signed_info: &[u8]) -> Result<()> {
    let decoded = CertificationRequest::from_der(request_der).map_err(|e| {
        CsrError::SignatureVerificationError(format!("encoded request does not decode: {e}"))
    })?;

    let reencoded = decoded
        .inner
        .info
        .to_der()
        .map_err(|e| CsrError::SignatureVerificationError(e.to_string()))?;
    if reencoded != signed_info {
        return Err(CsrError::SignatureVerificationError(format!(
            "encoded request info ({} bytes) differs from signed bytes ({} bytes)",
            reencoded.len(),
            signed_info.len()
        )));
    }

    decoded.verify_signature().map_err(|e| match e {
        CsrError::SignatureVerificationError(_) => e,
        other => CsrError::SignatureVerificationError(other.to_string()),
    })
}
