use log::debug;
use pkcs8::{DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use zeroize::Zeroizing;

use crate::error::{CsrError, Result};
use crate::pem_utils::{PRIVATE_KEY_LABEL, to_base64, to_pem};

/// Default RSA modulus length.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// RSA modulus lengths accepted for freshly generated keys.
pub const SUPPORTED_KEY_BITS: [usize; 3] = [2048, 3072, 4096];

/// Public exponent of every generated key (F4).
pub const PUBLIC_EXPONENT: u64 = 65537;

/// An RSA key pair used for RSASSA-PKCS1-v1_5 with SHA-256.
///
/// The private half is zeroized when the pair is dropped.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .field("private", &"<redacted>")
            .finish()
    }
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits and
    /// public exponent 65537.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        if !SUPPORTED_KEY_BITS.contains(&bits) {
            return Err(CsrError::InvalidInput(format!(
                "unsupported RSA key size {bits}, expected one of {SUPPORTED_KEY_BITS:?}"
            )));
        }
        let mut rng = rand_core::OsRng;
        let exp = BigUint::from(PUBLIC_EXPONENT);
        let private = RsaPrivateKey::new_with_exp(&mut rng, bits, &exp)
            .map_err(|e| CsrError::KeyGenerationError(e.to_string()))?;
        debug!("generated {bits}-bit RSA key pair");
        Ok(Self::from_private_key(private))
    }

    /// Wrap an existing RSA private key.
    pub fn from_private_key(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    /// Modulus length in bits.
    pub fn bits(&self) -> usize {
        self.public.n().bits()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over a SHA-256 digest.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::<Sha256>::new(self.private.as_ref().clone());
        let signature: Signature = signing_key
            .try_sign(data)
            .map_err(|e| CsrError::SigningError(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Export the private key as PKCS#8 DER.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let doc = self.private.to_pkcs8_der()?;
        Ok(Zeroizing::new(doc.as_bytes().to_vec()))
    }

    /// Export the private key as a `PRIVATE KEY` PEM block.
    pub fn to_pkcs8_pem(&self) -> Result<Zeroizing<String>> {
        let der = self.to_pkcs8_der()?;
        let base64 = Zeroizing::new(to_base64(&der));
        Ok(Zeroizing::new(to_pem(&base64, PRIVATE_KEY_LABEL)))
    }
}

/// The public half of an RSA key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        key_pair.public_key()
    }

    /// Recover the key from a decoded `SubjectPublicKeyInfo`.
    ///
    /// Only rsaEncryption keys are accepted.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        if spki.algorithm.oid != const_oid::db::rfc5912::RSA_ENCRYPTION {
            return Err(CsrError::DecodingError(format!(
                "unsupported public key algorithm {}",
                spki.algorithm.oid
            )));
        }
        let der = der::Encode::to_der(spki)?;
        let public = RsaPublicKey::from_public_key_der(&der)?;
        Ok(PublicKey(public))
    }

    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }

    /// Modulus length in bits.
    pub fn bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Encode as a `SubjectPublicKeyInfo` structure.
    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        SubjectPublicKeyInfoOwned::from_key(self.0.clone())
            .map_err(|e| CsrError::EncodingError(e.to_string()))
    }

    /// DER encoding of the `SubjectPublicKeyInfo`.
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .0
            .to_public_key_der()
            .map_err(|e| CsrError::EncodingError(e.to_string()))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// Verifies an RSASSA-PKCS1-v1_5/SHA-256 signature over `data`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key = VerifyingKey::<Sha256>::new(self.0.clone());
        let signature = Signature::try_from(signature)
            .map_err(|e| CsrError::SignatureVerificationError(e.to_string()))?;
        verifying_key
            .verify(data, &signature)
            .map_err(|e| CsrError::SignatureVerificationError(e.to_string()))
    }
}

/// Source of fresh key pairs for CSR generation.
///
/// Every call must return an unrelated key pair.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> Result<KeyPair>;
}

/// Generates RSA keys from the operating system RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RsaKeyGenerator {
    pub bits: usize,
}

impl Default for RsaKeyGenerator {
    fn default() -> Self {
        RsaKeyGenerator {
            bits: DEFAULT_KEY_BITS,
        }
    }
}

impl KeyGenerator for RsaKeyGenerator {
    fn generate(&self) -> Result<KeyPair> {
        KeyPair::generate_rsa(self.bits)
    }
}
