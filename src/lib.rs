//! # CsrKit - PKCS#10 Certificate Signing Requests in Pure Rust
//!
//! CsrKit generates certificate signing requests for a PKI management
//! backend, built entirely with rustcrypto libraries. A request is generated
//! together with a fresh RSA key pair, signed, checked against its own
//! public key and handed back as a matched pair of PEM blocks.
//!
//! ## Request Format
//!
//! - **Key**: RSA, 2048 bits by default, public exponent 65537
//! - **Signature**: sha256WithRSAEncryption (RSASSA-PKCS1-v1_5)
//! - **Subject**: `CN`, `O`, `C=RS` and an optional `emailAddress`, each in its
//!   own RDN
//! - **Output**: `CERTIFICATE REQUEST` and PKCS#8 `PRIVATE KEY` PEM blocks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use csrkit::csr::{generate_csr, params::SubjectIdentity};
//!
//! # fn main() -> Result<(), csrkit::error::CsrError> {
//! let identity = SubjectIdentity::builder()
//!     .common_name("example.com")
//!     .organization("Acme Corp")
//!     .email("admin@example.com")
//!     .build();
//!
//! let generated = generate_csr(&identity)?;
//! println!("{}", generated.csr_pem);
//! # Ok(())
//! # }
//! ```
//!
//! ### Checking a Request Before Submission
//!
//! ```rust,no_run
//! use csrkit::csr::CertificationRequest;
//! use csrkit::submission::CsrSubmission;
//!
//! # fn main() -> Result<(), csrkit::error::CsrError> {
//! # let csr_pem = String::new();
//! let request = CertificationRequest::from_pem(&csr_pem)?;
//! request.verify_signature()?;
//! assert!(request.matches_template(Some(r"[a-z0-9.-]+\.example\.com"))?);
//!
//! let body = CsrSubmission::new(csr_pem, 3).to_json()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Invalid input is rejected before any key is generated:
//!
//! ```rust
//! use csrkit::csr::{generate_csr, params::SubjectIdentity};
//! use csrkit::error::CsrError;
//!
//! let identity = SubjectIdentity::builder()
//!     .common_name("  ")
//!     .organization("Acme Corp")
//!     .build();
//!
//! match generate_csr(&identity) {
//!     Err(CsrError::ValidationError(msg)) => assert_eq!(msg, "Common Name is required"),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`csr`]: Request generation, decoding and validation
//! - [`key`]: RSA key generation, export, signing and verification
//! - [`pem_utils`]: Base64 and PEM text encoding
//! - [`submission`]: The JSON body accepted by the issuance endpoint
//! - [`error`]: Error types

pub mod csr;
pub mod error;
pub mod key;
pub mod pem_utils;
pub mod submission;
