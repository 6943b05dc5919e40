mod util;

use csrkit::csr::CertificationRequest;
use csrkit::csr::params::SubjectIdentity;
use csrkit::error::CsrError;
use csrkit::pem_utils::{LEGACY_CSR_LABEL, der_to_pem, pem_to_der};
use csrkit::submission::CsrSubmission;
use der::asn1::BitString;

fn example_request() -> CertificationRequest {
    CertificationRequest::from_pem(&util::example_csr().csr_pem).unwrap()
}

#[test]
fn flipped_signature_bit_is_rejected() {
    let mut request = example_request();
    let mut signature = request.inner.signature.raw_bytes().to_vec();
    signature[17] ^= 0x01;
    request.inner.signature = BitString::from_bytes(&signature).unwrap();

    let err = request.verify_signature().unwrap_err();
    assert!(matches!(err, CsrError::SignatureVerificationError(_)));
}

#[test]
fn substituted_subject_is_rejected() {
    let mut request = example_request();
    let other = SubjectIdentity::builder()
        .common_name("attacker.example")
        .organization("Acme Corp")
        .build();
    request.inner.info.subject = other.as_x509_name().unwrap();

    assert!(matches!(
        request.verify_signature(),
        Err(CsrError::SignatureVerificationError(_))
    ));
}

#[test]
fn legacy_pem_label_is_accepted() {
    let (_, der_bytes) = pem_to_der(&util::example_csr().csr_pem).unwrap();
    let request =
        CertificationRequest::from_pem(&der_to_pem(&der_bytes, LEGACY_CSR_LABEL)).unwrap();
    request.verify_signature().unwrap();
}

#[test]
fn private_key_pem_is_not_a_request() {
    let err = CertificationRequest::from_pem(&util::example_csr().private_key_pem).unwrap_err();
    assert!(matches!(err, CsrError::DecodingError(_)));
}

#[test]
fn truncated_der_is_rejected() {
    let (_, der_bytes) = pem_to_der(&util::example_csr().csr_pem).unwrap();
    assert!(CertificationRequest::from_der(&der_bytes[..der_bytes.len() - 1]).is_err());
}

#[test]
fn template_pattern_must_match_whole_common_name() {
    let request = example_request();

    assert!(request.matches_template(None).unwrap());
    assert!(request.matches_template(Some("")).unwrap());
    assert!(request.matches_template(Some(r"[a-z]+\.com")).unwrap());
    assert!(!request.matches_template(Some(r"example")).unwrap());
    assert!(!request.matches_template(Some(r".*\.org")).unwrap());
}

#[test]
fn invalid_template_pattern_is_invalid_input() {
    let err = example_request().matches_template(Some("(")).unwrap_err();
    assert!(matches!(err, CsrError::InvalidInput(_)));
}

#[test]
fn submission_carries_pem_verbatim() {
    let csr_pem = util::example_csr().csr_pem.clone();
    let json = CsrSubmission::new(csr_pem.clone(), 42).to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["csrContent"].as_str(), Some(csr_pem.as_str()));
    assert_eq!(value["selectedCAId"].as_i64(), Some(42));

    let parsed = CsrSubmission::from_json(&json).unwrap();
    CertificationRequest::from_pem(&parsed.csr_content)
        .unwrap()
        .verify_signature()
        .unwrap();
}

#[test]
fn blank_submission_is_rejected() {
    let err = CsrSubmission::new("  \n", 1).to_json().unwrap_err();
    assert_eq!(
        err,
        CsrError::ValidationError("CSR content is required".to_string())
    );

    assert!(CsrSubmission::from_json(r#"{"csrContent":"","selectedCAId":1}"#).is_err());
    assert!(CsrSubmission::from_json(r#"{"csrContent":"x"}"#).is_err());
}
