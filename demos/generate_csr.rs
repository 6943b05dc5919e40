use csrkit::csr::params::SubjectIdentity;
use csrkit::csr::{CertificationRequest, CsrBuilder};
use csrkit::submission::CsrSubmission;

fn main() -> Result<(), csrkit::error::CsrError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let common_name = args.next().unwrap_or_else(|| "example.com".to_string());
    let organization = args.next().unwrap_or_else(|| "Acme Corp".to_string());
    let email = args.next();

    let identity = SubjectIdentity::builder()
        .common_name(common_name)
        .organization(organization)
        .maybe_email(email)
        .build();

    let generated = CsrBuilder::default().generate(&identity)?;

    let request = CertificationRequest::from_pem(&generated.csr_pem)?;
    println!("Subject: {}", request.subject()?);
    println!("{}", generated.csr_pem);
    println!("{}", generated.private_key_pem.as_str());

    println!("{}", CsrSubmission::new(generated.csr_pem, 1).to_json()?);
    Ok(())
}
