use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CsrError, Result};

/// PEM label of a PKCS#10 certification request.
pub const CSR_LABEL: &str = "CERTIFICATE REQUEST";

/// Legacy label some tools still emit for PKCS#10 requests.
pub const LEGACY_CSR_LABEL: &str = "NEW CERTIFICATE REQUEST";

/// PEM label of a PKCS#8 private key.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// Width of a Base64 line inside a PEM block.
pub const LINE_WIDTH: usize = 64;

/// Input is encoded this many bytes at a time. A multiple of 3 keeps every
/// chunk free of padding so the pieces concatenate into one valid string.
const CHUNK_SIZE: usize = 3 * 10922;

/// Encode an arbitrary byte buffer as standard, padded Base64.
pub fn to_base64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(CHUNK_SIZE) {
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

/// Wrap a Base64 string into a PEM block with the given label.
///
/// The body is split into lines of [`LINE_WIDTH`] characters and the block
/// ends with exactly one newline after the `END` line.
pub fn to_pem(base64: &str, label: &str) -> String {
    let mut out =
        String::with_capacity(base64.len() + base64.len() / LINE_WIDTH + 2 * label.len() + 34);
    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n");
    // Wrap on characters, not bytes, so the body is copied through unchanged.
    for (i, c) in base64.chars().enumerate() {
        if i > 0 && i % LINE_WIDTH == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    if !base64.is_empty() {
        out.push('\n');
    }
    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    out
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    to_pem(&to_base64(der), label)
}

/// Convert a PEM‑encoded string to its label and DER‑encoded bytes.
pub fn pem_to_der(pem_str: &str) -> Result<(String, Vec<u8>)> {
    let pem = pem::parse(pem_str.trim())?;
    if pem.contents().is_empty() {
        return Err(CsrError::DecodingError(format!(
            "PEM block '{}' has no content",
            pem.tag()
        )));
    }
    Ok((pem.tag().to_string(), pem.contents().to_vec()))
}
