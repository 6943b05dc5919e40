use serde::{Deserialize, Serialize};

use crate::error::{CsrError, Result};

/// Body of an issuance request: a PEM CSR and the CA asked to sign it.
///
/// Serializes as `{"csrContent": "...", "selectedCAId": 1}`. The PEM text is
/// carried verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrSubmission {
    pub csr_content: String,
    #[serde(rename = "selectedCAId")]
    pub selected_ca_id: i64,
}

impl CsrSubmission {
    pub fn new(csr_content: impl Into<String>, selected_ca_id: i64) -> Self {
        CsrSubmission {
            csr_content: csr_content.into(),
            selected_ca_id,
        }
    }

    /// Rejects a blank CSR body.
    pub fn validate(&self) -> Result<()> {
        if self.csr_content.trim().is_empty() {
            return Err(CsrError::ValidationError(
                "CSR content is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates and serializes the submission.
    pub fn to_json(&self) -> Result<String> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let submission: CsrSubmission = serde_json::from_str(json)
            .map_err(|e| CsrError::DecodingError(e.to_string()))?;
        submission.validate()?;
        Ok(submission)
    }
}
