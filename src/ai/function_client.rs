//! Client for the hosted audit function
//!
//! Uploads every document as a multipart part under the shared `files`
//! field. The function does the gateway call itself; this side only maps
//! its statuses and fills in missing response fields. `analyzedFiles` is
//! always the uploaded batch, whatever the function echoes back.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::gateway::{error_message, manual_review_result, upstream_error};
use super::http_client::audit_client;
use super::wire::PartialAuditResponse;
use crate::audit::{dedupe_by_title, AuditBackend, AuditResult, Document};
use crate::config::FunctionConfig;
use crate::error::AuditError;

pub const FILES_FIELD: &str = "files";
pub const DEFAULT_SUMMARY: &str = "Analysis complete.";

const OCTET_STREAM: &str = "application/octet-stream";

/// Turn a hosted function response into an audit result
pub fn interpret_function_response(
    status: StatusCode,
    body: &str,
    uploaded: Vec<String>,
) -> Result<AuditResult, AuditError> {
    if !status.is_success() {
        let message = if body.trim().is_empty() {
            format!("Audit failed with status {}", status.as_u16())
        } else {
            error_message(body)
        };
        return Err(upstream_error(status, message));
    }

    let partial: PartialAuditResponse = match serde_json::from_str(body) {
        Ok(partial) => partial,
        Err(e) => {
            warn!(error = %e, "Unreadable audit function response");
            return Ok(manual_review_result(uploaded));
        }
    };

    Ok(AuditResult {
        issues: dedupe_by_title(partial.issues.unwrap_or_default()),
        summary: partial.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        analyzed_files: uploaded,
    })
}

/// Backend posting the batch to the hosted audit function
pub struct FunctionAuditor {
    config: FunctionConfig,
}

impl FunctionAuditor {
    pub fn new(config: FunctionConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self, AuditError> {
        Ok(Self::new(FunctionConfig::from_env()?))
    }

    fn build_form(documents: &[Document]) -> Form {
        documents.iter().fold(Form::new(), |form, doc| {
            form.part(FILES_FIELD, Self::file_part(doc))
        })
    }

    /// One upload part; an unparsable media type is sent as octet-stream
    fn file_part(doc: &Document) -> Part {
        let media_type = doc.effective_media_type();
        let part = || Part::bytes(doc.content.clone()).file_name(doc.name.clone());

        part().mime_str(&media_type).unwrap_or_else(|e| {
            warn!(file = %doc.name, media_type = %media_type, error = %e, "Invalid media type");
            part().mime_str(OCTET_STREAM).unwrap_or_else(|_| part())
        })
    }

    async fn send(&self, documents: &[Document]) -> Result<AuditResult, AuditError> {
        if documents.is_empty() {
            return Err(AuditError::NoDocuments);
        }

        let form = Self::build_form(documents);
        info!(
            files = documents.len(),
            endpoint = %self.config.endpoint,
            "Uploading documents for audit"
        );

        let response = audit_client()
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let uploaded = documents.iter().map(|d| d.name.clone()).collect();
        interpret_function_response(status, &body, uploaded)
    }
}

#[async_trait]
impl AuditBackend for FunctionAuditor {
    fn name(&self) -> &'static str {
        "function"
    }

    async fn audit(&self, documents: &[Document]) -> Result<AuditResult, AuditError> {
        let span = info_span!("audit", audit_id = %Uuid::new_v4(), backend = "function");
        self.send(documents).instrument(span).await
    }
}
