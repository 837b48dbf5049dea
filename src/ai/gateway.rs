//! Remote audit through an OpenAI-compatible chat-completions gateway
//!
//! One request per audit, no retries: rate limiting (429) and exhausted
//! credits (402) go back to the caller as distinct errors.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::http_client::audit_client;
use super::prompts::{build_audit_prompt, METHODOLOGY_POLICY_VERSION, METHODOLOGY_SYSTEM_PROMPT};
use super::tools::{parse_reported_findings, report_findings_choice, report_findings_tool};
use crate::audit::{dedupe_by_title, AuditBackend, AuditResult, Document};
use crate::config::GatewayConfig;
use crate::error::AuditError;

/// Summary used when the service answered without structured findings
pub const MANUAL_REVIEW_SUMMARY: &str =
    "Analysis complete but structured extraction failed. Please review manually.";

/// Result returned when no findings could be extracted
pub fn manual_review_result(analyzed_files: Vec<String>) -> AuditResult {
    AuditResult {
        issues: Vec::new(),
        summary: MANUAL_REVIEW_SUMMARY.to_string(),
        analyzed_files,
    }
}

/// Map a non-success status to the caller-facing error
pub(crate) fn upstream_error(status: StatusCode, message: String) -> AuditError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => AuditError::rate_limited(),
        StatusCode::PAYMENT_REQUIRED => AuditError::quota_exhausted(),
        _ => AuditError::UpstreamFailure {
            status: status.as_u16(),
            message,
        },
    }
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiErrorDetail {
    Message { message: String },
    Text(String),
}

/// Error message from an OpenAI-style error body, or the raw body
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            error: ApiErrorDetail::Message { message },
        })
        | Ok(ApiError {
            error: ApiErrorDetail::Text(message),
        }) => message,
        Err(_) => body.trim().to_string(),
    }
}

/// Turn a gateway response into an audit result
///
/// `analyzed_files` always comes from the upload batch, never from the
/// service.
pub fn interpret_gateway_response(
    status: StatusCode,
    body: &str,
    analyzed_files: Vec<String>,
) -> Result<AuditResult, AuditError> {
    if !status.is_success() {
        error!(status = status.as_u16(), body = %body, "AI gateway error");
        return Err(upstream_error(status, error_message(body)));
    }

    match parse_reported_findings(body) {
        Ok(findings) => {
            info!(issues = findings.issues.len(), "Structured findings received");
            Ok(AuditResult {
                issues: dedupe_by_title(findings.issues),
                summary: findings.summary,
                analyzed_files,
            })
        }
        Err(reason) => {
            warn!(reason = %reason, "No structured findings, returning manual review result");
            Ok(manual_review_result(analyzed_files))
        }
    }
}

/// Backend delegating the audit to the reasoning gateway
pub struct GatewayAuditor {
    config: GatewayConfig,
}

impl GatewayAuditor {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self, AuditError> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    /// JSON body for the chat-completions request
    pub fn build_request(&self, documents: &[Document]) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": METHODOLOGY_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": build_audit_prompt(documents, self.config.max_excerpt_chars)
                }
            ],
            "tools": [report_findings_tool()],
            "tool_choice": report_findings_choice()
        })
    }

    async fn send(&self, documents: &[Document]) -> Result<AuditResult, AuditError> {
        if documents.is_empty() {
            return Err(AuditError::NoDocuments);
        }

        for doc in documents {
            info!(
                file = %doc.name,
                media_type = %doc.effective_media_type(),
                bytes = doc.content.len(),
                "Received file"
            );
        }

        let request = self.build_request(documents);
        info!(
            model = %self.config.model,
            files = documents.len(),
            "Calling AI gateway for audit analysis"
        );

        let response = audit_client()
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let analyzed_files = documents.iter().map(|d| d.name.clone()).collect();
        interpret_gateway_response(status, &body, analyzed_files)
    }
}

#[async_trait]
impl AuditBackend for GatewayAuditor {
    fn name(&self) -> &'static str {
        "gateway"
    }

    async fn audit(&self, documents: &[Document]) -> Result<AuditResult, AuditError> {
        let span = info_span!(
            "audit",
            audit_id = %Uuid::new_v4(),
            backend = "gateway",
            policy = METHODOLOGY_POLICY_VERSION
        );
        self.send(documents).instrument(span).await
    }
}
