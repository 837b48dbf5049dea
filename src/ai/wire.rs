//! JSON bodies of the hosted audit function
//!
//! Success: `{status, summary, issues, analyzedFiles}`. Failure: `{error}`
//! with the HTTP status from [`AuditError::status_code`].

use serde::{Deserialize, Serialize};

use crate::audit::{AuditResult, Issue};
use crate::error::AuditError;

pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub status: String,
    pub summary: String,
    pub issues: Vec<Issue>,
    pub analyzed_files: Vec<String>,
}

impl From<AuditResult> for AuditResponse {
    fn from(result: AuditResult) -> Self {
        Self {
            status: STATUS_COMPLETED.to_string(),
            summary: result.summary,
            issues: result.issues,
            analyzed_files: result.analyzed_files,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&AuditError> for ErrorBody {
    fn from(err: &AuditError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Lenient view of a success body; every field may be missing
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PartialAuditResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub issues: Option<Vec<Issue>>,
}
