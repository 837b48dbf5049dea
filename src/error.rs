//! Error types for the audit backends and the issue catalog

use serde::Serialize;
use thiserror::Error;

use crate::audit::Category;

/// What a caller can sensibly do after a failed audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryHint {
    /// Transient transport failure; the same request may succeed immediately
    RetryNow,
    /// The reasoning service is throttling; retry after a delay
    RetryLater,
    /// Credits exhausted; nothing succeeds until billing is resolved
    ContactBilling,
    NotRetryable,
}

/// Failure of an audit request
///
/// The local pipeline never produces one of these. Remote backends return
/// them only when no result can be produced; a missing structured payload
/// degrades to a manual-review result instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("{message}")]
    RateLimited { message: String },

    #[error("{message}")]
    QuotaExhausted { message: String },

    #[error("upstream error ({status}): {message}")]
    UpstreamFailure { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{var} is not configured")]
    MissingCredentials { var: String },

    #[error("no files uploaded")]
    NoDocuments,

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait a moment and try again.";
pub const QUOTA_MESSAGE: &str = "AI usage limit reached. Please add credits to continue.";

impl AuditError {
    pub fn rate_limited() -> Self {
        Self::RateLimited {
            message: RATE_LIMIT_MESSAGE.to_string(),
        }
    }

    pub fn quota_exhausted() -> Self {
        Self::QuotaExhausted {
            message: QUOTA_MESSAGE.to_string(),
        }
    }

    pub fn retry_hint(&self) -> RetryHint {
        match self {
            Self::RateLimited { .. } => RetryHint::RetryLater,
            Self::QuotaExhausted { .. } => RetryHint::ContactBilling,
            Self::UpstreamFailure { status, .. } if *status >= 500 => RetryHint::RetryNow,
            Self::Transport(_) => RetryHint::RetryNow,
            Self::UpstreamFailure { .. }
            | Self::MissingCredentials { .. }
            | Self::NoDocuments
            | Self::Io(_) => RetryHint::NotRetryable,
        }
    }

    /// HTTP status a hosting service should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RateLimited { .. } => 429,
            Self::QuotaExhausted { .. } => 402,
            Self::UpstreamFailure { status, .. } => *status,
            Self::Transport(_) => 502,
            Self::NoDocuments => 400,
            Self::MissingCredentials { .. } | Self::Io(_) => 500,
        }
    }
}

/// Invalid issue catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no issues for category '{}'", .0.as_str())]
    EmptyCategory(Category),

    #[error("duplicate issue title '{title}' in category '{}'", .category.as_str())]
    DuplicateTitle { category: Category, title: String },

    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
}
