//! Local pre-audit pipeline
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  1. CLASSIFY: filename (+ media type) → Category             │
//! │  2. SELECT: SelectionPolicy draws catalog issues per doc     │
//! │  3. MERGE: dedupe by title (first seen wins), count, summary │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The remote backends in `crate::ai` produce the same [`AuditResult`].

mod aggregator;
mod backend;
mod catalog;
mod classifier;
mod selector;
pub mod types;

pub use aggregator::{dedupe_by_title, merge_findings, summarize, COMPLIANT_SUMMARY};
pub use backend::{AuditBackend, LocalAuditor};
pub use catalog::{IssueCatalog, BUILTIN_VERSION};
pub use classifier::{classify, classify_with_media_type};
pub use selector::{LeadingSelection, RandomSelection, SelectionPolicy};
pub use types::{AuditResult, Cardinality, Category, Document, Issue, Severity, SeverityCounts};
