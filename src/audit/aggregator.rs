//! Merging per-document findings into one audit result

use std::collections::HashSet;

use super::types::{AuditResult, Issue, SeverityCounts};

pub const COMPLIANT_SUMMARY: &str =
    "No compliance issues found. The documents appear to meet the methodology requirements.";

/// Keep the first issue seen for each title, dropping later ones even when
/// their other fields differ
pub fn dedupe_by_title(issues: impl IntoIterator<Item = Issue>) -> Vec<Issue> {
    let mut seen = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.title.clone()))
        .collect()
}

/// Human-readable summary of an audit
pub fn summarize(counts: SeverityCounts, document_count: usize) -> String {
    let total = counts.total();
    if total == 0 {
        return COMPLIANT_SUMMARY.to_string();
    }

    format!(
        "Found {} {} ({} major, {} minor) across {} {}.",
        total,
        plural(total, "issue", "issues"),
        counts.major,
        counts.minor,
        document_count,
        plural(document_count, "document", "documents"),
    )
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Merge per-document selections, in document order
///
/// Deduplication is global across the batch: two documents reporting the
/// same title yield one issue, attributed to whichever came first.
pub fn merge_findings<I>(per_document: I) -> AuditResult
where
    I: IntoIterator<Item = (String, Vec<Issue>)>,
{
    let mut analyzed_files = Vec::new();
    let mut candidates = Vec::new();

    for (name, issues) in per_document {
        analyzed_files.push(name);
        candidates.extend(issues);
    }

    let issues = dedupe_by_title(candidates);
    let counts = SeverityCounts::from_issues(&issues);
    let summary = summarize(counts, analyzed_files.len());

    AuditResult {
        issues,
        summary,
        analyzed_files,
    }
}
