//! Shared types for the pre-audit pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Severity of a finding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Affects the emission reduction calculation or project eligibility
    Major,
    /// Documentation gap, formatting, non-critical
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

/// A single compliance finding, either a catalog entry or a reported issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    #[serde(rename = "type")]
    pub severity: Severity,

    /// Short identifier, also the deduplication key within one audit
    pub title: String,

    pub description: String,

    /// Methodology or document section implicated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Issue {
    pub fn major(title: &str, description: &str) -> Self {
        Self::new(Severity::Major, title, description)
    }

    pub fn minor(title: &str, description: &str) -> Self {
        Self::new(Severity::Minor, title, description)
    }

    fn new(severity: Severity, title: &str, description: &str) -> Self {
        Self {
            severity,
            title: title.to_string(),
            description: description.to_string(),
            section: None,
            suggested_fix: None,
        }
    }

    pub fn with_section(mut self, section: &str) -> Self {
        self.section = Some(section.to_string());
        self
    }

    pub fn with_fix(mut self, fix: &str) -> Self {
        self.suggested_fix = Some(fix.to_string());
        self
    }

    pub fn is_major(&self) -> bool {
        self.severity == Severity::Major
    }
}

/// Methodology-relevant document category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Project Design Document
    Pdd,
    /// Emission calculation spreadsheets
    Calculation,
    /// Methodology reference material
    Methodology,
    Generic,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Pdd,
        Category::Calculation,
        Category::Methodology,
        Category::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdd => "pdd",
            Self::Calculation => "calculation",
            Self::Methodology => "methodology",
            Self::Generic => "generic",
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Pdd => Cardinality { min: 2, max: 3 },
            Self::Calculation => Cardinality { min: 1, max: 2 },
            Self::Methodology | Self::Generic => Cardinality { min: 1, max: 1 },
        }
    }
}

/// Number of issues a selection policy draws for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub min: usize,
    pub max: usize,
}

/// Severity breakdown recomputed from a list of issues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub major: usize,
    pub minor: usize,
}

impl SeverityCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut counts, issue| {
            match issue.severity {
                Severity::Major => counts.major += 1,
                Severity::Minor => counts.minor += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.major + self.minor
    }
}

/// Outcome of one audit run, whichever backend produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Unique by title, in first-seen order
    pub issues: Vec<Issue>,

    pub summary: String,

    /// One entry per input document, in input order
    pub analyzed_files: Vec<String>,
}

impl AuditResult {
    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_issues(&self.issues)
    }
}

/// An uploaded project document
#[derive(Debug, Clone)]
pub struct Document {
    /// Original filename as uploaded
    pub name: String,

    /// Declared media type, if the uploader supplied one
    pub media_type: Option<String>,

    /// Raw bytes; only the remote backends read them
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            content,
        }
    }

    /// A document known only by its filename
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Read a document from disk, guessing the media type from its extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let media_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());

        Ok(Self {
            name,
            media_type,
            content,
        })
    }

    /// Declared media type, or one guessed from the filename
    pub fn effective_media_type(&self) -> String {
        self.media_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_wire_format() {
        let issue = Issue::major("Baseline Emissions Calculation Error", "Mismatch")
            .with_section("Section B.3")
            .with_fix("Recalculate");
        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["type"], "major");
        assert_eq!(json["suggested_fix"], "Recalculate");
        assert_eq!(json["section"], "Section B.3");
    }

    #[test]
    fn test_issue_optional_fields_omitted() {
        let issue = Issue::minor("Missing Monitoring Frequency", "No frequency");
        let json = serde_json::to_value(&issue).unwrap();

        assert!(json.get("section").is_none());
        assert!(json.get("suggested_fix").is_none());
    }

    #[test]
    fn test_audit_result_uses_camel_case() {
        let result = AuditResult {
            issues: vec![],
            summary: "ok".to_string(),
            analyzed_files: vec!["a.pdf".to_string()],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["analyzedFiles"][0], "a.pdf");
    }

    #[test]
    fn test_severity_counts() {
        let issues = vec![
            Issue::major("a", "a"),
            Issue::minor("b", "b"),
            Issue::major("c", "c"),
        ];
        let counts = SeverityCounts::from_issues(&issues);
        assert_eq!(counts.major, 2);
        assert_eq!(counts.minor, 1);
        assert_eq!(counts.total(), issues.len());
    }

    #[test]
    fn test_cardinality_per_category() {
        assert_eq!(Category::Pdd.cardinality(), Cardinality { min: 2, max: 3 });
        assert_eq!(Category::Calculation.cardinality(), Cardinality { min: 1, max: 2 });
        assert_eq!(Category::Methodology.cardinality(), Cardinality { min: 1, max: 1 });
        assert_eq!(Category::Generic.cardinality(), Cardinality { min: 1, max: 1 });
    }

    #[test]
    fn test_effective_media_type() {
        let doc = Document::named("calc_sheet.xlsx");
        assert_eq!(
            doc.effective_media_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );

        let declared = Document::named("blob").with_media_type("application/pdf");
        assert_eq!(declared.effective_media_type(), "application/pdf");
    }

    #[tokio::test]
    async fn test_document_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project_pdd_v2.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = Document::from_path(&path).await.unwrap();
        assert_eq!(doc.name, "project_pdd_v2.pdf");
        assert_eq!(doc.media_type.as_deref(), Some("application/pdf"));
        assert_eq!(doc.content, b"%PDF-1.4");
    }
}
