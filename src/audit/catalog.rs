//! Issue catalog
//!
//! Candidate findings per document category. The catalog is plain data: a
//! new version can be loaded from JSON without touching the selection or
//! aggregation code.
//!
//! ```json
//! {
//!   "version": "ph-am004/2",
//!   "categories": {
//!     "pdd": [{"type": "major", "title": "...", "description": "..."}],
//!     "calculation": [...],
//!     "methodology": [...],
//!     "generic": [...]
//!   }
//! }
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::types::{Category, Issue};
use crate::error::CatalogError;

pub const BUILTIN_VERSION: &str = "ph-am004/1";

/// Immutable table of candidate issues, shared by reference across audits
#[derive(Debug, Clone)]
pub struct IssueCatalog {
    version: String,
    entries: HashMap<Category, Vec<Issue>>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    version: String,
    categories: HashMap<Category, Vec<Issue>>,
}

impl IssueCatalog {
    /// Build a catalog, checking that every category has issues and that
    /// titles are unique within each category
    pub fn new(
        version: impl Into<String>,
        entries: HashMap<Category, Vec<Issue>>,
    ) -> Result<Self, CatalogError> {
        for category in Category::ALL {
            let issues = entries
                .get(&category)
                .filter(|issues| !issues.is_empty())
                .ok_or(CatalogError::EmptyCategory(category))?;

            let mut seen = HashSet::new();
            for issue in issues {
                if !seen.insert(issue.title.as_str()) {
                    return Err(CatalogError::DuplicateTitle {
                        category,
                        title: issue.title.clone(),
                    });
                }
            }
        }

        Ok(Self {
            version: version.into(),
            entries,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::new(doc.version, doc.categories)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn issues(&self, category: Category) -> &[Issue] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: Category, title: &str) -> bool {
        self.issues(category).iter().any(|i| i.title == title)
    }

    /// Curated findings for JCM PH_AM004 (rice paddy water management)
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(Category::Pdd, pdd_issues());
        entries.insert(Category::Calculation, calculation_issues());
        entries.insert(Category::Methodology, methodology_issues());
        entries.insert(Category::Generic, generic_issues());

        Self {
            version: BUILTIN_VERSION.to_string(),
            entries,
        }
    }
}

impl Default for IssueCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn pdd_issues() -> Vec<Issue> {
    vec![
        Issue::major(
            "Baseline Emissions Calculation Error",
            "Reference CH4 emissions stated in the PDD do not follow RE_p = RE_CH4,p + RE_N2O,p + RE_CO2,p. The N2O term is omitted from the reference total.",
        )
        .with_section("Section C - Calculation of Emission Reductions")
        .with_fix("Recompute RE_p including all three gases and reconcile the figure with the calculation sheet."),
        Issue::minor(
            "Missing Monitoring Frequency",
            "The monitoring plan lists EF_CH4,R,s,st and EF_CH4,P,s,st without the weekly measurement frequency required by the monitoring spreadsheet.",
        )
        .with_section("Section D - Monitoring Plan")
        .with_fix("State a weekly frequency for both CH4 emission factors and the responsible personnel."),
        Issue::major(
            "Eligibility Criterion 2 Not Demonstrated",
            "No evidence that participating farmers did not practise the target drainage regime in the two years before the project start.",
        )
        .with_section("Section B - Eligibility Criteria")
        .with_fix("Attach farmer interviews or irrigation records covering the two preceding years."),
        Issue::major(
            "Drainage Completion Threshold Not Defined",
            "The PDD does not define drainage completion as a water level 15 cm below the soil surface, nor re-irrigation within 2 days.",
        )
        .with_section("Section B - Eligibility Criteria")
        .with_fix("Add the 15 cm threshold and the 2-day re-irrigation rule to the project description."),
        Issue::minor(
            "Legislative Requirement Check Missing",
            "The PDD does not confirm that single or multiple drainage is not mandated by local or national legislation.",
        )
        .with_section("Section B - Eligibility Criteria")
        .with_fix("Cite the applicable regulations and state that drainage is voluntary."),
        Issue::minor(
            "Stratification Table Incomplete",
            "Strata are defined by on-season water regime only; pre-season regime, soil type and organic amendment type from Table 1 are not listed.",
        )
        .with_section("Section A - Project Description")
        .with_fix("Complete the stratification with p1-p3, s1-s4 and o1-o6 codes for each field group."),
        Issue::major(
            "Leakage Emissions Underestimated",
            "Project CO2 from drainage pumps is excluded although pump use is required for the project scenario.",
        )
        .with_section("Section C - Project Emissions")
        .with_fix("Include PE_CO2,p from fuel consumed by drainage pumps."),
    ]
}

fn calculation_issues() -> Vec<Issue> {
    vec![
        Issue::major(
            "Incorrect GWP for Methane",
            "The sheet applies GWP_CH4 = 21 instead of the 28.0 tCO2e/tCH4 required by the methodology.",
        )
        .with_section("Excel - Parameters")
        .with_fix("Set GWP_CH4 to 28.0 and GWP_N2O to 265."),
        Issue::major(
            "Uncertainty Deduction Not Applied",
            "Emission reductions are reported as RE_p - PE_p without the (1 - Ud) factor.",
        )
        .with_section("Excel - Emission Reductions")
        .with_fix("Apply Ud_DM (0.05 or 0.10) or Ud_EF (0.15) according to the chosen monitoring option."),
        Issue::major(
            "Scaling Factor Mismatch",
            "SF_P,w = 0.71 is used for fields declared as multiple drainage; the methodology requires 0.55.",
        )
        .with_section("Excel - Project CH4")
        .with_fix("Use 0.55 for multiple drainage strata and 0.71 only for single drainage."),
        Issue::minor(
            "Emission Factor Source Not Cited",
            "Country-specific EF_CH4,c,s,d values (1.46 and 2.95 kg/ha/day) are entered without a reference.",
        )
        .with_section("Excel - Parameters")
        .with_fix("Reference the national inventory or study the default factors were taken from."),
        Issue::major(
            "N2O Conversion Factor Missing",
            "N2O emissions are computed from N input without the 44/28 conversion from N2O-N to N2O.",
        )
        .with_section("Excel - N2O Emissions")
        .with_fix("Multiply N2O-N by 44/28 before applying GWP_N2O."),
        Issue::minor(
            "Organic Amendment Rates Unsourced",
            "ROA_s,st,i values are hard-coded with no monitoring record for the end of the period.",
        )
        .with_section("Excel - Scaling Factors")
        .with_fix("Link ROA inputs to the monitoring records collected at the end of each period."),
    ]
}

fn methodology_issues() -> Vec<Issue> {
    vec![
        Issue::major(
            "Methodology Version Mismatch",
            "The reference document cites a methodology version that differs from PH_AM004 v01.0 applied in the PDD.",
        )
        .with_section("Methodology Reference")
        .with_fix("Align all documents on PH_AM004 version 01.0 or justify the deviation."),
        Issue::minor(
            "Measurement Option Not Declared",
            "The document does not state whether direct measurement or the country-specific emission factor option is used for CH4.",
        )
        .with_section("Methodology - CH4 Options")
        .with_fix("Declare the option and the matching uncertainty deduction."),
        Issue::minor(
            "CFOA Table Outdated",
            "Conversion factors for organic amendments do not match the current methodology values (e.g. compost 0.17, FYM 0.21).",
        )
        .with_section("Methodology - Scaling Factors")
        .with_fix("Update the CFOA table to the values in PH_AM004 v01.0."),
    ]
}

fn generic_issues() -> Vec<Issue> {
    vec![
        Issue::minor(
            "Document Purpose Unclear",
            "The document could not be mapped to a PDD, calculation sheet or methodology reference.",
        )
        .with_section("General")
        .with_fix("Rename the file or add a cover page describing its role in the submission."),
        Issue::minor(
            "Supporting Evidence Not Referenced",
            "The document is not referenced from the PDD, so its relevance to the audit cannot be verified.",
        )
        .with_section("General")
        .with_fix("Cross-reference the document from the relevant PDD section."),
        Issue::minor(
            "Missing Version Control",
            "No version number or issue date is shown on the document.",
        )
        .with_section("General")
        .with_fix("Add a version number and date consistent with the PDD."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_satisfies_invariants() {
        let builtin = IssueCatalog::builtin();
        let entries: HashMap<Category, Vec<Issue>> = Category::ALL
            .iter()
            .map(|c| (*c, builtin.issues(*c).to_vec()))
            .collect();

        assert!(IssueCatalog::new(BUILTIN_VERSION, entries).is_ok());
        assert_eq!(builtin.version(), BUILTIN_VERSION);
    }

    #[test]
    fn test_builtin_covers_pdd_draw_size() {
        let catalog = IssueCatalog::builtin();
        for category in Category::ALL {
            assert!(catalog.issues(category).len() >= category.cardinality().max);
        }
    }

    #[test]
    fn test_contains() {
        let catalog = IssueCatalog::builtin();
        assert!(catalog.contains(Category::Pdd, "Missing Monitoring Frequency"));
        assert!(!catalog.contains(Category::Generic, "Missing Monitoring Frequency"));
    }

    #[test]
    fn test_rejects_empty_category() {
        let mut entries = HashMap::new();
        entries.insert(Category::Pdd, vec![Issue::major("a", "a")]);
        entries.insert(Category::Calculation, vec![Issue::major("b", "b")]);
        entries.insert(Category::Methodology, vec![]);
        entries.insert(Category::Generic, vec![Issue::minor("c", "c")]);

        let err = IssueCatalog::new("test", entries).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategory(Category::Methodology)));
    }

    #[test]
    fn test_rejects_duplicate_title() {
        let mut entries = HashMap::new();
        entries.insert(
            Category::Pdd,
            vec![Issue::major("same", "one"), Issue::minor("same", "two")],
        );
        for category in [Category::Calculation, Category::Methodology, Category::Generic] {
            entries.insert(category, vec![Issue::minor("x", "x")]);
        }

        let err = IssueCatalog::new("test", entries).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTitle { category: Category::Pdd, .. }));
    }

    #[test]
    fn test_same_title_allowed_across_categories() {
        let entries: HashMap<Category, Vec<Issue>> = Category::ALL
            .iter()
            .map(|c| (*c, vec![Issue::minor("shared", "x")]))
            .collect();
        assert!(IssueCatalog::new("test", entries).is_ok());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "version": "ph-am004/2",
            "categories": {
                "pdd": [{"type": "major", "title": "A", "description": "a", "section": "S"}],
                "calculation": [{"type": "minor", "title": "B", "description": "b"}],
                "methodology": [{"type": "minor", "title": "C", "description": "c"}],
                "generic": [{"type": "minor", "title": "D", "description": "d", "suggested_fix": "f"}]
            }
        }"#;

        let catalog = IssueCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.version(), "ph-am004/2");
        assert_eq!(catalog.issues(Category::Pdd)[0].section.as_deref(), Some("S"));
        assert_eq!(
            catalog.issues(Category::Generic)[0].suggested_fix.as_deref(),
            Some("f")
        );
    }

    #[test]
    fn test_from_json_str_missing_category() {
        let json = r#"{"version": "v", "categories": {"pdd": [{"type": "major", "title": "A", "description": "a"}]}}"#;
        assert!(matches!(
            IssueCatalog::from_json_str(json),
            Err(CatalogError::EmptyCategory(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            IssueCatalog::from_path(&path),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            IssueCatalog::from_path(&dir.path().join("missing.json")),
            Err(CatalogError::Io(_))
        ));
    }
}
