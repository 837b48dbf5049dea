//! Filename-based document classification
//!
//! Rules are checked in a fixed order and the first match wins, so a file
//! named `pdd_emission_calc.xlsx` is a PDD, not a calculation sheet.

use super::types::Category;

const PDD_MARKERS: &[&str] = &["pdd", "project design", "project_design"];
const CALCULATION_MARKERS: &[&str] = &["calc", "spread", "emission"];
const CALCULATION_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];
const METHODOLOGY_MARKERS: &[&str] = &["method", "acm", "ams"];

const SPREADSHEET_MEDIA_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Classify a document by its filename
pub fn classify(filename: &str) -> Category {
    classify_with_media_type(filename, None)
}

/// Classify a document by its filename and declared media type
///
/// A spreadsheet media type counts as a calculation marker, but only at the
/// calculation rule's position in the order.
pub fn classify_with_media_type(filename: &str, media_type: Option<&str>) -> Category {
    let name = filename.to_lowercase();

    if contains_any(&name, PDD_MARKERS) {
        Category::Pdd
    } else if contains_any(&name, CALCULATION_MARKERS)
        || CALCULATION_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        || media_type.is_some_and(is_spreadsheet_media_type)
    {
        Category::Calculation
    } else if contains_any(&name, METHODOLOGY_MARKERS) {
        Category::Methodology
    } else {
        Category::Generic
    }
}

fn contains_any(name: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| name.contains(m))
}

fn is_spreadsheet_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    SPREADSHEET_MEDIA_TYPES.contains(&essence.as_str())
}
