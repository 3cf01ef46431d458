//! Cell severity for rendering validation results in the table.

use serde::Serialize;

use crate::models::DiagnosticReport;

/// Highest-priority problem affecting one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellSeverity {
    MissingOptional,
    TypeMismatch,
    MissingRequired,
}

impl CellSeverity {
    /// Background colour as RGB.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            CellSeverity::MissingRequired => (255, 200, 200),
            CellSeverity::TypeMismatch => (255, 230, 200),
            CellSeverity::MissingOptional => (255, 255, 200),
        }
    }
}

/// Severity of the cell under `header` for a record's report.
///
/// A type mismatch nested below the header (e.g. `specs.voltage` under
/// `specs`) also marks the header's cell.
pub fn cell_severity(report: &DiagnosticReport, header: &str) -> Option<CellSeverity> {
    if report.missing_required.iter().any(|f| f == header) {
        return Some(CellSeverity::MissingRequired);
    }
    if report.has_type_mismatch_under(header) {
        return Some(CellSeverity::TypeMismatch);
    }
    if report.missing_optional.iter().any(|f| f == header) {
        return Some(CellSeverity::MissingOptional);
    }
    None
}

/// Required headers are rendered bold.
pub fn header_is_required(required: &[String], header: &str) -> bool {
    required.iter().any(|f| f == header)
}
