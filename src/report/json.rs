use crate::report::{ExamReport, SubmissionReport};
use serde_json;

/// JSON formatter for exam reports
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format report as pretty-printed JSON
    pub fn format(report: &ExamReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    /// Format report as compact JSON (no whitespace)
    pub fn format_compact(report: &ExamReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }

    /// Format a batch of reports as a pretty-printed JSON array
    pub fn format_batch(reports: &[SubmissionReport]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(reports)
    }
}
