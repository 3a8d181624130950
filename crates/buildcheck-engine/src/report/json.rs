//! JSON report rendering.

use super::CompatibilityReport;
use crate::EngineResult;

/// Serialize the report as pretty-printed JSON.
pub fn render(report: &CompatibilityReport) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BuildSelection;
    use crate::report::aggregate;

    #[test]
    fn test_json_roundtrips() {
        let report = aggregate(&BuildSelection::new(), vec![]);
        let rendered = render(&report).unwrap();
        let parsed: CompatibilityReport = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.score, report.score);
    }
}
