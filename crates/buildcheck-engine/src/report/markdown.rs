//! Markdown report rendering.

use super::CompatibilityReport;
use crate::rules::RuleStatus;

fn status_marker(status: RuleStatus) -> &'static str {
    match status {
        RuleStatus::Compatible => "✅",
        RuleStatus::Incompatible => "❌",
        RuleStatus::Indeterminate => "❓",
    }
}

/// Render the report as a human-readable Markdown document.
pub fn render(report: &CompatibilityReport) -> String {
    let mut out = String::new();

    out.push_str("# Build Compatibility Report\n\n");
    out.push_str(&format!("- **Report ID:** {}\n", report.id));
    out.push_str(&format!(
        "- **Generated:** {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("- **Score:** {}/100\n", report.score));
    out.push_str(&format!(
        "- **Checks:** {} evaluated, {} passed, {} failed, {} indeterminate\n\n",
        report.evaluated, report.passed, report.failed, report.indeterminate
    ));

    if report.has_hard_incompatibility() {
        out.push_str("> ⚠️ This build has hard incompatibilities and will not assemble as selected.\n\n");
    }

    out.push_str("## Checks\n\n");
    out.push_str("| Check | Status | Detail |\n");
    out.push_str("|-------|--------|--------|\n");
    for outcome in &report.outcomes {
        out.push_str(&format!(
            "| {} | {} {} | {} |\n",
            outcome.rule,
            status_marker(outcome.status),
            outcome.status,
            outcome.detail.as_deref().unwrap_or("—")
        ));
    }
    out.push('\n');

    if !report.issues_by_slot.is_empty() {
        out.push_str("## Issues by slot\n\n");
        for (slot, rules) in &report.issues_by_slot {
            let rules: Vec<String> = rules.iter().map(|r| r.to_string()).collect();
            out.push_str(&format!("- **{}**: {}\n", slot, rules.join(", ")));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildSelection, Component, Slot};
    use crate::report::aggregate;
    use crate::rules::{RuleId, RuleOutcome, Severity};

    #[test]
    fn test_markdown_contains_score_and_failures() {
        let selection =
            BuildSelection::new().with(Slot::Cpu, Component::new("1", "cpu", "Ryzen 5 5600X"));
        let outcomes = vec![
            RuleOutcome::compatible(
                RuleId::RamSlots,
                &[Slot::Ram, Slot::Motherboard],
                Severity::Hard,
            ),
            RuleOutcome::incompatible(
                RuleId::CpuMotherboard,
                &[Slot::Cpu, Slot::Motherboard],
                Severity::Hard,
                "CPU socket (AM4) is not compatible with motherboard socket (AM5)".to_string(),
            ),
        ];
        let report = aggregate(&selection, outcomes);
        let doc = render(&report);

        assert!(doc.contains("**Score:** 50/100"));
        assert!(doc.contains("cpu_motherboard"));
        assert!(doc.contains("AM4"));
        assert!(doc.contains("hard incompatibilities"));
        assert!(doc.contains("## Issues by slot"));
    }
}
