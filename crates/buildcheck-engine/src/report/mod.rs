//! Report aggregation and rendering.
//!
//! A report is a snapshot of one evaluation pass: every rule outcome, the
//! 0-100 score over decided rules, and an index of which slots each failing
//! rule implicates. Rendering is a separate concern (`json`, `markdown`).

pub mod json;
pub mod markdown;

use crate::model::{BuildSelection, Slot};
use crate::rules::{RuleId, RuleOutcome, Severity};
use crate::EngineResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Aggregated result of evaluating the rule battery once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// 0-100 over decided rules; 0 when nothing decided.
    pub score: u8,
    pub outcomes: Vec<RuleOutcome>,
    /// Slots implicated by incompatible outcomes.
    pub issues_by_slot: BTreeMap<Slot, BTreeSet<RuleId>>,
    pub evaluated: usize,
    pub passed: usize,
    pub failed: usize,
    pub indeterminate: usize,
}

impl CompatibilityReport {
    /// True when some failed rule would physically block the build.
    pub fn has_hard_incompatibility(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.status.is_incompatible() && o.severity == Severity::Hard)
    }

    /// True when every evaluated rule decided and passed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.indeterminate == 0 && self.evaluated > 0
    }
}

/// Fold rule outcomes into a report.
///
/// The score counts only decided rules (indeterminate outcomes neither help
/// nor hurt): `round(100 * passed / decided)`. An empty selection, or a
/// selection where nothing decided, scores 0 rather than a vacuous 100.
pub fn aggregate(selection: &BuildSelection, outcomes: Vec<RuleOutcome>) -> CompatibilityReport {
    let evaluated = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.status.is_compatible()).count();
    let failed = outcomes
        .iter()
        .filter(|o| o.status.is_incompatible())
        .count();
    let indeterminate = evaluated - passed - failed;

    let decided = passed + failed;
    let score = if selection.is_empty() || decided == 0 {
        0
    } else {
        ((100.0 * passed as f64) / decided as f64).round() as u8
    };

    let mut issues_by_slot: BTreeMap<Slot, BTreeSet<RuleId>> = BTreeMap::new();
    for outcome in outcomes.iter().filter(|o| o.status.is_incompatible()) {
        for slot in &outcome.slots {
            issues_by_slot.entry(*slot).or_default().insert(outcome.rule);
        }
    }

    CompatibilityReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        score,
        outcomes,
        issues_by_slot,
        evaluated,
        passed,
        failed,
        indeterminate,
    }
}

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
}

/// Render a report in the requested format.
pub fn generate_report(
    report: &CompatibilityReport,
    format: ReportFormat,
) -> EngineResult<String> {
    match format {
        ReportFormat::Json => json::render(report),
        ReportFormat::Markdown => Ok(markdown::render(report)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Component;

    fn outcome(rule: RuleId, status: crate::rules::RuleStatus) -> RuleOutcome {
        use crate::rules::RuleStatus;
        let slots = &[Slot::Cpu, Slot::Motherboard];
        match status {
            RuleStatus::Compatible => RuleOutcome::compatible(rule, slots, Severity::Hard),
            RuleStatus::Incompatible => {
                RuleOutcome::incompatible(rule, slots, Severity::Hard, "nope".to_string())
            }
            RuleStatus::Indeterminate => {
                RuleOutcome::indeterminate(rule, slots, Severity::Hard, "unknown".to_string())
            }
        }
    }

    fn nonempty_selection() -> BuildSelection {
        BuildSelection::new().with(Slot::Cpu, Component::new("1", "cpu", "Ryzen 5 5600X"))
    }

    #[test]
    fn test_score_counts_only_decided_rules() {
        use crate::rules::RuleStatus;
        let report = aggregate(
            &nonempty_selection(),
            vec![
                outcome(RuleId::CpuMotherboard, RuleStatus::Compatible),
                outcome(RuleId::RamMotherboard, RuleStatus::Incompatible),
                outcome(RuleId::GpuLength, RuleStatus::Indeterminate),
            ],
        );
        assert_eq!(report.score, 50);
        assert_eq!(report.evaluated, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.indeterminate, 1);
    }

    #[test]
    fn test_empty_selection_scores_zero() {
        let report = aggregate(&BuildSelection::new(), vec![]);
        assert_eq!(report.score, 0);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_all_indeterminate_scores_zero() {
        use crate::rules::RuleStatus;
        let report = aggregate(
            &nonempty_selection(),
            vec![outcome(RuleId::CpuMotherboard, RuleStatus::Indeterminate)],
        );
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_all_passing_scores_hundred() {
        use crate::rules::RuleStatus;
        let report = aggregate(
            &nonempty_selection(),
            vec![
                outcome(RuleId::CpuMotherboard, RuleStatus::Compatible),
                outcome(RuleId::RamMotherboard, RuleStatus::Compatible),
            ],
        );
        assert_eq!(report.score, 100);
        assert!(report.is_clean());
        assert!(!report.has_hard_incompatibility());
    }

    #[test]
    fn test_issues_indexed_by_slot() {
        use crate::rules::RuleStatus;
        let report = aggregate(
            &nonempty_selection(),
            vec![outcome(RuleId::CpuMotherboard, RuleStatus::Incompatible)],
        );
        assert!(report.has_hard_incompatibility());
        assert!(report.issues_by_slot[&Slot::Cpu].contains(&RuleId::CpuMotherboard));
        assert!(report.issues_by_slot[&Slot::Motherboard].contains(&RuleId::CpuMotherboard));
        assert!(!report.issues_by_slot.contains_key(&Slot::Gpu));
    }

    #[test]
    fn test_advisory_failure_is_not_hard() {
        let outcome = RuleOutcome::incompatible(
            RuleId::RamSpeed,
            &[Slot::Ram, Slot::Motherboard],
            Severity::Advisory,
            "too fast".to_string(),
        );
        let report = aggregate(&nonempty_selection(), vec![outcome]);
        assert!(!report.has_hard_incompatibility());
        assert_eq!(report.score, 0);
    }
}
