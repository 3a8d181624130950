//! PC build compatibility and suggestion engine.
//!
//! The engine takes a build selection (up to eight canonical component
//! slots), extracts specifications from inconsistently shaped catalog
//! records, runs a fixed battery of pairwise compatibility rules, and folds
//! the outcomes into a scored report with replacement suggestions and a
//! rough performance estimate.
//!
//! Pipeline, one direction, no stage reaching back:
//!
//! ```text
//! raw keys -> normalize -> BuildSelection -> rules -> report
//!                                        \-> suggest
//!                                        \-> estimate
//! ```

pub mod estimate;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod report;
pub mod rules;
pub mod suggest;

pub use estimate::{estimate, PerformanceEstimate};
pub use extract::{Attr, FormFactor, SpecExtractor};
pub use model::{BuildSelection, Component, Slot};
pub use normalize::{canonical_slot, normalize_selection};
pub use report::{aggregate, generate_report, CompatibilityReport, ReportFormat};
pub use rules::{
    default_rules, rules_for, CompatibilityRule, RuleId, RuleOutcome, RuleStatus, Severity,
};
pub use suggest::{suggest, ActionKind, Requirement, Suggestion};

use tracing::debug;

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Tunables for the rule battery.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Flat allowance for drives, fans, and the board itself, in watts.
    pub base_system_watts: f64,
    /// Multiplier applied to estimated draw before rounding up to 50W.
    pub psu_headroom: f64,
    /// Band above the recommendation that still earns an efficiency note.
    pub psu_comfort_factor: f64,
    /// CPU TDP assumed when the slot is populated but the figure is missing.
    pub default_cpu_tdp: f64,
    /// GPU TDP assumed under the same condition.
    pub default_gpu_tdp: f64,
    /// Stick count assumed for RAM kits that do not state one.
    pub default_ram_sticks: f64,
    /// DIMM slot count assumed for boards that do not state one.
    pub default_ram_slots: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_system_watts: 100.0,
            psu_headroom: 1.2,
            psu_comfort_factor: 1.5,
            default_cpu_tdp: 65.0,
            default_gpu_tdp: 150.0,
            default_ram_sticks: 1.0,
            default_ram_slots: 2.0,
        }
    }
}

/// The compatibility engine: a configured rule battery plus an extractor.
///
/// Stateless across calls; every `check` recomputes from the selection alone,
/// so a selection can be re-checked after any mutation with no invalidation
/// protocol.
pub struct Engine {
    config: EngineConfig,
    extractor: SpecExtractor,
    rules: Vec<Box<dyn CompatibilityRule>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            extractor: SpecExtractor::new(),
            rules: rules::rules_for(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn extractor(&self) -> &SpecExtractor {
        &self.extractor
    }

    /// Append a custom rule to the battery.
    pub fn add_rule(&mut self, rule: Box<dyn CompatibilityRule>) {
        self.rules.push(rule);
    }

    /// Run the rule battery and aggregate a report.
    pub fn check(&self, selection: &BuildSelection) -> CompatibilityReport {
        let mut outcomes = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            match rule.evaluate(selection, &self.extractor) {
                Some(outcome) => {
                    debug!(rule = %outcome.rule, status = %outcome.status, "rule evaluated");
                    outcomes.push(outcome);
                }
                None => debug!(rule = %rule.id(), "rule skipped, slot empty"),
            }
        }
        report::aggregate(selection, outcomes)
    }

    /// Run the battery and derive suggestions for whatever failed.
    pub fn check_with_suggestions(
        &self,
        selection: &BuildSelection,
    ) -> (CompatibilityReport, Vec<Suggestion>) {
        let report = self.check(selection);
        let suggestions = suggest::suggest(selection, &report.outcomes, &self.extractor, &self.config);
        (report, suggestions)
    }

    /// Performance heuristics for the selection.
    pub fn estimate(&self, selection: &BuildSelection) -> PerformanceEstimate {
        estimate::estimate(selection, &self.extractor)
    }

    /// Split catalog candidates for `slot` into (fits, conflicts) against the
    /// rest of the selection. A candidate fits unless placing it introduces a
    /// hard incompatibility.
    pub fn partition_candidates(
        &self,
        candidates: &[Component],
        selection: &BuildSelection,
        slot: Slot,
    ) -> (Vec<Component>, Vec<Component>) {
        let mut fits = Vec::new();
        let mut conflicts = Vec::new();
        for candidate in candidates {
            let trial = selection.clone().with(slot, candidate.clone());
            if self.check(&trial).has_hard_incompatibility() {
                conflicts.push(candidate.clone());
            } else {
                fits.push(candidate.clone());
            }
        }
        (fits, conflicts)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_am4_build() -> BuildSelection {
        BuildSelection::new()
            .with(
                Slot::Cpu,
                Component::new("1", "cpu", "Ryzen 5 3600")
                    .with_attr("socket", "AM4")
                    .with_attr("tdp", 65),
            )
            .with(
                Slot::Motherboard,
                Component::new("2", "motherboard", "MSI B550M PRO")
                    .with_attr("socket", "AM4")
                    .with_attr("ram_type", "DDR4")
                    .with_attr("ram_slots", 4)
                    .with_attr("form_factor", "Micro-ATX")
                    .with_attr("storage_interfaces", "SATA III, M.2 NVMe"),
            )
            .with(
                Slot::Ram,
                Component::new("3", "ram", "Fury Beast 16GB")
                    .with_attr("ram_type", "DDR4")
                    .with_attr("sticks", 2),
            )
            .with(
                Slot::Storage,
                Component::new("4", "storage", "980 Pro").with_attr("interface", "NVMe"),
            )
            .with(
                Slot::Psu,
                Component::new("5", "psu", "Focus GX-650").with_attr("wattage", 650),
            )
    }

    #[test]
    fn test_clean_build_scores_hundred() {
        let engine = Engine::new();
        let report = engine.check(&clean_am4_build());
        assert_eq!(report.score, 100);
        assert!(!report.has_hard_incompatibility());
        assert!(report.failed == 0);
    }

    #[test]
    fn test_empty_selection_scores_zero() {
        let engine = Engine::new();
        let report = engine.check(&BuildSelection::new());
        assert_eq!(report.score, 0);
        assert_eq!(report.evaluated, 0);
    }

    #[test]
    fn test_breaking_one_pair_lowers_score() {
        let engine = Engine::new();
        let mut selection = clean_am4_build();
        let clean_score = engine.check(&selection).score;

        selection.insert(
            Slot::Ram,
            Component::new("9", "ram", "DDR5 Kit")
                .with_attr("ram_type", "DDR5")
                .with_attr("sticks", 2),
        );
        let report = engine.check(&selection);
        assert!(report.score < clean_score);
        assert!(report.has_hard_incompatibility());
    }

    #[test]
    fn test_check_with_suggestions_covers_failures() {
        let engine = Engine::new();
        let mut selection = clean_am4_build();
        selection.insert(
            Slot::Cpu,
            Component::new("9", "cpu", "Core i5-12600K")
                .with_attr("socket", "LGA1700")
                .with_attr("tdp", 125),
        );
        let (report, suggestions) = engine.check_with_suggestions(&selection);
        assert!(report.has_hard_incompatibility());
        assert!(!suggestions.is_empty());
        assert!(suggestions.iter().any(|s| s.rule == RuleId::CpuMotherboard));
    }

    #[test]
    fn test_partition_candidates_by_hard_fit() {
        let engine = Engine::new();
        let selection = clean_am4_build();
        let candidates = vec![
            Component::new("10", "cpu", "Ryzen 7 5700X")
                .with_attr("socket", "AM4")
                .with_attr("tdp", 65),
            Component::new("11", "cpu", "Core i7-13700K")
                .with_attr("socket", "LGA1700")
                .with_attr("tdp", 125),
        ];
        let (fits, conflicts) = engine.partition_candidates(&candidates, &selection, Slot::Cpu);
        assert_eq!(fits.len(), 1);
        assert_eq!(fits[0].id, "10");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "11");
    }

    #[test]
    fn test_custom_rule_participates() {
        struct AlwaysIndeterminate;
        impl CompatibilityRule for AlwaysIndeterminate {
            fn id(&self) -> RuleId {
                RuleId::GpuLength
            }
            fn involved_slots(&self) -> &'static [Slot] {
                &[Slot::Cpu]
            }
            fn severity(&self) -> Severity {
                Severity::Advisory
            }
            fn name(&self) -> &'static str {
                "always indeterminate"
            }
            fn evaluate(
                &self,
                selection: &BuildSelection,
                _extractor: &SpecExtractor,
            ) -> Option<RuleOutcome> {
                selection.get(Slot::Cpu)?;
                Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "never sure".to_string(),
                ))
            }
        }

        let mut engine = Engine::new();
        engine.add_rule(Box::new(AlwaysIndeterminate));
        let report = engine.check(&clean_am4_build());
        assert_eq!(report.indeterminate, 1);
        assert_eq!(report.score, 100);
    }
}
