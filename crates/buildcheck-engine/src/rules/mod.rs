//! Pairwise compatibility rules.
//!
//! Twelve fixed, independent rules, one concern per file:
//! - `socket` — CPU/motherboard socket match, cooler socket support
//! - `memory` — RAM type, slot count, speed vs motherboard, speed vs CPU
//! - `storage` — storage interface support
//! - `power` — PSU wattage budget, PSU form factor vs case
//! - `chassis` — case/motherboard form factor, GPU length, cooler height
//!
//! A rule only evaluates when all of its required slots are populated;
//! otherwise it is absent from the outcome set entirely. `Indeterminate` is
//! reserved for "slots present but data insufficient".

pub mod chassis;
pub mod memory;
pub mod power;
pub mod socket;
pub mod storage;

use crate::extract::SpecExtractor;
use crate::model::{BuildSelection, Slot};
use serde::{Deserialize, Serialize};

/// Identifier for each compatibility rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    CpuMotherboard,
    RamMotherboard,
    RamSlots,
    RamSpeed,
    RamCpuSpeed,
    StorageInterface,
    PsuPower,
    PsuFormFactor,
    CaseMotherboard,
    GpuLength,
    CoolerHeight,
    CoolerSocket,
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            RuleId::CpuMotherboard => "cpu_motherboard",
            RuleId::RamMotherboard => "ram_motherboard",
            RuleId::RamSlots => "ram_slots",
            RuleId::RamSpeed => "ram_speed",
            RuleId::RamCpuSpeed => "ram_cpu_speed",
            RuleId::StorageInterface => "storage_interface",
            RuleId::PsuPower => "psu_power",
            RuleId::PsuFormFactor => "psu_form_factor",
            RuleId::CaseMotherboard => "case_motherboard",
            RuleId::GpuLength => "gpu_length",
            RuleId::CoolerHeight => "cooler_height",
            RuleId::CoolerSocket => "cooler_socket",
        };
        write!(f, "{}", id)
    }
}

/// Tri-state outcome of a rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Compatible,
    Incompatible,
    Indeterminate,
}

impl RuleStatus {
    pub fn is_compatible(&self) -> bool {
        matches!(self, RuleStatus::Compatible)
    }

    pub fn is_incompatible(&self) -> bool {
        matches!(self, RuleStatus::Incompatible)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, RuleStatus::Indeterminate)
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleStatus::Compatible => write!(f, "Compatible"),
            RuleStatus::Incompatible => write!(f, "Incompatible"),
            RuleStatus::Indeterminate => write!(f, "Indeterminate"),
        }
    }
}

/// Whether a failing rule blocks a build or merely advises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Advisory,
    Hard,
}

/// Result of evaluating one rule against a selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub slots: Vec<Slot>,
    pub status: RuleStatus,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RuleOutcome {
    pub fn compatible(rule: RuleId, slots: &[Slot], severity: Severity) -> Self {
        Self {
            rule,
            slots: slots.to_vec(),
            status: RuleStatus::Compatible,
            severity,
            detail: None,
        }
    }

    pub fn compatible_with(
        rule: RuleId,
        slots: &[Slot],
        severity: Severity,
        detail: String,
    ) -> Self {
        Self {
            rule,
            slots: slots.to_vec(),
            status: RuleStatus::Compatible,
            severity,
            detail: Some(detail),
        }
    }

    pub fn incompatible(rule: RuleId, slots: &[Slot], severity: Severity, detail: String) -> Self {
        Self {
            rule,
            slots: slots.to_vec(),
            status: RuleStatus::Incompatible,
            severity,
            detail: Some(detail),
        }
    }

    pub fn indeterminate(rule: RuleId, slots: &[Slot], severity: Severity, detail: String) -> Self {
        Self {
            rule,
            slots: slots.to_vec(),
            status: RuleStatus::Indeterminate,
            severity,
            detail: Some(detail),
        }
    }
}

/// A single compatibility rule.
///
/// Rules are pure and mutually independent: each reads only the selection
/// and the extractor, and owns no state beyond its configuration.
pub trait CompatibilityRule: Send + Sync {
    fn id(&self) -> RuleId;

    /// Slots this rule reads. Required slots gate evaluation; optional
    /// context slots (e.g. CPU/GPU for the PSU budget) are not listed.
    fn involved_slots(&self) -> &'static [Slot];

    fn severity(&self) -> Severity;

    fn name(&self) -> &'static str;

    /// Evaluate against the selection. Returns `None` when a required slot
    /// is empty; `Indeterminate` when slots are present but the data is not.
    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome>;
}

/// The fixed rule battery in evaluation order, configured from `config`.
pub fn rules_for(config: &crate::EngineConfig) -> Vec<Box<dyn CompatibilityRule>> {
    vec![
        Box::new(socket::SocketMatchRule::new()),
        Box::new(memory::RamTypeRule),
        Box::new(memory::RamSlotCountRule {
            default_sticks: config.default_ram_sticks,
            default_slots: config.default_ram_slots,
        }),
        Box::new(memory::RamSpeedRule),
        Box::new(memory::RamCpuSpeedRule),
        Box::new(storage::StorageInterfaceRule),
        Box::new(power::PsuPowerRule {
            base_system_watts: config.base_system_watts,
            headroom_factor: config.psu_headroom,
            comfort_factor: config.psu_comfort_factor,
            default_cpu_tdp: config.default_cpu_tdp,
            default_gpu_tdp: config.default_gpu_tdp,
        }),
        Box::new(power::PsuFormFactorRule),
        Box::new(chassis::CaseFormFactorRule),
        Box::new(chassis::GpuClearanceRule),
        Box::new(chassis::CoolerClearanceRule),
        Box::new(socket::CoolerSocketRule),
    ]
}

/// The fixed rule battery with default configuration.
pub fn default_rules() -> Vec<Box<dyn CompatibilityRule>> {
    rules_for(&crate::EngineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_order_and_count() {
        let rules = default_rules();
        assert_eq!(rules.len(), 12);
        assert_eq!(rules[0].id(), RuleId::CpuMotherboard);
        assert_eq!(rules[11].id(), RuleId::CoolerSocket);
    }

    #[test]
    fn test_rules_skip_on_empty_selection() {
        let selection = BuildSelection::new();
        let extractor = SpecExtractor::new();
        for rule in default_rules() {
            assert!(
                rule.evaluate(&selection, &extractor).is_none(),
                "rule {} evaluated on empty selection",
                rule.id()
            );
        }
    }
}
