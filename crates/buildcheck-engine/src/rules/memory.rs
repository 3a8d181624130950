//! Memory compatibility rules: type, slot count, and speed limits.

use super::{CompatibilityRule, RuleId, RuleOutcome, Severity};
use crate::extract::{Attr, SpecExtractor};
use crate::model::{BuildSelection, Slot};

/// RAM generation (DDR4/DDR5) vs what the motherboard accepts.
pub struct RamTypeRule;

impl CompatibilityRule for RamTypeRule {
    fn id(&self) -> RuleId {
        RuleId::RamMotherboard
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Ram, Slot::Motherboard]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "RAM type"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let ram = selection.get(Slot::Ram)?;
        let motherboard = selection.get(Slot::Motherboard)?;

        let ram_type = extractor.get_str(ram, Attr::RamType);
        let mobo_type = extractor.get_str(motherboard, Attr::RamType);

        let (ram_type, mobo_type) = match (ram_type, mobo_type) {
            (Some(r), Some(m)) => (r, m),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine RAM type compatibility (missing data)".to_string(),
                ))
            }
        };

        if ram_type.eq_ignore_ascii_case(&mobo_type) {
            Some(RuleOutcome::compatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
            ))
        } else {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "RAM type ({}) is not compatible with motherboard ({})",
                    ram_type, mobo_type
                ),
            ))
        }
    }
}

/// Stick count vs motherboard DIMM slots.
///
/// Both sides carry defaults, so this rule always decides when the two
/// slots are populated, even while the type rule is indeterminate.
pub struct RamSlotCountRule {
    pub default_sticks: f64,
    pub default_slots: f64,
}

impl Default for RamSlotCountRule {
    fn default() -> Self {
        Self {
            default_sticks: 1.0,
            default_slots: 2.0,
        }
    }
}

impl CompatibilityRule for RamSlotCountRule {
    fn id(&self) -> RuleId {
        RuleId::RamSlots
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Ram, Slot::Motherboard]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "RAM stick count"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let ram = selection.get(Slot::Ram)?;
        let motherboard = selection.get(Slot::Motherboard)?;

        let sticks = extractor
            .get_num(ram, Attr::Sticks)
            .unwrap_or(self.default_sticks);
        let slots = extractor
            .get_num(motherboard, Attr::Slots)
            .unwrap_or(self.default_slots);

        if sticks > slots {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "Selected RAM ({} sticks) exceeds motherboard slots ({})",
                    sticks as i64, slots as i64
                ),
            ))
        } else {
            Some(RuleOutcome::compatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
            ))
        }
    }
}

/// RAM speed vs the motherboard's supported maximum. Only decided when both
/// numbers are present and parseable; otherwise the rule reports nothing.
pub struct RamSpeedRule;

impl CompatibilityRule for RamSpeedRule {
    fn id(&self) -> RuleId {
        RuleId::RamSpeed
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Ram, Slot::Motherboard]
    }

    fn severity(&self) -> Severity {
        Severity::Advisory
    }

    fn name(&self) -> &'static str {
        "RAM speed vs motherboard"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let ram = selection.get(Slot::Ram)?;
        let motherboard = selection.get(Slot::Motherboard)?;

        let speed = extractor.get_num(ram, Attr::Speed)?;
        let max_speed = extractor.get_num(motherboard, Attr::MaxRamSpeed)?;

        if speed > max_speed {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "RAM speed ({}MHz) exceeds motherboard maximum ({}MHz)",
                    speed as i64, max_speed as i64
                ),
            ))
        } else {
            Some(RuleOutcome::compatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
            ))
        }
    }
}

/// RAM speed vs the CPU's supported maximum. Same shape as `RamSpeedRule`.
pub struct RamCpuSpeedRule;

impl CompatibilityRule for RamCpuSpeedRule {
    fn id(&self) -> RuleId {
        RuleId::RamCpuSpeed
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Ram, Slot::Cpu]
    }

    fn severity(&self) -> Severity {
        Severity::Advisory
    }

    fn name(&self) -> &'static str {
        "RAM speed vs CPU"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let ram = selection.get(Slot::Ram)?;
        let cpu = selection.get(Slot::Cpu)?;

        let speed = extractor.get_num(ram, Attr::Speed)?;
        let max_speed = extractor.get_num(cpu, Attr::MaxMemorySpeed)?;

        if speed > max_speed {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "RAM speed ({}MHz) exceeds CPU maximum ({}MHz)",
                    speed as i64, max_speed as i64
                ),
            ))
        } else {
            Some(RuleOutcome::compatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
            ))
        }
    }
}
