//! Power supply rules: wattage budget and form factor fit.

use super::{CompatibilityRule, RuleId, RuleOutcome, Severity};
use crate::extract::{Attr, SpecExtractor};
use crate::model::{BuildSelection, Slot};

/// PSU wattage vs an estimated draw for the selected parts.
///
/// The draw model is deliberately coarse: CPU and GPU TDP (with defaults
/// when the slot is populated but the figure is missing) plus a flat
/// base-system allowance, inflated by a headroom factor and rounded up to
/// the next 50W step. Only the PSU slot gates evaluation; a PSU-only
/// selection is still scored against the base allowance.
pub struct PsuPowerRule {
    pub base_system_watts: f64,
    pub headroom_factor: f64,
    pub comfort_factor: f64,
    pub default_cpu_tdp: f64,
    pub default_gpu_tdp: f64,
}

impl Default for PsuPowerRule {
    fn default() -> Self {
        Self {
            base_system_watts: 100.0,
            headroom_factor: 1.2,
            comfort_factor: 1.5,
            default_cpu_tdp: 65.0,
            default_gpu_tdp: 150.0,
        }
    }
}

impl PsuPowerRule {
    /// Estimated total draw of the selection in watts.
    pub fn total_power(&self, selection: &BuildSelection, extractor: &SpecExtractor) -> f64 {
        let cpu = selection
            .get(Slot::Cpu)
            .map(|c| extractor.get_num(c, Attr::Tdp).unwrap_or(self.default_cpu_tdp))
            .unwrap_or(0.0);
        let gpu = selection
            .get(Slot::Gpu)
            .map(|c| extractor.get_num(c, Attr::Tdp).unwrap_or(self.default_gpu_tdp))
            .unwrap_or(0.0);
        cpu + gpu + self.base_system_watts
    }

    /// Recommended PSU wattage: draw plus headroom, rounded up to 50W.
    pub fn recommended_wattage(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> f64 {
        let total = self.total_power(selection, extractor);
        ((total * self.headroom_factor) / 50.0).ceil() * 50.0
    }
}

impl CompatibilityRule for PsuPowerRule {
    fn id(&self) -> RuleId {
        RuleId::PsuPower
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Psu]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "PSU wattage"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let psu = selection.get(Slot::Psu)?;

        let wattage = match extractor.get_num(psu, Attr::Wattage) {
            Some(w) => w,
            None => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine PSU compatibility (missing wattage data)".to_string(),
                ))
            }
        };

        let recommended = self.recommended_wattage(selection, extractor);

        if wattage < recommended {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "PSU wattage ({}W) is below recommended ({}W) for your components",
                    wattage as i64, recommended as i64
                ),
            ))
        } else if wattage < recommended * self.comfort_factor {
            Some(RuleOutcome::compatible_with(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "PSU wattage ({}W) is adequate but consider {}W for better efficiency",
                    wattage as i64,
                    (recommended * self.comfort_factor) as i64
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

/// PSU form factor vs what the case takes (ATX / SFX / SFX-L).
pub struct PsuFormFactorRule;

impl CompatibilityRule for PsuFormFactorRule {
    fn id(&self) -> RuleId {
        RuleId::PsuFormFactor
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Psu, Slot::Case]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "PSU form factor"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let psu = selection.get(Slot::Psu)?;
        let case = selection.get(Slot::Case)?;

        let psu_ff = extractor.get_str(psu, Attr::FormFactor);
        let supported = extractor.get_str(case, Attr::PsuSupport);

        let (psu_ff, supported) = match (psu_ff, supported) {
            (Some(p), Some(s)) => (p, s),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine PSU form factor compatibility (missing data)".to_string(),
                ))
            }
        };

        let ff = psu_ff.to_ascii_lowercase();
        let support = supported.to_ascii_lowercase();

        // "sfx-l" checks before "sfx" so an SFX-L PSU never passes on a
        // case that lists plain SFX only.
        let matched = if ff.contains("sfx-l") {
            support.contains("sfx-l")
        } else {
            ["sfx", "atx"]
                .iter()
                .any(|family| ff.contains(family) && support.contains(family))
        };

        if matched {
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
                format!("PSU form factor ({}) not supported by case", psu_ff),
            ))
        }
    }
}
