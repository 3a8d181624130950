//! Case fit rules: motherboard form factor, GPU length, cooler height.

use super::{CompatibilityRule, RuleId, RuleOutcome, Severity};
use crate::extract::{Attr, FormFactor, SpecExtractor};
use crate::model::{BuildSelection, Slot};

/// Case vs motherboard form factor, via the containment matrix.
pub struct CaseFormFactorRule;

impl CompatibilityRule for CaseFormFactorRule {
    fn id(&self) -> RuleId {
        RuleId::CaseMotherboard
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Case, Slot::Motherboard]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "case form factor"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let case = selection.get(Slot::Case)?;
        let motherboard = selection.get(Slot::Motherboard)?;

        let case_ff = extractor
            .get_str(case, Attr::FormFactor)
            .and_then(|s| FormFactor::parse(&s));
        let mobo_ff = extractor
            .get_str(motherboard, Attr::FormFactor)
            .and_then(|s| FormFactor::parse(&s));

        let (case_ff, mobo_ff) = match (case_ff, mobo_ff) {
            (Some(c), Some(m)) => (c, m),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine form factor compatibility (missing data)".to_string(),
                ))
            }
        };

        if case_ff.case_supports(mobo_ff) {
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
                    "Case form factor ({}) does not support motherboard ({})",
                    case_ff.label(),
                    mobo_ff.label()
                ),
            ))
        }
    }
}

/// GPU length vs the case's clearance figure.
pub struct GpuClearanceRule;

impl CompatibilityRule for GpuClearanceRule {
    fn id(&self) -> RuleId {
        RuleId::GpuLength
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Gpu, Slot::Case]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "GPU clearance"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let gpu = selection.get(Slot::Gpu)?;
        let case = selection.get(Slot::Case)?;

        let length = extractor.get_num(gpu, Attr::Length);
        let max_length = extractor.get_num(case, Attr::GpuMaxLength);

        let (length, max_length) = match (length, max_length) {
            (Some(l), Some(m)) => (l, m),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine GPU clearance (missing data)".to_string(),
                ))
            }
        };

        if length > max_length {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "GPU length ({}mm) exceeds case maximum ({}mm)",
                    length as i64, max_length as i64
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

/// Cooler height vs the case's clearance figure.
pub struct CoolerClearanceRule;

impl CompatibilityRule for CoolerClearanceRule {
    fn id(&self) -> RuleId {
        RuleId::CoolerHeight
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Cooler, Slot::Case]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "cooler clearance"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let cooler = selection.get(Slot::Cooler)?;
        let case = selection.get(Slot::Case)?;

        let height = extractor.get_num(cooler, Attr::Height);
        let max_height = extractor.get_num(case, Attr::CoolerMaxHeight);

        let (height, max_height) = match (height, max_height) {
            (Some(h), Some(m)) => (h, m),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine cooler clearance (missing data)".to_string(),
                ))
            }
        };

        if height > max_height {
            Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "Cooler height ({}mm) exceeds case maximum ({}mm)",
                    height as i64, max_height as i64
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
