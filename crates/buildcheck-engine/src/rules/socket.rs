//! Socket matching rules.

use super::{CompatibilityRule, RuleId, RuleOutcome, Severity};
use crate::extract::{normalize_socket, Attr, SpecExtractor};
use crate::model::{BuildSelection, Slot};
use regex::Regex;

/// CPU/motherboard socket match.
///
/// Sockets compare under the canonical token table (AM4, AM5, LGA1200,
/// LGA1700, LGA1851). A Ryzen 5000-class CPU on an older AM4 chipset stays
/// compatible but carries a firmware-update warning.
pub struct SocketMatchRule {
    ryzen_5000_re: Regex,
    old_chipset_re: Regex,
}

impl SocketMatchRule {
    pub fn new() -> Self {
        Self {
            ryzen_5000_re: Regex::new(r"(?i)ryzen\s*5[0-9]{3}|ryzen\s*[3579]\s*5[0-9]{3}")
                .unwrap(),
            old_chipset_re: Regex::new(r"(?i)(a320|b350|b450|a520)").unwrap(),
        }
    }
}

impl Default for SocketMatchRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CompatibilityRule for SocketMatchRule {
    fn id(&self) -> RuleId {
        RuleId::CpuMotherboard
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Cpu, Slot::Motherboard]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "CPU/motherboard socket"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let cpu = selection.get(Slot::Cpu)?;
        let motherboard = selection.get(Slot::Motherboard)?;

        let cpu_socket = extractor.get_str(cpu, Attr::Socket);
        let mobo_socket = extractor.get_str(motherboard, Attr::Socket);

        let (cpu_socket, mobo_socket) = match (cpu_socket, mobo_socket) {
            (Some(c), Some(m)) => (c, m),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine socket compatibility (missing data)".to_string(),
                ))
            }
        };

        // Sockets outside the canonical table still compare as raw strings;
        // Indeterminate is reserved for absent values.
        let cpu_label = normalize_socket(&cpu_socket)
            .map(str::to_string)
            .unwrap_or_else(|| cpu_socket.trim().to_string());
        let mobo_label = normalize_socket(&mobo_socket)
            .map(str::to_string)
            .unwrap_or_else(|| mobo_socket.trim().to_string());

        if !cpu_label.eq_ignore_ascii_case(&mobo_label) {
            return Some(RuleOutcome::incompatible(
                self.id(),
                self.involved_slots(),
                self.severity(),
                format!(
                    "CPU socket ({}) is not compatible with motherboard socket ({})",
                    cpu_label, mobo_label
                ),
            ));
        }

        // Ryzen 5000 parts on first-wave AM4 boards often need a firmware
        // update before they post.
        if cpu_label == "AM4" {
            let board_text = format!(
                "{} {}",
                motherboard.name,
                extractor
                    .get_str(motherboard, Attr::Chipset)
                    .unwrap_or_default()
            );
            if self.ryzen_5000_re.is_match(&cpu.name) && self.old_chipset_re.is_match(&board_text)
            {
                return Some(RuleOutcome::compatible_with(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Compatible. May require BIOS update for Ryzen 5000 series".to_string(),
                ));
            }
        }

        Some(RuleOutcome::compatible(
            self.id(),
            self.involved_slots(),
            self.severity(),
        ))
    }
}

/// Cooler socket support vs the CPU's socket.
pub struct CoolerSocketRule;

impl CompatibilityRule for CoolerSocketRule {
    fn id(&self) -> RuleId {
        RuleId::CoolerSocket
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Cooler, Slot::Cpu]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "cooler socket support"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let cooler = selection.get(Slot::Cooler)?;
        let cpu = selection.get(Slot::Cpu)?;

        let support = extractor.get_str(cooler, Attr::Socket);
        let cpu_socket = extractor.get_str(cpu, Attr::Socket);

        let (support, cpu_socket) = match (support, cpu_socket) {
            (Some(s), Some(c)) => (s, c),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine cooler socket compatibility (missing data)".to_string(),
                ))
            }
        };

        // Same raw-string fallback as the CPU/motherboard rule for sockets
        // outside the canonical table.
        let cpu_socket = normalize_socket(&cpu_socket)
            .map(str::to_string)
            .unwrap_or_else(|| cpu_socket.trim().to_string());

        let support_norm = support.to_ascii_lowercase();
        let universal = support_norm.contains("universal") || support_norm.contains("all");
        let listed = support_norm.contains(&cpu_socket.to_ascii_lowercase());

        if universal || listed {
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
                    "CPU cooler socket ({}) not compatible with CPU ({})",
                    support, cpu_socket
                ),
            ))
        }
    }
}
