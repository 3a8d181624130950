//! Storage interface support.

use super::{CompatibilityRule, RuleId, RuleOutcome, Severity};
use crate::extract::{Attr, SpecExtractor};
use crate::model::{BuildSelection, Slot};

/// Interface families compared when the literal strings differ.
const INTERFACE_FAMILIES: &[&str] = &["sata", "nvme", "m.2", "pcie"];

/// Drive interface vs what the motherboard exposes.
///
/// Matching is substring-based in both directions: a board advertising
/// "SATA III, M.2 NVMe" accepts a drive labelled "NVMe PCIe 4.0" because
/// the two share an interface family token.
pub struct StorageInterfaceRule;

impl CompatibilityRule for StorageInterfaceRule {
    fn id(&self) -> RuleId {
        RuleId::StorageInterface
    }

    fn involved_slots(&self) -> &'static [Slot] {
        &[Slot::Storage, Slot::Motherboard]
    }

    fn severity(&self) -> Severity {
        Severity::Hard
    }

    fn name(&self) -> &'static str {
        "storage interface"
    }

    fn evaluate(
        &self,
        selection: &BuildSelection,
        extractor: &SpecExtractor,
    ) -> Option<RuleOutcome> {
        let storage = selection.get(Slot::Storage)?;
        let motherboard = selection.get(Slot::Motherboard)?;

        let interface = extractor.get_str(storage, Attr::Interface);
        let supported = extractor.get_str(motherboard, Attr::StorageInterfaces);

        let (interface, supported) = match (interface, supported) {
            (Some(i), Some(s)) => (i, s),
            _ => {
                return Some(RuleOutcome::indeterminate(
                    self.id(),
                    self.involved_slots(),
                    self.severity(),
                    "Cannot determine storage compatibility (missing data)".to_string(),
                ))
            }
        };

        let iface = interface.to_ascii_lowercase();
        let support = supported.to_ascii_lowercase();

        let matched = support.contains(&iface)
            || INTERFACE_FAMILIES
                .iter()
                .any(|family| iface.contains(family) && support.contains(family));

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
                format!("Storage interface ({}) not supported by motherboard", interface),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Component;
    use crate::rules::RuleStatus;

    fn pair(storage: Component, motherboard: Component) -> BuildSelection {
        BuildSelection::new()
            .with(Slot::Storage, storage)
            .with(Slot::Motherboard, motherboard)
    }

    #[test]
    fn test_family_token_match() {
        let ex = SpecExtractor::new();
        let sel = pair(
            Component::new("1", "storage", "980 Pro").with_attr("interface", "NVMe PCIe 4.0"),
            Component::new("2", "motherboard", "B550M")
                .with_attr("storage_interfaces", "SATA III, M.2 NVMe"),
        );
        assert_eq!(
            StorageInterfaceRule.evaluate(&sel, &ex).unwrap().status,
            RuleStatus::Compatible
        );
    }

    #[test]
    fn test_unsupported_interface() {
        let ex = SpecExtractor::new();
        let sel = pair(
            Component::new("1", "storage", "U.2 Enterprise SSD").with_attr("interface", "U.2"),
            Component::new("2", "motherboard", "H610M")
                .with_attr("storage_interfaces", "SATA III"),
        );
        let outcome = StorageInterfaceRule.evaluate(&sel, &ex).unwrap();
        assert_eq!(outcome.status, RuleStatus::Incompatible);
        assert!(outcome.detail.unwrap().contains("U.2"));
    }

    #[test]
    fn test_missing_board_data_indeterminate() {
        let ex = SpecExtractor::new();
        let sel = pair(
            Component::new("1", "storage", "980 Pro").with_attr("interface", "NVMe"),
            Component::new("2", "motherboard", "B550M"),
        );
        assert_eq!(
            StorageInterfaceRule.evaluate(&sel, &ex).unwrap().status,
            RuleStatus::Indeterminate
        );
    }
}
