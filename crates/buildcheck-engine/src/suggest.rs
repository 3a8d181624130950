//! Replacement suggestions for incompatible outcomes.
//!
//! Each incompatible rule outcome yields one suggestion: which slot to swap,
//! whether the swap is a replacement or an upgrade, and a machine-queryable
//! `Requirement` a catalog search can filter on. The wording targets the part
//! the user is most likely to change, which is why `last_changed` can flip
//! the target for the symmetric socket and RAM-type rules.

use crate::extract::{Attr, FormFactor, SpecExtractor};
use crate::model::{BuildSelection, Slot};
use crate::rules::{power::PsuPowerRule, RuleId, RuleOutcome};
use crate::EngineConfig;
use serde::{Deserialize, Serialize};

/// What kind of change a suggestion asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Replace,
    Upgrade,
}

/// Constraints a replacement part must satisfy. All fields optional; a
/// catalog query applies whichever are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sticks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_wattage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed_mhz: Option<f64>,
}

/// A concrete "swap this part" recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub rule: RuleId,
    pub target: Slot,
    pub action: ActionKind,
    pub requirement: Requirement,
    pub message: String,
}

fn str_attr(
    extractor: &SpecExtractor,
    selection: &BuildSelection,
    slot: Slot,
    attr: Attr,
) -> Option<String> {
    selection.get(slot).and_then(|c| extractor.get_str(c, attr))
}

fn num_attr(
    extractor: &SpecExtractor,
    selection: &BuildSelection,
    slot: Slot,
    attr: Attr,
) -> Option<f64> {
    selection.get(slot).and_then(|c| extractor.get_num(c, attr))
}

fn num_label(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{}{}", v as i64, unit))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Build suggestions for every incompatible outcome in `outcomes`.
///
/// Outcomes that are compatible or indeterminate never suggest anything;
/// re-extraction failures degrade message text, never panic.
pub fn suggest(
    selection: &BuildSelection,
    outcomes: &[RuleOutcome],
    extractor: &SpecExtractor,
    config: &EngineConfig,
) -> Vec<Suggestion> {
    outcomes
        .iter()
        .filter(|o| o.status.is_incompatible())
        .map(|o| suggest_for(selection, o, extractor, config))
        .collect()
}

fn suggest_for(
    selection: &BuildSelection,
    outcome: &RuleOutcome,
    extractor: &SpecExtractor,
    config: &EngineConfig,
) -> Suggestion {
    let unknown = || "unknown".to_string();
    let last = selection.last_changed;

    match outcome.rule {
        RuleId::CpuMotherboard => {
            let cpu_socket =
                str_attr(extractor, selection, Slot::Cpu, Attr::Socket).unwrap_or_else(unknown);
            let mobo_socket = str_attr(extractor, selection, Slot::Motherboard, Attr::Socket)
                .unwrap_or_else(unknown);
            if last == Some(Slot::Motherboard) {
                Suggestion {
                    rule: outcome.rule,
                    target: Slot::Motherboard,
                    action: ActionKind::Replace,
                    requirement: Requirement {
                        socket: Some(cpu_socket.clone()),
                        ..Default::default()
                    },
                    message: format!(
                        "Motherboard socket ({}) doesn't match CPU ({})",
                        mobo_socket, cpu_socket
                    ),
                }
            } else {
                Suggestion {
                    rule: outcome.rule,
                    target: Slot::Cpu,
                    action: ActionKind::Replace,
                    requirement: Requirement {
                        socket: Some(mobo_socket.clone()),
                        ..Default::default()
                    },
                    message: format!(
                        "CPU socket ({}) doesn't match motherboard ({})",
                        cpu_socket, mobo_socket
                    ),
                }
            }
        }
        RuleId::RamMotherboard => {
            let ram_type =
                str_attr(extractor, selection, Slot::Ram, Attr::RamType).unwrap_or_else(unknown);
            let mobo_type = str_attr(extractor, selection, Slot::Motherboard, Attr::RamType)
                .unwrap_or_else(unknown);
            // Replacement RAM must match the board either way; only the
            // phrasing follows the part last touched.
            let message = if last == Some(Slot::Motherboard) {
                format!("Motherboard supports {} but RAM is {}", mobo_type, ram_type)
            } else {
                format!(
                    "RAM type ({}) doesn't match motherboard ({})",
                    ram_type, mobo_type
                )
            };
            Suggestion {
                rule: outcome.rule,
                target: Slot::Ram,
                action: ActionKind::Replace,
                requirement: Requirement {
                    ram_type: Some(mobo_type),
                    ..Default::default()
                },
                message,
            }
        }
        RuleId::RamSlots => {
            let sticks = num_attr(extractor, selection, Slot::Ram, Attr::Sticks)
                .unwrap_or(config.default_ram_sticks);
            let slots = num_attr(extractor, selection, Slot::Motherboard, Attr::Slots)
                .unwrap_or(config.default_ram_slots);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Ram,
                action: ActionKind::Replace,
                requirement: Requirement {
                    max_sticks: Some(slots as u32),
                    ..Default::default()
                },
                message: format!(
                    "Selected RAM ({} sticks) exceeds motherboard slots ({})",
                    sticks as i64, slots as i64
                ),
            }
        }
        RuleId::RamSpeed => {
            let max = num_attr(extractor, selection, Slot::Motherboard, Attr::MaxRamSpeed);
            let speed = num_attr(extractor, selection, Slot::Ram, Attr::Speed);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Ram,
                action: ActionKind::Replace,
                requirement: Requirement {
                    max_speed_mhz: max,
                    ..Default::default()
                },
                message: format!(
                    "RAM speed ({}) exceeds motherboard maximum ({})",
                    num_label(speed, "MHz"),
                    num_label(max, "MHz")
                ),
            }
        }
        RuleId::RamCpuSpeed => {
            let max = num_attr(extractor, selection, Slot::Cpu, Attr::MaxMemorySpeed);
            let speed = num_attr(extractor, selection, Slot::Ram, Attr::Speed);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Ram,
                action: ActionKind::Replace,
                requirement: Requirement {
                    max_speed_mhz: max,
                    ..Default::default()
                },
                message: format!(
                    "RAM speed ({}) exceeds CPU maximum ({})",
                    num_label(speed, "MHz"),
                    num_label(max, "MHz")
                ),
            }
        }
        RuleId::StorageInterface => {
            let interface = str_attr(extractor, selection, Slot::Storage, Attr::Interface)
                .unwrap_or_else(unknown);
            let supported =
                str_attr(extractor, selection, Slot::Motherboard, Attr::StorageInterfaces)
                    .unwrap_or_else(unknown);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Storage,
                action: ActionKind::Replace,
                requirement: Requirement {
                    interface: Some(supported.clone()),
                    ..Default::default()
                },
                message: format!(
                    "Storage interface ({}) not supported by motherboard ({})",
                    interface, supported
                ),
            }
        }
        RuleId::PsuPower => {
            let psu_rule = PsuPowerRule {
                base_system_watts: config.base_system_watts,
                headroom_factor: config.psu_headroom,
                comfort_factor: config.psu_comfort_factor,
                default_cpu_tdp: config.default_cpu_tdp,
                default_gpu_tdp: config.default_gpu_tdp,
            };
            let recommended = psu_rule.recommended_wattage(selection, extractor);
            let wattage = num_attr(extractor, selection, Slot::Psu, Attr::Wattage);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Psu,
                action: ActionKind::Upgrade,
                requirement: Requirement {
                    min_wattage: Some(recommended as u32),
                    ..Default::default()
                },
                message: format!(
                    "PSU ({}) may not provide enough power ({}W recommended)",
                    num_label(wattage, "W"),
                    recommended as i64
                ),
            }
        }
        RuleId::PsuFormFactor => {
            let psu_ff =
                str_attr(extractor, selection, Slot::Psu, Attr::FormFactor).unwrap_or_else(unknown);
            let supported = str_attr(extractor, selection, Slot::Case, Attr::PsuSupport)
                .unwrap_or_else(unknown);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Psu,
                action: ActionKind::Replace,
                requirement: Requirement {
                    form_factor: Some(supported.clone()),
                    ..Default::default()
                },
                message: format!(
                    "PSU form factor ({}) not supported by case ({})",
                    psu_ff, supported
                ),
            }
        }
        RuleId::CaseMotherboard => {
            let case_ff = str_attr(extractor, selection, Slot::Case, Attr::FormFactor)
                .unwrap_or_else(unknown);
            let mobo_ff = str_attr(extractor, selection, Slot::Motherboard, Attr::FormFactor)
                .and_then(|s| FormFactor::parse(&s))
                .map(|f| f.label().to_string())
                .unwrap_or_else(unknown);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Case,
                action: ActionKind::Replace,
                requirement: Requirement {
                    form_factor: Some(mobo_ff.clone()),
                    ..Default::default()
                },
                message: format!(
                    "Case form factor ({}) may not fit motherboard ({})",
                    case_ff, mobo_ff
                ),
            }
        }
        RuleId::GpuLength => {
            let max = num_attr(extractor, selection, Slot::Case, Attr::GpuMaxLength);
            let length = num_attr(extractor, selection, Slot::Gpu, Attr::Length);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Gpu,
                action: ActionKind::Replace,
                requirement: Requirement {
                    max_length_mm: max,
                    ..Default::default()
                },
                message: format!(
                    "GPU length ({}) exceeds case max GPU length ({})",
                    num_label(length, "mm"),
                    num_label(max, "mm")
                ),
            }
        }
        RuleId::CoolerHeight => {
            let max = num_attr(extractor, selection, Slot::Case, Attr::CoolerMaxHeight);
            let height = num_attr(extractor, selection, Slot::Cooler, Attr::Height);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Cooler,
                action: ActionKind::Replace,
                requirement: Requirement {
                    max_height_mm: max,
                    ..Default::default()
                },
                message: format!(
                    "Cooler height ({}) exceeds case max cooler height ({})",
                    num_label(height, "mm"),
                    num_label(max, "mm")
                ),
            }
        }
        RuleId::CoolerSocket => {
            let cpu_socket =
                str_attr(extractor, selection, Slot::Cpu, Attr::Socket).unwrap_or_else(unknown);
            let support = str_attr(extractor, selection, Slot::Cooler, Attr::Socket)
                .unwrap_or_else(unknown);
            Suggestion {
                rule: outcome.rule,
                target: Slot::Cooler,
                action: ActionKind::Replace,
                requirement: Requirement {
                    socket: Some(cpu_socket.clone()),
                    ..Default::default()
                },
                message: format!(
                    "CPU cooler socket ({}) not compatible with CPU ({})",
                    support, cpu_socket
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Component;
    use crate::rules::Severity;

    fn socket_mismatch_selection() -> BuildSelection {
        BuildSelection::new()
            .with(
                Slot::Cpu,
                Component::new("1", "cpu", "Ryzen 5 5600X").with_attr("socket", "AM4"),
            )
            .with(
                Slot::Motherboard,
                Component::new("2", "motherboard", "B650M PRO").with_attr("socket", "AM5"),
            )
    }

    fn incompatible(rule: RuleId) -> RuleOutcome {
        RuleOutcome::incompatible(rule, &[], Severity::Hard, "mismatch".to_string())
    }

    #[test]
    fn test_socket_suggestion_targets_cpu_by_default() {
        let selection = socket_mismatch_selection();
        let suggestions = suggest(
            &selection,
            &[incompatible(RuleId::CpuMotherboard)],
            &SpecExtractor::new(),
            &EngineConfig::default(),
        );
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.target, Slot::Cpu);
        assert_eq!(s.action, ActionKind::Replace);
        assert_eq!(s.requirement.socket.as_deref(), Some("AM5"));
        assert!(s.message.contains("CPU socket (AM4)"));
    }

    #[test]
    fn test_socket_suggestion_flips_when_board_last_changed() {
        let mut selection = socket_mismatch_selection();
        selection.last_changed = Some(Slot::Motherboard);
        let suggestions = suggest(
            &selection,
            &[incompatible(RuleId::CpuMotherboard)],
            &SpecExtractor::new(),
            &EngineConfig::default(),
        );
        let s = &suggestions[0];
        assert_eq!(s.target, Slot::Motherboard);
        assert_eq!(s.requirement.socket.as_deref(), Some("AM4"));
        assert!(s.message.starts_with("Motherboard socket (AM5)"));
    }

    #[test]
    fn test_ram_type_suggestion_always_targets_ram() {
        let mut selection = BuildSelection::new()
            .with(
                Slot::Ram,
                Component::new("1", "ram", "Fury Beast").with_attr("ram_type", "DDR4"),
            )
            .with(
                Slot::Motherboard,
                Component::new("2", "motherboard", "B650M").with_attr("ram_type", "DDR5"),
            );
        selection.last_changed = Some(Slot::Motherboard);

        let suggestions = suggest(
            &selection,
            &[incompatible(RuleId::RamMotherboard)],
            &SpecExtractor::new(),
            &EngineConfig::default(),
        );
        let s = &suggestions[0];
        assert_eq!(s.target, Slot::Ram);
        assert_eq!(s.requirement.ram_type.as_deref(), Some("DDR5"));
        assert_eq!(s.message, "Motherboard supports DDR5 but RAM is DDR4");
    }

    #[test]
    fn test_psu_suggestion_is_an_upgrade_with_min_wattage() {
        let selection = BuildSelection::new()
            .with(
                Slot::Cpu,
                Component::new("1", "cpu", "Ryzen 5 5600X").with_attr("tdp", 65),
            )
            .with(
                Slot::Gpu,
                Component::new("2", "gpu", "RTX 4060").with_attr("tdp", 150),
            )
            .with(
                Slot::Psu,
                Component::new("3", "psu", "CV350").with_attr("wattage", 350),
            );
        let suggestions = suggest(
            &selection,
            &[incompatible(RuleId::PsuPower)],
            &SpecExtractor::new(),
            &EngineConfig::default(),
        );
        let s = &suggestions[0];
        assert_eq!(s.target, Slot::Psu);
        assert_eq!(s.action, ActionKind::Upgrade);
        assert_eq!(s.requirement.min_wattage, Some(400));
        assert!(s.message.contains("350W"));
    }

    #[test]
    fn test_suggestion_survives_missing_reextraction() {
        // An incompatible outcome whose figures are no longer extractable
        // still yields a suggestion; unreadable values degrade the message.
        let selection = BuildSelection::new()
            .with(Slot::Gpu, Component::new("1", "gpu", "Mystery GPU"))
            .with(Slot::Case, Component::new("2", "case", "Mystery Case"));
        let suggestions = suggest(
            &selection,
            &[incompatible(RuleId::GpuLength)],
            &SpecExtractor::new(),
            &EngineConfig::default(),
        );
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.target, Slot::Gpu);
        assert!(s.requirement.max_length_mm.is_none());
        assert!(s.message.contains("unknown"));
    }

    #[test]
    fn test_compatible_outcomes_suggest_nothing() {
        let selection = socket_mismatch_selection();
        let outcome = RuleOutcome::compatible(
            RuleId::CpuMotherboard,
            &[Slot::Cpu, Slot::Motherboard],
            Severity::Hard,
        );
        let suggestions = suggest(
            &selection,
            &[outcome],
            &SpecExtractor::new(),
            &EngineConfig::default(),
        );
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_requirement_serializes_camel_case_and_sparse() {
        let req = Requirement {
            ram_type: Some("DDR5".to_string()),
            min_wattage: Some(400),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ramType"], "DDR5");
        assert_eq!(json["minWattage"], 400);
        assert!(json.get("socket").is_none());
    }

    #[test]
    fn test_full_pipeline_produces_suggestion_per_failure() {
        let selection = socket_mismatch_selection();
        let ex = SpecExtractor::new();
        let outcomes: Vec<RuleOutcome> = crate::rules::default_rules()
            .iter()
            .filter_map(|r| r.evaluate(&selection, &ex))
            .collect();
        let failures = outcomes.iter().filter(|o| o.status.is_incompatible()).count();
        let suggestions = suggest(&selection, &outcomes, &ex, &EngineConfig::default());
        assert_eq!(failures, 1);
        assert_eq!(suggestions.len(), 1);
    }
}
