//! Slot normalization.
//!
//! Selections and catalog rows arrive keyed by whatever label the upstream
//! data entry used ("procie only", "mobo", "ssd nvme", "aio", ...). This
//! module folds those labels onto the eight canonical slots via a fixed
//! alias table. Unrecognized keys are dropped, never an error: unrelated
//! metadata rides along with selections in the wild.

use crate::model::{BuildSelection, Component, Slot};
use std::collections::HashMap;
use tracing::debug;

/// Alias table observed in catalog and client data.
const SLOT_ALIASES: &[(Slot, &[&str])] = &[
    (
        Slot::Cpu,
        &["cpu", "processor", "procie", "procie only", "processor only"],
    ),
    (Slot::Motherboard, &["motherboard", "mobo"]),
    (
        Slot::Gpu,
        &["gpu", "graphics", "graphics card", "video", "video card", "vga"],
    ),
    (
        Slot::Ram,
        &["ram", "memory", "ddr", "ddr4", "ddr5", "ram 3200mhz"],
    ),
    (
        Slot::Storage,
        &["storage", "ssd", "nvme", "ssd nvme", "hdd", "hard drive", "drive"],
    ),
    (Slot::Psu, &["psu", "power supply", "psu - tr", "tr psu"]),
    (Slot::Case, &["case", "chassis", "case gaming"]),
    (
        Slot::Cooler,
        &[
            "cooler",
            "coolers",
            "cooling",
            "aio",
            "cpu cooler",
            "liquid cooler",
            "water cooling",
            "fan",
            "heatsink",
        ],
    ),
];

/// Resolve a raw slot key or category label to its canonical slot.
///
/// Matching is case-insensitive over trimmed input; the first alias in table
/// order wins.
pub fn canonical_slot(label: &str) -> Option<Slot> {
    let needle = label.trim().to_ascii_lowercase();
    for (slot, aliases) in SLOT_ALIASES {
        if aliases.contains(&needle.as_str()) {
            return Some(*slot);
        }
    }
    None
}

/// Accepted aliases for a slot, canonical key first.
pub fn aliases(slot: Slot) -> &'static [&'static str] {
    SLOT_ALIASES
        .iter()
        .find(|(s, _)| *s == slot)
        .map(|(_, a)| *a)
        .unwrap_or(&[])
}

/// Fold a raw key -> component mapping onto the canonical slots.
///
/// Exact canonical keys always win over alias keys; among alias keys the
/// first to claim a vacant slot wins. Keys that match nothing are resolved
/// through the component's own category label as a last resort, then
/// silently dropped. Idempotent over its own output. Only keys and category
/// labels are inspected, never attribute contents.
pub fn normalize_selection(raw: &HashMap<String, Component>) -> BuildSelection {
    let mut selection = BuildSelection::new();

    // Canonical keys first so alias drift can never displace them.
    for (key, component) in raw {
        if let Some(slot) = canonical_slot(key) {
            if key.trim().eq_ignore_ascii_case(slot.key()) {
                selection.insert(slot, component.clone());
            }
        }
    }

    // Alias keys fill the remaining vacancies.
    for (key, component) in raw {
        if let Some(slot) = canonical_slot(key) {
            if selection.get(slot).is_none() {
                selection.insert(slot, component.clone());
            }
        }
    }

    // Keys that match nothing: fall back to the component's category label.
    for (key, component) in raw {
        match canonical_slot(key) {
            Some(_) => {}
            None => match component.slot() {
                Some(slot) if selection.get(slot).is_none() => {
                    selection.insert(slot, component.clone());
                }
                _ => {
                    debug!(key = %key, "dropping unrecognized slot key");
                }
            },
        }
    }

    selection
}
