//! Coarse performance heuristics over a selection.
//!
//! These are shopping-grade signals, not benchmarks: gaming scales with
//! CPU/GPU spend, workstation with core count and RAM capacity, cooling and
//! upgrade path from categorical reads. Each axis is clamped to 0-100.

use crate::extract::{Attr, SpecExtractor};
use crate::model::{BuildSelection, Slot};
use serde::{Deserialize, Serialize};

/// Price (in catalog currency units) at which the GPU alone saturates the
/// gaming axis.
const GPU_PRICE_CEILING: f64 = 50_000.0;
/// Same saturation point for the CPU contribution.
const CPU_PRICE_CEILING: f64 = 30_000.0;
/// Core count that saturates the workstation axis on its own.
const CORE_CEILING: f64 = 16.0;
/// RAM capacity (GB) that saturates the workstation axis on its own.
const CAPACITY_CEILING: f64 = 64.0;

/// 0-100 heuristic scores on four axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    pub gaming: u8,
    pub workstation: u8,
    pub cooling: u8,
    pub upgrade: u8,
}

fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}

/// Estimate performance for the selection.
pub fn estimate(selection: &BuildSelection, extractor: &SpecExtractor) -> PerformanceEstimate {
    let gaming = match (selection.get(Slot::Gpu), selection.get(Slot::Cpu)) {
        (Some(gpu), Some(cpu)) => clamp_score(
            (gpu.price / GPU_PRICE_CEILING) * 100.0 + (cpu.price / CPU_PRICE_CEILING) * 100.0,
        ),
        _ => 0,
    };

    let workstation = match (selection.get(Slot::Cpu), selection.get(Slot::Ram)) {
        (Some(cpu), Some(ram)) => {
            let cores = extractor.get_num(cpu, Attr::Cores).unwrap_or(0.0);
            let capacity = extractor.get_num(ram, Attr::Capacity).unwrap_or(0.0);
            clamp_score((cores / CORE_CEILING) * 100.0 + (capacity / CAPACITY_CEILING) * 100.0)
        }
        _ => 0,
    };

    let cooling = match selection.get(Slot::Cooler) {
        Some(cooler) => match extractor.get_str(cooler, Attr::CoolerType) {
            Some(kind) => {
                let kind = kind.to_ascii_lowercase();
                if kind.contains("aio") || kind.contains("liquid") {
                    100
                } else if kind.contains("air") {
                    80
                } else {
                    60
                }
            }
            None => 60,
        },
        // Stock cooling still cools, just not well.
        None => 40,
    };

    let upgrade = match selection.get(Slot::Motherboard) {
        Some(motherboard) => match extractor.get_str(motherboard, Attr::RamType) {
            Some(t) if t.eq_ignore_ascii_case("ddr5") => 100,
            _ => 70,
        },
        None => 0,
    };

    PerformanceEstimate {
        gaming,
        workstation,
        cooling,
        upgrade,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Component;

    #[test]
    fn test_empty_selection_floors() {
        let est = estimate(&BuildSelection::new(), &SpecExtractor::new());
        assert_eq!(est.gaming, 0);
        assert_eq!(est.workstation, 0);
        assert_eq!(est.cooling, 40);
        assert_eq!(est.upgrade, 0);
    }

    #[test]
    fn test_gaming_scales_with_spend_and_clamps() {
        let ex = SpecExtractor::new();
        let sel = BuildSelection::new()
            .with(
                Slot::Gpu,
                Component::new("1", "gpu", "RTX 4060").with_price(25_000.0),
            )
            .with(
                Slot::Cpu,
                Component::new("2", "cpu", "Ryzen 5 7600").with_price(15_000.0),
            );
        // 50% of each ceiling: 50 + 50 = 100.
        assert_eq!(estimate(&sel, &ex).gaming, 100);

        let modest = BuildSelection::new()
            .with(
                Slot::Gpu,
                Component::new("1", "gpu", "RX 6600").with_price(12_500.0),
            )
            .with(
                Slot::Cpu,
                Component::new("2", "cpu", "Ryzen 5 5500").with_price(7_500.0),
            );
        assert_eq!(estimate(&modest, &ex).gaming, 50);
    }

    #[test]
    fn test_workstation_from_cores_and_capacity() {
        let ex = SpecExtractor::new();
        let sel = BuildSelection::new()
            .with(
                Slot::Cpu,
                Component::new("1", "cpu", "Ryzen 7 5700X").with_attr("cores", 8),
            )
            .with(
                Slot::Ram,
                Component::new("2", "ram", "32GB Kit").with_attr("capacity", 32),
            );
        // 8/16 + 32/64 = 50 + 50.
        assert_eq!(estimate(&sel, &ex).workstation, 100);
    }

    #[test]
    fn test_cooling_tiers() {
        let ex = SpecExtractor::new();
        let with_cooler = |kind: &str| {
            BuildSelection::new().with(
                Slot::Cooler,
                Component::new("1", "cooler", "Some Cooler").with_attr("type", kind),
            )
        };
        assert_eq!(estimate(&with_cooler("AIO Liquid Cooler"), &ex).cooling, 100);
        assert_eq!(estimate(&with_cooler("Air Cooler"), &ex).cooling, 80);
        assert_eq!(estimate(&with_cooler("Passive Heatsink"), &ex).cooling, 60);
    }

    #[test]
    fn test_upgrade_path_prefers_ddr5_platform() {
        let ex = SpecExtractor::new();
        let ddr5 = BuildSelection::new().with(
            Slot::Motherboard,
            Component::new("1", "motherboard", "B650M").with_attr("ram_type", "DDR5"),
        );
        assert_eq!(estimate(&ddr5, &ex).upgrade, 100);

        let ddr4 = BuildSelection::new().with(
            Slot::Motherboard,
            Component::new("1", "motherboard", "B550M").with_attr("ram_type", "DDR4"),
        );
        assert_eq!(estimate(&ddr4, &ex).upgrade, 70);
    }
}
