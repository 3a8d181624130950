//! Canonical attribute model: slots, catalog components, build selections.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// The eight canonical component slots of a build.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Cpu,
    Motherboard,
    Gpu,
    Ram,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl Slot {
    /// All slots in canonical order.
    pub fn all() -> [Slot; 8] {
        [
            Slot::Cpu,
            Slot::Motherboard,
            Slot::Gpu,
            Slot::Ram,
            Slot::Storage,
            Slot::Psu,
            Slot::Case,
            Slot::Cooler,
        ]
    }

    /// Canonical key for this slot.
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Cpu => "cpu",
            Slot::Motherboard => "motherboard",
            Slot::Gpu => "gpu",
            Slot::Ram => "ram",
            Slot::Storage => "storage",
            Slot::Psu => "psu",
            Slot::Case => "case",
            Slot::Cooler => "cooler",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A catalog record.
///
/// Components are immutable once read by the engine; the engine only computes
/// derived views over them. Field naming in the wild is inconsistent: known
/// top-level fields are captured explicitly, everything else lands in `attrs`
/// or the nested `specs` sub-record and is resolved through the
/// specification extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    /// Category label as it arrived from the catalog. May be an alias
    /// (e.g. "procie only") until resolved through the slot normalizer.
    pub category: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nested spec sub-record, present on some catalog entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<HashMap<String, Value>>,
    /// Remaining top-level attributes, inconsistently named.
    #[serde(flatten)]
    pub attrs: HashMap<String, Value>,
}

/// Catalog prices arrive as numbers or numeric strings; anything else
/// degrades to zero rather than failing the record.
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

impl Component {
    pub fn new(id: &str, category: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            name: name.to_string(),
            brand: None,
            price: 0.0,
            description: None,
            specs: None,
            attrs: HashMap::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set a top-level attribute.
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Set an attribute inside the nested `specs` sub-record.
    pub fn with_spec(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.specs
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Canonical slot for this component's category label, if recognized.
    pub fn slot(&self) -> Option<Slot> {
        crate::normalize::canonical_slot(&self.category)
    }
}

/// Snapshot of the current selection: at most one component per slot.
///
/// The engine treats a selection as an immutable input and recomputes all
/// derived views (report, suggestions, estimate) from scratch on every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSelection {
    #[serde(default)]
    slots: BTreeMap<Slot, Component>,
    /// Most recently changed slot, when the caller tracks one. Consulted by
    /// the suggestion policy to decide which side of a conflict to replace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<Slot>,
}

impl BuildSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a component in a slot, replacing any previous occupant.
    pub fn insert(&mut self, slot: Slot, component: Component) {
        self.slots.insert(slot, component);
    }

    /// Builder-style insert.
    pub fn with(mut self, slot: Slot, component: Component) -> Self {
        self.insert(slot, component);
        self
    }

    pub fn remove(&mut self, slot: Slot) -> Option<Component> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: Slot) -> Option<&Component> {
        self.slots.get(&slot)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn populated_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterate populated slots in canonical order.
    pub fn populated(&self) -> impl Iterator<Item = (Slot, &Component)> + '_ {
        self.slots.iter().map(|(slot, component)| (*slot, component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_keys_roundtrip() {
        for slot in Slot::all() {
            let json = serde_json::to_string(&slot).unwrap();
            assert_eq!(json, format!("\"{}\"", slot.key()));
            let back: Slot = serde_json::from_str(&json).unwrap();
            assert_eq!(back, slot);
        }
    }

    #[test]
    fn test_selection_insert_and_replace() {
        let mut selection = BuildSelection::new();
        assert!(selection.is_empty());

        selection.insert(Slot::Cpu, Component::new("1", "cpu", "Ryzen 5 5600X"));
        selection.insert(Slot::Cpu, Component::new("2", "cpu", "Ryzen 7 5800X"));

        assert_eq!(selection.populated_count(), 1);
        assert_eq!(selection.get(Slot::Cpu).unwrap().id, "2");
        assert!(selection.get(Slot::Gpu).is_none());
    }

    #[test]
    fn test_component_deserializes_with_messy_fields() {
        let json = r#"{
            "id": "42",
            "category": "psu",
            "name": "Seasonic Focus 650W",
            "price": "3450.50",
            "Wattage": 650,
            "specs": { "form_factor": "ATX" }
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.price, 3450.50);
        assert_eq!(component.attrs.get("Wattage"), Some(&serde_json::json!(650)));
        assert!(component.specs.unwrap().contains_key("form_factor"));
    }

    #[test]
    fn test_component_price_degrades_to_zero() {
        let json = r#"{ "id": "1", "category": "cpu", "name": "X", "price": {"bad": true} }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.price, 0.0);
    }
}
