//! Specification extraction over inconsistently shaped catalog records.
//!
//! For each normalized attribute there is an ordered list of field-name
//! variants to probe, first at the record's top level and then inside its
//! `specs` sub-record. When no structured field matches, a small set of
//! enumerable attributes (socket, RAM type, form factor, wattage) falls back
//! to substring heuristics over the component's name and description,
//! because catalog entries are not guaranteed to carry structured fields.
//!
//! Extraction never errors and never guesses a default: absence and
//! unparseable values both surface as `None`, which rules must treat as
//! "cannot evaluate", never as a failing value.

use crate::model::Component;
use regex::Regex;
use serde_json::Value;

/// Normalized attribute vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Socket,
    Brand,
    RamType,
    FormFactor,
    Wattage,
    Tdp,
    Length,
    Height,
    Width,
    Interface,
    Slots,
    Sticks,
    Speed,
    MaxRamSpeed,
    MaxMemorySpeed,
    StorageInterfaces,
    GpuMaxLength,
    CoolerMaxHeight,
    PsuSupport,
    Chipset,
    CoolerType,
    Cores,
    Capacity,
}

impl Attr {
    /// Candidate field names, in probe order.
    fn candidates(&self) -> &'static [&'static str] {
        match self {
            Attr::Socket => &["socket", "type", "cpu_socket"],
            Attr::Brand => &["brand", "manufacturer"],
            Attr::RamType => &["ram_type", "ramtype", "memory_type", "type", "ddr"],
            Attr::FormFactor => &["form_factor", "formfactor", "size", "type"],
            Attr::Wattage => &["wattage", "power", "w"],
            Attr::Tdp => &["tdp", "thermal_design_power", "power_consumption"],
            Attr::Length => &["length", "max_length", "maxlength", "size"],
            Attr::Height => &["height", "max_height", "maxheight"],
            Attr::Width => &["width", "max_width", "maxwidth"],
            Attr::Interface => &["interface", "connection", "type"],
            Attr::Slots => &["slots", "ram_slots", "memory_slots", "dimms"],
            Attr::Sticks => &["sticks", "modules", "ram_modules"],
            Attr::Speed => &["speed", "frequency"],
            Attr::MaxRamSpeed => &["max_ram_speed", "memory_speed"],
            Attr::MaxMemorySpeed => &["max_memory_speed", "max_ram_speed"],
            Attr::StorageInterfaces => {
                &["storage_interfaces", "storage_support", "sata_ports", "m2_slots"]
            }
            Attr::GpuMaxLength => {
                &["gpu_max_length", "max_gpu_length", "gpu_length", "max_length"]
            }
            Attr::CoolerMaxHeight => {
                &["cooler_max_height", "max_cooler_height", "cpu_cooler_height"]
            }
            Attr::PsuSupport => &["psu_support", "psu_type", "power_supply_support"],
            Attr::Chipset => &["chipset", "platform"],
            Attr::CoolerType => &["type", "cooler_type"],
            Attr::Cores => &["cores", "core_count"],
            Attr::Capacity => &["capacity", "size_gb"],
        }
    }
}

/// Canonical socket tokens recognized by the engine.
const SOCKET_TOKENS: &[(&str, &str)] = &[
    ("am4", "AM4"),
    ("amd4", "AM4"),
    ("am5", "AM5"),
    ("amd5", "AM5"),
    ("lga1200", "LGA1200"),
    ("lga1700", "LGA1700"),
    ("lga1851", "LGA1851"),
];

/// Collapse a raw socket string to its canonical token.
///
/// Tolerates vendor prefixes ("Socket AM4", "AMD AM4"), punctuation, and the
/// common AMD4/AMD5 typo. Returns `None` for anything unrecognized.
pub fn normalize_socket(raw: &str) -> Option<&'static str> {
    let squashed: String = raw
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect();
    for (needle, token) in SOCKET_TOKENS {
        if squashed.contains(needle) {
            return Some(token);
        }
    }
    None
}

/// Motherboard / case form factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Atx,
    MicroAtx,
    MiniItx,
    Eatx,
}

impl FormFactor {
    /// Parse a raw form factor label, tolerating the usual alias soup
    /// (mATX, u-ATX, MicroATX, mini itx, eatx, ...).
    pub fn parse(raw: &str) -> Option<FormFactor> {
        let v = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['_', ' '], "-");
        if v.contains("e-atx") || v.contains("eatx") {
            return Some(FormFactor::Eatx);
        }
        if v.contains("micro") && v.contains("atx") {
            return Some(FormFactor::MicroAtx);
        }
        if matches!(v.as_str(), "matx" | "m-atx" | "uatx" | "u-atx" | "microatx") {
            return Some(FormFactor::MicroAtx);
        }
        if (v.contains("mini") && v.contains("itx")) || matches!(v.as_str(), "mitx" | "miniitx") {
            return Some(FormFactor::MiniItx);
        }
        if v.contains("itx") {
            return Some(FormFactor::MiniItx);
        }
        if v.contains("atx") {
            return Some(FormFactor::Atx);
        }
        None
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormFactor::Atx => "ATX",
            FormFactor::MicroAtx => "Micro-ATX",
            FormFactor::MiniItx => "Mini-ITX",
            FormFactor::Eatx => "E-ATX",
        }
    }

    /// Containment matrix: can a case of this form factor house a
    /// motherboard of `motherboard`'s form factor?
    pub fn case_supports(&self, motherboard: FormFactor) -> bool {
        match self {
            FormFactor::Atx => matches!(
                motherboard,
                FormFactor::Atx | FormFactor::MicroAtx | FormFactor::MiniItx
            ),
            FormFactor::MicroAtx => {
                matches!(motherboard, FormFactor::MicroAtx | FormFactor::MiniItx)
            }
            FormFactor::MiniItx => matches!(motherboard, FormFactor::MiniItx),
            FormFactor::Eatx => true,
        }
    }
}

impl std::fmt::Display for FormFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Ordered-fallback specification extractor.
pub struct SpecExtractor {
    number_re: Regex,
    wattage_re: Regex,
    ryzen_re: Regex,
}

impl SpecExtractor {
    pub fn new() -> Self {
        Self {
            number_re: Regex::new(r"(\d+(?:\.\d+)?)").unwrap(),
            wattage_re: Regex::new(r"(?i)\b(\d{3,4})\s*w\b").unwrap(),
            ryzen_re: Regex::new(r"(?i)\b(?:ryzen\s*[3579]?|r[3579])\s*-?\s*(\d{4})").unwrap(),
        }
    }

    /// Raw attribute lookup: first present, non-empty field variant, then
    /// the text fallback for enumerable attributes.
    pub fn get(&self, component: &Component, attr: Attr) -> Option<Value> {
        for field in attr.candidates() {
            if let Some(value) = lookup_field(component, field) {
                return Some(value.clone());
            }
        }
        self.text_fallback(component, attr)
    }

    /// Attribute as a trimmed string.
    pub fn get_str(&self, component: &Component, attr: Attr) -> Option<String> {
        match self.get(component, attr)? {
            Value::String(s) => {
                let trimmed = s.trim().to_string();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Attribute as a number. Numeric strings with unit suffixes ("650W",
    /// "3200MHz") parse through their leading digits; anything else is
    /// `None`, never a guess.
    pub fn get_num(&self, component: &Component, attr: Attr) -> Option<f64> {
        match self.get(component, attr)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => self
                .number_re
                .captures(&s)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok()),
            _ => None,
        }
    }

    /// Substring heuristics over name + description, restricted to
    /// attributes with enumerable values.
    fn text_fallback(&self, component: &Component, attr: Attr) -> Option<Value> {
        let text = format!(
            "{} {}",
            component.name,
            component.description.as_deref().unwrap_or("")
        )
        .to_ascii_lowercase();

        match attr {
            Attr::Socket => self.socket_from_text(&text).map(Value::from),
            Attr::RamType => {
                if text.contains("ddr5") {
                    Some(Value::from("DDR5"))
                } else if text.contains("ddr4") {
                    Some(Value::from("DDR4"))
                } else {
                    None
                }
            }
            Attr::FormFactor => {
                // Longest token first so "micro-atx" never reports as "atx".
                if text.contains("micro-atx") || text.contains("micro atx") {
                    Some(Value::from("Micro-ATX"))
                } else if text.contains("mini-itx") || text.contains("mini itx") {
                    Some(Value::from("Mini-ITX"))
                } else if text.contains("atx") {
                    Some(Value::from("ATX"))
                } else {
                    None
                }
            }
            Attr::Wattage => self
                .wattage_re
                .captures(&text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .map(Value::from),
            Attr::Brand => {
                if text.contains("amd") || text.contains("ryzen") || text.contains("radeon") {
                    Some(Value::from("AMD"))
                } else if text.contains("intel") || text.contains("core i") {
                    Some(Value::from("Intel"))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn socket_from_text(&self, text: &str) -> Option<&'static str> {
        let squashed: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();
        for (needle, token) in SOCKET_TOKENS {
            if squashed.contains(needle) {
                return Some(token);
            }
        }
        // Ryzen model-number shorthand: 1000-6999 series are AM4 parts,
        // 7000+ are AM5.
        if let Some(caps) = self.ryzen_re.captures(text) {
            if let Ok(series) = caps[1].parse::<u32>() {
                if series >= 7000 {
                    return Some("AM5");
                }
                if series >= 1000 {
                    return Some("AM4");
                }
            }
        }
        None
    }
}

impl Default for SpecExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive field probe: top level first, then the `specs`
/// sub-record. Null and empty-string values count as absent.
fn lookup_field<'a>(component: &'a Component, field: &str) -> Option<&'a Value> {
    let present = |v: &Value| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    };

    for (key, value) in &component.attrs {
        if key.eq_ignore_ascii_case(field) && present(value) {
            return Some(value);
        }
    }
    if let Some(specs) = &component.specs {
        for (key, value) in specs {
            if key.eq_ignore_ascii_case(field) && present(value) {
                return Some(value);
            }
        }
    }
    None
}
