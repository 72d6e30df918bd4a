//! Fertilizers applied with a watering or solution change.
//!
//! Two record shapes exist in stored logs: the original object of named
//! product flags, and the later list of free-form products. Both are kept as
//! variants so formatting matches on the variant instead of probing shape.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Text shown when no fertilizer was used.
pub const NO_FERTILIZERS: &str = "Ninguno";

/// Fertilizer payload in either of its stored forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fertilizers {
    ItemList(Vec<FertilizerItem>),
    Structured(StructuredFertilizers),
}

/// Fixed product line with on/off additives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredFertilizers {
    #[serde(deserialize_with = "lenient::number")]
    pub bases_amount: Option<f64>,
    pub bases_unit: Option<String>,
    pub enzimas: bool,
    pub candy: bool,
    pub big_bud: bool,
    pub flawless_finish: bool,
    pub foliar: bool,
    pub foliar_product: Option<String>,
}

/// One product of a free-form fertilizer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerItem {
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub dose: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

impl FertilizerItem {
    pub fn new(product_name: impl Into<String>, dose: f64, unit: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            dose: Some(dose),
            unit: unit.into(),
        }
    }
}

impl Fertilizers {
    /// Comma-separated human summary, or [`NO_FERTILIZERS`].
    pub fn summary(&self) -> String {
        let used: Vec<String> = match self {
            Fertilizers::ItemList(items) => items.iter().map(format_item).collect(),
            Fertilizers::Structured(flags) => structured_parts(flags),
        };
        if used.is_empty() {
            NO_FERTILIZERS.to_string()
        } else {
            used.join(", ")
        }
    }
}

/// Summary for an optional payload; absent means none were used.
pub fn format_fertilizers(fertilizers: Option<&Fertilizers>) -> String {
    fertilizers
        .map(Fertilizers::summary)
        .unwrap_or_else(|| NO_FERTILIZERS.to_string())
}

fn format_item(item: &FertilizerItem) -> String {
    let dose = item.dose.map(|d| d.to_string()).unwrap_or_default();
    format!("{} ({} {})", item.product_name, dose, item.unit)
}

fn structured_parts(flags: &StructuredFertilizers) -> Vec<String> {
    let mut used = Vec::new();
    let unit = flags.bases_unit.as_deref().filter(|u| !u.is_empty());
    if let (Some(amount), Some(unit)) = (flags.bases_amount.filter(|a| *a != 0.0), unit) {
        used.push(format!("Bases ({} {})", amount, unit));
    }
    for (enabled, label) in [
        (flags.enzimas, "Enzimas"),
        (flags.candy, "Candy"),
        (flags.big_bud, "BigBud"),
        (flags.flawless_finish, "FlawlessFinish"),
    ] {
        if enabled {
            used.push(label.to_string());
        }
    }
    if let Some(product) = flags.foliar_product.as_deref().filter(|p| !p.is_empty()) {
        if flags.foliar {
            used.push(format!("Foliar ({})", product));
        }
    }
    used
}
