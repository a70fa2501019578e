//! Outfit plan types
//!
//! The generated per-day selection of catalog items plus styling
//! notes, and the derived reusability analysis. Matches the
//! generation wire format (camelCase).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::DressCode;

/// Trip header echoed back by generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub occasion: String,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub dress_code: DressCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

/// A single catalog item placed in a slot. Only the SKU is mandatory;
/// descriptive attributes are whatever the model echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutfitItem {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OutfitItem {
    pub fn sku(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: None,
            category: None,
            color: None,
            notes: None,
        }
    }
}

/// The slots of one day's outfit. `outerwear` may be null; the three
/// core slots are always filled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSlots {
    pub topwear: OutfitItem,
    pub bottomwear: OutfitItem,
    pub footwear: OutfitItem,
    #[serde(default)]
    pub outerwear: Option<OutfitItem>,
    #[serde(default)]
    pub accessories: Vec<OutfitItem>,
}

impl OutfitSlots {
    /// All items worn that day, slots first, then accessories.
    pub fn items(&self) -> impl Iterator<Item = &OutfitItem> {
        [&self.topwear, &self.bottomwear, &self.footwear]
            .into_iter()
            .chain(self.outerwear.as_ref())
            .chain(self.accessories.iter())
    }
}

/// Styling notes accompanying each outfit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Styling {
    pub rationale: String,
    pub weather_considerations: String,
    pub dresscode_compliance: String,
}

/// One generated day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyOutfit {
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    pub outfit: OutfitSlots,
    pub styling: Styling,
}

/// Cross-day reuse metrics derived from the plan. `reusability_map`
/// only contains SKUs worn on more than one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReusabilityAnalysis {
    pub total_items: u32,
    pub reused_items: u32,
    pub reusability_percentage: u32,
    pub reusability_map: BTreeMap<String, Vec<u32>>,
}

/// The complete generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutfitPlan {
    pub trip_details: TripDetails,
    pub daily_outfits: Vec<DailyOutfit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reusability_analysis: Option<ReusabilityAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_iterate_in_order() {
        let slots = OutfitSlots {
            topwear: OutfitItem::sku("SKU001"),
            bottomwear: OutfitItem::sku("SKU002"),
            footwear: OutfitItem::sku("SKU003"),
            outerwear: None,
            accessories: vec![OutfitItem::sku("SKU004")],
        };
        let skus: Vec<_> = slots.items().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, ["SKU001", "SKU002", "SKU003", "SKU004"]);
    }

    #[test]
    fn outerwear_null_deserializes() {
        let json = serde_json::json!({
            "topwear": {"sku": "SKU001"},
            "bottomwear": {"sku": "SKU002"},
            "footwear": {"sku": "SKU003"},
            "outerwear": null,
            "accessories": []
        });
        let slots: OutfitSlots = serde_json::from_value(json).unwrap();
        assert!(slots.outerwear.is_none());
        assert!(slots.accessories.is_empty());
    }
}
