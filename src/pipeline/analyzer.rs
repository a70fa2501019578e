//! Reusability analysis
//!
//! Pure derivation over a generated plan: which catalog items are
//! worn on more than one day, and what share of the wardrobe that
//! represents.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{DailyOutfit, ReusabilityAnalysis};

/// Analyze cross-day item reuse. An item worn twice on the same day
/// counts once for that day; the map only lists items worn on more
/// than one day, each with a sorted, deduplicated day list.
pub fn analyze(daily_outfits: &[DailyOutfit]) -> ReusabilityAnalysis {
    let mut wear_days: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();

    for daily in daily_outfits {
        for item in daily.outfit.items() {
            wear_days
                .entry(item.sku.clone())
                .or_default()
                .insert(daily.day);
        }
    }

    let total_items = wear_days.len() as u32;
    let reusability_map: BTreeMap<String, Vec<u32>> = wear_days
        .into_iter()
        .filter(|(_, days)| days.len() > 1)
        .map(|(sku, days)| (sku, days.into_iter().collect()))
        .collect();
    let reused_items = reusability_map.len() as u32;
    let reusability_percentage = if total_items == 0 {
        0
    } else {
        (f64::from(reused_items) / f64::from(total_items) * 100.0).round() as u32
    };

    ReusabilityAnalysis {
        total_items,
        reused_items,
        reusability_percentage,
        reusability_map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutfitItem, OutfitSlots, Styling};

    fn day(n: u32, top: &str, bottom: &str, foot: &str) -> DailyOutfit {
        DailyOutfit {
            day: n,
            date: None,
            occasion: None,
            outfit: OutfitSlots {
                topwear: OutfitItem::sku(top),
                bottomwear: OutfitItem::sku(bottom),
                footwear: OutfitItem::sku(foot),
                outerwear: None,
                accessories: vec![],
            },
            styling: Styling {
                rationale: "r".into(),
                weather_considerations: "w".into(),
                dresscode_compliance: "d".into(),
            },
        }
    }

    #[test]
    fn reuse_across_days_is_tracked() {
        // SKU_A worn on days 1 and 3, SKU_B every day, six one-offs.
        let days = vec![
            day(1, "SKU_A", "SKU_P", "SKU_B"),
            day(2, "SKU_Q", "SKU_R", "SKU_B"),
            day(3, "SKU_A", "SKU_S", "SKU_B"),
        ];
        let mut days = days;
        days[1].outfit.accessories.push(OutfitItem::sku("SKU_T"));
        days[2].outfit.accessories.push(OutfitItem::sku("SKU_U"));

        let analysis = analyze(&days);
        assert_eq!(analysis.total_items, 8);
        assert_eq!(analysis.reused_items, 2);
        assert_eq!(analysis.reusability_percentage, 25);
        assert_eq!(analysis.reusability_map["SKU_A"], vec![1, 3]);
        assert_eq!(analysis.reusability_map["SKU_B"], vec![1, 2, 3]);
        assert!(!analysis.reusability_map.contains_key("SKU_P"));
    }

    #[test]
    fn same_day_double_wear_counts_once() {
        let mut single = day(1, "SKU_A", "SKU_B", "SKU_C");
        single.outfit.accessories.push(OutfitItem::sku("SKU_A"));
        let analysis = analyze(&[single]);
        assert_eq!(analysis.total_items, 3);
        assert_eq!(analysis.reused_items, 0);
        assert!(analysis.reusability_map.is_empty());
    }

    #[test]
    fn out_of_order_days_yield_sorted_unique_lists() {
        // Entries may arrive in any order and a day may repeat.
        let days = vec![
            day(2, "SKU_A", "SKU_P", "SKU_Q"),
            day(1, "SKU_A", "SKU_R", "SKU_S"),
            day(2, "SKU_A", "SKU_T", "SKU_U"),
        ];
        let analysis = analyze(&days);
        assert_eq!(analysis.reusability_map["SKU_A"], vec![1, 2]);
        for days in analysis.reusability_map.values() {
            assert!(days.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn empty_plan_is_all_zeroes() {
        let analysis = analyze(&[]);
        assert_eq!(analysis.total_items, 0);
        assert_eq!(analysis.reusability_percentage, 0);
    }
}
