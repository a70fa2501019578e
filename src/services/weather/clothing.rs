//! Clothing recommendations and weather quality
//!
//! Derives layering, protection needs, footwear/fabric/color guidance
//! and a 0-100 weather-quality score from a day's normalized
//! forecast.

use crate::domain::{
    AccessoryNeed, ClothingRecommendations, LayeringTier, ProtectionNeed, QualityRating,
    RecommendAvoid, Urgency, WeatherCondition, WeatherQuality,
};

/// Inputs shared by the recommendation and quality functions.
#[derive(Debug, Clone, Copy)]
pub struct DayProfile {
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_avg: f64,
    pub condition: WeatherCondition,
    pub precipitation_probability: u8,
    pub humidity: u8,
    pub wind_kmh: f64,
}

pub fn layering_tier(temp_min: f64) -> LayeringTier {
    if temp_min < 0.0 {
        LayeringTier::Heavy
    } else if temp_min < 10.0 {
        LayeringTier::Moderate
    } else if temp_min < 18.0 {
        LayeringTier::Light
    } else {
        LayeringTier::None
    }
}

fn waterproof_need(profile: &DayProfile) -> ProtectionNeed {
    let wet = matches!(profile.condition, WeatherCondition::Rainy | WeatherCondition::Snowy);
    if profile.precipitation_probability >= 70 || (wet && profile.precipitation_probability >= 40) {
        ProtectionNeed::needed(Urgency::Essential)
    } else if wet || profile.precipitation_probability >= 40 {
        ProtectionNeed::needed(Urgency::Recommended)
    } else {
        ProtectionNeed::not_needed()
    }
}

fn sun_protection_need(profile: &DayProfile) -> ProtectionNeed {
    if profile.condition != WeatherCondition::Sunny {
        return ProtectionNeed::not_needed();
    }
    if profile.temp_max >= 28.0 {
        ProtectionNeed::needed(Urgency::Essential)
    } else if profile.temp_max >= 20.0 {
        ProtectionNeed::needed(Urgency::Recommended)
    } else {
        ProtectionNeed::not_needed()
    }
}

fn warm_accessories(profile: &DayProfile) -> AccessoryNeed {
    if profile.temp_min > 5.0 {
        return AccessoryNeed { needed: false, items: Vec::new() };
    }
    let mut items = vec!["beanie".to_string(), "gloves".to_string(), "scarf".to_string()];
    if profile.temp_min <= 0.0 {
        items.push("thermal socks".to_string());
    }
    AccessoryNeed { needed: true, items }
}

fn footwear(profile: &DayProfile) -> RecommendAvoid {
    match profile.condition {
        WeatherCondition::Rainy => RecommendAvoid {
            recommended: vec!["waterproof boots".into(), "rubber-soled shoes".into()],
            avoid: vec!["suede shoes".into(), "canvas sneakers".into()],
        },
        WeatherCondition::Snowy => RecommendAvoid {
            recommended: vec!["insulated boots".into(), "lug-sole boots".into()],
            avoid: vec!["open footwear".into(), "smooth leather soles".into()],
        },
        WeatherCondition::Sunny if profile.temp_max >= 25.0 => RecommendAvoid {
            recommended: vec!["breathable sneakers".into(), "sandals".into()],
            avoid: vec!["heavy boots".into()],
        },
        _ if profile.temp_min <= 5.0 => RecommendAvoid {
            recommended: vec!["closed leather shoes".into(), "boots".into()],
            avoid: vec!["sandals".into()],
        },
        _ => RecommendAvoid {
            recommended: vec!["comfortable closed shoes".into()],
            avoid: Vec::new(),
        },
    }
}

fn fabrics(profile: &DayProfile) -> RecommendAvoid {
    if profile.temp_avg >= 25.0 {
        RecommendAvoid {
            recommended: vec!["linen".into(), "lightweight cotton".into()],
            avoid: vec!["wool".into(), "heavy denim".into()],
        }
    } else if profile.temp_avg <= 8.0 {
        RecommendAvoid {
            recommended: vec!["wool".into(), "fleece".into(), "layered knits".into()],
            avoid: vec!["linen".into()],
        }
    } else if profile.humidity >= 80 {
        RecommendAvoid {
            recommended: vec!["breathable cotton".into(), "moisture-wicking blends".into()],
            avoid: vec!["non-breathable synthetics".into()],
        }
    } else {
        RecommendAvoid {
            recommended: vec!["cotton".into(), "light knits".into()],
            avoid: Vec::new(),
        }
    }
}

fn colors(profile: &DayProfile) -> RecommendAvoid {
    match profile.condition {
        WeatherCondition::Sunny if profile.temp_max >= 25.0 => RecommendAvoid {
            recommended: vec!["light neutrals".into(), "white".into(), "pastels".into()],
            avoid: vec!["black".into(), "dark navy".into()],
        },
        WeatherCondition::Rainy => RecommendAvoid {
            recommended: vec!["darker practical tones".into(), "navy".into(), "charcoal".into()],
            avoid: vec!["white".into(), "pale suede tones".into()],
        },
        _ => RecommendAvoid {
            recommended: vec!["seasonal neutrals".into()],
            avoid: Vec::new(),
        },
    }
}

fn activity_adjustments(profile: &DayProfile) -> Vec<String> {
    let mut out = Vec::new();
    if profile.precipitation_probability >= 50 {
        out.push("Plan indoor alternatives for outdoor activities".to_string());
    }
    if profile.temp_max >= 30.0 {
        out.push("Schedule strenuous activities for the cooler morning hours".to_string());
    }
    if profile.temp_min <= 0.0 {
        out.push("Limit prolonged time outdoors".to_string());
    }
    if profile.wind_kmh >= 25.0 {
        out.push("Secure hats and loose layers in open areas".to_string());
    }
    out
}

fn comfort_tips(profile: &DayProfile) -> Vec<String> {
    let mut tips = Vec::new();
    match layering_tier(profile.temp_min) {
        LayeringTier::Heavy => tips.push("Wear a thermal base layer under everything".to_string()),
        LayeringTier::Moderate => tips.push("Bring a warm mid-layer you can shed indoors".to_string()),
        LayeringTier::Light => tips.push("A light extra layer covers the morning chill".to_string()),
        LayeringTier::None => tips.push("Single light layers are enough all day".to_string()),
    }
    if profile.humidity >= 80 {
        tips.push("Choose loose cuts; humidity makes it feel warmer".to_string());
    }
    if (profile.temp_max - profile.temp_min) >= 10.0 {
        tips.push("Large day-night swing: dress in removable layers".to_string());
    }
    tips
}

/// Full recommendation block for one day.
pub fn recommendations(profile: &DayProfile) -> ClothingRecommendations {
    ClothingRecommendations {
        layering: layering_tier(profile.temp_min),
        waterproof: waterproof_need(profile),
        sun_protection: sun_protection_need(profile),
        warm_accessories: warm_accessories(profile),
        footwear: footwear(profile),
        fabrics: fabrics(profile),
        colors: colors(profile),
        activity_adjustments: activity_adjustments(profile),
        comfort_tips: comfort_tips(profile),
    }
}

/// Start at 100 and deduct for adverse conditions; clamp to [0,100].
pub fn quality(profile: &DayProfile) -> WeatherQuality {
    let mut score: i32 = 100;

    // Temperature extremes
    if profile.temp_avg < 0.0 {
        score -= 30;
    } else if profile.temp_avg < 5.0 {
        score -= 20;
    } else if profile.temp_avg < 10.0 {
        score -= 10;
    } else if profile.temp_avg > 35.0 {
        score -= 30;
    } else if profile.temp_avg > 30.0 {
        score -= 20;
    } else if profile.temp_avg > 27.0 {
        score -= 10;
    }

    // Precipitation probability
    if profile.precipitation_probability >= 80 {
        score -= 25;
    } else if profile.precipitation_probability >= 60 {
        score -= 15;
    } else if profile.precipitation_probability >= 40 {
        score -= 8;
    }

    // Wind
    if profile.wind_kmh >= 40.0 {
        score -= 20;
    } else if profile.wind_kmh >= 25.0 {
        score -= 10;
    }

    // Humidity
    if profile.humidity >= 85 {
        score -= 10;
    } else if profile.humidity <= 20 {
        score -= 5;
    }

    // Condition
    score -= match profile.condition {
        WeatherCondition::Rainy => 15,
        WeatherCondition::Snowy => 20,
        WeatherCondition::Windy => 10,
        WeatherCondition::Sunny | WeatherCondition::Cloudy => 0,
    };

    let score = score.clamp(0, 100) as u32;
    WeatherQuality {
        score,
        rating: QualityRating::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mild() -> DayProfile {
        DayProfile {
            temp_min: 14.0,
            temp_max: 22.0,
            temp_avg: 18.0,
            condition: WeatherCondition::Sunny,
            precipitation_probability: 10,
            humidity: 50,
            wind_kmh: 8.0,
        }
    }

    #[test]
    fn layering_tiers() {
        assert_eq!(layering_tier(-3.0), LayeringTier::Heavy);
        assert_eq!(layering_tier(0.0), LayeringTier::Moderate);
        assert_eq!(layering_tier(10.0), LayeringTier::Light);
        assert_eq!(layering_tier(18.0), LayeringTier::None);
    }

    #[test]
    fn pleasant_day_scores_excellent() {
        let q = quality(&mild());
        assert!(q.score >= 80, "score was {}", q.score);
        assert_eq!(q.rating, QualityRating::Excellent);
    }

    #[test]
    fn cold_wet_windy_day_scores_poorly() {
        let profile = DayProfile {
            temp_min: -5.0,
            temp_max: 0.0,
            temp_avg: -2.0,
            condition: WeatherCondition::Snowy,
            precipitation_probability: 85,
            humidity: 90,
            wind_kmh: 45.0,
        };
        let q = quality(&profile);
        assert!(q.score < 20, "score was {}", q.score);
        assert_eq!(q.rating, QualityRating::Difficult);
    }

    #[test]
    fn rainy_day_needs_waterproof() {
        let mut profile = mild();
        profile.condition = WeatherCondition::Rainy;
        profile.precipitation_probability = 75;
        let rec = recommendations(&profile);
        assert!(rec.waterproof.needed);
        assert_eq!(rec.waterproof.urgency, Some(Urgency::Essential));
        assert!(rec.footwear.avoid.iter().any(|s| s.contains("suede")));
    }

    #[test]
    fn hot_sunny_day_needs_sun_protection() {
        let profile = DayProfile {
            temp_min: 20.0,
            temp_max: 32.0,
            temp_avg: 26.0,
            condition: WeatherCondition::Sunny,
            precipitation_probability: 0,
            humidity: 40,
            wind_kmh: 5.0,
        };
        let rec = recommendations(&profile);
        assert_eq!(rec.sun_protection.urgency, Some(Urgency::Essential));
        assert!(rec.fabrics.recommended.contains(&"linen".to_string()));
        assert!(rec.colors.avoid.contains(&"black".to_string()));
        assert!(!rec.warm_accessories.needed);
    }

    #[test]
    fn freezing_day_gets_thermal_accessories() {
        let profile = DayProfile {
            temp_min: -2.0,
            temp_max: 4.0,
            temp_avg: 1.0,
            condition: WeatherCondition::Cloudy,
            precipitation_probability: 20,
            humidity: 60,
            wind_kmh: 12.0,
        };
        let rec = recommendations(&profile);
        assert!(rec.warm_accessories.needed);
        assert!(rec.warm_accessories.items.contains(&"thermal socks".to_string()));
        assert_eq!(rec.layering, LayeringTier::Heavy);
    }
}
