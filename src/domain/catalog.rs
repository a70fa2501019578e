//! Clothing catalog types
//!
//! The catalog is a read-only table loaded from a CSV file and keyed
//! by SKU.

use serde::{Deserialize, Serialize};

/// One catalog row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub sku: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_suitability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CatalogItem {
    /// SKUs are expected to look like `SKU123`. Non-conforming values
    /// are tolerated but logged at load time.
    pub fn has_conventional_sku(&self) -> bool {
        let rest = match self.sku.strip_prefix("SKU") {
            Some(rest) => rest,
            None => return false,
        };
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str) -> CatalogItem {
        CatalogItem {
            sku: sku.to_string(),
            name: "White Oxford Shirt".to_string(),
            category: "topwear".to_string(),
            price: Some(49.0),
            colors: vec!["white".to_string()],
            weather_suitability: None,
            formality: None,
            notes: None,
        }
    }

    #[test]
    fn conventional_sku_pattern() {
        assert!(item("SKU001").has_conventional_sku());
        assert!(item("SKU42").has_conventional_sku());
        assert!(!item("SKU").has_conventional_sku());
        assert!(!item("sku001").has_conventional_sku());
        assert!(!item("SKU00A").has_conventional_sku());
    }
}
