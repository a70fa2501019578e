//! Clothing catalog loader
//!
//! Loads the catalog CSV, validates required columns, and caches an
//! immutable snapshot per TTL window. The snapshot used to build a
//! generation prompt is the same one used to verify the returned
//! SKUs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::domain::CatalogItem;
use crate::error::{PipelineError, PipelineResult};

/// Immutable catalog snapshot shared for one TTL window.
#[derive(Debug)]
pub struct CatalogSnapshot {
    items: Vec<CatalogItem>,
    by_sku: HashMap<String, usize>,
}

impl CatalogSnapshot {
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn lookup(&self, sku: &str) -> Option<&CatalogItem> {
        self.by_sku.get(sku).map(|&idx| &self.items[idx])
    }

    /// Textual table view embedded in the generation prompt: a
    /// prelude with the row count, then header and data rows.
    pub fn format_for_prompt(&self) -> String {
        let mut out = format!(
            "Available clothing catalog ({} items). Select SKUs only from this table.\n",
            self.items.len()
        );
        out.push_str("sku | name | category | price | colors | weatherSuitability | formality | notes\n");
        for item in &self.items {
            let price = item
                .price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{} | {} | {} | {} | {} | {} | {} | {}\n",
                item.sku,
                item.name,
                item.category,
                price,
                if item.colors.is_empty() { "-".to_string() } else { item.colors.join(";") },
                item.weather_suitability.as_deref().unwrap_or("-"),
                item.formality.as_deref().unwrap_or("-"),
                item.notes.as_deref().unwrap_or("-"),
            ));
        }
        out
    }
}

struct CachedSnapshot {
    snapshot: Arc<CatalogSnapshot>,
    loaded_at: Instant,
}

/// Loads and caches the catalog by path.
pub struct CatalogLoader {
    path: PathBuf,
    ttl: Duration,
    cached: Mutex<Option<CachedSnapshot>>,
}

impl CatalogLoader {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Current snapshot, reloading the file when the cached one has
    /// expired.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> PipelineResult<Arc<CatalogSnapshot>> {
        {
            let cached = self.cached.lock();
            if let Some(entry) = cached.as_ref() {
                if entry.loaded_at.elapsed() < self.ttl {
                    debug!("Catalog cache hit");
                    return Ok(Arc::clone(&entry.snapshot));
                }
            }
        }

        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PipelineError::CatalogNotFound(format!("{}: {e}", self.path.display()))
        })?;

        let snapshot = Arc::new(parse_catalog(&raw)?);
        debug!(items = snapshot.len(), "Catalog loaded");

        let mut cached = self.cached.lock();
        *cached = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            loaded_at: Instant::now(),
        });
        Ok(snapshot)
    }
}

/// Parse the raw CSV body into catalog items.
pub fn parse_catalog(raw: &str) -> PipelineResult<CatalogSnapshot> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::CatalogMalformed(format!("unreadable header row: {e}")))?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| {
        column(name).ok_or_else(|| {
            PipelineError::CatalogMalformed(format!("missing required column '{name}'"))
        })
    };

    let sku_col = require("sku")?;
    let name_col = require("name")?;
    let category_col = require("category")?;
    let price_col = column("price");
    let colors_col = column("colors");
    let weather_col = column("weatherSuitability");
    let formality_col = column("formality");
    let notes_col = column("notes");

    let mut items = Vec::new();
    let mut by_sku = HashMap::new();

    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| PipelineError::CatalogMalformed(format!("row {}: {e}", line + 2)))?;
        let field = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let Some(sku) = field(Some(sku_col)) else {
            warn!(row = line + 2, "Skipping catalog row without SKU");
            continue;
        };

        let item = CatalogItem {
            sku: sku.clone(),
            name: field(Some(name_col)).unwrap_or_default(),
            category: field(Some(category_col)).unwrap_or_default(),
            price: field(price_col).and_then(|p| p.parse().ok()),
            colors: field(colors_col)
                .map(|c| c.split(';').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            weather_suitability: field(weather_col),
            formality: field(formality_col),
            notes: field(notes_col),
        };

        if !item.has_conventional_sku() {
            warn!(sku = %item.sku, "Catalog SKU does not match the SKU<digits> convention");
        }

        if by_sku.contains_key(&sku) {
            warn!(sku = %sku, "Duplicate catalog SKU, keeping first occurrence");
            continue;
        }
        by_sku.insert(sku, items.len());
        items.push(item);
    }

    if items.is_empty() {
        return Err(PipelineError::CatalogMalformed("no data rows".to_string()));
    }

    Ok(CatalogSnapshot { items, by_sku })
}
