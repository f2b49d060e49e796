//! Import configuration.
//!
//! Defaults match the column layout of the product export; a few knobs can be
//! overridden from the environment (`CATALOG_IMPORT_*`).

use serde::{Deserialize, Serialize};

use crate::record::fields;

/// What happens to `original_price` when a channel pricing is imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginalPricePolicy {
    /// Overwrite the original price with the imported price.
    #[default]
    Reset,
    /// Only fill the original price when the pricing has none yet.
    KeepExisting,
}

impl OriginalPricePolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Some(Self::Reset),
            "keep_existing" | "keep-existing" | "keep" => Some(Self::KeepExisting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Columns every product record must carry (attribute and image columns
    /// are added per run).
    pub header_keys: Vec<String>,
    /// Column prefix of image slots (`Images_main` → slot `main`).
    pub image_prefix: String,
    /// Slots treated as known even when no product uses them yet.
    pub image_slots: Vec<String>,
    /// Separator of `Taxons`, `Channels` and select attribute cells.
    pub list_delimiter: char,
    /// Separator of `AssociatedProducts`.
    pub association_delimiter: char,
    pub association_type_code: String,
    /// Character cap of bounded text fields.
    pub text_limit: usize,
    pub original_price_policy: OriginalPricePolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_keys: fields::PRODUCT_HEADERS.iter().map(|s| s.to_string()).collect(),
            image_prefix: "Images_".to_string(),
            image_slots: Vec::new(),
            list_delimiter: '|',
            association_delimiter: ',',
            association_type_code: "cross-selling".to_string(),
            text_limit: 255,
            original_price_policy: OriginalPricePolicy::Reset,
        }
    }
}

impl ImportConfig {
    /// Defaults overridden by `CATALOG_IMPORT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Invalid values are logged
    /// and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(prefix) = lookup("CATALOG_IMPORT_IMAGE_PREFIX") {
            if prefix.trim().is_empty() {
                tracing::warn!("CATALOG_IMPORT_IMAGE_PREFIX is blank; keeping {}", self.image_prefix);
            } else {
                self.image_prefix = prefix;
            }
        }

        if let Some(code) = lookup("CATALOG_IMPORT_ASSOCIATION_TYPE") {
            if code.trim().is_empty() {
                tracing::warn!("CATALOG_IMPORT_ASSOCIATION_TYPE is blank; keeping {}", self.association_type_code);
            } else {
                self.association_type_code = code;
            }
        }

        if let Some(limit) = lookup("CATALOG_IMPORT_TEXT_LIMIT") {
            match limit.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => self.text_limit = limit,
                _ => tracing::warn!(
                    value = %limit,
                    "invalid CATALOG_IMPORT_TEXT_LIMIT; keeping {}",
                    self.text_limit
                ),
            }
        }

        if let Some(policy) = lookup("CATALOG_IMPORT_ORIGINAL_PRICE_POLICY") {
            match OriginalPricePolicy::parse(&policy) {
                Some(policy) => self.original_price_policy = policy,
                None => tracing::warn!(
                    value = %policy,
                    "invalid CATALOG_IMPORT_ORIGINAL_PRICE_POLICY; keeping {:?}",
                    self.original_price_policy
                ),
            }
        }

        self
    }
}
