//! Record model.
//!
//! A [`RawRecord`] is one flat row as it comes from the source. Product rows
//! are parsed once into an [`ImportRecord`]: the typed known fields plus the
//! open-ended attribute/image columns, tagged as either a standalone product or
//! a variant of an existing product.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_core::{LocaleCode, ProductCode};
use catalog_products::Dimensions;

use crate::coerce::{coerce_f64, coerce_i64, is_blank, is_truthy, split_list};
use crate::config::ImportConfig;
use crate::error::ImportError;

/// Column names of the product and association pipelines.
pub mod fields {
    pub const CODE: &str = "Code";
    pub const PARENT_CODE: &str = "Parent_code";
    pub const LOCALE: &str = "Locale";
    pub const NAME: &str = "Name";
    pub const ENABLED: &str = "Enabled";
    pub const DESCRIPTION: &str = "Description";
    pub const SHORT_DESCRIPTION: &str = "Short_description";
    pub const META_DESCRIPTION: &str = "Meta_description";
    pub const META_KEYWORDS: &str = "Meta_keywords";
    pub const MANUFACTURER_REFERENCE: &str = "ManufacturerReference";
    pub const MAX_LENGTH_DELIVERY: &str = "MaxLengthDelivery";
    pub const IS_ELIGIBLE_TO_PRIORITY_ORDER: &str = "IsEligibleToPriorityOrder";
    pub const MIN_PREPARATION_HOUR: &str = "MinPreparationHour";
    pub const MAX_PREPARATION_HOUR: &str = "MaxPreparationHour";
    pub const MAIN_TAXON: &str = "Main_taxon";
    pub const TAXONS: &str = "Taxons";
    pub const CHANNELS: &str = "Channels";
    pub const DEPTH: &str = "Depth";
    pub const WIDTH: &str = "Width";
    pub const HEIGHT: &str = "Height";
    pub const WEIGHT: &str = "Weight";
    pub const WEIGHT_PER_LENGTH: &str = "WeightPerLength";
    pub const WEIGHT_PER_SURFACE: &str = "WeightPerSurface";
    pub const WEIGHT_PER_VOLUME: &str = "WeightPerVolume";
    pub const CAN_BE_TAILORED: &str = "Can_be_tailored";
    pub const IS_SAMPLE: &str = "Is_sample";
    pub const PRICE: &str = "Price";

    pub const PRODUCT_HEADERS: [&str; 27] = [
        CODE,
        PARENT_CODE,
        LOCALE,
        NAME,
        ENABLED,
        DESCRIPTION,
        SHORT_DESCRIPTION,
        META_DESCRIPTION,
        META_KEYWORDS,
        MANUFACTURER_REFERENCE,
        MAX_LENGTH_DELIVERY,
        IS_ELIGIBLE_TO_PRIORITY_ORDER,
        MIN_PREPARATION_HOUR,
        MAX_PREPARATION_HOUR,
        MAIN_TAXON,
        TAXONS,
        CHANNELS,
        DEPTH,
        WIDTH,
        HEIGHT,
        WEIGHT,
        WEIGHT_PER_LENGTH,
        WEIGHT_PER_SURFACE,
        WEIGHT_PER_VOLUME,
        CAN_BE_TAILORED,
        IS_SAMPLE,
        PRICE,
    ];

    pub const PRODUCT_CODE: &str = "ProductCode";
    pub const ASSOCIATED_PRODUCTS: &str = "AssociatedProducts";

    pub const ASSOCIATION_HEADERS: [&str; 2] = [PRODUCT_CODE, ASSOCIATED_PRODUCTS];
}

/// One flat source row: column name → cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell text; an absent column reads as empty.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Typed view of a product or variant row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    /// Product code for standalone rows, variant code for variant rows.
    pub code: String,
    pub locale: LocaleCode,
    pub name: String,
    pub enabled: bool,
    pub description: String,
    pub short_description: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub manufacturer_reference: String,
    pub max_length_delivery: f64,
    pub is_eligible_to_priority_order: bool,
    pub min_preparation_hour: i64,
    pub max_preparation_hour: i64,
    pub main_taxon: String,
    pub taxons: Vec<String>,
    pub channels: Vec<String>,
    pub dimensions: Dimensions,
    pub can_be_tailored: bool,
    pub is_sample: bool,
    /// Raw price cell; converted per channel pricing.
    pub price: String,
    /// Attribute and image columns (everything that is not a known field).
    pub columns: BTreeMap<String, String>,
}

impl ProductRow {
    /// Cell of an open-ended column; absent reads as empty.
    pub fn column(&self, key: &str) -> &str {
        self.columns.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// A product-pipeline record, classified once.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportRecord {
    Standalone(ProductRow),
    VariantOf {
        parent_code: ProductCode,
        row: ProductRow,
    },
}

impl ImportRecord {
    pub fn parse(raw: &RawRecord, config: &ImportConfig) -> Result<Self, ImportError> {
        let code = raw.get(fields::CODE);
        if is_blank(code) {
            return Err(ImportError::InvalidRecord(format!(
                "{} cannot be empty",
                fields::CODE
            )));
        }
        let locale = LocaleCode::new(raw.get(fields::LOCALE)).map_err(|_| {
            ImportError::InvalidRecord(format!("{} cannot be empty for {code}", fields::LOCALE))
        })?;

        let columns = raw
            .0
            .iter()
            .filter(|(k, _)| !fields::PRODUCT_HEADERS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let row = ProductRow {
            code: code.to_string(),
            locale,
            name: raw.get(fields::NAME).to_string(),
            enabled: is_truthy(raw.get(fields::ENABLED)),
            description: raw.get(fields::DESCRIPTION).to_string(),
            short_description: raw.get(fields::SHORT_DESCRIPTION).to_string(),
            meta_description: raw.get(fields::META_DESCRIPTION).to_string(),
            meta_keywords: raw.get(fields::META_KEYWORDS).to_string(),
            manufacturer_reference: raw.get(fields::MANUFACTURER_REFERENCE).to_string(),
            max_length_delivery: coerce_f64(raw.get(fields::MAX_LENGTH_DELIVERY)),
            is_eligible_to_priority_order: is_truthy(raw.get(fields::IS_ELIGIBLE_TO_PRIORITY_ORDER)),
            min_preparation_hour: coerce_i64(raw.get(fields::MIN_PREPARATION_HOUR)),
            max_preparation_hour: coerce_i64(raw.get(fields::MAX_PREPARATION_HOUR)),
            main_taxon: raw.get(fields::MAIN_TAXON).to_string(),
            taxons: split_list(raw.get(fields::TAXONS), config.list_delimiter)
                .into_iter()
                .map(str::to_string)
                .collect(),
            channels: split_list(raw.get(fields::CHANNELS), config.list_delimiter)
                .into_iter()
                .map(str::to_string)
                .collect(),
            dimensions: Dimensions {
                depth: coerce_f64(raw.get(fields::DEPTH)),
                width: coerce_f64(raw.get(fields::WIDTH)),
                height: coerce_f64(raw.get(fields::HEIGHT)),
                weight: coerce_f64(raw.get(fields::WEIGHT)),
                weight_per_length: coerce_f64(raw.get(fields::WEIGHT_PER_LENGTH)),
                weight_per_surface: coerce_f64(raw.get(fields::WEIGHT_PER_SURFACE)),
                weight_per_volume: coerce_f64(raw.get(fields::WEIGHT_PER_VOLUME)),
            },
            can_be_tailored: is_truthy(raw.get(fields::CAN_BE_TAILORED)),
            is_sample: is_truthy(raw.get(fields::IS_SAMPLE)),
            price: raw.get(fields::PRICE).to_string(),
            columns,
        };

        let parent = raw.get(fields::PARENT_CODE);
        if is_blank(parent) {
            return Ok(ImportRecord::Standalone(row));
        }
        Ok(ImportRecord::VariantOf {
            parent_code: ProductCode::new(parent)?,
            row,
        })
    }

    pub fn row(&self) -> &ProductRow {
        match self {
            ImportRecord::Standalone(row) => row,
            ImportRecord::VariantOf { row, .. } => row,
        }
    }
}

/// An association-pipeline record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRecord {
    pub owner_code: String,
    pub associated_codes: Vec<String>,
}

impl AssociationRecord {
    pub fn parse(raw: &RawRecord, config: &ImportConfig) -> Self {
        Self::from_parts(
            raw.get(fields::PRODUCT_CODE),
            raw.get(fields::ASSOCIATED_PRODUCTS),
            config.association_delimiter,
        )
    }

    pub fn from_parts(owner_code: &str, associated_codes: &str, delimiter: char) -> Self {
        Self {
            owner_code: owner_code.trim().to_string(),
            associated_codes: split_list(associated_codes, delimiter)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
