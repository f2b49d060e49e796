//! Per-run import schema.
//!
//! Attribute codes and known image slots come from the catalog once, before
//! the first record, and never change during the run.

use std::collections::BTreeSet;

use catalog_core::AttributeCode;
use catalog_infra::{AttributeCodesProvider, ImageTypesProvider};

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::record::fields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSchema {
    required_headers: Vec<String>,
    attribute_codes: Vec<AttributeCode>,
    image_prefix: String,
    image_slots: Vec<String>,
}

impl ImportSchema {
    pub fn new(
        header_keys: Vec<String>,
        attribute_codes: Vec<AttributeCode>,
        image_prefix: impl Into<String>,
        image_slots: Vec<String>,
    ) -> Self {
        let mut slots: Vec<String> = Vec::with_capacity(image_slots.len());
        for slot in image_slots {
            if !slot.trim().is_empty() && !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        let image_prefix = image_prefix.into();

        let mut required_headers = header_keys;
        required_headers.extend(attribute_codes.iter().map(|c| c.as_str().to_string()));
        required_headers.extend(slots.iter().map(|s| format!("{image_prefix}{s}")));

        Self {
            required_headers,
            attribute_codes,
            image_prefix,
            image_slots: slots,
        }
    }

    /// Build the schema from the catalog lookups plus configured extra slots.
    pub fn load(
        config: &ImportConfig,
        attributes: &dyn AttributeCodesProvider,
        images: &dyn ImageTypesProvider,
    ) -> Result<Self, ImportError> {
        let attribute_codes = attributes.attribute_codes()?;
        let mut slots: Vec<String> = images
            .image_types()?
            .into_iter()
            .map(|kind| kind.into_inner())
            .collect();
        slots.extend(config.image_slots.iter().cloned());

        let schema = Self::new(
            config.header_keys.clone(),
            attribute_codes,
            config.image_prefix.clone(),
            slots,
        );
        tracing::debug!(
            attributes = schema.attribute_codes.len(),
            image_slots = schema.image_slots.len(),
            "import schema loaded"
        );
        Ok(schema)
    }

    pub fn attribute_codes(&self) -> &[AttributeCode] {
        &self.attribute_codes
    }

    pub fn image_prefix(&self) -> &str {
        &self.image_prefix
    }

    /// Known image slots, without prefix.
    pub fn image_slots(&self) -> &[String] {
        &self.image_slots
    }

    pub fn is_known_slot(&self, slot: &str) -> bool {
        self.image_slots.iter().any(|s| s == slot)
    }

    pub fn image_column(&self, slot: &str) -> String {
        format!("{}{}", self.image_prefix, slot)
    }

    /// Every column a product record must carry.
    pub fn required_headers(&self) -> &[String] {
        &self.required_headers
    }

    pub fn validate_headers<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<(), ImportError> {
        require(&self.required_headers, keys)
    }

    /// Slots named by prefixed columns of a record, in column order.
    pub fn discover_slots<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> Vec<String> {
        discover_slots(&self.image_prefix, keys)
    }
}

/// Strip `prefix` from every matching key; keys equal to the bare prefix are
/// ignored. A blank prefix names no slots.
pub fn discover_slots<'k>(prefix: &str, keys: impl IntoIterator<Item = &'k str>) -> Vec<String> {
    let mut slots: Vec<String> = Vec::new();
    if prefix.trim().is_empty() {
        return slots;
    }
    for key in keys {
        if let Some(slot) = key.strip_prefix(prefix) {
            if !slot.is_empty() && !slots.iter().any(|s| s == slot) {
                slots.push(slot.to_string());
            }
        }
    }
    slots
}

pub fn validate_association_headers<'k>(
    keys: impl IntoIterator<Item = &'k str>,
) -> Result<(), ImportError> {
    let required: Vec<String> = fields::ASSOCIATION_HEADERS
        .iter()
        .map(|h| h.to_string())
        .collect();
    require(&required, keys)
}

fn require<'k>(required: &[String], keys: impl IntoIterator<Item = &'k str>) -> Result<(), ImportError> {
    let present: BTreeSet<&str> = keys.into_iter().collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|h| !present.contains(&h.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingHeaders { missing })
    }
}
