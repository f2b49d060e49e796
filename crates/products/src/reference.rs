use serde::{Deserialize, Serialize};

use catalog_core::{ChannelCode, TaxonCode};

/// Taxonomy node (category). Read-only for the import engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    pub code: TaxonCode,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: Option<TaxonCode>,
}

impl Taxon {
    pub fn new(code: TaxonCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            parent: None,
        }
    }
}

/// Sales channel. Read-only for the import engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub code: ChannelCode,
    #[serde(default)]
    pub name: String,
}

impl Channel {
    pub fn new(code: ChannelCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}
