//! Reconcilers: one per concern of the product graph.
//!
//! Each reconciler borrows the lookups it needs, mutates the loaded
//! [`Product`](catalog_products::Product) aggregate in memory and records what
//! it did in a [`ChangeSet`]. Only [`ProductRecordReconciler`] and
//! [`AssociationReconciler`] write to the repository, once per record.

mod association;
mod attribute;
mod detail;
mod image;
mod pricing;
mod product;
mod taxonomy;
mod variant;

pub use association::AssociationReconciler;
pub use attribute::AttributeReconciler;
pub use detail::DetailReconciler;
pub use image::ImageReconciler;
pub use pricing::ChannelPricingReconciler;
pub use product::ProductRecordReconciler;
pub use taxonomy::TaxonomyLinker;
pub use variant::VariantReconciler;

use serde::Serialize;

use catalog_infra::{
    AssociationTypeRepository, AttributeRepository, ChannelRepository, ProductRepository,
    TaxonRepository,
};

use crate::changes::ChangeSet;

/// Repositories a run reads from and writes to.
#[derive(Clone, Copy)]
pub struct Lookups<'a> {
    pub products: &'a dyn ProductRepository,
    pub taxons: &'a dyn TaxonRepository,
    pub channels: &'a dyn ChannelRepository,
    pub attributes: &'a dyn AttributeRepository,
    pub association_types: &'a dyn AssociationTypeRepository,
}

impl<'a> Lookups<'a> {
    /// All lookups served by one backend.
    pub fn from_catalog<C>(catalog: &'a C) -> Self
    where
        C: ProductRepository
            + TaxonRepository
            + ChannelRepository
            + AttributeRepository
            + AssociationTypeRepository,
    {
        Self {
            products: catalog,
            taxons: catalog,
            channels: catalog,
            attributes: catalog,
            association_types: catalog,
        }
    }
}

/// Result of one successfully reconciled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// Code of the product that was written.
    pub code: String,
    /// Whether the product was created by this record.
    pub created: bool,
    pub changes: ChangeSet,
}
