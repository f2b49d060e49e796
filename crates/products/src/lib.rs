//! Catalog domain model.
//!
//! `Product` is the aggregate root: variants, channel pricings, taxon links,
//! attribute values, images and owned associations are only reachable through
//! it. Taxons, channels, attribute definitions and association types are
//! pre-existing reference data that the import engine looks up but never
//! creates.
//!
//! Everything here is deterministic domain logic (no IO, no storage).

pub mod association;
pub mod attribute;
pub mod image;
pub mod product;
pub mod reference;
pub mod variant;

pub use association::{Association, AssociationType};
pub use attribute::{Attribute, AttributeType, AttributeValue};
pub use image::ProductImage;
pub use product::{Product, ProductTaxon, ProductTranslation};
pub use reference::{Channel, Taxon};
pub use variant::{ChannelPricing, Dimensions, Variant, VariantTranslation};
