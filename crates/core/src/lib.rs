//! `catalog-core`: building blocks shared by the catalog crates.
//!
//! This crate contains **pure domain** primitives (no storage, no IO).

pub mod aggregate;
pub mod code;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use code::{
    AssociationTypeCode, AttributeCode, ChannelCode, ImageType, LocaleCode, ProductCode,
    TaxonCode, VariantCode,
};
pub use entity::{Entity, find_by_id_mut, position_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{AssociationId, AttributeValueId, ChannelPricingId, ImageId, ProductId, VariantId};
pub use value_object::ValueObject;
