//! Infrastructure layer: repositories and the lookups the importer runs on.
//!
//! The import engine only talks to the traits in [`repository`] and
//! [`provider`]; [`InMemoryCatalog`] implements all of them for tests, dev
//! runs and the CLI snapshot mode.

pub mod catalog;
pub mod error;
pub mod provider;
pub mod repository;
pub mod store;

pub use catalog::{CatalogSnapshot, InMemoryCatalog};
pub use error::{RepositoryError, RepositoryResult};
pub use provider::{AttributeCodesProvider, ImageTypesProvider};
pub use repository::{
    AssociationTypeRepository, AttributeRepository, ChannelRepository, ProductRepository,
    TaxonRepository,
};
pub use store::{CatalogStore, InMemoryCatalogStore};
