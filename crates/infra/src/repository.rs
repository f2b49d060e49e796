//! Repository seams used by the import engine.
//!
//! Reference data (taxons, channels, attribute definitions, association types)
//! is looked up by raw code: a miss is `Ok(None)`, never an error.

use std::sync::Arc;

use catalog_products::{Attribute, AssociationType, Channel, Product, Taxon};

use crate::error::RepositoryResult;

pub trait ProductRepository: Send + Sync {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Product>>;

    /// Insert or replace the whole aggregate, bumping its version.
    fn save(&self, product: &mut Product) -> RepositoryResult<()>;

    fn list(&self) -> RepositoryResult<Vec<Product>>;
}

pub trait TaxonRepository: Send + Sync {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Taxon>>;
}

pub trait ChannelRepository: Send + Sync {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Channel>>;
}

pub trait AttributeRepository: Send + Sync {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Attribute>>;

    fn list(&self) -> RepositoryResult<Vec<Attribute>>;
}

pub trait AssociationTypeRepository: Send + Sync {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<AssociationType>>;
}

impl<S> ProductRepository for Arc<S>
where
    S: ProductRepository + ?Sized,
{
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Product>> {
        (**self).find_by_code(code)
    }

    fn save(&self, product: &mut Product) -> RepositoryResult<()> {
        (**self).save(product)
    }

    fn list(&self) -> RepositoryResult<Vec<Product>> {
        (**self).list()
    }
}

impl<S> TaxonRepository for Arc<S>
where
    S: TaxonRepository + ?Sized,
{
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Taxon>> {
        (**self).find_by_code(code)
    }
}

impl<S> ChannelRepository for Arc<S>
where
    S: ChannelRepository + ?Sized,
{
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Channel>> {
        (**self).find_by_code(code)
    }
}

impl<S> AttributeRepository for Arc<S>
where
    S: AttributeRepository + ?Sized,
{
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Attribute>> {
        (**self).find_by_code(code)
    }

    fn list(&self) -> RepositoryResult<Vec<Attribute>> {
        (**self).list()
    }
}

impl<S> AssociationTypeRepository for Arc<S>
where
    S: AssociationTypeRepository + ?Sized,
{
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<AssociationType>> {
        (**self).find_by_code(code)
    }
}
