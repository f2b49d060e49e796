//! Lookahead lists the product pipeline needs before the first record:
//! which attribute columns and which image slots exist.

use std::collections::BTreeSet;
use std::sync::Arc;

use catalog_core::{AttributeCode, ImageType};

use crate::catalog::InMemoryCatalog;
use crate::error::RepositoryResult;
use crate::repository::{AttributeRepository, ProductRepository};

pub trait AttributeCodesProvider {
    fn attribute_codes(&self) -> RepositoryResult<Vec<AttributeCode>>;
}

pub trait ImageTypesProvider {
    /// Image slots already in use in the catalog.
    fn image_types(&self) -> RepositoryResult<Vec<ImageType>>;
}

impl AttributeCodesProvider for InMemoryCatalog {
    fn attribute_codes(&self) -> RepositoryResult<Vec<AttributeCode>> {
        Ok(AttributeRepository::list(self)?
            .into_iter()
            .map(|a| a.code)
            .collect())
    }
}

impl ImageTypesProvider for InMemoryCatalog {
    fn image_types(&self) -> RepositoryResult<Vec<ImageType>> {
        let mut kinds = BTreeSet::new();
        for product in ProductRepository::list(self)? {
            for image in product.images() {
                kinds.insert(image.kind().clone());
            }
        }
        Ok(kinds.into_iter().collect())
    }
}

impl<S> AttributeCodesProvider for Arc<S>
where
    S: AttributeCodesProvider + ?Sized,
{
    fn attribute_codes(&self) -> RepositoryResult<Vec<AttributeCode>> {
        (**self).attribute_codes()
    }
}

impl<S> ImageTypesProvider for Arc<S>
where
    S: ImageTypesProvider + ?Sized,
{
    fn image_types(&self) -> RepositoryResult<Vec<ImageType>> {
        (**self).image_types()
    }
}
