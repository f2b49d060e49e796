use serde::{Deserialize, Serialize};

use catalog_core::{
    AggregateRoot, AssociationTypeCode, AttributeCode, ChannelCode, ProductCode, TaxonCode,
};
use catalog_products::{Attribute, AssociationType, Channel, Product, Taxon};

use crate::error::RepositoryResult;
use crate::repository::{
    AssociationTypeRepository, AttributeRepository, ChannelRepository, ProductRepository,
    TaxonRepository,
};
use crate::store::{CatalogStore, InMemoryCatalogStore};

/// Serializable image of a whole catalog (reference data + products).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub taxons: Vec<Taxon>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub association_types: Vec<AssociationType>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// In-memory catalog implementing every repository seam.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: InMemoryCatalogStore<ProductCode, Product>,
    taxons: InMemoryCatalogStore<TaxonCode, Taxon>,
    channels: InMemoryCatalogStore<ChannelCode, Channel>,
    attributes: InMemoryCatalogStore<AttributeCode, Attribute>,
    association_types: InMemoryCatalogStore<AssociationTypeCode, AssociationType>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> RepositoryResult<Self> {
        let catalog = Self::new();
        for taxon in snapshot.taxons {
            catalog.insert_taxon(taxon)?;
        }
        for channel in snapshot.channels {
            catalog.insert_channel(channel)?;
        }
        for attribute in snapshot.attributes {
            catalog.insert_attribute(attribute)?;
        }
        for kind in snapshot.association_types {
            catalog.insert_association_type(kind)?;
        }
        for product in snapshot.products {
            catalog.products.upsert(product.code().clone(), product)?;
        }
        Ok(catalog)
    }

    pub fn snapshot(&self) -> RepositoryResult<CatalogSnapshot> {
        Ok(CatalogSnapshot {
            taxons: self.taxons.list()?,
            channels: self.channels.list()?,
            attributes: self.attributes.list()?,
            association_types: self.association_types.list()?,
            products: self.products.list()?,
        })
    }

    pub fn insert_taxon(&self, taxon: Taxon) -> RepositoryResult<()> {
        self.taxons.upsert(taxon.code.clone(), taxon)
    }

    pub fn insert_channel(&self, channel: Channel) -> RepositoryResult<()> {
        self.channels.upsert(channel.code.clone(), channel)
    }

    pub fn insert_attribute(&self, attribute: Attribute) -> RepositoryResult<()> {
        self.attributes.upsert(attribute.code.clone(), attribute)
    }

    pub fn insert_association_type(&self, kind: AssociationType) -> RepositoryResult<()> {
        self.association_types.upsert(kind.code.clone(), kind)
    }

    pub fn remove_association_type(&self, code: &AssociationTypeCode) -> RepositoryResult<()> {
        self.association_types.remove(code).map(|_| ())
    }
}

fn lookup<K, V>(store: &InMemoryCatalogStore<K, V>, code: &str) -> RepositoryResult<Option<V>>
where
    K: core::str::FromStr + Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // Blank codes cannot name anything.
    match code.parse::<K>() {
        Ok(key) => store.get(&key),
        Err(_) => Ok(None),
    }
}

impl ProductRepository for InMemoryCatalog {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Product>> {
        lookup(&self.products, code)
    }

    fn save(&self, product: &mut Product) -> RepositoryResult<()> {
        product.increment_version();
        tracing::debug!(
            product = %product.code(),
            version = product.version(),
            "product saved"
        );
        self.products.upsert(product.code().clone(), product.clone())
    }

    fn list(&self) -> RepositoryResult<Vec<Product>> {
        self.products.list()
    }
}

impl TaxonRepository for InMemoryCatalog {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Taxon>> {
        lookup(&self.taxons, code)
    }
}

impl ChannelRepository for InMemoryCatalog {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Channel>> {
        lookup(&self.channels, code)
    }
}

impl AttributeRepository for InMemoryCatalog {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Attribute>> {
        lookup(&self.attributes, code)
    }

    fn list(&self) -> RepositoryResult<Vec<Attribute>> {
        self.attributes.list()
    }
}

impl AssociationTypeRepository for InMemoryCatalog {
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<AssociationType>> {
        lookup(&self.association_types, code)
    }
}
