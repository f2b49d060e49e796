use catalog_infra::TaxonRepository;
use catalog_products::Product;

use crate::changes::{ChangeSet, Mutation, SkipReason};
use crate::error::ImportError;
use crate::record::ProductRow;

/// Main taxon and secondary taxon links. Unknown taxon codes are skipped.
pub struct TaxonomyLinker<'a> {
    taxons: &'a dyn TaxonRepository,
}

impl<'a> TaxonomyLinker<'a> {
    pub fn new(taxons: &'a dyn TaxonRepository) -> Self {
        Self { taxons }
    }

    pub fn set_main_taxon(
        &self,
        product: &mut Product,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        let Some(taxon) = self.taxons.find_by_code(&row.main_taxon)? else {
            if !row.main_taxon.trim().is_empty() {
                changes.skip(SkipReason::TaxonNotFound, row.main_taxon.as_str());
            }
            return Ok(());
        };

        if product.main_taxon() != Some(&taxon.code) {
            product.set_main_taxon(taxon.code.clone());
            changes.record(Mutation::MainTaxonSet {
                product: product.code().clone(),
                taxon: taxon.code,
            });
        }
        self.add_taxon_to_product(product, &row.main_taxon, changes)?;
        Ok(())
    }

    /// Link every listed taxon except the main one.
    pub fn set_taxons(
        &self,
        product: &mut Product,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        for code in &row.taxons {
            if code == &row.main_taxon {
                continue;
            }
            self.add_taxon_to_product(product, code, changes)?;
        }
        Ok(())
    }

    /// Returns whether a new link was created.
    pub fn add_taxon_to_product(
        &self,
        product: &mut Product,
        code: &str,
        changes: &mut ChangeSet,
    ) -> Result<bool, ImportError> {
        let Some(taxon) = self.taxons.find_by_code(code)? else {
            tracing::debug!(product = %product.code(), taxon = code, "taxon not found, skipping");
            changes.skip(SkipReason::TaxonNotFound, code);
            return Ok(false);
        };

        if product.has_taxon(&taxon.code) {
            changes.skip(SkipReason::TaxonAlreadyLinked, taxon.code.as_str());
            return Ok(false);
        }

        product.add_product_taxon(taxon.code.clone())?;
        changes.record(Mutation::TaxonLinked {
            product: product.code().clone(),
            taxon: taxon.code,
        });
        Ok(true)
    }
}
