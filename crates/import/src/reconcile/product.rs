use catalog_core::ProductCode;
use catalog_products::Product;

use crate::changes::{ChangeSet, Mutation, SkipReason};
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::record::{ImportRecord, ProductRow, RawRecord};
use crate::schema::ImportSchema;
use crate::transform::TransformerPool;

use super::{
    AttributeReconciler, ChannelPricingReconciler, DetailReconciler, ImageReconciler, Lookups,
    RecordOutcome, TaxonomyLinker, VariantReconciler,
};

/// Entry point of the product pipeline.
///
/// Validates the record's columns against the schema, then reconciles either
/// a standalone product or a variant of an existing product, and writes the
/// product once.
pub struct ProductRecordReconciler<'a> {
    lookups: Lookups<'a>,
    schema: &'a ImportSchema,
    config: &'a ImportConfig,
    transformers: &'a TransformerPool,
}

impl<'a> ProductRecordReconciler<'a> {
    pub fn new(
        lookups: Lookups<'a>,
        schema: &'a ImportSchema,
        config: &'a ImportConfig,
        transformers: &'a TransformerPool,
    ) -> Self {
        Self {
            lookups,
            schema,
            config,
            transformers,
        }
    }

    pub fn reconcile(&self, raw: &RawRecord) -> Result<RecordOutcome, ImportError> {
        self.schema.validate_headers(raw.keys())?;

        match ImportRecord::parse(raw, self.config)? {
            ImportRecord::VariantOf { parent_code, row } => self.reconcile_variant(parent_code, &row),
            ImportRecord::Standalone(row) => self.reconcile_standalone(&row),
        }
    }

    fn reconcile_variant(
        &self,
        parent_code: ProductCode,
        row: &ProductRow,
    ) -> Result<RecordOutcome, ImportError> {
        let mut parent = self
            .lookups
            .products
            .find_by_code(parent_code.as_str())?
            .ok_or_else(|| ImportError::ParentNotFound {
                parent_code: parent_code.to_string(),
            })?;
        let mut changes = ChangeSet::new();

        let variants = VariantReconciler::new(
            self.config.text_limit,
            ChannelPricingReconciler::new(self.config.original_price_policy),
        );
        variants.apply(&mut parent, row, &mut changes)?;
        ImageReconciler::new(self.schema).apply(&mut parent, row, &mut changes)?;

        self.save(&mut parent, &mut changes)?;
        Ok(RecordOutcome {
            code: parent_code.into_inner(),
            created: false,
            changes,
        })
    }

    fn reconcile_standalone(&self, row: &ProductRow) -> Result<RecordOutcome, ImportError> {
        let mut changes = ChangeSet::new();
        let (mut product, created) = match self.lookups.products.find_by_code(&row.code)? {
            Some(product) => (product, false),
            None => {
                let product = Product::new(ProductCode::new(row.code.as_str())?);
                tracing::info!(product = %product.code(), "product created");
                changes.record(Mutation::ProductCreated {
                    product: product.code().clone(),
                });
                (product, true)
            }
        };

        DetailReconciler::new(self.config.text_limit).apply(&mut product, row)?;

        let taxonomy = TaxonomyLinker::new(self.lookups.taxons);
        taxonomy.set_main_taxon(&mut product, row, &mut changes)?;
        taxonomy.set_taxons(&mut product, row, &mut changes)?;

        self.attach_channels(&mut product, row, &mut changes)?;

        AttributeReconciler::new(self.lookups.attributes, self.transformers).apply(
            &mut product,
            row,
            self.schema,
            &mut changes,
        )?;

        self.save(&mut product, &mut changes)?;
        Ok(RecordOutcome {
            code: product.code().as_str().to_string(),
            created,
            changes,
        })
    }

    /// Adds every resolvable listed channel; unknown channels are skipped.
    fn attach_channels(
        &self,
        product: &mut Product,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        for code in &row.channels {
            let Some(channel) = self.lookups.channels.find_by_code(code)? else {
                changes.skip(SkipReason::ChannelNotFound, code.as_str());
                continue;
            };
            if product.add_channel(channel.code.clone()) {
                changes.record(Mutation::ChannelAttached {
                    product: product.code().clone(),
                    channel: channel.code,
                });
            }
        }
        Ok(())
    }

    fn save(&self, product: &mut Product, changes: &mut ChangeSet) -> Result<(), ImportError> {
        self.lookups.products.save(product)?;
        changes.record(Mutation::ProductSaved {
            product: product.code().clone(),
        });
        Ok(())
    }
}
