use catalog_core::ImageType;
use catalog_products::{Product, ProductImage};

use crate::changes::{ChangeSet, Mutation};
use crate::coerce::is_blank;
use crate::error::ImportError;
use crate::record::ProductRow;
use crate::schema::ImportSchema;

/// `Images_<slot>` columns → product images, one per slot.
pub struct ImageReconciler<'a> {
    schema: &'a ImportSchema,
}

impl<'a> ImageReconciler<'a> {
    pub fn new(schema: &'a ImportSchema) -> Self {
        Self { schema }
    }

    pub fn apply(
        &self,
        product: &mut Product,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        for slot in self.schema.image_slots() {
            let kind = ImageType::new(slot.as_str())?;
            let path = row.column(&self.schema.image_column(slot));

            if is_blank(path) {
                self.remove_all(product, &kind, changes);
                continue;
            }
            self.upsert(product, kind, path, changes)?;
        }

        // Slots the catalog does not know yet; empty cells are ignored here.
        for slot in self.schema.discover_slots(row.column_names()) {
            if self.schema.is_known_slot(&slot) {
                continue;
            }
            let path = row.column(&self.schema.image_column(&slot));
            if is_blank(path) {
                continue;
            }
            self.upsert(product, ImageType::new(slot)?, path, changes)?;
        }
        Ok(())
    }

    fn remove_all(&self, product: &mut Product, kind: &ImageType, changes: &mut ChangeSet) {
        let ids: Vec<_> = product
            .images_by_type(kind)
            .into_iter()
            .map(ProductImage::id_typed)
            .collect();
        for id in ids {
            if product.remove_image(id).is_some() {
                changes.record(Mutation::ImageRemoved {
                    product: product.code().clone(),
                    kind: kind.clone(),
                });
            }
        }
    }

    /// Reuse the first image of the slot or attach a new one.
    fn upsert(
        &self,
        product: &mut Product,
        kind: ImageType,
        path: &str,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        let product_code = product.code().clone();
        let existing = product
            .images_by_type(&kind)
            .first()
            .map(|image| image.id_typed());

        match existing.and_then(|id| product.image_mut(id)) {
            Some(image) => {
                if image.path() != path {
                    image.set_path(path);
                    changes.record(Mutation::ImageUpdated {
                        product: product_code,
                        kind,
                    });
                }
            }
            None => {
                product.add_image(ProductImage::new(kind.clone(), path))?;
                tracing::info!(product = %product_code, kind = %kind, "image created");
                changes.record(Mutation::ImageCreated {
                    product: product_code,
                    kind,
                });
            }
        }
        Ok(())
    }
}
