use catalog_core::{AttributeCode, AttributeValueId, LocaleCode};
use catalog_infra::AttributeRepository;
use catalog_products::{Attribute, AttributeValue, Product};

use crate::changes::{ChangeSet, Mutation};
use crate::coerce::is_blank;
use crate::error::ImportError;
use crate::record::ProductRow;
use crate::schema::ImportSchema;
use crate::transform::TransformerPool;

/// Attribute-code columns → attribute values of the product.
pub struct AttributeReconciler<'a> {
    attributes: &'a dyn AttributeRepository,
    transformers: &'a TransformerPool,
}

impl<'a> AttributeReconciler<'a> {
    pub fn new(attributes: &'a dyn AttributeRepository, transformers: &'a TransformerPool) -> Self {
        Self {
            attributes,
            transformers,
        }
    }

    /// Expects the product's current locale to be the record locale.
    ///
    /// Values are transformed and scoped by the attribute definition as it is
    /// now in the repository, not by the copy stored on the value.
    pub fn apply(
        &self,
        product: &mut Product,
        row: &ProductRow,
        schema: &ImportSchema,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        for code in schema.attribute_codes() {
            let cell = row.column(code.as_str());

            if is_blank(cell) {
                let existing = product
                    .attribute_by_code_and_locale(code, None)
                    .map(AttributeValue::id_typed);
                if let Some(id) = existing {
                    product.remove_attribute(id);
                    changes.record(Mutation::AttributeValueRemoved {
                        product: product.code().clone(),
                        attribute: code.clone(),
                    });
                }
                continue;
            }

            let attribute = self.definition(code)?;
            let existing = if attribute.translatable {
                product
                    .attribute_by_code_and_locale(code, None)
                    .map(AttributeValue::id_typed)
            } else {
                collapse_shared(product, code, changes)
            };

            match existing {
                Some(id) => self.update(product, id, attribute, cell, changes)?,
                None => self.create(product, attribute, cell, changes)?,
            }
        }
        Ok(())
    }

    fn definition(&self, code: &AttributeCode) -> Result<Attribute, ImportError> {
        self.attributes
            .find_by_code(code.as_str())?
            .ok_or_else(|| ImportError::MissingAttribute {
                code: code.to_string(),
            })
    }

    fn update(
        &self,
        product: &mut Product,
        id: AttributeValueId,
        attribute: Attribute,
        cell: &str,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        let product_code = product.code().clone();
        let Some(value) = product.attribute_mut(id) else {
            return Ok(());
        };

        let transformed = self.transformers.handle(&attribute, cell)?;
        let translatable = attribute.translatable;
        let mut changed = value.refresh_attribute(attribute);
        if value.value() != &transformed {
            value.set_value(transformed);
            changed = true;
        }
        if !translatable && value.locale().is_some() {
            value.set_locale(None);
            changed = true;
        }

        if changed {
            changes.record(Mutation::AttributeValueUpdated {
                product: product_code,
                attribute: value.code().clone(),
            });
        }
        Ok(())
    }

    fn create(
        &self,
        product: &mut Product,
        attribute: Attribute,
        cell: &str,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        let code = attribute.code.clone();
        let locale = if attribute.translatable {
            product.current_locale().cloned()
        } else {
            None
        };
        let transformed = self.transformers.handle(&attribute, cell)?;

        product.add_attribute(AttributeValue::new(attribute, locale.clone(), transformed))?;
        tracing::info!(product = %product.code(), attribute = %code, "attribute value created");
        changes.record(Mutation::AttributeValueCreated {
            product: product.code().clone(),
            attribute: code,
            locale,
        });
        Ok(())
    }
}

/// Keep one value for a shared attribute and drop the rest.
///
/// The value without a locale wins, then the one in the current locale, then
/// the first one found.
fn collapse_shared(
    product: &mut Product,
    code: &AttributeCode,
    changes: &mut ChangeSet,
) -> Option<AttributeValueId> {
    let current = product.current_locale().cloned();
    let candidates: Vec<(AttributeValueId, Option<LocaleCode>)> = product
        .attributes()
        .iter()
        .filter(|value| value.code() == code)
        .map(|value| (value.id_typed(), value.locale().cloned()))
        .collect();

    let keep = candidates
        .iter()
        .find(|(_, locale)| locale.is_none())
        .or_else(|| candidates.iter().find(|(_, locale)| current.is_some() && *locale == current))
        .or_else(|| candidates.first())?
        .0;

    for (id, _) in candidates.into_iter().filter(|(id, _)| *id != keep) {
        product.remove_attribute(id);
        changes.record(Mutation::AttributeValueRemoved {
            product: product.code().clone(),
            attribute: code.clone(),
        });
    }
    Some(keep)
}
