use catalog_core::{DomainError, VariantCode, VariantId};
use catalog_products::{Product, Variant};

use crate::changes::{ChangeSet, Mutation};
use crate::coerce::truncate;
use crate::error::ImportError;
use crate::record::ProductRow;

use super::ChannelPricingReconciler;

/// Variant rows: one variant per code, one translation per locale.
pub struct VariantReconciler {
    text_limit: usize,
    pricing: ChannelPricingReconciler,
}

impl VariantReconciler {
    pub fn new(text_limit: usize, pricing: ChannelPricingReconciler) -> Self {
        Self { text_limit, pricing }
    }

    pub fn apply(
        &self,
        product: &mut Product,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<VariantId, ImportError> {
        let code = VariantCode::new(row.code.as_str())?;
        let product_code = product.code().clone();

        let existing = product
            .variant_by_code(&code)
            .map(|v| (v.id_typed(), v.has_translation(&row.locale)));

        match existing {
            Some((id, has_locale)) => {
                let variant = product.variant_mut(id).ok_or_else(|| {
                    DomainError::invariant(format!("variant {code} vanished from {product_code}"))
                })?;
                if !has_locale {
                    variant.set_current_locale(row.locale.clone());
                    variant.set_fallback_locale(row.locale.clone());
                    changes.record(Mutation::VariantLocaleAdded {
                        product: product_code,
                        variant: code,
                        locale: row.locale.clone(),
                    });
                }
                self.fill(variant, row, changes)?;
                Ok(id)
            }
            None => {
                let mut variant = Variant::new(code.clone());
                variant.set_current_locale(row.locale.clone());
                variant.set_fallback_locale(row.locale.clone());
                tracing::info!(product = %product_code, variant = %code, "variant created");
                changes.record(Mutation::VariantCreated {
                    product: product_code,
                    variant: code,
                });
                self.fill(&mut variant, row, changes)?;
                let id = variant.id_typed();
                product.add_variant(variant)?;
                Ok(id)
            }
        }
    }

    fn fill(
        &self,
        variant: &mut Variant,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        variant.set_current_locale(row.locale.clone());
        variant.translation_mut()?.name = truncate(&row.name, self.text_limit);

        if row.can_be_tailored {
            variant.mark_custom_cut();
        } else {
            variant.set_dimensions(row.dimensions);
        }
        if row.is_sample {
            variant.set_sample(true);
        }

        self.pricing.apply(variant, row, changes)
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::{LocaleCode, ProductCode};
    use catalog_products::Dimensions;

    use super::*;
    use crate::config::OriginalPricePolicy;

    fn reconciler() -> VariantReconciler {
        VariantReconciler::new(255, ChannelPricingReconciler::new(OriginalPricePolicy::Reset))
    }

    fn row(code: &str, locale: &str, name: &str) -> ProductRow {
        let mut row = crate::record::tests_support::row(code);
        row.locale = LocaleCode::new(locale).unwrap();
        row.name = name.to_string();
        row
    }

    fn parent() -> Product {
        Product::new(ProductCode::new("P1").unwrap())
    }

    #[test]
    fn second_locale_extends_existing_variant() {
        let mut product = parent();
        let reconciler = reconciler();

        reconciler
            .apply(&mut product, &row("V1", "en", "Oak plank"), &mut ChangeSet::new())
            .unwrap();
        let mut changes = ChangeSet::new();
        reconciler
            .apply(&mut product, &row("V1", "fr", "Planche de chêne"), &mut changes)
            .unwrap();

        assert_eq!(product.variants().len(), 1);
        let variant = &product.variants()[0];
        assert_eq!(variant.translations().len(), 2);
        assert_eq!(changes.count("catalog.variant.locale_added"), 1);
        assert_eq!(changes.count("catalog.variant.created"), 0);
    }

    #[test]
    fn dimensions_and_custom_cut_are_exclusive() {
        let mut product = parent();
        let reconciler = reconciler();
        let mut measured = row("V1", "en", "Plank");
        measured.dimensions = Dimensions {
            depth: 2.0,
            width: 20.0,
            height: 200.0,
            weight: 4.5,
            ..Dimensions::default()
        };

        reconciler
            .apply(&mut product, &measured, &mut ChangeSet::new())
            .unwrap();
        assert!(!product.variants()[0].is_custom_cut());
        assert_eq!(product.variants()[0].dimensions().width, 20.0);

        let mut tailored = measured.clone();
        tailored.can_be_tailored = true;
        tailored.dimensions = Dimensions::default();
        reconciler
            .apply(&mut product, &tailored, &mut ChangeSet::new())
            .unwrap();
        let variant = &product.variants()[0];
        assert!(variant.is_custom_cut());
        assert_eq!(variant.dimensions().width, 20.0);

        reconciler
            .apply(&mut product, &measured, &mut ChangeSet::new())
            .unwrap();
        assert!(!product.variants()[0].is_custom_cut());
    }

    #[test]
    fn sample_flag_is_only_raised() {
        let mut product = parent();
        let reconciler = reconciler();
        let mut sample = row("V1", "en", "Swatch");
        sample.is_sample = true;

        reconciler
            .apply(&mut product, &sample, &mut ChangeSet::new())
            .unwrap();
        reconciler
            .apply(&mut product, &row("V1", "en", "Swatch"), &mut ChangeSet::new())
            .unwrap();

        assert!(product.variants()[0].is_sample());
    }

    #[test]
    fn new_code_adds_a_variant() {
        let mut product = parent();
        let reconciler = reconciler();

        reconciler
            .apply(&mut product, &row("V1", "en", "One"), &mut ChangeSet::new())
            .unwrap();
        reconciler
            .apply(&mut product, &row("V2", "en", "Two"), &mut ChangeSet::new())
            .unwrap();

        assert_eq!(product.variants().len(), 2);
    }
}
