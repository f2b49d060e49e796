use catalog_products::Product;

use crate::coerce::{slugify, truncate};
use crate::error::ImportError;
use crate::record::ProductRow;

/// Scalar and localized product fields.
pub struct DetailReconciler {
    text_limit: usize,
}

impl DetailReconciler {
    pub fn new(text_limit: usize) -> Self {
        Self { text_limit }
    }

    pub fn apply(&self, product: &mut Product, row: &ProductRow) -> Result<(), ImportError> {
        product.set_current_locale(row.locale.clone());
        product.set_fallback_locale(row.locale.clone());

        let limit = self.text_limit;
        let code_slug = slugify(product.code().as_str());
        let translation = product.translation_mut()?;
        translation.name = truncate(&row.name, limit);
        translation.description = row.description.clone();
        translation.short_description = truncate(&row.short_description, limit);
        translation.meta_description = truncate(&row.meta_description, limit);
        translation.meta_keywords = truncate(&row.meta_keywords, limit);

        let has_slug = translation.slug.as_deref().is_some_and(|s| !s.is_empty());
        if !has_slug {
            let slug = match slugify(&translation.name) {
                slug if slug.is_empty() => code_slug,
                slug => slug,
            };
            if !slug.is_empty() {
                translation.slug = Some(slug);
            }
        }

        product.set_enabled(row.enabled);
        product.set_manufacturer_reference(truncate(&row.manufacturer_reference, limit));
        product.set_max_length_delivery(row.max_length_delivery);
        product.set_eligible_to_priority_order(row.is_eligible_to_priority_order);
        product.set_min_preparation_hour(row.min_preparation_hour);
        product.set_max_preparation_hour(row.max_preparation_hour);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::{LocaleCode, ProductCode};

    use super::*;
    use crate::config::ImportConfig;
    use crate::record::{ImportRecord, RawRecord};

    fn row(pairs: &[(&str, &str)]) -> ProductRow {
        let raw: RawRecord = pairs.iter().copied().collect();
        match ImportRecord::parse(&raw, &ImportConfig::default()).unwrap() {
            ImportRecord::Standalone(row) => row,
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn sets_locale_text_and_scalars() {
        let mut product = Product::new(ProductCode::new("P1").unwrap());
        let row = row(&[
            ("Code", "P1"),
            ("Locale", "fr_FR"),
            ("Name", "Chêne Massif"),
            ("Enabled", "0"),
            ("MaxLengthDelivery", "2.5m"),
            ("MinPreparationHour", "3.7"),
            ("MaxPreparationHour", "abc"),
            ("IsEligibleToPriorityOrder", "1"),
        ]);

        DetailReconciler::new(255).apply(&mut product, &row).unwrap();

        let fr = LocaleCode::new("fr_FR").unwrap();
        assert_eq!(product.current_locale(), Some(&fr));
        assert_eq!(product.fallback_locale(), Some(&fr));
        assert_eq!(product.name(), Some("Chêne Massif"));
        assert_eq!(product.slug(), Some("chene-massif"));
        assert!(!product.is_enabled());
        assert!(product.is_eligible_to_priority_order());
        assert_eq!(product.max_length_delivery(), 2.5);
        assert_eq!(product.min_preparation_hour(), 3);
        assert_eq!(product.max_preparation_hour(), 0);
    }

    #[test]
    fn bounded_fields_are_truncated_description_is_not() {
        let mut product = Product::new(ProductCode::new("P1").unwrap());
        let long = "é".repeat(300);
        let row = row(&[
            ("Code", "P1"),
            ("Locale", "en"),
            ("Name", long.as_str()),
            ("Description", long.as_str()),
            ("Meta_keywords", long.as_str()),
        ]);

        DetailReconciler::new(255).apply(&mut product, &row).unwrap();

        let translation = product.translation().unwrap();
        assert_eq!(translation.name.chars().count(), 255);
        assert_eq!(translation.meta_keywords.chars().count(), 255);
        assert_eq!(translation.description.chars().count(), 300);
    }

    #[test]
    fn existing_slug_is_kept() {
        let mut product = Product::new(ProductCode::new("P1").unwrap());
        DetailReconciler::new(255)
            .apply(&mut product, &row(&[("Code", "P1"), ("Locale", "en"), ("Name", "First")]))
            .unwrap();
        DetailReconciler::new(255)
            .apply(&mut product, &row(&[("Code", "P1"), ("Locale", "en"), ("Name", "Renamed")]))
            .unwrap();

        assert_eq!(product.name(), Some("Renamed"));
        assert_eq!(product.slug(), Some("first"));
    }

    #[test]
    fn unsluggable_name_falls_back_to_code() {
        let mut product = Product::new(ProductCode::new("OAK_01").unwrap());
        DetailReconciler::new(255)
            .apply(&mut product, &row(&[("Code", "OAK_01"), ("Locale", "ja"), ("Name", "木材")]))
            .unwrap();

        assert_eq!(product.slug(), Some("oak-01"));
    }
}
