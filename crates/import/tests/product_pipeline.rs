use catalog_core::{AttributeCode, ChannelCode, ImageType, LocaleCode, TaxonCode, VariantCode};
use catalog_import::record::fields;
use catalog_import::{ImportConfig, ImportReport, ImportRunner, Lookups, RawRecord};
use catalog_infra::{InMemoryCatalog, ProductRepository};
use catalog_products::{Attribute, AttributeType, Channel, Product, Taxon};
use proptest::prelude::*;
use serde_json::json;

fn catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    for code in ["wood", "oak", "pine"] {
        catalog
            .insert_taxon(Taxon::new(TaxonCode::new(code).unwrap(), code))
            .unwrap();
    }
    for code in ["WEB", "SHOP"] {
        catalog
            .insert_channel(Channel::new(ChannelCode::new(code).unwrap(), code))
            .unwrap();
    }
    catalog
        .insert_attribute(Attribute::new(
            AttributeCode::new("color").unwrap(),
            AttributeType::Text,
            true,
        ))
        .unwrap();
    catalog
        .insert_attribute(Attribute::new(
            AttributeCode::new("thickness").unwrap(),
            AttributeType::Integer,
            false,
        ))
        .unwrap();
    catalog
}

fn config() -> ImportConfig {
    ImportConfig {
        image_slots: vec!["main".into(), "thumbnail".into()],
        ..ImportConfig::default()
    }
}

fn import(catalog: &InMemoryCatalog, records: Vec<RawRecord>) -> ImportReport {
    ImportRunner::new(Lookups::from_catalog(catalog), catalog, catalog, config())
        .run_products(records)
        .unwrap()
}

/// Every required column present and empty, then the given cells.
fn record(cells: &[(&str, &str)]) -> RawRecord {
    let mut raw: RawRecord = fields::PRODUCT_HEADERS.iter().map(|h| (*h, "")).collect();
    for column in ["color", "thickness", "Images_main", "Images_thumbnail"] {
        raw.insert(column, "");
    }
    for (k, v) in cells {
        raw.insert(*k, *v);
    }
    raw
}

fn product_record() -> RawRecord {
    record(&[
        ("Code", "PLANK"),
        ("Locale", "en_US"),
        ("Name", "Oak plank"),
        ("Enabled", "1"),
        ("Main_taxon", "wood"),
        ("Taxons", "wood|oak|unknown"),
        ("Channels", "WEB|SHOP"),
        ("color", "amber"),
        ("thickness", "18"),
    ])
}

fn variant_record(code: &str, locale: &str, price: &str) -> RawRecord {
    record(&[
        ("Code", code),
        ("Parent_code", "PLANK"),
        ("Locale", locale),
        ("Name", "Oak plank 2m"),
        ("Channels", "WEB|SHOP"),
        ("Price", price),
        ("Depth", "2"),
        ("Width", "20"),
        ("Height", "2000"),
        ("Weight", "4.5"),
        ("Images_main", "plank.jpg"),
    ])
}

fn plank(catalog: &InMemoryCatalog) -> Product {
    catalog.find_by_code("PLANK").unwrap().unwrap()
}

#[test]
fn reimporting_a_product_changes_nothing() {
    let catalog = catalog();
    let first = import(&catalog, vec![product_record(), variant_record("PLANK-2M", "en_US", "12.50")]);
    assert_eq!(first.failed, 0);
    let before = plank(&catalog);

    let second = import(&catalog, vec![product_record(), variant_record("PLANK-2M", "en_US", "12.50")]);
    let after = plank(&catalog);

    assert_eq!(second.failed, 0);
    assert_eq!(second.created, 0);
    assert_eq!(second.mutation_count("catalog.product.saved"), 2);
    assert_eq!(second.mutations.len(), 1, "only saves expected, got {:?}", second.mutations);

    assert_eq!(after.product_taxons(), before.product_taxons());
    assert_eq!(after.channels(), before.channels());
    assert_eq!(after.attributes(), before.attributes());
    assert_eq!(after.variants(), before.variants());
    assert_eq!(after.images(), before.images());
}

#[test]
fn standalone_product_is_fully_populated() {
    let catalog = catalog();
    let report = import(&catalog, vec![product_record()]);

    assert_eq!(report.created, 1);
    assert_eq!(report.skip_count("taxon_not_found"), 1);

    let product = plank(&catalog);
    assert_eq!(product.name(), Some("Oak plank"));
    assert_eq!(product.slug(), Some("oak-plank"));
    assert!(product.is_enabled());
    assert_eq!(product.main_taxon(), Some(&TaxonCode::new("wood").unwrap()));
    assert_eq!(product.product_taxons().len(), 2);
    assert_eq!(product.channels().len(), 2);
    assert_eq!(product.attributes().len(), 2);
}

#[test]
fn decimal_comma_and_point_give_the_same_price() {
    let catalog = catalog();
    import(
        &catalog,
        vec![
            product_record(),
            variant_record("COMMA", "en_US", "12,50"),
            variant_record("POINT", "en_US", "12.50"),
        ],
    );

    let product = plank(&catalog);
    let web = ChannelCode::new("WEB").unwrap();
    for code in ["COMMA", "POINT"] {
        let variant = product
            .variant_by_code(&VariantCode::new(code).unwrap())
            .unwrap();
        let pricing = variant.channel_pricing(&web).unwrap();
        assert_eq!(pricing.price(), 1250);
        assert_eq!(pricing.original_price(), Some(1250));
    }
}

#[test]
fn price_change_resets_original_price() {
    let catalog = catalog();
    import(&catalog, vec![product_record(), variant_record("V", "en_US", "20")]);
    import(&catalog, vec![variant_record("V", "en_US", "15,99")]);

    let product = plank(&catalog);
    let variant = product.variant_by_code(&VariantCode::new("V").unwrap()).unwrap();
    assert_eq!(variant.channel_pricings().len(), 2);
    for pricing in variant.channel_pricings() {
        assert_eq!(pricing.price(), 1599);
        assert_eq!(pricing.original_price(), Some(pricing.price()));
    }
}

#[test]
fn tailorable_variant_keeps_dimensions_untouched() {
    let catalog = catalog();
    import(&catalog, vec![product_record(), variant_record("V", "en_US", "1")]);

    let mut tailored = variant_record("V", "en_US", "1");
    tailored.insert("Can_be_tailored", "1");
    tailored.insert("Width", "999");
    import(&catalog, vec![tailored]);

    let product = plank(&catalog);
    let variant = product.variant_by_code(&VariantCode::new("V").unwrap()).unwrap();
    assert!(variant.is_custom_cut());
    assert_eq!(variant.dimensions().width, 20.0);
    assert_eq!(variant.dimensions().weight, 4.5);

    import(&catalog, vec![variant_record("V", "en_US", "1")]);
    let product = plank(&catalog);
    let variant = product.variant_by_code(&VariantCode::new("V").unwrap()).unwrap();
    assert!(!variant.is_custom_cut());
}

#[test]
fn second_locale_extends_the_variant() {
    let catalog = catalog();
    let mut french = variant_record("V", "fr_FR", "1");
    french.insert("Name", "Planche de chêne 2m");
    let report = import(
        &catalog,
        vec![product_record(), variant_record("V", "en_US", "1"), french],
    );

    assert_eq!(report.mutation_count("catalog.variant.created"), 1);
    assert_eq!(report.mutation_count("catalog.variant.locale_added"), 1);

    let product = plank(&catalog);
    assert_eq!(product.variants().len(), 1);
    let translations = product.variants()[0].translations();
    assert_eq!(translations.len(), 2);
    assert_eq!(
        translations[&LocaleCode::new("fr_FR").unwrap()].name,
        "Planche de chêne 2m"
    );
}

#[test]
fn attribute_cells_drive_create_update_remove() {
    let catalog = catalog();
    import(&catalog, vec![product_record()]);

    let mut changed = product_record();
    changed.insert("color", "");
    changed.insert("thickness", "22");
    let report = import(&catalog, vec![changed]);

    assert_eq!(report.mutation_count("catalog.attribute_value.removed"), 1);
    assert_eq!(report.mutation_count("catalog.attribute_value.updated"), 1);

    let product = plank(&catalog);
    assert_eq!(product.attributes().len(), 1);
    let thickness = &product.attributes()[0];
    assert_eq!(thickness.code().as_str(), "thickness");
    assert_eq!(thickness.locale(), None);
    assert_eq!(thickness.value(), &json!(22));
}

#[test]
fn translatable_attribute_is_scoped_to_record_locale() {
    let catalog = catalog();
    let mut french = product_record();
    french.insert("Locale", "fr_FR");
    french.insert("color", "ambre");
    import(&catalog, vec![product_record(), french]);

    let product = plank(&catalog);
    let color = AttributeCode::new("color").unwrap();
    let en = LocaleCode::new("en_US").unwrap();
    let fr = LocaleCode::new("fr_FR").unwrap();
    assert_eq!(
        product.attribute_by_code_and_locale(&color, Some(&en)).unwrap().value(),
        &json!("amber")
    );
    assert_eq!(
        product.attribute_by_code_and_locale(&color, Some(&fr)).unwrap().value(),
        &json!("ambre")
    );
    // thickness is shared by every locale
    assert_eq!(product.attributes().len(), 3);
}

#[test]
fn empty_image_slot_removes_and_new_slot_is_created() {
    let catalog = catalog();
    let mut with_thumbnail = variant_record("V", "en_US", "1");
    with_thumbnail.insert("Images_thumbnail", "thumb.jpg");
    import(&catalog, vec![product_record(), with_thumbnail]);
    assert_eq!(plank(&catalog).images().len(), 2);

    let mut next = variant_record("V", "en_US", "1");
    next.insert("Images_zoom", "zoom.jpg");
    let report = import(&catalog, vec![next]);

    assert_eq!(report.mutation_count("catalog.image.removed"), 1);
    assert_eq!(report.mutation_count("catalog.image.created"), 1);

    let product = plank(&catalog);
    assert!(product.images_by_type(&ImageType::new("thumbnail").unwrap()).is_empty());
    assert_eq!(product.images_by_type(&ImageType::new("main").unwrap()).len(), 1);
    assert_eq!(
        product.images_by_type(&ImageType::new("zoom").unwrap())[0].path(),
        "zoom.jpg"
    );
}

#[test]
fn image_type_seen_in_catalog_becomes_a_required_column() {
    let catalog = catalog();
    let mut zoomed = variant_record("V", "en_US", "1");
    zoomed.insert("Images_zoom", "zoom.jpg");
    import(&catalog, vec![product_record(), zoomed]);

    let err = ImportRunner::new(Lookups::from_catalog(&catalog), &catalog, &catalog, config())
        .run_products(vec![variant_record("V", "en_US", "1")])
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("Images_zoom"));
}

#[test]
fn variant_of_unknown_parent_is_skipped() {
    let catalog = catalog();
    let report = import(&catalog, vec![variant_record("V", "en_US", "1"), product_record()]);

    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 1);
    assert!(report.failures[0].message.contains("PLANK"));
    assert!(plank(&catalog).variants().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, ..ProptestConfig::default() })]

    #[test]
    fn variant_import_is_idempotent(
        units in 0u32..100_000,
        cents in 0u32..100,
        comma in any::<bool>(),
        tailored in any::<bool>(),
        sample in any::<bool>(),
    ) {
        let catalog = catalog();
        let separator = if comma { "," } else { "." };
        let price = format!("{units}{separator}{cents:02}");
        let mut variant = variant_record("V", "en_US", &price);
        variant.insert("Can_be_tailored", if tailored { "1" } else { "0" });
        variant.insert("Is_sample", if sample { "1" } else { "" });

        import(&catalog, vec![product_record(), variant.clone()]);
        let before = plank(&catalog);
        let report = import(&catalog, vec![variant]);
        let after = plank(&catalog);

        prop_assert_eq!(report.failed, 0);
        prop_assert_eq!(after.variants(), before.variants());
        prop_assert_eq!(after.images(), before.images());

        let v = &after.variants()[0];
        prop_assert_eq!(v.channel_pricings().len(), 2);
        prop_assert_eq!(v.is_custom_cut(), tailored);
        prop_assert_eq!(v.is_sample(), sample);
        let expected = i64::from(units) * 100 + i64::from(cents);
        for pricing in v.channel_pricings() {
            prop_assert_eq!(pricing.price(), expected);
            prop_assert_eq!(pricing.original_price(), Some(expected));
        }
    }
}
