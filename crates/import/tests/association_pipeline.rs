use catalog_core::{AssociationTypeCode, ProductCode};
use catalog_import::{ImportConfig, ImportError, ImportReport, ImportRunner, Lookups, RawRecord};
use catalog_infra::{InMemoryCatalog, ProductRepository};
use catalog_products::{AssociationType, Product};

fn catalog(products: &[&str]) -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    catalog
        .insert_association_type(AssociationType::new(
            AssociationTypeCode::new("cross-selling").unwrap(),
            "Cross selling",
        ))
        .unwrap();
    for code in products {
        catalog
            .save(&mut Product::new(ProductCode::new(*code).unwrap()))
            .unwrap();
    }
    catalog
}

fn record(owner: &str, associated: &str) -> RawRecord {
    [("ProductCode", owner), ("AssociatedProducts", associated)]
        .into_iter()
        .collect()
}

fn run(catalog: &InMemoryCatalog, records: Vec<RawRecord>) -> Result<ImportReport, ImportError> {
    ImportRunner::new(
        Lookups::from_catalog(catalog),
        catalog,
        catalog,
        ImportConfig::default(),
    )
    .run_associations(records)
}

fn members(catalog: &InMemoryCatalog, owner: &str) -> Vec<String> {
    catalog
        .find_by_code(owner)
        .unwrap()
        .unwrap()
        .association_by_type(&AssociationTypeCode::new("cross-selling").unwrap())
        .map(|a| a.associated_products().iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn repeated_code_is_added_once() {
    let catalog = catalog(&["OWNER", "A", "B"]);
    let report = run(&catalog, vec![record("OWNER", "A,B,A")]).unwrap();

    assert_eq!(members(&catalog, "OWNER"), vec!["A", "B"]);
    assert_eq!(report.mutation_count("catalog.association.created"), 1);
    assert_eq!(report.mutation_count("catalog.association.product_added"), 2);
    assert_eq!(report.skip_count("already_associated"), 1);
}

#[test]
fn reimport_is_idempotent() {
    let catalog = catalog(&["OWNER", "A", "B"]);
    run(&catalog, vec![record("OWNER", "A, B")]).unwrap();
    let report = run(&catalog, vec![record("OWNER", "A,B")]).unwrap();

    assert_eq!(members(&catalog, "OWNER"), vec!["A", "B"]);
    assert_eq!(report.mutation_count("catalog.association.product_added"), 0);
    assert_eq!(report.skip_count("already_associated"), 2);
    let owner = catalog.find_by_code("OWNER").unwrap().unwrap();
    assert_eq!(owner.associations().len(), 1);
}

#[test]
fn missing_owner_skips_the_record_only() {
    let catalog = catalog(&["OWNER", "A"]);
    let report = run(
        &catalog,
        vec![record("GHOST", "A"), record("OWNER", "A,MISSING")],
    )
    .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].code, "GHOST");
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skip_count("associated_product_not_found"), 1);
    assert_eq!(members(&catalog, "OWNER"), vec!["A"]);
}

#[test]
fn missing_association_type_aborts_the_run() {
    let catalog = catalog(&["OWNER", "A"]);
    catalog
        .remove_association_type(&AssociationTypeCode::new("cross-selling").unwrap())
        .unwrap();

    let err = run(&catalog, vec![record("OWNER", "A")]).unwrap_err();

    assert_eq!(
        err,
        ImportError::MissingAssociationType {
            code: "cross-selling".into()
        }
    );
    assert!(members(&catalog, "OWNER").is_empty());
}

#[test]
fn configured_association_type_is_used() {
    let catalog = catalog(&["OWNER", "A"]);
    catalog
        .insert_association_type(AssociationType::new(
            AssociationTypeCode::new("up-selling").unwrap(),
            "Up selling",
        ))
        .unwrap();
    let config = ImportConfig {
        association_type_code: "up-selling".into(),
        ..ImportConfig::default()
    };

    ImportRunner::new(Lookups::from_catalog(&catalog), &catalog, &catalog, config)
        .run_associations(vec![record("OWNER", "A")])
        .unwrap();

    let owner = catalog.find_by_code("OWNER").unwrap().unwrap();
    assert!(
        owner
            .association_by_type(&AssociationTypeCode::new("up-selling").unwrap())
            .is_some()
    );
    assert!(members(&catalog, "OWNER").is_empty());
}

#[test]
fn missing_header_in_a_later_record_saves_nothing() {
    let catalog = catalog(&["OWNER", "A"]);
    let broken: RawRecord = [("ProductCode", "OWNER")].into_iter().collect();

    let err = run(&catalog, vec![record("OWNER", "A"), broken]).unwrap_err();

    assert!(matches!(err, ImportError::MissingHeaders { .. }));
    assert!(members(&catalog, "OWNER").is_empty());
}
