use catalog_core::{AssociationTypeCode, ProductCode};
use catalog_products::Association;

use crate::changes::{ChangeSet, Mutation, SkipReason};
use crate::error::ImportError;
use crate::record::AssociationRecord;

use super::{Lookups, RecordOutcome};

/// Owner code + associated codes → one association per (owner, type).
pub struct AssociationReconciler<'a> {
    lookups: Lookups<'a>,
    association_type: &'a str,
}

impl<'a> AssociationReconciler<'a> {
    pub fn new(lookups: Lookups<'a>, association_type: &'a str) -> Self {
        Self {
            lookups,
            association_type,
        }
    }

    pub fn reconcile(&self, record: &AssociationRecord) -> Result<RecordOutcome, ImportError> {
        let Some(mut owner) = self.lookups.products.find_by_code(&record.owner_code)? else {
            tracing::error!(owner = %record.owner_code, "product not found");
            return Err(ImportError::OwnerNotFound {
                code: record.owner_code.clone(),
            });
        };

        let association_type: AssociationTypeCode = self
            .lookups
            .association_types
            .find_by_code(self.association_type)?
            .ok_or_else(|| ImportError::MissingAssociationType {
                code: self.association_type.to_string(),
            })?
            .code;

        let owner_code = owner.code().clone();
        let mut changes = ChangeSet::new();

        for code in &record.associated_codes {
            let Some(associated) = self.lookups.products.find_by_code(code)? else {
                tracing::error!(owner = %owner_code, product = %code, "associated product not found");
                changes.skip(SkipReason::AssociatedProductNotFound, code.as_str());
                continue;
            };
            let associated: ProductCode = associated.code().clone();

            match owner.association_by_type_mut(&association_type) {
                Some(association) => {
                    if association.add_associated_product(associated.clone()) {
                        tracing::info!(owner = %owner_code, product = %associated, "associated product added");
                        changes.record(Mutation::AssociatedProductAdded {
                            owner: owner_code.clone(),
                            association_type: association_type.clone(),
                            product: associated,
                        });
                    } else {
                        tracing::info!(owner = %owner_code, product = %associated, "already associated, skipped");
                        changes.skip(SkipReason::AlreadyAssociated, associated.as_str());
                    }
                }
                None => {
                    let mut association = Association::new(owner_code.clone(), association_type.clone());
                    association.add_associated_product(associated.clone());
                    owner.add_association(association)?;
                    tracing::info!(owner = %owner_code, product = %associated, "association created");
                    changes.record(Mutation::AssociationCreated {
                        owner: owner_code.clone(),
                        association_type: association_type.clone(),
                    });
                    changes.record(Mutation::AssociatedProductAdded {
                        owner: owner_code.clone(),
                        association_type: association_type.clone(),
                        product: associated,
                    });
                }
            }
        }

        self.lookups.products.save(&mut owner)?;
        changes.record(Mutation::ProductSaved {
            product: owner_code.clone(),
        });
        Ok(RecordOutcome {
            code: owner_code.into_inner(),
            created: false,
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use catalog_infra::{InMemoryCatalog, ProductRepository};
    use catalog_products::{AssociationType, Product};

    use super::*;

    fn catalog(codes: &[&str]) -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog
            .insert_association_type(AssociationType::new(
                AssociationTypeCode::new("cross-selling").unwrap(),
                "Cross selling",
            ))
            .unwrap();
        for code in codes {
            let mut product = Product::new(ProductCode::new(*code).unwrap());
            catalog.save(&mut product).unwrap();
        }
        catalog
    }

    fn record(owner: &str, codes: &str) -> AssociationRecord {
        AssociationRecord::from_parts(owner, codes, ',')
    }

    fn members(catalog: &InMemoryCatalog, owner: &str) -> Vec<String> {
        let owner = catalog.find_by_code(owner).unwrap().unwrap();
        owner
            .association_by_type(&AssociationTypeCode::new("cross-selling").unwrap())
            .map(|a| a.associated_products().iter().map(|c| c.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn duplicate_code_in_one_record_is_skipped() {
        let catalog = catalog(&["OWNER", "A", "B"]);
        let reconciler = AssociationReconciler::new(Lookups::from_catalog(&catalog), "cross-selling");

        let outcome = reconciler.reconcile(&record("OWNER", "A,B,A")).unwrap();

        assert_eq!(members(&catalog, "OWNER"), vec!["A", "B"]);
        assert_eq!(outcome.changes.count("catalog.association.created"), 1);
        assert_eq!(outcome.changes.skipped(SkipReason::AlreadyAssociated), 1);
    }

    #[test]
    fn unknown_associated_product_is_skipped() {
        let catalog = catalog(&["OWNER", "A"]);
        let reconciler = AssociationReconciler::new(Lookups::from_catalog(&catalog), "cross-selling");

        let outcome = reconciler.reconcile(&record("OWNER", "GHOST,A")).unwrap();

        assert_eq!(members(&catalog, "OWNER"), vec!["A"]);
        assert_eq!(outcome.changes.skipped(SkipReason::AssociatedProductNotFound), 1);
    }

    #[test]
    fn missing_owner_is_recoverable() {
        let catalog = catalog(&["A"]);
        let reconciler = AssociationReconciler::new(Lookups::from_catalog(&catalog), "cross-selling");

        let err = reconciler.reconcile(&record("NOPE", "A")).unwrap_err();
        assert_eq!(err, ImportError::OwnerNotFound { code: "NOPE".into() });
        assert!(!err.is_fatal());
    }

    #[test]
    fn missing_association_type_is_fatal() {
        let catalog = catalog(&["OWNER", "A"]);
        let reconciler = AssociationReconciler::new(Lookups::from_catalog(&catalog), "up-selling");

        let err = reconciler.reconcile(&record("OWNER", "A")).unwrap_err();
        assert!(err.is_fatal());
        assert!(members(&catalog, "OWNER").is_empty());
    }

    #[test]
    fn later_records_extend_the_same_association() {
        let catalog = catalog(&["OWNER", "A", "B"]);
        let reconciler = AssociationReconciler::new(Lookups::from_catalog(&catalog), "cross-selling");

        reconciler.reconcile(&record("OWNER", "A")).unwrap();
        let outcome = reconciler.reconcile(&record("OWNER", "B,A")).unwrap();

        assert_eq!(members(&catalog, "OWNER"), vec!["A", "B"]);
        assert_eq!(outcome.changes.count("catalog.association.created"), 0);
        assert_eq!(outcome.changes.count("catalog.association.product_added"), 1);
        let owner = catalog.find_by_code("OWNER").unwrap().unwrap();
        assert_eq!(owner.associations().len(), 1);
    }
}
