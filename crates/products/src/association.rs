use serde::{Deserialize, Serialize};

use catalog_core::{AssociationId, AssociationTypeCode, Entity, ProductCode};

/// Category of product cross-reference (e.g. `cross-selling`). Read-only for
/// the import engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationType {
    pub code: AssociationTypeCode,
    #[serde(default)]
    pub name: String,
}

impl AssociationType {
    pub fn new(code: AssociationTypeCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

/// Set of products associated to an owner under one association type.
///
/// Membership is a set: adding an already-associated product is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    id: AssociationId,
    association_type: AssociationTypeCode,
    owner: ProductCode,
    associated_products: Vec<ProductCode>,
}

impl Association {
    pub fn new(owner: ProductCode, association_type: AssociationTypeCode) -> Self {
        Self {
            id: AssociationId::new(),
            association_type,
            owner,
            associated_products: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> AssociationId {
        self.id
    }

    pub fn association_type(&self) -> &AssociationTypeCode {
        &self.association_type
    }

    pub fn owner(&self) -> &ProductCode {
        &self.owner
    }

    pub fn associated_products(&self) -> &[ProductCode] {
        &self.associated_products
    }

    pub fn has_associated_product(&self, code: &ProductCode) -> bool {
        self.associated_products.contains(code)
    }

    /// Returns `false` when the product was already a member.
    pub fn add_associated_product(&mut self, code: ProductCode) -> bool {
        if self.has_associated_product(&code) {
            return false;
        }
        self.associated_products.push(code);
        true
    }
}

impl Entity for Association {
    type Id = AssociationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    #[test]
    fn membership_is_a_set() {
        let mut association = Association::new(
            code("OWNER1"),
            AssociationTypeCode::new("cross-selling").unwrap(),
        );

        assert!(association.add_associated_product(code("A")));
        assert!(association.add_associated_product(code("B")));
        assert!(!association.add_associated_product(code("A")));

        assert_eq!(association.associated_products(), &[code("A"), code("B")]);
    }
}
