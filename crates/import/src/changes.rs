//! Change log of a reconciliation pass.
//!
//! Reconcilers mutate the `Product` aggregate in memory and describe each
//! applied change as a [`Mutation`]. Decisions to leave something alone are
//! recorded as a [`Skip`]. The run driver folds both into the report.

use serde::Serialize;

use catalog_core::{
    AssociationTypeCode, AttributeCode, ChannelCode, ImageType, LocaleCode, ProductCode,
    TaxonCode, VariantCode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mutation", rename_all = "snake_case")]
pub enum Mutation {
    ProductCreated {
        product: ProductCode,
    },
    ProductSaved {
        product: ProductCode,
    },
    VariantCreated {
        product: ProductCode,
        variant: VariantCode,
    },
    VariantLocaleAdded {
        product: ProductCode,
        variant: VariantCode,
        locale: LocaleCode,
    },
    MainTaxonSet {
        product: ProductCode,
        taxon: TaxonCode,
    },
    TaxonLinked {
        product: ProductCode,
        taxon: TaxonCode,
    },
    ChannelAttached {
        product: ProductCode,
        channel: ChannelCode,
    },
    AttributeValueCreated {
        product: ProductCode,
        attribute: AttributeCode,
        locale: Option<LocaleCode>,
    },
    AttributeValueUpdated {
        product: ProductCode,
        attribute: AttributeCode,
    },
    AttributeValueRemoved {
        product: ProductCode,
        attribute: AttributeCode,
    },
    ChannelPricingCreated {
        variant: VariantCode,
        channel: ChannelCode,
        price: i64,
    },
    ChannelPricingUpdated {
        variant: VariantCode,
        channel: ChannelCode,
        price: i64,
    },
    ImageCreated {
        product: ProductCode,
        kind: ImageType,
    },
    ImageUpdated {
        product: ProductCode,
        kind: ImageType,
    },
    ImageRemoved {
        product: ProductCode,
        kind: ImageType,
    },
    AssociationCreated {
        owner: ProductCode,
        association_type: AssociationTypeCode,
    },
    AssociatedProductAdded {
        owner: ProductCode,
        association_type: AssociationTypeCode,
        product: ProductCode,
    },
}

impl Mutation {
    /// Stable dotted name, used as the counter key in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::ProductCreated { .. } => "catalog.product.created",
            Mutation::ProductSaved { .. } => "catalog.product.saved",
            Mutation::VariantCreated { .. } => "catalog.variant.created",
            Mutation::VariantLocaleAdded { .. } => "catalog.variant.locale_added",
            Mutation::MainTaxonSet { .. } => "catalog.product.main_taxon_set",
            Mutation::TaxonLinked { .. } => "catalog.product_taxon.created",
            Mutation::ChannelAttached { .. } => "catalog.product.channel_attached",
            Mutation::AttributeValueCreated { .. } => "catalog.attribute_value.created",
            Mutation::AttributeValueUpdated { .. } => "catalog.attribute_value.updated",
            Mutation::AttributeValueRemoved { .. } => "catalog.attribute_value.removed",
            Mutation::ChannelPricingCreated { .. } => "catalog.channel_pricing.created",
            Mutation::ChannelPricingUpdated { .. } => "catalog.channel_pricing.updated",
            Mutation::ImageCreated { .. } => "catalog.image.created",
            Mutation::ImageUpdated { .. } => "catalog.image.updated",
            Mutation::ImageRemoved { .. } => "catalog.image.removed",
            Mutation::AssociationCreated { .. } => "catalog.association.created",
            Mutation::AssociatedProductAdded { .. } => "catalog.association.product_added",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TaxonNotFound,
    TaxonAlreadyLinked,
    ChannelNotFound,
    AssociatedProductNotFound,
    AlreadyAssociated,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TaxonNotFound => "taxon_not_found",
            SkipReason::TaxonAlreadyLinked => "taxon_already_linked",
            SkipReason::ChannelNotFound => "channel_not_found",
            SkipReason::AssociatedProductNotFound => "associated_product_not_found",
            SkipReason::AlreadyAssociated => "already_associated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    pub reason: SkipReason,
    pub code: String,
}

/// Everything one record changed (or chose not to).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    mutations: Vec<Mutation>,
    skips: Vec<Skip>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mutation: Mutation) {
        tracing::debug!(kind = mutation.kind(), ?mutation, "mutation recorded");
        self.mutations.push(mutation);
    }

    pub fn skip(&mut self, reason: SkipReason, code: impl Into<String>) {
        let code = code.into();
        tracing::debug!(reason = reason.as_str(), code = %code, "skipped");
        self.skips.push(Skip { reason, code });
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn skips(&self) -> &[Skip] {
        &self.skips
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.skips.is_empty()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.mutations.iter().filter(|m| m.kind() == kind).count()
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skips.iter().filter(|s| s.reason == reason).count()
    }

    /// Mutations other than the final save.
    pub fn has_changes(&self) -> bool {
        self.mutations
            .iter()
            .any(|m| !matches!(m, Mutation::ProductSaved { .. }))
    }
}
