use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use catalog_core::{
    AggregateRoot, AssociationTypeCode, AttributeCode, AttributeValueId, ChannelCode, DomainError,
    DomainResult, ImageId, ImageType, LocaleCode, ProductCode, ProductId, TaxonCode, VariantCode,
    VariantId, find_by_id_mut, position_by_id,
};

use crate::association::Association;
use crate::attribute::AttributeValue;
use crate::image::ProductImage;
use crate::variant::Variant;

/// Localized fields of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTranslation {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub short_description: String,
    pub meta_description: String,
    pub meta_keywords: String,
}

/// Link between a product and a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTaxon {
    pub taxon: TaxonCode,
    pub position: u32,
}

/// Aggregate root: Product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    code: ProductCode,
    current_locale: Option<LocaleCode>,
    fallback_locale: Option<LocaleCode>,
    translations: BTreeMap<LocaleCode, ProductTranslation>,
    enabled: bool,
    manufacturer_reference: String,
    max_length_delivery: f64,
    is_eligible_to_priority_order: bool,
    min_preparation_hour: i64,
    max_preparation_hour: i64,
    channels: BTreeSet<ChannelCode>,
    main_taxon: Option<TaxonCode>,
    product_taxons: Vec<ProductTaxon>,
    variants: Vec<Variant>,
    attributes: Vec<AttributeValue>,
    images: Vec<ProductImage>,
    associations: Vec<Association>,
    version: u64,
}

impl Product {
    /// Create a product that has never been saved. The code cannot change later.
    pub fn new(code: ProductCode) -> Self {
        Self {
            id: ProductId::new(),
            code,
            current_locale: None,
            fallback_locale: None,
            translations: BTreeMap::new(),
            enabled: true,
            manufacturer_reference: String::new(),
            max_length_delivery: 0.0,
            is_eligible_to_priority_order: false,
            min_preparation_hour: 0,
            max_preparation_hour: 0,
            channels: BTreeSet::new(),
            main_taxon: None,
            product_taxons: Vec::new(),
            variants: Vec::new(),
            attributes: Vec::new(),
            images: Vec::new(),
            associations: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    /// Called by repositories once the aggregate has been written.
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    // --- locale & translations -------------------------------------------

    pub fn current_locale(&self) -> Option<&LocaleCode> {
        self.current_locale.as_ref()
    }

    pub fn fallback_locale(&self) -> Option<&LocaleCode> {
        self.fallback_locale.as_ref()
    }

    pub fn set_current_locale(&mut self, locale: LocaleCode) {
        self.current_locale = Some(locale);
    }

    pub fn set_fallback_locale(&mut self, locale: LocaleCode) {
        self.fallback_locale = Some(locale);
    }

    pub fn translations(&self) -> &BTreeMap<LocaleCode, ProductTranslation> {
        &self.translations
    }

    /// Translation in the current locale, falling back to the fallback locale.
    pub fn translation(&self) -> Option<&ProductTranslation> {
        self.current_locale
            .as_ref()
            .and_then(|l| self.translations.get(l))
            .or_else(|| {
                self.fallback_locale
                    .as_ref()
                    .and_then(|l| self.translations.get(l))
            })
    }

    /// Translation in the current locale, created on first access.
    pub fn translation_mut(&mut self) -> DomainResult<&mut ProductTranslation> {
        let locale = self
            .current_locale
            .clone()
            .ok_or_else(|| DomainError::invariant("product has no current locale"))?;
        Ok(self.translations.entry(locale).or_default())
    }

    pub fn name(&self) -> Option<&str> {
        self.translation().map(|t| t.name.as_str())
    }

    pub fn slug(&self) -> Option<&str> {
        self.translation().and_then(|t| t.slug.as_deref())
    }

    // --- scalar policy fields ---------------------------------------------

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn manufacturer_reference(&self) -> &str {
        &self.manufacturer_reference
    }

    pub fn set_manufacturer_reference(&mut self, reference: impl Into<String>) {
        self.manufacturer_reference = reference.into();
    }

    pub fn max_length_delivery(&self) -> f64 {
        self.max_length_delivery
    }

    pub fn set_max_length_delivery(&mut self, length: f64) {
        self.max_length_delivery = length;
    }

    pub fn is_eligible_to_priority_order(&self) -> bool {
        self.is_eligible_to_priority_order
    }

    pub fn set_eligible_to_priority_order(&mut self, eligible: bool) {
        self.is_eligible_to_priority_order = eligible;
    }

    pub fn min_preparation_hour(&self) -> i64 {
        self.min_preparation_hour
    }

    pub fn set_min_preparation_hour(&mut self, hours: i64) {
        self.min_preparation_hour = hours;
    }

    pub fn max_preparation_hour(&self) -> i64 {
        self.max_preparation_hour
    }

    pub fn set_max_preparation_hour(&mut self, hours: i64) {
        self.max_preparation_hour = hours;
    }

    // --- channels ---------------------------------------------------------

    pub fn channels(&self) -> &BTreeSet<ChannelCode> {
        &self.channels
    }

    /// Returns `false` when the channel was already attached.
    pub fn add_channel(&mut self, channel: ChannelCode) -> bool {
        self.channels.insert(channel)
    }

    // --- taxons -----------------------------------------------------------

    pub fn main_taxon(&self) -> Option<&TaxonCode> {
        self.main_taxon.as_ref()
    }

    pub fn set_main_taxon(&mut self, taxon: TaxonCode) {
        self.main_taxon = Some(taxon);
    }

    pub fn product_taxons(&self) -> &[ProductTaxon] {
        &self.product_taxons
    }

    pub fn has_taxon(&self, taxon: &TaxonCode) -> bool {
        self.product_taxons.iter().any(|pt| &pt.taxon == taxon)
    }

    /// Link a taxon; a (product, taxon) pair can only be linked once.
    pub fn add_product_taxon(&mut self, taxon: TaxonCode) -> DomainResult<()> {
        if self.has_taxon(&taxon) {
            return Err(DomainError::invariant(format!(
                "product {} is already linked to taxon {}",
                self.code, taxon
            )));
        }
        let position = self.product_taxons.len() as u32;
        self.product_taxons.push(ProductTaxon { taxon, position });
        Ok(())
    }

    // --- variants ---------------------------------------------------------

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant_by_code(&self, code: &VariantCode) -> Option<&Variant> {
        self.variants.iter().find(|v| v.code() == code)
    }

    pub fn variant_mut(&mut self, id: VariantId) -> Option<&mut Variant> {
        find_by_id_mut(&mut self.variants, &id)
    }

    /// Attach a variant; variant codes are unique within a product.
    pub fn add_variant(&mut self, variant: Variant) -> DomainResult<()> {
        if self.variant_by_code(variant.code()).is_some() {
            return Err(DomainError::invariant(format!(
                "product {} already has a variant {}",
                self.code,
                variant.code()
            )));
        }
        self.variants.push(variant);
        Ok(())
    }

    // --- attribute values -------------------------------------------------

    pub fn attributes(&self) -> &[AttributeValue] {
        &self.attributes
    }

    /// Value for `code` in `locale` (current locale when `None`), or the value
    /// shared by all locales.
    pub fn attribute_by_code_and_locale(
        &self,
        code: &AttributeCode,
        locale: Option<&LocaleCode>,
    ) -> Option<&AttributeValue> {
        let locale = locale.or(self.current_locale.as_ref());
        self.attributes.iter().find(|value| {
            value.code() == code && (value.locale().is_none() || value.locale() == locale)
        })
    }

    pub fn attribute_mut(&mut self, id: AttributeValueId) -> Option<&mut AttributeValue> {
        find_by_id_mut(&mut self.attributes, &id)
    }

    /// Attach a value; one value per (attribute, locale).
    pub fn add_attribute(&mut self, value: AttributeValue) -> DomainResult<()> {
        let clash = self
            .attributes
            .iter()
            .any(|a| a.code() == value.code() && a.locale() == value.locale());
        if clash {
            return Err(DomainError::invariant(format!(
                "product {} already has a value for attribute {}",
                self.code,
                value.code()
            )));
        }
        self.attributes.push(value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: AttributeValueId) -> Option<AttributeValue> {
        let idx = position_by_id(&self.attributes, &id)?;
        Some(self.attributes.remove(idx))
    }

    // --- images -----------------------------------------------------------

    pub fn images(&self) -> &[ProductImage] {
        &self.images
    }

    pub fn images_by_type(&self, kind: &ImageType) -> Vec<&ProductImage> {
        self.images.iter().filter(|i| i.kind() == kind).collect()
    }

    pub fn image_mut(&mut self, id: ImageId) -> Option<&mut ProductImage> {
        find_by_id_mut(&mut self.images, &id)
    }

    /// Attach an image; one image per type slot.
    pub fn add_image(&mut self, image: ProductImage) -> DomainResult<()> {
        if self.images.iter().any(|i| i.kind() == image.kind()) {
            return Err(DomainError::invariant(format!(
                "product {} already has an image of type {}",
                self.code,
                image.kind()
            )));
        }
        self.images.push(image);
        Ok(())
    }

    pub fn remove_image(&mut self, id: ImageId) -> Option<ProductImage> {
        let idx = position_by_id(&self.images, &id)?;
        Some(self.images.remove(idx))
    }

    // --- associations -----------------------------------------------------

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn association_by_type(&self, kind: &AssociationTypeCode) -> Option<&Association> {
        self.associations
            .iter()
            .find(|a| a.association_type() == kind)
    }

    pub fn association_by_type_mut(
        &mut self,
        kind: &AssociationTypeCode,
    ) -> Option<&mut Association> {
        self.associations
            .iter_mut()
            .find(|a| a.association_type() == kind)
    }

    /// Attach an association owned by this product; one per association type.
    pub fn add_association(&mut self, association: Association) -> DomainResult<()> {
        if association.owner() != &self.code {
            return Err(DomainError::invariant(format!(
                "association owned by {} cannot be attached to {}",
                association.owner(),
                self.code
            )));
        }
        if self.association_by_type(association.association_type()).is_some() {
            return Err(DomainError::invariant(format!(
                "product {} already owns a {} association",
                self.code,
                association.association_type()
            )));
        }
        self.associations.push(association);
        Ok(())
    }
}

impl AggregateRoot for Product {
    type Id = ProductCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }

    fn version(&self) -> u64 {
        self.version
    }
}
