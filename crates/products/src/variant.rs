use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_core::{
    ChannelCode, ChannelPricingId, DomainError, DomainResult, Entity, LocaleCode, ValueObject,
    VariantCode, VariantId,
};

/// Physical measurements of a variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub depth: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub weight_per_length: f64,
    pub weight_per_surface: f64,
    pub weight_per_volume: f64,
}

impl ValueObject for Dimensions {}

/// Price of a variant in one channel, in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPricing {
    id: ChannelPricingId,
    channel_code: ChannelCode,
    price: i64,
    original_price: Option<i64>,
}

impl ChannelPricing {
    pub fn new(channel_code: ChannelCode) -> Self {
        Self {
            id: ChannelPricingId::new(),
            channel_code,
            price: 0,
            original_price: None,
        }
    }

    pub fn id_typed(&self) -> ChannelPricingId {
        self.id
    }

    pub fn channel_code(&self) -> &ChannelCode {
        &self.channel_code
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn original_price(&self) -> Option<i64> {
        self.original_price
    }

    pub fn set_price(&mut self, price: i64) {
        self.price = price;
    }

    pub fn set_original_price(&mut self, original_price: Option<i64>) {
        self.original_price = original_price;
    }
}

impl Entity for ChannelPricing {
    type Id = ChannelPricingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Localized fields of a variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTranslation {
    pub name: String,
}

/// Sellable variant of a product.
///
/// A variant is either measured (`dimensions`) or cut to order
/// (`is_custom_cut`); setting one state clears the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    id: VariantId,
    code: VariantCode,
    current_locale: Option<LocaleCode>,
    fallback_locale: Option<LocaleCode>,
    translations: BTreeMap<LocaleCode, VariantTranslation>,
    dimensions: Dimensions,
    is_custom_cut: bool,
    is_sample: bool,
    channel_pricings: Vec<ChannelPricing>,
}

impl Variant {
    pub fn new(code: VariantCode) -> Self {
        Self {
            id: VariantId::new(),
            code,
            current_locale: None,
            fallback_locale: None,
            translations: BTreeMap::new(),
            dimensions: Dimensions::default(),
            is_custom_cut: false,
            is_sample: false,
            channel_pricings: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> VariantId {
        self.id
    }

    pub fn code(&self) -> &VariantCode {
        &self.code
    }

    pub fn set_code(&mut self, code: VariantCode) {
        self.code = code;
    }

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

    pub fn has_translation(&self, locale: &LocaleCode) -> bool {
        self.translations.contains_key(locale)
    }

    pub fn translations(&self) -> &BTreeMap<LocaleCode, VariantTranslation> {
        &self.translations
    }

    /// Translation in the current locale, created on first access.
    pub fn translation_mut(&mut self) -> DomainResult<&mut VariantTranslation> {
        let locale = self
            .current_locale
            .clone()
            .ok_or_else(|| DomainError::invariant("variant has no current locale"))?;
        Ok(self.translations.entry(locale).or_default())
    }

    pub fn name(&self) -> Option<&str> {
        self.current_locale
            .as_ref()
            .or(self.fallback_locale.as_ref())
            .and_then(|locale| self.translations.get(locale))
            .map(|t| t.name.as_str())
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn is_custom_cut(&self) -> bool {
        self.is_custom_cut
    }

    pub fn is_sample(&self) -> bool {
        self.is_sample
    }

    /// Record measured dimensions; the variant is no longer cut to order.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
        self.is_custom_cut = false;
    }

    /// Flag the variant as cut to order. Stored dimensions are left untouched.
    pub fn mark_custom_cut(&mut self) {
        self.is_custom_cut = true;
    }

    pub fn set_sample(&mut self, is_sample: bool) {
        self.is_sample = is_sample;
    }

    pub fn channel_pricings(&self) -> &[ChannelPricing] {
        &self.channel_pricings
    }

    pub fn channel_pricing(&self, channel_code: &ChannelCode) -> Option<&ChannelPricing> {
        self.channel_pricings
            .iter()
            .find(|p| p.channel_code() == channel_code)
    }

    pub fn channel_pricing_mut(&mut self, channel_code: &ChannelCode) -> Option<&mut ChannelPricing> {
        self.channel_pricings
            .iter_mut()
            .find(|p| p.channel_code() == channel_code)
    }

    /// Attach a pricing; at most one pricing per channel.
    pub fn add_channel_pricing(&mut self, pricing: ChannelPricing) -> DomainResult<()> {
        if self.channel_pricing(pricing.channel_code()).is_some() {
            return Err(DomainError::invariant(format!(
                "variant {} already has a pricing for channel {}",
                self.code,
                pricing.channel_code()
            )));
        }
        self.channel_pricings.push(pricing);
        Ok(())
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
