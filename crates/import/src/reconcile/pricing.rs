use catalog_core::ChannelCode;
use catalog_products::{ChannelPricing, Variant};

use crate::changes::{ChangeSet, Mutation};
use crate::coerce::parse_minor_units;
use crate::config::OriginalPricePolicy;
use crate::error::ImportError;
use crate::record::ProductRow;

/// One pricing per listed channel, priced in minor units.
pub struct ChannelPricingReconciler {
    policy: OriginalPricePolicy,
}

impl ChannelPricingReconciler {
    pub fn new(policy: OriginalPricePolicy) -> Self {
        Self { policy }
    }

    pub fn apply(
        &self,
        variant: &mut Variant,
        row: &ProductRow,
        changes: &mut ChangeSet,
    ) -> Result<(), ImportError> {
        let price = parse_minor_units(&row.price);
        let variant_code = variant.code().clone();

        for code in &row.channels {
            let channel = ChannelCode::new(code.as_str())?;
            match variant.channel_pricing_mut(&channel) {
                Some(pricing) => {
                    let before = (pricing.price(), pricing.original_price());
                    self.set_prices(pricing, price);
                    if before != (pricing.price(), pricing.original_price()) {
                        changes.record(Mutation::ChannelPricingUpdated {
                            variant: variant_code.clone(),
                            channel,
                            price,
                        });
                    }
                }
                None => {
                    let mut pricing = ChannelPricing::new(channel.clone());
                    self.set_prices(&mut pricing, price);
                    variant.add_channel_pricing(pricing)?;
                    changes.record(Mutation::ChannelPricingCreated {
                        variant: variant_code.clone(),
                        channel,
                        price,
                    });
                }
            }
        }
        Ok(())
    }

    fn set_prices(&self, pricing: &mut ChannelPricing, price: i64) {
        pricing.set_price(price);
        match self.policy {
            OriginalPricePolicy::Reset => pricing.set_original_price(Some(price)),
            OriginalPricePolicy::KeepExisting => {
                if pricing.original_price().is_none() {
                    pricing.set_original_price(Some(price));
                }
            }
        }
    }
}
