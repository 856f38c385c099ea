//! Property-based tests for EventService pricing.

use caterbook_shared::types::UserId;
use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::{EventService, PricingInput};
use super::types::PricingModel;
use super::types::fixtures::lead_event;
use crate::context::{Actor, CommandContext};
use crate::permissions::AppPermissions;

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn model() -> impl Strategy<Value = PricingModel> {
    prop_oneof![
        Just(PricingModel::Variable),
        Just(PricingModel::Flat),
        Just(PricingModel::Mix),
    ]
}

fn ctx() -> CommandContext {
    CommandContext::new(
        Some(Actor::new(UserId::new(), "Property Tester")),
        AppPermissions::full(),
        Utc::now(),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only the figures used by the model survive a pricing update.
    #[test]
    fn prop_pricing_model_exclusivity(
        pricing_model in model(),
        pax in 0u32..5_000,
        per_pax_price in money(),
        rent in money(),
    ) {
        let input = PricingInput { pricing_model, pax, per_pax_price, rent };
        let event = EventService::update_pricing(&lead_event(), &ctx(), input, "repriced")
            .unwrap()
            .into_aggregate();

        match pricing_model {
            PricingModel::Variable => {
                prop_assert_eq!(event.rent, Decimal::ZERO);
                prop_assert_eq!(event.per_pax_price, per_pax_price);
            }
            PricingModel::Flat => {
                prop_assert_eq!(event.per_pax_price, Decimal::ZERO);
                prop_assert_eq!(event.rent, rent);
            }
            PricingModel::Mix => {
                prop_assert_eq!(event.per_pax_price, per_pax_price);
                prop_assert_eq!(event.rent, rent);
            }
        }
    }

    /// Switching the model directly zeroes whatever the new model ignores.
    #[test]
    fn prop_set_pricing_model_zeroes_unused(
        per_pax_price in money(),
        rent in money(),
        pricing_model in model(),
    ) {
        let mut event = lead_event();
        event.per_pax_price = per_pax_price;
        event.rent = rent;
        event.set_pricing_model(pricing_model);

        if pricing_model.uses_per_pax() {
            prop_assert_eq!(event.per_pax_price, per_pax_price);
        } else {
            prop_assert_eq!(event.per_pax_price, Decimal::ZERO);
        }
        if !pricing_model.uses_rent() {
            prop_assert_eq!(event.rent, Decimal::ZERO);
        }
    }
}
