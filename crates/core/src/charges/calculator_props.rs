//! Property-based tests for the charge calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{ChargeCalculator, PricingContext};
use super::types::ChargeInput;

/// Money from 0.00 to 100,000.00.
fn money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn pax() -> impl Strategy<Value = u32> {
    0u32..2_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No discount can push a special charge below zero.
    #[test]
    fn prop_special_amounts_never_negative(
        price in money(),
        discount in money(),
        corkage in money(),
        event_pax in pax(),
        other_pax in pax(),
    ) {
        prop_assert!(ChargeCalculator::live_counter(price, event_pax, discount) >= Decimal::ZERO);
        prop_assert!(ChargeCalculator::cocktail_menu(price, other_pax, discount, corkage) >= Decimal::ZERO);
        prop_assert!(ChargeCalculator::additional_pax(other_pax, price, discount) >= Decimal::ZERO);
        prop_assert!(ChargeCalculator::hi_tea_menu(price, discount) >= Decimal::ZERO);
    }

    /// Without a discount the live counter is exactly price × pax.
    #[test]
    fn prop_live_counter_without_discount(price in money(), event_pax in pax()) {
        prop_assert_eq!(
            ChargeCalculator::live_counter(price, event_pax, Decimal::ZERO),
            price * Decimal::from(event_pax)
        );
    }

    /// Derivation is deterministic for identical inputs.
    #[test]
    fn prop_derive_is_deterministic(
        price in money(),
        discount in money(),
        event_pax in pax(),
        per_pax in money(),
    ) {
        let ctx = PricingContext { pax: event_pax, per_pax_price: per_pax };
        let input = ChargeInput::live_counter("counter", price, discount);
        let first = ChargeCalculator::derive_amount(&input, ctx).unwrap();
        let second = ChargeCalculator::derive_amount(&input, ctx).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Additional pax follows the event rate, not a charge-level price.
    #[test]
    fn prop_additional_pax_ignores_price(
        count in pax(),
        per_pax in money(),
        bogus_price in money(),
    ) {
        let ctx = PricingContext { pax: 0, per_pax_price: per_pax };
        let mut input = ChargeInput::additional_pax(count, Decimal::ZERO);
        input.price = Some(bogus_price);
        prop_assert_eq!(
            ChargeCalculator::derive_amount(&input, ctx).unwrap(),
            Decimal::from(count) * per_pax
        );
    }
}
