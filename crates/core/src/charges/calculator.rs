//! Special charge calculator.
//!
//! Pure, deterministic formulas. Every formula clamps at zero so a large
//! discount can never produce a negative charge.

use rust_decimal::Decimal;

use super::types::{ChargeInput, ChargeType};
use crate::error::DomainError;

/// Event figures a special charge may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingContext {
    /// Booked guest count.
    pub pax: u32,
    /// Price per guest.
    pub per_pax_price: Decimal,
}

/// Stateless charge amount calculator.
pub struct ChargeCalculator;

impl ChargeCalculator {
    /// `max(0, price × eventPax − discount)`
    #[must_use]
    pub fn live_counter(price: Decimal, event_pax: u32, discount: Decimal) -> Decimal {
        clamp(price * Decimal::from(event_pax) - discount)
    }

    /// `max(0, price × cocktailPax − discount + corkage)`
    #[must_use]
    pub fn cocktail_menu(
        price: Decimal,
        cocktail_pax: u32,
        discount: Decimal,
        corkage: Decimal,
    ) -> Decimal {
        clamp(price * Decimal::from(cocktail_pax) - discount + corkage)
    }

    /// `max(0, additionalPaxCount × eventPerPaxPrice − discount)`
    #[must_use]
    pub fn additional_pax(count: u32, per_pax_price: Decimal, discount: Decimal) -> Decimal {
        clamp(Decimal::from(count) * per_pax_price - discount)
    }

    /// `max(0, price − discount)`
    #[must_use]
    pub fn hi_tea_menu(price: Decimal, discount: Decimal) -> Decimal {
        clamp(price - discount)
    }

    /// Derive the amount a charge input should carry.
    ///
    /// Special types are computed from their inputs; free-form types return
    /// the declared amount. Positivity is not enforced here: recalculation
    /// after a pricing change may legitimately reach zero.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when a required input is absent and
    /// `NegativeValue` when a money input is negative.
    pub fn derive_amount(input: &ChargeInput, ctx: PricingContext) -> Result<Decimal, DomainError> {
        let discount = non_negative("discountAmount", input.discount_amount)?.unwrap_or_default();

        match &input.charge_type {
            ChargeType::LiveCounter => {
                require_text("liveCounterId", input.live_counter_id.as_deref())?;
                let price = required_money("price", input.price)?;
                Ok(Self::live_counter(price, ctx.pax, discount))
            }
            ChargeType::CocktailMenu => {
                require_text("menuTemplateId", input.menu_template_id.as_deref())?;
                let price = required_money("price", input.price)?;
                let cocktail_pax = input
                    .cocktail_pax
                    .ok_or(DomainError::MissingField { field: "cocktailPax" })?;
                let corkage =
                    non_negative("corkageCharges", input.corkage_charges)?.unwrap_or_default();
                Ok(Self::cocktail_menu(price, cocktail_pax, discount, corkage))
            }
            ChargeType::HiTeaMenu => {
                require_text("menuTemplateId", input.menu_template_id.as_deref())?;
                let price = required_money("price", input.price)?;
                Ok(Self::hi_tea_menu(price, discount))
            }
            ChargeType::AdditionalPax => {
                let count = input.additional_pax_count.ok_or(DomainError::MissingField {
                    field: "additionalPaxCount",
                })?;
                Ok(Self::additional_pax(count, ctx.per_pax_price, discount))
            }
            ChargeType::Custom(label) => {
                require_text("type", Some(label))?;
                input
                    .amount
                    .ok_or(DomainError::MissingField { field: "amount" })
            }
        }
    }

    /// Derive the amount and require it to be strictly positive.
    ///
    /// # Errors
    ///
    /// Everything `derive_amount` returns, plus `NonPositiveAmount`.
    pub fn billable_amount(input: &ChargeInput, ctx: PricingContext) -> Result<Decimal, DomainError> {
        let amount = Self::derive_amount(input, ctx)?;
        if amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveAmount {
                field: "amount",
                amount,
            });
        }
        Ok(amount)
    }
}

fn clamp(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

fn non_negative(field: &'static str, value: Option<Decimal>) -> Result<Option<Decimal>, DomainError> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(DomainError::NegativeValue { field }),
        other => Ok(other),
    }
}

fn required_money(field: &'static str, value: Option<Decimal>) -> Result<Decimal, DomainError> {
    non_negative(field, value)?.ok_or(DomainError::MissingField { field })
}

fn require_text(field: &'static str, value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(DomainError::MissingField { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn ctx() -> PricingContext {
        PricingContext {
            pax: 100,
            per_pax_price: dec!(500),
        }
    }

    #[rstest]
    #[case(dec!(100), 100, dec!(1000), dec!(9000))]
    #[case(dec!(100), 10, dec!(5000), dec!(0))]
    #[case(dec!(0), 100, dec!(0), dec!(0))]
    fn test_live_counter(
        #[case] price: Decimal,
        #[case] pax: u32,
        #[case] discount: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(ChargeCalculator::live_counter(price, pax, discount), expected);
    }

    #[rstest]
    #[case(dec!(800), 50, dec!(2000), dec!(5000), dec!(43000))]
    #[case(dec!(10), 1, dec!(100), dec!(50), dec!(0))]
    fn test_cocktail_menu(
        #[case] price: Decimal,
        #[case] pax: u32,
        #[case] discount: Decimal,
        #[case] corkage: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(
            ChargeCalculator::cocktail_menu(price, pax, discount, corkage),
            expected
        );
    }

    #[test]
    fn test_additional_pax_uses_event_rate() {
        assert_eq!(
            ChargeCalculator::additional_pax(20, dec!(500), dec!(1000)),
            dec!(9000)
        );
    }

    #[test]
    fn test_hi_tea_menu() {
        assert_eq!(ChargeCalculator::hi_tea_menu(dec!(15000), dec!(500)), dec!(14500));
        assert_eq!(ChargeCalculator::hi_tea_menu(dec!(100), dec!(500)), dec!(0));
    }

    #[test]
    fn test_derive_live_counter_with_discount() {
        let input = ChargeInput::live_counter("pasta", dec!(100), dec!(1000));
        assert_eq!(
            ChargeCalculator::derive_amount(&input, ctx()).unwrap(),
            dec!(9000)
        );
    }

    #[test]
    fn test_declared_amount_is_ignored_for_special_types() {
        let mut input = ChargeInput::hi_tea_menu("t1", dec!(3000), dec!(0));
        input.amount = Some(dec!(1));
        assert_eq!(
            ChargeCalculator::derive_amount(&input, ctx()).unwrap(),
            dec!(3000)
        );
    }

    #[test]
    fn test_custom_requires_amount() {
        let mut input = ChargeInput::custom("Decor", dec!(1));
        input.amount = None;
        assert!(matches!(
            ChargeCalculator::derive_amount(&input, ctx()),
            Err(DomainError::MissingField { field: "amount" })
        ));
    }

    #[test]
    fn test_custom_requires_label() {
        let input = ChargeInput::custom("   ", dec!(100));
        assert!(matches!(
            ChargeCalculator::derive_amount(&input, ctx()),
            Err(DomainError::MissingField { field: "type" })
        ));
    }

    #[test]
    fn test_billable_rejects_zero_and_negative() {
        let zero = ChargeInput::custom("Decor", dec!(0));
        assert!(matches!(
            ChargeCalculator::billable_amount(&zero, ctx()),
            Err(DomainError::NonPositiveAmount { .. })
        ));
        let negative = ChargeInput::custom("Decor", dec!(-10));
        assert!(matches!(
            ChargeCalculator::billable_amount(&negative, ctx()),
            Err(DomainError::NonPositiveAmount { .. })
        ));
        let clamped = ChargeInput::live_counter("pasta", dec!(1), dec!(1000));
        assert!(matches!(
            ChargeCalculator::billable_amount(&clamped, ctx()),
            Err(DomainError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn test_missing_special_inputs() {
        let mut input = ChargeInput::live_counter("pasta", dec!(100), dec!(0));
        input.live_counter_id = None;
        assert!(matches!(
            ChargeCalculator::derive_amount(&input, ctx()),
            Err(DomainError::MissingField {
                field: "liveCounterId"
            })
        ));

        let mut input = ChargeInput::cocktail_menu("t1", dec!(100), 10, dec!(0), dec!(0));
        input.cocktail_pax = None;
        assert!(matches!(
            ChargeCalculator::derive_amount(&input, ctx()),
            Err(DomainError::MissingField {
                field: "cocktailPax"
            })
        ));
    }

    #[test]
    fn test_negative_discount_rejected() {
        let input = ChargeInput::hi_tea_menu("t1", dec!(100), dec!(-1));
        assert!(matches!(
            ChargeCalculator::derive_amount(&input, ctx()),
            Err(DomainError::NegativeValue {
                field: "discountAmount"
            })
        ));
    }
}
