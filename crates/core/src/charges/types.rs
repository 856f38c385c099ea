//! Charge domain types.

use caterbook_shared::types::ChargeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audit::AuditTrail;

/// Charge type: one of the reserved special types or a free-form label.
///
/// Stored as its display string so documents stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargeType {
    /// Live counter priced per event guest.
    LiveCounter,
    /// Cocktail menu priced per cocktail guest plus corkage.
    CocktailMenu,
    /// Flat-priced hi-tea menu.
    HiTeaMenu,
    /// Extra guests priced at the event's per-pax rate.
    AdditionalPax,
    /// Any other label; amount is entered directly.
    Custom(String),
}

impl ChargeType {
    /// Parses a stored label. Reserved names match case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "live counter" => Self::LiveCounter,
            "cocktail menu" => Self::CocktailMenu,
            "hi-tea menu" => Self::HiTeaMenu,
            "additional pax" => Self::AdditionalPax,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// Returns the stored label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::LiveCounter => "Live Counter",
            Self::CocktailMenu => "Cocktail Menu",
            Self::HiTeaMenu => "Hi-Tea Menu",
            Self::AdditionalPax => "Additional PAX",
            Self::Custom(label) => label,
        }
    }

    /// Returns true if the amount is formula-derived.
    #[must_use]
    pub fn is_special(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Returns true if a live charge of this type unlocks a menu section.
    #[must_use]
    pub fn gates_menu(&self) -> bool {
        matches!(self, Self::LiveCounter | Self::CocktailMenu | Self::HiTeaMenu)
    }

    /// Returns true if the amount depends on the event's pax or per-pax price.
    #[must_use]
    pub fn depends_on_pricing(&self) -> bool {
        matches!(self, Self::LiveCounter | Self::AdditionalPax)
    }
}

impl From<String> for ChargeType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ChargeType> for String {
    fn from(t: ChargeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied charge data for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeInput {
    /// Charge type.
    pub charge_type: ChargeType,
    /// Declared amount; ignored for special types.
    pub amount: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Unit price (special types except Additional PAX).
    pub price: Option<Decimal>,
    /// Discount subtracted before clamping at zero.
    pub discount_amount: Option<Decimal>,
    /// Live counter catalog reference.
    pub live_counter_id: Option<String>,
    /// Cocktail or hi-tea menu template reference.
    pub menu_template_id: Option<String>,
    /// Guests served by the cocktail menu.
    pub cocktail_pax: Option<u32>,
    /// Corkage added to the cocktail menu.
    pub corkage_charges: Option<Decimal>,
    /// Guests beyond the booked pax.
    pub additional_pax_count: Option<u32>,
}

impl ChargeInput {
    /// Input for a free-form charge with a declared amount.
    #[must_use]
    pub fn custom(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::empty(ChargeType::parse(&label.into()))
        }
    }

    /// Input for a live counter charge.
    #[must_use]
    pub fn live_counter(counter_id: impl Into<String>, price: Decimal, discount: Decimal) -> Self {
        Self {
            price: Some(price),
            discount_amount: Some(discount),
            live_counter_id: Some(counter_id.into()),
            ..Self::empty(ChargeType::LiveCounter)
        }
    }

    /// Input for a cocktail menu charge.
    #[must_use]
    pub fn cocktail_menu(
        template_id: impl Into<String>,
        price: Decimal,
        cocktail_pax: u32,
        discount: Decimal,
        corkage: Decimal,
    ) -> Self {
        Self {
            price: Some(price),
            discount_amount: Some(discount),
            menu_template_id: Some(template_id.into()),
            cocktail_pax: Some(cocktail_pax),
            corkage_charges: Some(corkage),
            ..Self::empty(ChargeType::CocktailMenu)
        }
    }

    /// Input for a hi-tea menu charge.
    #[must_use]
    pub fn hi_tea_menu(template_id: impl Into<String>, price: Decimal, discount: Decimal) -> Self {
        Self {
            price: Some(price),
            discount_amount: Some(discount),
            menu_template_id: Some(template_id.into()),
            ..Self::empty(ChargeType::HiTeaMenu)
        }
    }

    /// Input for an additional pax charge.
    #[must_use]
    pub fn additional_pax(count: u32, discount: Decimal) -> Self {
        Self {
            discount_amount: Some(discount),
            additional_pax_count: Some(count),
            ..Self::empty(ChargeType::AdditionalPax)
        }
    }

    fn empty(charge_type: ChargeType) -> Self {
        Self {
            charge_type,
            amount: None,
            notes: None,
            price: None,
            discount_amount: None,
            live_counter_id: None,
            menu_template_id: None,
            cocktail_pax: None,
            corkage_charges: None,
            additional_pax_count: None,
        }
    }

    /// Sets notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A billable line item beyond the base cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    /// Charge ID.
    pub id: ChargeId,
    /// Charge type label.
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    /// Billed amount; derived for special types.
    pub amount: Decimal,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
    /// Audit trail for this line.
    #[serde(default)]
    pub history: AuditTrail,
    /// Unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<Decimal>,
    /// Live counter reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_counter_id: Option<String>,
    /// Menu template reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_template_id: Option<String>,
    /// Cocktail guest count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cocktail_pax: Option<u32>,
    /// Corkage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corkage_charges: Option<Decimal>,
    /// Extra guest count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_pax_count: Option<u32>,
}

impl Charge {
    /// Builds a live charge from validated input and its derived amount.
    #[must_use]
    pub fn from_input(id: ChargeId, input: ChargeInput, amount: Decimal, history: AuditTrail) -> Self {
        Self {
            id,
            charge_type: input.charge_type,
            amount,
            notes: input.notes,
            is_deleted: false,
            history,
            price: input.price,
            discount_amount: input.discount_amount,
            live_counter_id: input.live_counter_id,
            menu_template_id: input.menu_template_id,
            cocktail_pax: input.cocktail_pax,
            corkage_charges: input.corkage_charges,
            additional_pax_count: input.additional_pax_count,
        }
    }

    /// The charge's current values as an input, for recalculation.
    #[must_use]
    pub fn to_input(&self) -> ChargeInput {
        ChargeInput {
            charge_type: self.charge_type.clone(),
            amount: Some(self.amount),
            notes: self.notes.clone(),
            price: self.price,
            discount_amount: self.discount_amount,
            live_counter_id: self.live_counter_id.clone(),
            menu_template_id: self.menu_template_id.clone(),
            cocktail_pax: self.cocktail_pax,
            corkage_charges: self.corkage_charges,
            additional_pax_count: self.additional_pax_count,
        }
    }

    /// Returns true if the charge still counts toward totals.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
