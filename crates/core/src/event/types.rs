//! Event domain types.

use caterbook_shared::types::{ChargeId, ClientId, EventId, TransactionId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::audit::AuditTrail;
use crate::charges::{Charge, ChargeType, PricingContext};
use crate::ledger::Transaction;

/// Menu selection: category reference to the chosen item references.
pub type MenuSelection = BTreeMap<String, Vec<String>>;

/// Commercial lifecycle stage.
///
/// The valid transitions are:
/// - Lead → Confirmed
/// - Lead → Lost
/// - Confirmed → Lost
/// - Confirmed → Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    /// Enquiry, not yet booked.
    Lead,
    /// Booked.
    Confirmed,
    /// Enquiry did not convert (terminal).
    Lost,
    /// Booking was cancelled (terminal).
    Cancelled,
}

impl EventState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Confirmed => "confirmed",
            Self::Lost => "lost",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lead" => Some(Self::Lead),
            "confirmed" => Some(Self::Confirmed),
            "lost" => Some(Self::Lost),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition or ledger edit is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Lost | Self::Cancelled)
    }

    /// Returns true if the event counts toward client billing.
    #[must_use]
    pub fn is_billable(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Menu-selection lock, independent of `EventState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Menu is still being chosen.
    Draft,
    /// Menu is locked.
    Finalized,
}

impl EventStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the base cost is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingModel {
    /// `pax × perPaxPrice`
    Variable,
    /// `rent`
    Flat,
    /// `rent + pax × perPaxPrice`
    Mix,
}

impl PricingModel {
    /// Returns the string representation of the model.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Flat => "flat",
            Self::Mix => "mix",
        }
    }

    /// Whether `perPaxPrice` is meaningful.
    #[must_use]
    pub fn uses_per_pax(&self) -> bool {
        matches!(self, Self::Variable | Self::Mix)
    }

    /// Whether `rent` is meaningful.
    #[must_use]
    pub fn uses_rent(&self) -> bool {
        matches!(self, Self::Flat | Self::Mix)
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata only valid while the event is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostDetails {
    /// Code from the configured reason list.
    pub reason_code: String,
    /// Competitor the event was lost to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor: Option<String>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the event was marked lost.
    pub lost_at: DateTime<Utc>,
}

/// One commercial state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeEntry {
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Who did it.
    pub actor_id: UserId,
    /// Display name of the actor.
    pub actor_name: String,
    /// Previous state.
    pub from_state: EventState,
    /// New state.
    pub to_state: EventState,
    /// Human-readable reason, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Root aggregate for one catering engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event ID.
    pub id: EventId,
    /// The client who booked it.
    pub client_id: ClientId,
    /// Display name (e.g. "Sharma wedding reception").
    pub name: String,
    /// Day of the event.
    pub event_date: NaiveDate,
    /// Commercial lifecycle stage.
    pub state: EventState,
    /// Menu lock.
    pub status: EventStatus,
    /// Base-cost model.
    pub pricing_model: PricingModel,
    /// Booked guests.
    pub pax: u32,
    /// Price per guest.
    pub per_pax_price: Decimal,
    /// Flat rent.
    pub rent: Decimal,
    /// Additional charges, including soft-deleted ones.
    #[serde(default)]
    pub charges: Vec<Charge>,
    /// Payments and expenses, including soft-deleted ones.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Commercial state history.
    #[serde(default)]
    pub state_history: Vec<StateChangeEntry>,
    /// Audit trail for event-level edits (pricing, menu lock).
    #[serde(default)]
    pub history: AuditTrail,
    /// Only present while `state = lost`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lost_details: Option<LostDetails>,
    /// Main menu selection.
    #[serde(default)]
    pub menu_items: MenuSelection,
    /// Live counter reference to its chosen items.
    #[serde(default)]
    pub live_counter_items: BTreeMap<String, Vec<String>>,
    /// Cocktail sub-menu selection.
    #[serde(default)]
    pub cocktail_menu_items: MenuSelection,
    /// Hi-tea sub-menu selection.
    #[serde(default)]
    pub hi_tea_menu_items: MenuSelection,
    /// Store version this snapshot was read at.
    #[serde(default)]
    pub version: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Sets the pricing model, zeroing whichever figure it does not use.
    pub fn set_pricing_model(&mut self, model: PricingModel) {
        self.pricing_model = model;
        if !model.uses_per_pax() {
            self.per_pax_price = Decimal::ZERO;
        }
        if !model.uses_rent() {
            self.rent = Decimal::ZERO;
        }
    }

    /// Figures special charges are computed from.
    #[must_use]
    pub fn pricing_context(&self) -> PricingContext {
        PricingContext {
            pax: self.pax,
            per_pax_price: self.per_pax_price,
        }
    }

    /// Returns true if the event is lost or cancelled.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns true if the menu is finalized.
    #[must_use]
    pub fn is_menu_finalized(&self) -> bool {
        self.status == EventStatus::Finalized
    }

    /// Charges, optionally including soft-deleted ones.
    pub fn charges_view(&self, include_archived: bool) -> impl Iterator<Item = &Charge> {
        self.charges
            .iter()
            .filter(move |c| include_archived || c.is_active())
    }

    /// Transactions, optionally including soft-deleted ones.
    pub fn transactions_view(&self, include_archived: bool) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| include_archived || t.is_active())
    }

    /// A live (non-deleted) charge by ID.
    #[must_use]
    pub fn active_charge(&self, id: ChargeId) -> Option<&Charge> {
        self.charges.iter().find(|c| c.id == id && c.is_active())
    }

    /// A live (non-deleted) transaction by ID.
    #[must_use]
    pub fn active_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id && t.is_active())
    }

    /// Returns true if a live charge of `charge_type` exists.
    #[must_use]
    pub fn has_active_charge(&self, charge_type: &ChargeType) -> bool {
        self.charges_view(false).any(|c| &c.charge_type == charge_type)
    }
}
