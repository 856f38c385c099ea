//! Event service for creation, pricing and menu commands.
//!
//! Lifecycle transitions (confirm, lose, cancel) live in `lifecycle`; this
//! module covers everything else that edits the event document itself.

use caterbook_shared::types::{ClientId, EventId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{Event, EventState, EventStatus, MenuSelection, PricingModel};
use crate::audit::{AuditEntry, AuditTrail, ChangeSet, require_reason};
use crate::charges::{ChargeCalculator, ChargeType};
use crate::context::{CommandContext, Effect, Notification, Outcome};
use crate::error::DomainError;
use crate::ledger::lock::ensure_ledger_open;
use crate::permissions::{PermissionGate, Scope};

/// Input for booking a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventInput {
    /// The booking client.
    pub client_id: ClientId,
    /// Display name.
    pub name: String,
    /// Day of the event.
    pub event_date: NaiveDate,
    /// Pricing inputs.
    pub pricing: PricingInput,
}

/// Base-cost figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingInput {
    /// Base-cost model.
    pub pricing_model: PricingModel,
    /// Booked guests.
    pub pax: u32,
    /// Price per guest; ignored by `flat`.
    pub per_pax_price: Decimal,
    /// Flat rent; ignored by `variable`.
    pub rent: Decimal,
}

impl PricingInput {
    /// `pax × per_pax_price`.
    #[must_use]
    pub fn variable(pax: u32, per_pax_price: Decimal) -> Self {
        Self {
            pricing_model: PricingModel::Variable,
            pax,
            per_pax_price,
            rent: Decimal::ZERO,
        }
    }

    /// A fixed rent.
    #[must_use]
    pub fn flat(pax: u32, rent: Decimal) -> Self {
        Self {
            pricing_model: PricingModel::Flat,
            pax,
            per_pax_price: Decimal::ZERO,
            rent,
        }
    }

    /// Rent plus a per-guest price.
    #[must_use]
    pub fn mix(pax: u32, per_pax_price: Decimal, rent: Decimal) -> Self {
        Self {
            pricing_model: PricingModel::Mix,
            pax,
            per_pax_price,
            rent,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.per_pax_price < Decimal::ZERO {
            return Err(DomainError::NegativeValue {
                field: "perPaxPrice",
            });
        }
        if self.rent < Decimal::ZERO {
            return Err(DomainError::NegativeValue { field: "rent" });
        }
        Ok(())
    }
}

/// A replacement for one menu section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuUpdate {
    /// Main menu.
    Main(MenuSelection),
    /// Items for one live counter. An empty list removes the counter's entry.
    LiveCounter {
        /// The counter reference, matching a live charge's `liveCounterId`.
        counter_id: String,
        /// Chosen item references.
        items: Vec<String>,
    },
    /// Cocktail sub-menu.
    Cocktail(MenuSelection),
    /// Hi-tea sub-menu.
    HiTea(MenuSelection),
}

/// Stateless service for event-level commands.
pub struct EventService;

impl EventService {
    /// Book a new event as a draft lead.
    ///
    /// # Arguments
    /// * `ctx` - Caller identity, permissions and clock
    /// * `input` - Client, name, date and pricing
    ///
    /// # Returns
    /// * `Ok(Outcome)` with an `InsertEvent` effect
    /// * `Err(DomainError::PermissionDenied)` without events modify
    /// * `Err(DomainError::MissingField)` for a blank name
    /// * `Err(DomainError::NegativeValue)` for negative pricing figures
    pub fn create_event(
        ctx: &CommandContext,
        input: CreateEventInput,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingField { field: "name" });
        }
        input.pricing.validate()?;

        let now = ctx.now();
        let mut event = Event {
            id: EventId::new(),
            client_id: input.client_id,
            name: name.to_string(),
            event_date: input.event_date,
            state: EventState::Lead,
            status: EventStatus::Draft,
            pricing_model: input.pricing.pricing_model,
            pax: input.pricing.pax,
            per_pax_price: input.pricing.per_pax_price,
            rent: input.pricing.rent,
            charges: Vec::new(),
            transactions: Vec::new(),
            state_history: Vec::new(),
            history: AuditTrail::starting_with(AuditEntry::created(
                ctx.actor(),
                now,
                "Event Created",
            )),
            lost_details: None,
            menu_items: MenuSelection::new(),
            live_counter_items: MenuSelection::new(),
            cocktail_menu_items: MenuSelection::new(),
            hi_tea_menu_items: MenuSelection::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        event.set_pricing_model(input.pricing.pricing_model);

        let effects = vec![
            Effect::InsertEvent(event.id),
            Effect::Notify(Notification::EventCreated(event.id)),
        ];
        Ok(Outcome::new(event, effects))
    }

    /// Change the base-cost figures and re-derive dependent charges.
    ///
    /// Live Counter and Additional PAX charges are priced off the event's
    /// pax and per-pax price; each one whose amount moves gets its own
    /// `updated` audit entry.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without finance core modify, `EventLocked`,
    /// `ReasonRequired` or `NegativeValue`.
    pub fn update_pricing(
        event: &Event,
        ctx: &CommandContext,
        input: PricingInput,
        reason: &str,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::FinanceCore)?;
        ensure_ledger_open(event)?;
        let reason = require_reason(reason)?;
        input.validate()?;

        let mut next = event.clone();
        next.pax = input.pax;
        next.per_pax_price = input.per_pax_price;
        next.rent = input.rent;
        next.set_pricing_model(input.pricing_model);

        let mut changes = ChangeSet::new();
        changes.track("pricingModel", &event.pricing_model, &next.pricing_model);
        changes.track("pax", &event.pax, &next.pax);
        changes.track("perPaxPrice", &event.per_pax_price, &next.per_pax_price);
        changes.track("rent", &event.rent, &next.rent);
        next.history.append(AuditEntry::updated(
            ctx.actor(),
            ctx.now(),
            reason.clone(),
            changes.into_changes(),
        ));

        Self::recalculate_charges(&mut next, ctx, &reason)?;
        next.updated_at = ctx.now();

        Ok(Outcome::event_saved(
            next,
            Notification::PricingChanged(event.id),
        ))
    }

    fn recalculate_charges(
        event: &mut Event,
        ctx: &CommandContext,
        reason: &str,
    ) -> Result<(), DomainError> {
        let pricing = event.pricing_context();
        for charge in event
            .charges
            .iter_mut()
            .filter(|c| c.is_active() && c.charge_type.depends_on_pricing())
        {
            let amount = ChargeCalculator::derive_amount(&charge.to_input(), pricing)?;
            if amount == charge.amount {
                continue;
            }
            let mut changes = ChangeSet::new();
            changes.track("amount", &charge.amount, &amount);
            charge.amount = amount;
            charge.history.append(AuditEntry::updated(
                ctx.actor(),
                ctx.now(),
                format!("Recalculated after pricing change: {reason}"),
                changes.into_changes(),
            ));
        }
        Ok(())
    }

    /// Lock menu selection.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, or `InvalidStatusChange`
    /// when the menu is already finalized.
    pub fn finalize_menu(event: &Event, ctx: &CommandContext) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        ensure_ledger_open(event)?;
        if event.status == EventStatus::Finalized {
            return Err(DomainError::InvalidStatusChange(EventStatus::Finalized));
        }
        Ok(Self::set_status(
            event,
            ctx,
            EventStatus::Finalized,
            "Menu finalized".to_string(),
        ))
    }

    /// Unlock menu selection.
    ///
    /// Lost and cancelled events stay finalized.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `ReasonRequired`, or
    /// `InvalidStatusChange` when the menu is already a draft.
    pub fn reopen_menu(
        event: &Event,
        ctx: &CommandContext,
        reason: &str,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        ensure_ledger_open(event)?;
        let reason = require_reason(reason)?;
        if event.status == EventStatus::Draft {
            return Err(DomainError::InvalidStatusChange(EventStatus::Draft));
        }
        Ok(Self::set_status(event, ctx, EventStatus::Draft, reason))
    }

    fn set_status(
        event: &Event,
        ctx: &CommandContext,
        status: EventStatus,
        reason: String,
    ) -> Outcome<Event> {
        let mut changes = ChangeSet::new();
        changes.track("status", &event.status, &status);

        let mut next = event.clone();
        next.status = status;
        next.history.append(AuditEntry::updated(
            ctx.actor(),
            ctx.now(),
            reason,
            changes.into_changes(),
        ));
        next.updated_at = ctx.now();

        Outcome::event_saved(
            next,
            Notification::MenuStatusChanged {
                event_id: event.id,
                status,
            },
        )
    }

    /// Replace one section of the menu.
    ///
    /// Sub-menus are only selectable while a live charge of the matching
    /// type exists; live counters match on the charge's counter reference.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `MenuFinalized` or
    /// `SubMenuUnavailable`.
    pub fn update_menu(
        event: &Event,
        ctx: &CommandContext,
        update: MenuUpdate,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        ensure_ledger_open(event)?;
        if event.is_menu_finalized() {
            return Err(DomainError::MenuFinalized);
        }

        let mut next = event.clone();
        match update {
            MenuUpdate::Main(selection) => next.menu_items = selection,
            MenuUpdate::LiveCounter { counter_id, items } => {
                let available = event.charges_view(false).any(|c| {
                    c.charge_type == ChargeType::LiveCounter
                        && c.live_counter_id.as_deref() == Some(counter_id.as_str())
                });
                if !available {
                    return Err(DomainError::SubMenuUnavailable(
                        ChargeType::LiveCounter.to_string(),
                    ));
                }
                if items.is_empty() {
                    next.live_counter_items.remove(&counter_id);
                } else {
                    next.live_counter_items.insert(counter_id, items);
                }
            }
            MenuUpdate::Cocktail(selection) => {
                require_sub_menu(event, &ChargeType::CocktailMenu)?;
                next.cocktail_menu_items = selection;
            }
            MenuUpdate::HiTea(selection) => {
                require_sub_menu(event, &ChargeType::HiTeaMenu)?;
                next.hi_tea_menu_items = selection;
            }
        }
        next.updated_at = ctx.now();

        Ok(Outcome::event_saved(next, Notification::MenuChanged(event.id)))
    }
}

fn require_sub_menu(event: &Event, charge_type: &ChargeType) -> Result<(), DomainError> {
    if event.has_active_charge(charge_type) {
        Ok(())
    } else {
        Err(DomainError::SubMenuUnavailable(charge_type.to_string()))
    }
}
