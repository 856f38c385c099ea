//! Command context and command outcomes.
//!
//! Commands are pure functions: they read an aggregate, validate the request
//! against the `CommandContext`, and return a new aggregate together with the
//! side effects the caller must carry out (persist, notify).

use caterbook_shared::types::{ChargeId, ClientId, EventId, TransactionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditAction;
use crate::client::Client;
use crate::error::DomainError;
use crate::event::{Event, EventState, EventStatus};
use crate::permissions::AppPermissions;

/// The staff member performing a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Stable identifier used for attribution.
    pub id: UserId,
    /// Display name recorded next to the identifier.
    pub name: String,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Everything a command needs to know about who is calling and when.
#[derive(Debug, Clone)]
pub struct CommandContext {
    actor: Actor,
    permissions: AppPermissions,
    now: DateTime<Utc>,
}

impl CommandContext {
    /// Builds a context, failing closed when no identity is available.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthenticated` if `actor` is `None` or has a blank name.
    pub fn new(
        actor: Option<Actor>,
        permissions: AppPermissions,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let actor = actor
            .filter(|a| !a.name.trim().is_empty())
            .ok_or(DomainError::Unauthenticated)?;
        Ok(Self {
            actor,
            permissions,
            now,
        })
    }

    /// The acting staff member.
    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The caller's resolved permission snapshot.
    #[must_use]
    pub fn permissions(&self) -> &AppPermissions {
        &self.permissions
    }

    /// Timestamp stamped on every audit and state entry of this command.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// A ledger line touched by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEntryRef {
    /// An additional charge.
    Charge(ChargeId),
    /// A payment or expense.
    Transaction(TransactionId),
}

/// Who owns a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOwner {
    /// Per-event ledger.
    Event(EventId),
    /// Client-level advance ledger.
    Client(ClientId),
}

/// Something observers may want to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A new event was booked as a lead.
    EventCreated(EventId),
    /// The commercial state moved.
    StateChanged {
        /// The event.
        event_id: EventId,
        /// Previous state.
        from: EventState,
        /// New state.
        to: EventState,
    },
    /// Menu was finalized or reopened.
    MenuStatusChanged {
        /// The event.
        event_id: EventId,
        /// New status.
        status: EventStatus,
    },
    /// Menu selections were replaced.
    MenuChanged(EventId),
    /// Pricing figures changed.
    PricingChanged(EventId),
    /// A ledger entry was created, updated or deleted.
    LedgerChanged {
        /// The owning aggregate.
        owner: LedgerOwner,
        /// The entry.
        entry: LedgerEntryRef,
        /// What happened to it.
        action: AuditAction,
    },
    /// A client profile was created or edited.
    ClientChanged(ClientId),
}

/// Side effects the caller must apply after a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Insert a newly created event document.
    InsertEvent(EventId),
    /// Replace an event document if the stored version still matches.
    PersistEvent {
        /// The event.
        event_id: EventId,
        /// Version the command read.
        expected_version: u64,
    },
    /// Insert a newly created client document.
    InsertClient(ClientId),
    /// Replace a client document if the stored version still matches.
    PersistClient {
        /// The client.
        client_id: ClientId,
        /// Version the command read.
        expected_version: u64,
    },
    /// Publish a notification.
    Notify(Notification),
}

/// New aggregate plus the effects produced by a command.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    /// The updated aggregate.
    pub aggregate: T,
    /// Effects in the order they should be applied.
    pub effects: Vec<Effect>,
}

impl<T> Outcome<T> {
    /// Creates an outcome.
    #[must_use]
    pub fn new(aggregate: T, effects: Vec<Effect>) -> Self {
        Self { aggregate, effects }
    }

    /// Consumes the outcome, returning the aggregate.
    #[must_use]
    pub fn into_aggregate(self) -> T {
        self.aggregate
    }

    /// Notifications carried by this outcome.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.effects.iter().filter_map(|e| match e {
            Effect::Notify(n) => Some(n),
            _ => None,
        })
    }
}

impl Outcome<Event> {
    /// Outcome replacing a stored event, followed by one notification.
    pub(crate) fn event_saved(event: Event, notification: Notification) -> Self {
        let effects = vec![
            Effect::PersistEvent {
                event_id: event.id,
                expected_version: event.version,
            },
            Effect::Notify(notification),
        ];
        Self::new(event, effects)
    }
}

impl Outcome<Client> {
    /// Outcome replacing a stored client, followed by one notification.
    pub(crate) fn client_saved(client: Client, notification: Notification) -> Self {
        let effects = vec![
            Effect::PersistClient {
                client_id: client.id,
                expected_version: client.version,
            },
            Effect::Notify(notification),
        ];
        Self::new(client, effects)
    }
}
