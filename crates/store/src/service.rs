//! Booking orchestration.
//!
//! `BookingService` loads an aggregate, runs a pure command from
//! `caterbook-core` against it, and applies the returned effects: versioned
//! writes through the `Repository`, then notifications on a broadcast
//! channel. Every outcome is logged with the acting user.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use caterbook_core::charges::ChargeInput;
use caterbook_core::client::{Client, ClientProfileInput, ClientService};
use caterbook_core::event::{CreateEventInput, Event, EventService, MenuUpdate, PricingInput};
use caterbook_core::finance::{ClientBalanceView, FinancialAggregator, FinancialView};
use caterbook_core::ledger::{LedgerService, TransactionInput};
use caterbook_core::lifecycle::{LifecycleService, LostReasonCatalog, TransitionRequest};
use caterbook_core::{CommandContext, DomainError, Effect, Notification, Outcome};
use caterbook_shared::types::{ChargeId, ClientId, EventId, TransactionId};
use caterbook_shared::{AppError, AppResult, LifecycleConfig};

use crate::document::Collection;
use crate::error::StoreError;
use crate::repository::{Aggregate, Repository};
use crate::store::{DocumentStore, SnapshotCallback, Subscription};

const NOTIFICATION_CAPACITY: usize = 256;

/// Entry point for every booking operation.
pub struct BookingService {
    repository: Repository,
    catalog: LostReasonCatalog,
    notifications: broadcast::Sender<Notification>,
}

impl BookingService {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, lifecycle: &LifecycleConfig) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            repository: Repository::new(store),
            catalog: LostReasonCatalog::from_config(lifecycle),
            notifications,
        }
    }

    /// Receive notifications published after successful writes.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Lost-reason codes accepted by `transition`.
    #[must_use]
    pub fn lost_reasons(&self) -> &LostReasonCatalog {
        &self.catalog
    }

    /// Register for raw document snapshots of a collection.
    pub fn subscribe(&self, collection: Collection, callback: SnapshotCallback) -> Subscription {
        self.repository.store().subscribe(collection, callback)
    }

    /// Apply the effects of a command outcome.
    ///
    /// Writes run in order; notifications are only published once every
    /// write has succeeded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::VersionConflict` if the aggregate changed since it
    /// was read, or any other store failure.
    pub async fn commit<T: Aggregate>(&self, outcome: Outcome<T>) -> Result<T, StoreError> {
        let Outcome {
            mut aggregate,
            effects,
        } = outcome;

        let mut pending = Vec::new();
        for effect in effects {
            match effect {
                Effect::InsertEvent(_) | Effect::InsertClient(_) => {
                    let version = self.repository.insert(&aggregate).await?;
                    aggregate.set_version(version);
                }
                Effect::PersistEvent {
                    expected_version, ..
                }
                | Effect::PersistClient {
                    expected_version, ..
                } => {
                    let version = self
                        .repository
                        .replace(&aggregate, expected_version)
                        .await?;
                    aggregate.set_version(version);
                }
                Effect::Notify(notification) => pending.push(notification),
            }
        }

        for notification in pending {
            debug!(?notification, "Publishing notification");
            // No receivers is not an error.
            let _ = self.notifications.send(notification);
        }
        Ok(aggregate)
    }

    // ========== Events ==========

    /// Book a new lead for an existing client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the client does not exist, or the
    /// command's validation error.
    pub async fn create_event(
        &self,
        ctx: &CommandContext,
        input: CreateEventInput,
    ) -> AppResult<Event> {
        const OPERATION: &str = "create_event";
        let client_id = input.client_id;
        self.repository
            .load::<Client>(&client_id.to_string())
            .await
            .map_err(|e| rejected(OPERATION, e))?;

        let outcome = EventService::create_event(ctx, input).map_err(|e| rejected(OPERATION, e))?;
        let event = self
            .commit(outcome)
            .await
            .map_err(|e| rejected(OPERATION, e))?;

        info!(
            event_id = %event.id,
            client_id = %client_id,
            actor_id = %ctx.actor().id,
            "Event created"
        );
        Ok(event)
    }

    /// Fetch an event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such event is stored.
    pub async fn event(&self, event_id: EventId) -> AppResult<Event> {
        Ok(self.repository.load(&event_id.to_string()).await?)
    }

    /// Every stored event of a client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub async fn events_for_client(&self, client_id: ClientId) -> AppResult<Vec<Event>> {
        let events: Vec<Event> = self.repository.list().await?;
        Ok(events
            .into_iter()
            .filter(|event| event.client_id == client_id)
            .collect())
    }

    /// Financial summary of an event, filtered to what the caller may see.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such event is stored.
    pub async fn event_financials(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
    ) -> AppResult<FinancialView> {
        let event = self.event(event_id).await?;
        let totals = FinancialAggregator::summarize(&event);
        Ok(FinancialView::project(&totals, ctx.permissions()))
    }

    /// Move an event through the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn transition(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        request: TransitionRequest,
    ) -> AppResult<Event> {
        let target = request.target();
        let event = self
            .run_event(ctx, event_id, "transition", |event| {
                LifecycleService::transition(event, ctx, &self.catalog, request)
            })
            .await?;
        info!(event_id = %event.id, to = %target, "Event state changed");
        Ok(event)
    }

    /// Replace the pricing figures of an event.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn update_pricing(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        input: PricingInput,
        reason: &str,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "update_pricing", |event| {
            EventService::update_pricing(event, ctx, input, reason)
        })
        .await
    }

    /// Finalize the menu.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn finalize_menu(&self, ctx: &CommandContext, event_id: EventId) -> AppResult<Event> {
        self.run_event(ctx, event_id, "finalize_menu", |event| {
            EventService::finalize_menu(event, ctx)
        })
        .await
    }

    /// Reopen a finalized menu.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn reopen_menu(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        reason: &str,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "reopen_menu", |event| {
            EventService::reopen_menu(event, ctx, reason)
        })
        .await
    }

    /// Replace one set of menu selections.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn update_menu(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        update: MenuUpdate,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "update_menu", |event| {
            EventService::update_menu(event, ctx, update)
        })
        .await
    }

    // ========== Event ledger ==========

    /// Add a charge to an event.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn create_charge(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        input: ChargeInput,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "create_charge", |event| {
            LedgerService::create_charge(event, ctx, input)
        })
        .await
    }

    /// Edit a charge.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn update_charge(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        charge_id: ChargeId,
        input: ChargeInput,
        reason: &str,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "update_charge", |event| {
            LedgerService::update_charge(event, ctx, charge_id, input, reason)
        })
        .await
    }

    /// Soft-delete a charge.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn delete_charge(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        charge_id: ChargeId,
        reason: &str,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "delete_charge", |event| {
            LedgerService::delete_charge(event, ctx, charge_id, reason)
        })
        .await
    }

    /// Record a payment or expense against an event.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn create_transaction(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        input: TransactionInput,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "create_transaction", |event| {
            LedgerService::create_transaction(event, ctx, input)
        })
        .await
    }

    /// Edit an event transaction.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn update_transaction(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        transaction_id: TransactionId,
        input: TransactionInput,
        reason: &str,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "update_transaction", |event| {
            LedgerService::update_transaction(event, ctx, transaction_id, input, reason)
        })
        .await
    }

    /// Soft-delete an event transaction.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn delete_transaction(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        transaction_id: TransactionId,
        reason: &str,
    ) -> AppResult<Event> {
        self.run_event(ctx, event_id, "delete_transaction", |event| {
            LedgerService::delete_transaction(event, ctx, transaction_id, reason)
        })
        .await
    }

    // ========== Clients ==========

    /// Register a client.
    ///
    /// # Errors
    ///
    /// Returns the command's validation error or a store failure.
    pub async fn create_client(
        &self,
        ctx: &CommandContext,
        input: ClientProfileInput,
    ) -> AppResult<Client> {
        const OPERATION: &str = "create_client";
        let outcome = ClientService::create_client(ctx, input).map_err(|e| rejected(OPERATION, e))?;
        let client = self
            .commit(outcome)
            .await
            .map_err(|e| rejected(OPERATION, e))?;

        info!(client_id = %client.id, actor_id = %ctx.actor().id, "Client created");
        Ok(client)
    }

    /// Fetch a client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such client is stored.
    pub async fn client(&self, client_id: ClientId) -> AppResult<Client> {
        Ok(self.repository.load(&client_id.to_string()).await?)
    }

    /// Edit a client's profile.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn update_client_profile(
        &self,
        ctx: &CommandContext,
        client_id: ClientId,
        input: ClientProfileInput,
        reason: &str,
    ) -> AppResult<Client> {
        self.run_client(ctx, client_id, "update_client_profile", |client| {
            ClientService::update_profile(client, ctx, input, reason)
        })
        .await
    }

    /// Record an advance or refund on the client ledger.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn create_client_transaction(
        &self,
        ctx: &CommandContext,
        client_id: ClientId,
        input: TransactionInput,
    ) -> AppResult<Client> {
        self.run_client(ctx, client_id, "create_client_transaction", |client| {
            ClientService::create_transaction(client, ctx, input)
        })
        .await
    }

    /// Edit a client transaction.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn update_client_transaction(
        &self,
        ctx: &CommandContext,
        client_id: ClientId,
        transaction_id: TransactionId,
        input: TransactionInput,
        reason: &str,
    ) -> AppResult<Client> {
        self.run_client(ctx, client_id, "update_client_transaction", |client| {
            ClientService::update_transaction(client, ctx, transaction_id, input, reason)
        })
        .await
    }

    /// Soft-delete a client transaction.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or `AppError::Conflict` on a stale write.
    pub async fn delete_client_transaction(
        &self,
        ctx: &CommandContext,
        client_id: ClientId,
        transaction_id: TransactionId,
        reason: &str,
    ) -> AppResult<Client> {
        self.run_client(ctx, client_id, "delete_client_transaction", |client| {
            ClientService::delete_transaction(client, ctx, transaction_id, reason)
        })
        .await
    }

    /// What the client has been billed against what they have paid,
    /// filtered to what the caller may see.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such client is stored.
    pub async fn client_balance(
        &self,
        ctx: &CommandContext,
        client_id: ClientId,
    ) -> AppResult<ClientBalanceView> {
        let client = self.client(client_id).await?;
        let events = self.events_for_client(client_id).await?;
        let balance = FinancialAggregator::client_balance(&client, &events);
        Ok(ClientBalanceView::project(&balance, ctx.permissions()))
    }

    // ========== Plumbing ==========

    async fn run_event<F>(
        &self,
        ctx: &CommandContext,
        event_id: EventId,
        operation: &'static str,
        command: F,
    ) -> AppResult<Event>
    where
        F: FnOnce(&Event) -> Result<Outcome<Event>, DomainError> + Send,
    {
        let event: Event = self
            .repository
            .load(&event_id.to_string())
            .await
            .map_err(|e| rejected(operation, e))?;
        let outcome = command(&event).map_err(|e| rejected(operation, e))?;
        let saved = self
            .commit(outcome)
            .await
            .map_err(|e| rejected(operation, e))?;

        info!(
            event_id = %saved.id,
            actor_id = %ctx.actor().id,
            operation,
            version = saved.version,
            "Event updated"
        );
        Ok(saved)
    }

    async fn run_client<F>(
        &self,
        ctx: &CommandContext,
        client_id: ClientId,
        operation: &'static str,
        command: F,
    ) -> AppResult<Client>
    where
        F: FnOnce(&Client) -> Result<Outcome<Client>, DomainError> + Send,
    {
        let client: Client = self
            .repository
            .load(&client_id.to_string())
            .await
            .map_err(|e| rejected(operation, e))?;
        let outcome = command(&client).map_err(|e| rejected(operation, e))?;
        let saved = self
            .commit(outcome)
            .await
            .map_err(|e| rejected(operation, e))?;

        info!(
            client_id = %saved.id,
            actor_id = %ctx.actor().id,
            operation,
            version = saved.version,
            "Client updated"
        );
        Ok(saved)
    }
}

fn rejected(operation: &'static str, err: impl Into<AppError>) -> AppError {
    let err = err.into();
    warn!(
        operation,
        error_code = err.error_code(),
        error = %err,
        "Operation rejected"
    );
    err
}
