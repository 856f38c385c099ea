//! Client profile and client-ledger commands.
//!
//! The client ledger holds advance payments taken before (or instead of)
//! per-event billing. It is never locked by an event's state.

use caterbook_shared::types::{ClientId, TransactionId};

use super::types::{Client, ClientProfileInput};
use crate::audit::{AuditAction, AuditEntry, AuditTrail, ChangeSet, require_reason};
use crate::context::{CommandContext, Effect, LedgerEntryRef, LedgerOwner, Notification, Outcome};
use crate::error::DomainError;
use crate::ledger::{TransactionInput, transactions};
use crate::permissions::{PermissionGate, Scope};

/// Stateless service for client commands.
pub struct ClientService;

impl ClientService {
    /// Register a new client.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `MissingField` for a blank name.
    pub fn create_client(
        ctx: &CommandContext,
        input: ClientProfileInput,
    ) -> Result<Outcome<Client>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        let input = input.normalized();
        if input.name.is_empty() {
            return Err(DomainError::MissingField { field: "name" });
        }

        let now = ctx.now();
        let client = Client {
            id: ClientId::new(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            notes: input.notes,
            history: AuditTrail::starting_with(AuditEntry::created(
                ctx.actor(),
                now,
                "Client Created",
            )),
            transactions: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let effects = vec![
            Effect::InsertClient(client.id),
            Effect::Notify(Notification::ClientChanged(client.id)),
        ];
        Ok(Outcome::new(client, effects))
    }

    /// Edit the profile, recording the changed fields.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `ReasonRequired` or `MissingField`.
    pub fn update_profile(
        client: &Client,
        ctx: &CommandContext,
        input: ClientProfileInput,
        reason: &str,
    ) -> Result<Outcome<Client>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        let reason = require_reason(reason)?;
        let input = input.normalized();
        if input.name.is_empty() {
            return Err(DomainError::MissingField { field: "name" });
        }

        let mut changes = ChangeSet::new();
        changes.track("name", &client.name, &input.name);
        changes.track_opt("phone", client.phone.as_ref(), input.phone.as_ref());
        changes.track_opt("email", client.email.as_ref(), input.email.as_ref());
        changes.track_opt("notes", client.notes.as_ref(), input.notes.as_ref());

        let mut next = client.clone();
        next.name = input.name;
        next.phone = input.phone;
        next.email = input.email;
        next.notes = input.notes;
        next.history.append(AuditEntry::updated(
            ctx.actor(),
            ctx.now(),
            reason,
            changes.into_changes(),
        ));
        next.updated_at = ctx.now();

        Ok(Outcome::client_saved(
            next,
            Notification::ClientChanged(client.id),
        ))
    }

    /// Record a client-level payment or expense.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or a validation error.
    pub fn create_transaction(
        client: &Client,
        ctx: &CommandContext,
        input: TransactionInput,
    ) -> Result<Outcome<Client>, DomainError> {
        transactions::authorize(ctx, input.kind)?;

        let mut next = client.clone();
        let id = transactions::insert(&mut next.transactions, ctx, input)?;
        next.updated_at = ctx.now();

        Ok(ledger_outcome(next, id, AuditAction::Created))
    }

    /// Replace a client-level transaction's values.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `ReasonRequired`, `TransactionNotFound`
    /// or a validation error.
    pub fn update_transaction(
        client: &Client,
        ctx: &CommandContext,
        id: TransactionId,
        input: TransactionInput,
        reason: &str,
    ) -> Result<Outcome<Client>, DomainError> {
        transactions::authorize(ctx, input.kind)?;

        let mut next = client.clone();
        transactions::amend(&mut next.transactions, ctx, id, input, reason)?;
        next.updated_at = ctx.now();

        Ok(ledger_outcome(next, id, AuditAction::Updated))
    }

    /// Soft-delete a client-level transaction.
    ///
    /// # Errors
    ///
    /// Returns `ReasonRequired`, `TransactionNotFound` or `PermissionDenied`.
    pub fn delete_transaction(
        client: &Client,
        ctx: &CommandContext,
        id: TransactionId,
        reason: &str,
    ) -> Result<Outcome<Client>, DomainError> {
        let mut next = client.clone();
        transactions::retire(&mut next.transactions, ctx, id, reason)?;
        next.updated_at = ctx.now();

        Ok(ledger_outcome(next, id, AuditAction::Deleted))
    }
}

fn ledger_outcome(client: Client, id: TransactionId, action: AuditAction) -> Outcome<Client> {
    let notification = Notification::LedgerChanged {
        owner: LedgerOwner::Client(client.id),
        entry: LedgerEntryRef::Transaction(id),
        action,
    };
    Outcome::client_saved(client, notification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Actor;
    use crate::ledger::PaymentMode;
    use crate::permissions::{AppPermissions, PermissionLevel};
    use caterbook_shared::types::UserId;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn ctx() -> CommandContext {
        ctx_with(AppPermissions::full())
    }

    fn ctx_with(permissions: AppPermissions) -> CommandContext {
        CommandContext::new(Some(Actor::new(UserId::new(), "Kavya")), permissions, Utc::now())
            .unwrap()
    }

    fn client() -> Client {
        let mut input = ClientProfileInput::named("Sharma Family");
        input.phone = Some(" 98200 00000 ".into());
        ClientService::create_client(&ctx(), input)
            .unwrap()
            .into_aggregate()
    }

    #[test]
    fn test_create_client_normalizes_profile() {
        let client = client();
        assert_eq!(client.phone.as_deref(), Some("98200 00000"));
        assert_eq!(client.email, None);
        assert_eq!(client.history.len(), 1);
        assert_eq!(client.version, 0);
    }

    #[test]
    fn test_create_client_rejects_blank_name() {
        let result = ClientService::create_client(&ctx(), ClientProfileInput::named("   "));
        assert!(matches!(
            result,
            Err(DomainError::MissingField { field: "name" })
        ));
    }

    #[test]
    fn test_update_profile_diffs_fields() {
        let client = client();
        let mut input = ClientProfileInput::named("Sharma Family");
        input.email = Some("sharma@example.com".into());
        input.phone = client.phone.clone();

        let outcome =
            ClientService::update_profile(&client, &ctx(), input, "added email").unwrap();
        assert!(matches!(
            outcome.effects[0],
            Effect::PersistClient {
                expected_version: 0,
                ..
            }
        ));

        let last = outcome.aggregate.history.last().unwrap().clone();
        let changes = last.changes.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "email");
        assert_eq!(changes[0].from, None);
    }

    #[test]
    fn test_update_profile_requires_reason() {
        let client = client();
        let result = ClientService::update_profile(
            &client,
            &ctx(),
            ClientProfileInput::named("Renamed"),
            "",
        );
        assert!(matches!(result, Err(DomainError::ReasonRequired)));
    }

    #[test]
    fn test_client_ledger_uses_payment_scope() {
        let limited =
            ctx_with(AppPermissions::full().with(Scope::FinancePayments, PermissionLevel::View));
        let result = ClientService::create_transaction(
            &client(),
            &limited,
            TransactionInput::income(
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                dec!(10000),
                PaymentMode::Upi,
            ),
        );
        assert!(matches!(
            result,
            Err(DomainError::PermissionDenied {
                scope: Scope::FinancePayments,
                ..
            })
        ));
    }

    #[test]
    fn test_client_advance_lifecycle() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let client = ClientService::create_transaction(
            &client(),
            &ctx(),
            TransactionInput::income(date, dec!(10000), PaymentMode::Upi),
        )
        .unwrap()
        .into_aggregate();
        let id = client.transactions[0].id;

        let client = ClientService::update_transaction(
            &client,
            &ctx(),
            id,
            TransactionInput::income(date, dec!(12000), PaymentMode::Upi),
            "second instalment merged",
        )
        .unwrap()
        .into_aggregate();
        assert_eq!(client.transactions[0].amount, dec!(12000));

        let client = ClientService::delete_transaction(&client, &ctx(), id, "refunded")
            .unwrap()
            .into_aggregate();
        assert_eq!(client.transactions_view(false).count(), 0);
        assert_eq!(client.transactions[0].history.len(), 3);
    }
}
