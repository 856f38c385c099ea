//! Development seeder for Caterbook.
//!
//! Books a sample client with a confirmed wedding and a lost enquiry into an
//! in-memory store, then logs the resulting financials.
//!
//! Usage: cargo run --bin caterbook-seeder

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use caterbook_core::charges::ChargeInput;
use caterbook_core::client::ClientProfileInput;
use caterbook_core::event::{CreateEventInput, PricingInput};
use caterbook_core::ledger::{PaymentMode, TransactionInput};
use caterbook_core::lifecycle::TransitionRequest;
use caterbook_core::permissions::AppPermissions;
use caterbook_core::{Actor, CommandContext};
use caterbook_shared::types::UserId;
use caterbook_shared::{AppConfig, LoggingConfig};
use caterbook_store::{BookingService, InMemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let store = Arc::new(InMemoryStore::with_config(&config.store));
    let service = BookingService::new(store, &config.lifecycle);
    let ctx = CommandContext::new(
        Some(Actor::new(UserId::new(), "Seeder")),
        AppPermissions::full(),
        Utc::now(),
    )?;

    let client = service
        .create_client(
            &ctx,
            ClientProfileInput {
                phone: Some("+91 98200 00000".into()),
                ..ClientProfileInput::named("Sharma family")
            },
        )
        .await?;
    info!(client_id = %client.id, "Seeded client");

    let wedding = service
        .create_event(
            &ctx,
            CreateEventInput {
                client_id: client.id,
                name: "Sharma wedding reception".into(),
                event_date: seed_date(2026, 12, 12)?,
                pricing: PricingInput::variable(250, dec!(1200)),
            },
        )
        .await?;
    service
        .create_charge(
            &ctx,
            wedding.id,
            ChargeInput::live_counter("chaat-counter", dec!(150), dec!(2500)),
        )
        .await?;
    service
        .create_charge(
            &ctx,
            wedding.id,
            ChargeInput::cocktail_menu("signature-bar", dec!(450), 120, dec!(0), dec!(15000)),
        )
        .await?;
    service
        .create_charge(&ctx, wedding.id, ChargeInput::additional_pax(20, Decimal::ZERO))
        .await?;
    service
        .transition(&ctx, wedding.id, TransitionRequest::confirm())
        .await?;
    service
        .create_transaction(
            &ctx,
            wedding.id,
            TransactionInput::income(seed_date(2026, 10, 1)?, dec!(100000), PaymentMode::BankTransfer),
        )
        .await?;
    service
        .create_transaction(
            &ctx,
            wedding.id,
            TransactionInput::expense(seed_date(2026, 12, 10)?, dec!(42000), "Florist"),
        )
        .await?;

    let enquiry = service
        .create_event(
            &ctx,
            CreateEventInput {
                client_id: client.id,
                name: "Sharma anniversary lunch".into(),
                event_date: seed_date(2027, 2, 14)?,
                pricing: PricingInput::flat(60, dec!(45000)),
            },
        )
        .await?;
    service
        .transition(&ctx, enquiry.id, TransitionRequest::lose("Budget"))
        .await?;

    for event in service.events_for_client(client.id).await? {
        let view = service.event_financials(&ctx, event.id).await?;
        info!(
            event_id = %event.id,
            name = %event.name,
            state = %event.state,
            financials = %serde_json::to_string(&view)?,
            "Seeded event"
        );
    }

    let balance = service.client_balance(&ctx, client.id).await?;
    info!(
        client_id = %client.id,
        balance = %serde_json::to_string(&balance)?,
        "Seeding complete"
    );

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let json = logging.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

fn seed_date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("invalid seed date {year}-{month}-{day}"))
}
