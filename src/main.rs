//! Grocery ordering bot
//!
//! A Telegram bot that walks customers through browsing a catalog, building
//! a cart and placing cash-on-delivery orders, which are handed to staff in
//! rotation.

mod cart;
mod catalog;
mod config;
mod order;
mod runtime;
mod session;
mod state_machine;
mod telegram;

use catalog::Catalog;
use config::{BotConfig, ConfigError};
use order::{OrderDispatcher, StaffRoster};
use runtime::SessionManager;
use state_machine::ChatContext;
use std::sync::Arc;
use telegram::{run_poller, TelegramClient};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grocery_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env()?;

    tracing::info!(path = %config.catalog_path.display(), "Loading catalog");
    let catalog = Catalog::load(&config.catalog_path)?;
    tracing::info!(
        categories = catalog.categories().len(),
        "Catalog loaded"
    );

    let roster = StaffRoster::new(config.staff.clone()).ok_or(ConfigError::EmptyStaffRoster)?;
    tracing::info!(
        staff = config.staff.len(),
        admin = %config.admin,
        group = %config.group,
        "Order routing configured"
    );

    let telegram = Arc::new(TelegramClient::new(
        &config.api_url,
        &config.bot_token,
        config.poll_timeout,
    )?);
    let dispatcher = Arc::new(OrderDispatcher::new(
        roster,
        config.admin,
        config.group,
        telegram.clone(),
    ));
    let context = Arc::new(ChatContext::new(Arc::new(catalog), config.shop));
    let sessions = Arc::new(SessionManager::new(context, telegram.clone(), dispatcher));

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutting down");
        signal.cancel();
    });

    run_poller(telegram, sessions, shutdown).await;
    Ok(())
}
