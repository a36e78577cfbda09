//! Walks through a passwordless login: issue a token, deliver the link, and
//! race several redemptions of the same link.
//!
//! Run with `cargo run --example login_flow`.

use std::time::Duration;

use loginlink::{
    console::login_link, login_token::spawn_reclaimer, LoginTokenError, StoreSettings,
    TokenStore,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .compact()
        .init();

    let store = TokenStore::new(StoreSettings::new(
        "https://example.com/login",
        32,
        Duration::from_secs(2),
    ))?;
    let reclaimer = spawn_reclaimer(store.clone(), Duration::from_millis(500));

    // A user asks for a login link
    let token = store.issue(42);
    info!("📧 Sending {}", login_link(store.login_url(), &token.value));

    // The link gets clicked several times at once
    let mut clicks = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let value = token.value.clone();
        clicks.push(tokio::task::spawn_blocking(move || store.redeem(&value)));
    }

    for click in clicks {
        match click.await? {
            Ok(account_id) => info!("✅ Signed in as account {account_id}"),
            Err(LoginTokenError::TokenNotFound) => info!("🚫 Invalid or expired link"),
        }
    }

    // A link that is never clicked expires and is reclaimed in the background
    let stale = store.issue(7);
    tokio::time::sleep(Duration::from_secs(3)).await;
    info!(
        remaining = store.len(),
        "⏰ Stale link redeems: {:?}",
        store.redeem(&stale.value)
    );

    reclaimer.abort();
    Ok(())
}
