use std::time::Duration;

use tokio::{spawn, task::JoinHandle, time::sleep};
use tracing::{debug, info};

use super::store::TokenStore;

/// Start a background task that reclaims expired tokens every `interval`.
///
/// Issuance already sweeps the store, this task covers idle periods after a
/// burst of logins. Abort the returned handle to stop it.
pub fn spawn_reclaimer(store: TokenStore, interval: Duration) -> JoinHandle<()> {
    spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "🧹 Starting login token reclaimer"
        );
        run_reclaim_loop(&store, interval).await;
    })
}

async fn run_reclaim_loop(store: &TokenStore, interval: Duration) {
    loop {
        // Wait first, a freshly created store has nothing to reclaim
        sleep(interval).await;

        let reclaimed = store.reclaim_expired();
        if reclaimed > 0 {
            debug!(
                reclaimed,
                remaining = store.len(),
                "🧹 Reclaimed expired login tokens"
            );
        }
    }
}
