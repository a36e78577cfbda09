use std::process;

use tracing::{error, info};

use crate::{
    config::LoginTokenConfig,
    console::LoginConsole,
    environment::Environment,
    login_token::{spawn_reclaimer, TokenStore},
};

pub async fn handle_console_command(environment: Environment, config: &LoginTokenConfig) {
    let store = match TokenStore::from_config(config) {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Failed to create login token store: {}", e);
            process::exit(1);
        }
    };

    let reclaimer = (config.reclaim_interval_seconds > 0).then(|| {
        spawn_reclaimer(
            store.clone(),
            std::time::Duration::from_secs(config.reclaim_interval_seconds),
        )
    });

    info!("🔑 Starting login token console...");

    // rustyline blocks on stdin, keep it off the runtime's worker threads
    let result = tokio::task::spawn_blocking(move || {
        let mut console = LoginConsole::new(store, environment);
        console.start_interactive()
    })
    .await;

    if let Some(reclaimer) = reclaimer {
        reclaimer.abort();
    }

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("Console error: {e}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Console task failed: {e}");
            process::exit(1);
        }
    }
}
