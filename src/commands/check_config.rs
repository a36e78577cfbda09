use std::process;

use serde::Serialize;

use crate::{
    config::{Config, ConfigError},
    login_token::StoreSettings,
};

/// Effective token settings as printed by `check-config`.
#[derive(Debug, Serialize)]
struct EffectiveSettings {
    login_url: String,
    token_length: usize,
    expiry_seconds: u64,
    reclaim_interval_seconds: u64,
    log_level: String,
}

pub fn handle_check_config_command(config: &Config) {
    let effective = match effective_settings(config) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("❌ {e}");
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&effective) {
        Ok(json) => {
            println!("✅ Configuration is valid");
            println!("{json}");
        }
        Err(e) => {
            eprintln!("❌ Failed to render configuration: {e}");
            process::exit(1);
        }
    }
}

/// Apply the same checks a token store does on construction and collect the
/// settings it would run with.
fn effective_settings(config: &Config) -> Result<EffectiveSettings, ConfigError> {
    let settings = StoreSettings::try_from(&config.login_token)?;
    settings.validated_expiry()?;

    Ok(EffectiveSettings {
        login_url: settings.login_url,
        token_length: settings.token_length,
        expiry_seconds: settings.expiry.as_secs(),
        reclaim_interval_seconds: config.login_token.reclaim_interval_seconds,
        log_level: config.tracing.log_level.clone(),
    })
}
