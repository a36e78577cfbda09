use std::{env, process, str::FromStr as _};

use clap::Parser as _;
use config_rs::Config as ConfigRs;
use tracing::{debug, trace};
use validator::Validate as _;

use crate::{
    cli::{Cli, Commands},
    commands::{check_config, console, version},
    config::{Config, ConfigError},
    environment::Environment,
    setup_tracing::setup_tracing,
};

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";
const ENVIRONMENT_PREFIX: &str = "APP";

/// Log level of one-shot commands unless RUST_LOG says otherwise
const QUIET_LOG_LEVEL: &str = "warn";

pub async fn boot() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            version::print_version_info();
        }
        Some(Commands::CheckConfig) => {
            let (_, config) = prepare(Some(QUIET_LOG_LEVEL));
            check_config::handle_check_config_command(&config);
        }
        Some(Commands::Console) | None => {
            let (environment, config) = prepare(None);
            console::handle_console_command(environment, &config.login_token).await;
        }
    }
}

/// Pick the environment, load its configuration and set up tracing.
///
/// `log_level` replaces the configured level when given.
fn prepare(log_level: Option<&str>) -> (Environment, Config) {
    let environment = set_environment();

    let app_config = match read_config(&environment) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            process::exit(1);
        }
    };

    setup_tracing(log_level.unwrap_or(&app_config.tracing.log_level));

    debug!("Environment set to: {:?}", environment);
    trace!("Configuration loaded: {:?}", app_config);

    (environment, app_config)
}

#[must_use]
pub fn set_environment() -> Environment {
    env::var(ENVIRONMENT_VARIABLE)
        .ok()
        .and_then(|s| Environment::from_str(&s).ok())
        .unwrap_or_default()
}

/// Read `config/{environment}` and apply `APP_` environment overrides.
///
/// Nested keys are separated by a double underscore, for example
/// `APP_LOGIN_TOKEN__EXPIRY_MINUTES=5`.
pub fn read_config(environment: &Environment) -> Result<Config, ConfigError> {
    let config_file_name = environment.config_file_name();

    trace!("Reading configuration from: {}", config_file_name);

    let config: Config = ConfigRs::builder()
        .add_source(config_rs::File::with_name(&config_file_name))
        .add_source(environment_source())
        .build()?
        .try_deserialize()?;

    config.validate()?;

    Ok(config)
}

// The prefix is joined with a single underscore, nested keys with two
fn environment_source() -> config_rs::Environment {
    config_rs::Environment::with_prefix(ENVIRONMENT_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
