use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    login_token::{StoreSettings, TokenStore},
    token::{generate_secure_token, TokenGenerator},
};

static TRACING_INITIALIZED: std::sync::Once = std::sync::Once::new();

pub const TEST_LOGIN_URL: &str = "https://example.com/login";
pub const TEST_TOKEN_LENGTH: usize = 32;

/// Initialize tracing for tests
pub fn init_tracing() {
    TRACING_INITIALIZED.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .init();
    });
}

/// Settings with the test login URL, 32 character tokens and the given expiry.
#[must_use]
pub fn test_settings(expiry: Duration) -> StoreSettings {
    StoreSettings::new(TEST_LOGIN_URL, TEST_TOKEN_LENGTH, expiry)
}

/// Creates a token store for tests.
///
/// # Panics
///
/// Panics if `expiry` is rejected by the store.
#[must_use]
pub fn test_store(expiry: Duration) -> TokenStore {
    TokenStore::new(test_settings(expiry)).expect("Failed to create test token store")
}

/// Generator that hands out a fixed sequence of values, then falls back to
/// random ones.
///
/// Used to force token collisions deterministically.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    values: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: Mutex::new(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of scripted values not handed out yet
    pub fn remaining(&self) -> usize {
        self.values.lock().unwrap().len()
    }
}

impl TokenGenerator for ScriptedGenerator {
    fn generate(&self, length: usize) -> String {
        self.values
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| generate_secure_token(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_generator_replays_then_falls_back() {
        let generator = ScriptedGenerator::new(["first", "second"]);

        assert_eq!(generator.generate(8), "first");
        assert_eq!(generator.generate(8), "second");
        assert_eq!(generator.remaining(), 0);
        assert_eq!(generator.generate(8).len(), 8);
    }
}
