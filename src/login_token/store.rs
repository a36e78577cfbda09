use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use serde::Serialize;
use tracing::{debug, error, trace, warn};

use crate::config::{ConfigError, LoginTokenConfig};
use crate::token::{AlphanumericGenerator, TokenGenerator};

use super::error::LoginTokenError;

/// How many values are drawn before a generator that keeps colliding with live
/// tokens is treated as broken.
pub(crate) const MAX_GENERATION_ATTEMPTS: u32 = 4;

/// Token lengths below this are accepted but reported as weak.
const WEAK_TOKEN_LENGTH: usize = 16;

/// A single-use login token bound to an account.
///
/// Tokens are immutable once issued. The `value` is what gets delivered to the
/// user, usually embedded in a login link.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginToken {
    pub value: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for LoginToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginToken")
            .field("value", &"[redacted]")
            .field("account_id", &self.account_id)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl LoginToken {
    /// Check whether the token can still be redeemed at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.is_valid_at(Utc::now())
    }
}

/// Construction-time settings of a [`TokenStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Base URL handed to whoever delivers the token; never interpreted here
    pub login_url: String,
    /// Number of characters in each token value
    pub token_length: usize,
    /// Lifetime of a token from issuance
    pub expiry: Duration,
}

impl StoreSettings {
    #[must_use]
    pub fn new(login_url: impl Into<String>, token_length: usize, expiry: Duration) -> Self {
        Self {
            login_url: login_url.into(),
            token_length,
            expiry,
        }
    }

    /// Reject degenerate settings and convert the expiry for timestamp arithmetic.
    pub(crate) fn validated_expiry(&self) -> Result<TimeDelta, ConfigError> {
        if self.token_length == 0 {
            return Err(ConfigError::ZeroTokenLength);
        }
        if self.expiry.is_zero() {
            return Err(ConfigError::ZeroExpiry);
        }

        let expiry =
            TimeDelta::from_std(self.expiry).map_err(|_| ConfigError::ExpiryOutOfRange)?;
        if Utc::now().checked_add_signed(expiry).is_none() {
            return Err(ConfigError::ExpiryOutOfRange);
        }

        if self.token_length < WEAK_TOKEN_LENGTH {
            warn!(
                token_length = self.token_length,
                "Login token length is short, tokens may be guessable"
            );
        }

        Ok(expiry)
    }
}

impl TryFrom<&LoginTokenConfig> for StoreSettings {
    type Error = ConfigError;

    fn try_from(config: &LoginTokenConfig) -> Result<Self, Self::Error> {
        validator::Validate::validate(config)?;

        let expiry_secs = config
            .expiry_minutes
            .checked_mul(60)
            .ok_or(ConfigError::ExpiryOutOfRange)?;

        Ok(Self::new(
            config.login_url.clone(),
            config.token_length,
            Duration::from_secs(expiry_secs),
        ))
    }
}

/// In-memory store of active login tokens.
///
/// Tokens are keyed by their own value in a DashMap, so lookups and removals
/// on different tokens proceed in parallel while every single-key operation is
/// exclusive. Cloning the store is cheap and yields a handle to the same tokens.
#[derive(Clone)]
pub struct TokenStore {
    settings: Arc<StoreSettings>,
    expiry: TimeDelta,
    tokens: Arc<DashMap<String, LoginToken>>,
    generator: Arc<dyn TokenGenerator>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("settings", &self.settings)
            .field("tokens", &self.tokens.len())
            .field("generator", &self.generator)
            .finish()
    }
}

impl TokenStore {
    /// Create a store backed by the default alphanumeric generator.
    ///
    /// Fails when the settings are degenerate (zero length, zero expiry, or an
    /// expiry too large to represent).
    pub fn new(settings: StoreSettings) -> Result<Self, ConfigError> {
        Self::with_generator(settings, Arc::new(AlphanumericGenerator))
    }

    /// Create a store that draws token values from `generator`.
    pub fn with_generator(
        settings: StoreSettings,
        generator: Arc<dyn TokenGenerator>,
    ) -> Result<Self, ConfigError> {
        let expiry = settings.validated_expiry()?;

        debug!(
            token_length = settings.token_length,
            expiry_secs = settings.expiry.as_secs(),
            "Login token store created"
        );

        Ok(Self {
            settings: Arc::new(settings),
            expiry,
            tokens: Arc::new(DashMap::new()),
            generator,
        })
    }

    /// Create a store from the `login_token` configuration section.
    pub fn from_config(config: &LoginTokenConfig) -> Result<Self, ConfigError> {
        Self::new(StoreSettings::try_from(config)?)
    }

    /// Issue a new token for `account_id`.
    ///
    /// The token expires `expiry` from now. Expired tokens are reclaimed before
    /// returning, so memory stays bounded under sustained issuance.
    ///
    /// # Panics
    ///
    /// Panics when the generator produces a live token's value
    /// [`MAX_GENERATION_ATTEMPTS`] times in a row. The live token is left intact.
    pub fn issue(&self, account_id: i64) -> LoginToken {
        let token = self.insert_new_token(account_id);
        let reclaimed = self.reclaim_expired();

        debug!(
            account_id,
            expires_at = %token.expires_at,
            reclaimed,
            "Issued login token"
        );

        token
    }

    /// Exchange a token value for the account it was issued to.
    ///
    /// Succeeds at most once per token: the entry is looked up and removed in a
    /// single locked operation, so of several concurrent callers only the one
    /// that removed it gets the account id. Unknown, redeemed and expired tokens
    /// all fail with [`LoginTokenError::TokenNotFound`].
    pub fn redeem(&self, value: &str) -> Result<i64, LoginTokenError> {
        let Some((_, token)) = self.tokens.remove(value) else {
            trace!("Login token redemption failed: unknown token");
            return Err(LoginTokenError::TokenNotFound);
        };

        if !token.is_valid_at(Utc::now()) {
            debug!(
                account_id = token.account_id,
                expired_at = %token.expires_at,
                "Login token redemption failed: token expired"
            );
            return Err(LoginTokenError::TokenNotFound);
        }

        debug!(account_id = token.account_id, "Redeemed login token");
        Ok(token.account_id)
    }

    /// Remove every token whose expiry has passed.
    ///
    /// Locks one shard at a time, so it can interleave with issuance and
    /// redemption of other tokens. Returns how many tokens were removed.
    pub fn reclaim_expired(&self) -> usize {
        let now = Utc::now();
        let mut reclaimed = 0;

        self.tokens.retain(|_, token| {
            let live = token.is_valid_at(now);
            if !live {
                reclaimed += 1;
            }
            live
        });

        if reclaimed > 0 {
            trace!(
                reclaimed,
                remaining = self.tokens.len(),
                "Reclaimed expired login tokens"
            );
        }

        reclaimed
    }

    /// Number of tokens held, including expired ones not yet reclaimed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.settings.login_url
    }

    #[must_use]
    pub fn token_length(&self) -> usize {
        self.settings.token_length
    }

    #[must_use]
    pub fn expiry(&self) -> Duration {
        self.settings.expiry
    }

    fn insert_new_token(&self, account_id: i64) -> LoginToken {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.expiry)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut attempt = 1;
        loop {
            let value = self.generator.generate(self.settings.token_length);
            let token = LoginToken {
                value: value.clone(),
                account_id,
                expires_at,
            };

            match self.tokens.entry(value) {
                Entry::Vacant(entry) => {
                    entry.insert(token.clone());
                    return token;
                }
                Entry::Occupied(mut entry) if !entry.get().is_valid_at(now) => {
                    trace!("Generated login token matched an expired token, replacing it");
                    entry.insert(token.clone());
                    return token;
                }
                Entry::Occupied(entry) => {
                    if attempt >= MAX_GENERATION_ATTEMPTS {
                        drop(entry);
                        error!(
                            account_id,
                            attempts = attempt,
                            "Token generator keeps colliding with live tokens"
                        );
                        panic!(
                            "token generator is broken: {attempt} consecutive values collided with live tokens"
                        );
                    }

                    warn!(
                        account_id,
                        attempt, "Generated login token collided with a live token, regenerating"
                    );
                }
            }

            attempt += 1;
        }
    }
}
