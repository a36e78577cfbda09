//! Loginlink - single-use login tokens
//!
//! Issues short-lived random tokens bound to an account id and exchanges a
//! presented token for that id exactly once before it expires. Delivery of the
//! token (email, SMS, HTTP) is left to the caller.

#![allow(missing_docs)]

pub mod boot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod environment;
pub mod login_token;
pub mod setup_tracing;
pub mod token;

#[cfg(any(test, feature = "test-utils"))]
pub mod tests;

pub use login_token::{LoginToken, LoginTokenError, StoreSettings, TokenStore};
