pub mod error;
pub mod reclaimer;
pub mod store;

pub use error::LoginTokenError;
pub use reclaimer::spawn_reclaimer;
pub use store::{LoginToken, StoreSettings, TokenStore};
