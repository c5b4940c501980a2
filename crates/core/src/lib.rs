//! Token and session lifecycle core.
//!
//! - [`config`] -- Secret material and lifetimes ([`AuthConfig`]).
//! - [`secret`] -- Refresh-secret generation and Argon2id hashing.
//! - [`token`] -- HMAC-signed JWT access tokens.
//! - [`store`] -- The [`SessionStore`] seam and an in-memory implementation.
//! - [`notify`] -- The [`AnomalyNotifier`] seam for IP-change warnings.
//! - [`manager`] -- [`SessionManager`], which issues and refreshes tokens.

pub mod config;
pub mod error;
pub mod manager;
pub mod notify;
pub mod secret;
pub mod session;
pub mod store;
pub mod token;
pub mod types;

pub use config::{AuthConfig, HashCost};
pub use error::{CoreError, TokenRejection};
pub use manager::{IssuedTokens, SessionManager};
pub use notify::{AnomalyNotifier, LogNotifier, NotifyError};
pub use session::Session;
pub use store::{MemorySessionStore, SessionStore};
