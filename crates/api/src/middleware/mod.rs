//! Request extractors.
//!
//! - [`client_ip::ClientIp`] -- The caller's network origin.
//! - [`auth::AuthClient`] -- Claims from a valid Bearer access token.

pub mod auth;
pub mod client_ip;
