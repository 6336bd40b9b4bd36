//! # Voice Token Broker Library
//!
//! Issues signed voice-chat access tokens over a single HTTP route.
//!
//! Modules:
//! - `config` — environment configuration and settings types
//! - `transport` — HTTP / HTTPS selection and listener
//! - `signer` — token claims, identities, HMAC signing
//! - `service` — token service adapter (login / join / kick)
//! - `server` — router, request parsing and the `/createToken` handler

pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod service;
pub mod signer;
#[cfg(test)]
mod tests;
pub mod transport;
pub mod utils;
