//! Voice-chat access token construction and signing.
//!
//! A token is `header.claims.signature`, each segment base64url without
//! padding. The header is always the empty JSON object and the signature is
//! HMAC-SHA256 over `header.claims` keyed by the issuer secret.

pub mod hmac_signer;
pub mod sip;

use serde::{Deserialize, Serialize};

use crate::errors::TokenGenerationError;

/// Channel classification encoded into the channel identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    NonPositional,
    Positional,
    Echo,
}

impl ChannelType {
    pub fn code(&self) -> char {
        match self {
            ChannelType::NonPositional => 'g',
            ChannelType::Positional => 'd',
            ChannelType::Echo => 'e',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenAction {
    Login,
    Join,
    JoinMuted,
    Kick,
}

impl TokenAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenAction::Login => "login",
            TokenAction::Join => "join",
            TokenAction::JoinMuted => "join_muted",
            TokenAction::Kick => "kick",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub exp: u64,
    pub vxa: TokenAction,
    pub vxi: u64,
    pub f: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

/// Seam between the token service and the signing scheme.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenGenerationError>;
}
