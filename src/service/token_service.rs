use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::settings::TokenIssuerConfig;
use crate::errors::TokenGenerationError;
use crate::helpers::time::expires_in;
use crate::signer::hmac_signer::HmacTokenSigner;
use crate::signer::sip::{channel_uri, user_uri};
use crate::signer::{ChannelType, TokenAction, TokenClaims, TokenSigner};

/// Issues login / join / kick tokens for one issuer. Shared across requests
/// behind an `Arc`; the only mutable part is the atomic serial.
pub struct TokenService {
    config: TokenIssuerConfig,
    signer: Arc<dyn TokenSigner>,
    serial: AtomicU64,
}

impl TokenService {
    pub fn new(config: TokenIssuerConfig) -> Self {
        let signer = Arc::new(HmacTokenSigner::new(&config.secret_key));
        Self::with_signer(config, signer)
    }

    pub fn with_signer(config: TokenIssuerConfig, signer: Arc<dyn TokenSigner>) -> Self {
        Self {
            config,
            signer,
            serial: AtomicU64::new(0),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }

    pub fn login(&self, user_id: &str) -> Result<String, TokenGenerationError> {
        let from = self.user(user_id)?;
        self.sign(TokenAction::Login, from, None, None)
    }

    pub fn join(
        &self,
        user_id: &str,
        channel_id: &str,
        channel_type: ChannelType,
    ) -> Result<String, TokenGenerationError> {
        let from = self.user(user_id)?;
        let to = self.channel(channel_id, channel_type)?;
        self.sign(TokenAction::Join, from, Some(to), None)
    }

    pub fn join_muted(
        &self,
        user_id: &str,
        channel_id: &str,
        channel_type: ChannelType,
    ) -> Result<String, TokenGenerationError> {
        let from = self.user(user_id)?;
        let to = self.channel(channel_id, channel_type)?;
        self.sign(TokenAction::JoinMuted, from, Some(to), None)
    }

    /// Signed as the admin user; `target_user_id` becomes the subject.
    pub fn kick(
        &self,
        target_user_id: &str,
        channel_id: &str,
        channel_type: ChannelType,
    ) -> Result<String, TokenGenerationError> {
        let subject = self.user(target_user_id)?;
        let to = self.channel(channel_id, channel_type)?;
        let from = self.user(&self.config.admin_user_id)?;
        self.sign(TokenAction::Kick, from, Some(to), Some(subject))
    }

    fn user(&self, user_id: &str) -> Result<String, TokenGenerationError> {
        if user_id.is_empty() {
            return Err(TokenGenerationError::EmptyUserId);
        }
        Ok(user_uri(&self.config.issuer, user_id, &self.config.domain))
    }

    fn channel(&self, channel_id: &str, channel_type: ChannelType) -> Result<String, TokenGenerationError> {
        if channel_id.is_empty() {
            return Err(TokenGenerationError::EmptyChannelId);
        }
        Ok(channel_uri(
            &self.config.issuer,
            channel_id,
            channel_type,
            &self.config.domain,
        ))
    }

    fn sign(
        &self,
        action: TokenAction,
        from: String,
        to: Option<String>,
        sub: Option<String>,
    ) -> Result<String, TokenGenerationError> {
        let claims = TokenClaims {
            iss: self.config.issuer.clone(),
            exp: expires_in(self.config.token_ttl_seconds),
            vxa: action,
            vxi: self.serial.fetch_add(1, Ordering::Relaxed),
            f: from,
            t: to,
            sub,
        };
        debug!(action = action.as_str(), serial = claims.vxi, "signing token");
        self.signer.sign(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn service() -> TokenService {
        TokenService::new(TokenIssuerConfig::new("i", "s", "d", "a"))
    }

    fn claims_of(token: &str) -> TokenClaims {
        let payload = token.split('.').nth(1).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn login_token_carries_user_identity() {
        let token = service().login("alice").unwrap();
        let claims = claims_of(&token);
        assert_eq!(claims.iss, "i");
        assert_eq!(claims.vxa, TokenAction::Login);
        assert_eq!(claims.f, "sip:.i.alice.@d");
        assert!(claims.t.is_none());
        assert!(claims.exp > crate::helpers::time::now_u64());
    }

    #[test]
    fn join_token_targets_channel() {
        let token = service()
            .join("alice", "lobby", ChannelType::NonPositional)
            .unwrap();
        let claims = claims_of(&token);
        assert_eq!(claims.vxa, TokenAction::Join);
        assert_eq!(claims.t.as_deref(), Some("sip:confctl-g-i.lobby@d"));
    }

    #[test]
    fn join_muted_uses_its_own_action() {
        let token = service()
            .join_muted("bob", "lobby", ChannelType::Echo)
            .unwrap();
        let claims = claims_of(&token);
        assert_eq!(claims.vxa, TokenAction::JoinMuted);
        assert_eq!(claims.t.as_deref(), Some("sip:confctl-e-i.lobby@d"));
    }

    #[test]
    fn kick_is_signed_by_admin() {
        let token = service()
            .kick("mallory", "lobby", ChannelType::NonPositional)
            .unwrap();
        let claims = claims_of(&token);
        assert_eq!(claims.vxa, TokenAction::Kick);
        assert_eq!(claims.f, "sip:.i.a.@d");
        assert_eq!(claims.sub.as_deref(), Some("sip:.i.mallory.@d"));
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let svc = service();
        assert!(matches!(svc.login(""), Err(TokenGenerationError::EmptyUserId)));
        assert!(matches!(
            svc.join("", "lobby", ChannelType::NonPositional),
            Err(TokenGenerationError::EmptyUserId)
        ));
        assert!(matches!(
            svc.join("alice", "", ChannelType::NonPositional),
            Err(TokenGenerationError::EmptyChannelId)
        ));
    }

    #[test]
    fn serial_is_unique_per_token() {
        let svc = service();
        let first = claims_of(&svc.login("alice").unwrap()).vxi;
        let second = claims_of(&svc.login("alice").unwrap()).vxi;
        assert_ne!(first, second);
    }

    #[test]
    fn tokens_differ_per_user_and_channel() {
        let svc = service();
        let a = svc.join("alice", "one", ChannelType::NonPositional).unwrap();
        let b = svc.join("alice", "two", ChannelType::NonPositional).unwrap();
        let c = svc.join("bob", "one", ChannelType::NonPositional).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
