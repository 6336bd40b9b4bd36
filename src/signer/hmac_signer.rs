use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{TokenClaims, TokenSigner};
use crate::errors::TokenGenerationError;

type HmacSha256 = Hmac<Sha256>;

/// base64url of `{}`
pub const EMPTY_HEADER: &str = "e30";

pub struct HmacTokenSigner {
    secret_key: Vec<u8>,
}

impl HmacTokenSigner {
    pub fn new(secret_key: &str) -> Self {
        Self {
            secret_key: secret_key.as_bytes().to_vec(),
        }
    }

    fn signature(&self, signing_input: &str) -> Result<String, TokenGenerationError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret_key)
            .map_err(|e| TokenGenerationError::Sign(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}

impl TokenSigner for HmacTokenSigner {
    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenGenerationError> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let signing_input = format!("{}.{}", EMPTY_HEADER, payload);
        let signature = self.signature(&signing_input)?;
        Ok(format!("{}.{}", signing_input, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::TokenAction;

    fn claims() -> TokenClaims {
        TokenClaims {
            iss: "blindmelon-AppName-dev".into(),
            exp: 1600349400,
            vxa: TokenAction::Login,
            vxi: 933000,
            f: "sip:.blindmelon-AppName-dev.jerky.@tla.vivox.com".into(),
            t: None,
            sub: None,
        }
    }

    #[test]
    fn empty_header_constant_matches_encoding() {
        assert_eq!(URL_SAFE_NO_PAD.encode(b"{}"), EMPTY_HEADER);
    }

    #[test]
    fn token_has_three_segments_and_decodable_claims() {
        let token = HmacTokenSigner::new("secret").sign(&claims()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], EMPTY_HEADER);

        let decoded: TokenClaims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(decoded, claims());

        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(json["vxa"], "login");
        assert!(json.get("t").is_none());
        assert!(json.get("sub").is_none());
    }

    #[test]
    fn signature_verifies_with_the_secret_only() {
        let token = HmacTokenSigner::new("secret").sign(&claims()).unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let raw = URL_SAFE_NO_PAD.decode(signature).unwrap();

        let mut mac = HmacSha256::new_from_slice(b"secret").unwrap();
        mac.update(signing_input.as_bytes());
        assert!(mac.verify_slice(&raw).is_ok());

        let mut wrong = HmacSha256::new_from_slice(b"other").unwrap();
        wrong.update(signing_input.as_bytes());
        assert!(wrong.verify_slice(&raw).is_err());
    }

    #[test]
    fn signing_is_deterministic_for_identical_claims() {
        let signer = HmacTokenSigner::new("secret");
        assert_eq!(signer.sign(&claims()).unwrap(), signer.sign(&claims()).unwrap());
    }
}
