use serde::Deserialize;

use crate::errors::RequestError;

/// Body as clients send it. Every field is optional here so that missing
/// values surface as [`RequestError::MissingField`] rather than a serde error.
#[derive(Debug, Default, Deserialize)]
pub struct RawTokenRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "channelID", alias = "channelId")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRequest {
    Login { user_id: String },
    Join { user_id: String, channel_id: String },
    JoinMuted { user_id: String, channel_id: String },
    Kick { user_id: String, channel_id: String },
}

impl TokenRequest {
    /// Validate the raw body. `kick` is only recognised when admin tokens
    /// are enabled.
    pub fn parse(raw: RawTokenRequest, allow_admin_tokens: bool) -> Result<Self, RequestError> {
        let kind = raw.kind.ok_or(RequestError::MissingField("type"))?;
        let user_id = raw.user_id.ok_or(RequestError::MissingField("userId"))?;
        let channel = raw.channel_id.ok_or(RequestError::MissingField("channelID"));

        match kind.as_str() {
            "login" => Ok(TokenRequest::Login { user_id }),
            "join" => Ok(TokenRequest::Join {
                user_id,
                channel_id: channel?,
            }),
            "joinMuted" => Ok(TokenRequest::JoinMuted {
                user_id,
                channel_id: channel?,
            }),
            "kick" if allow_admin_tokens => Ok(TokenRequest::Kick {
                user_id,
                channel_id: channel?,
            }),
            _ => Err(RequestError::UnsupportedRequestType(kind)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TokenRequest::Login { .. } => "login",
            TokenRequest::Join { .. } => "join",
            TokenRequest::JoinMuted { .. } => "joinMuted",
            TokenRequest::Kick { .. } => "kick",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            TokenRequest::Login { user_id }
            | TokenRequest::Join { user_id, .. }
            | TokenRequest::JoinMuted { user_id, .. }
            | TokenRequest::Kick { user_id, .. } => user_id,
        }
    }
}
