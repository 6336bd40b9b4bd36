use super::ChannelType;

/// `sip:.{issuer}.{user}.@{domain}`
pub fn user_uri(issuer: &str, user_id: &str, domain: &str) -> String {
    format!("sip:.{}.{}.@{}", issuer, user_id, domain)
}

/// `sip:confctl-{type}-{issuer}.{channel}@{domain}`
pub fn channel_uri(issuer: &str, channel_id: &str, channel_type: ChannelType, domain: &str) -> String {
    format!(
        "sip:confctl-{}-{}.{}@{}",
        channel_type.code(),
        issuer,
        channel_id,
        domain
    )
}
