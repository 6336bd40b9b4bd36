use chrono::Utc;

pub fn now_u64() -> u64 {
    now_i64().max(0) as u64
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Unix timestamp `ttl_seconds` from now.
pub fn expires_in(ttl_seconds: u64) -> u64 {
    now_u64().saturating_add(ttl_seconds)
}
