//! Shared constants and invariants

pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 90;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_ENV_FILE: &str = ".env";

// Environment variables
pub const ENV_SERVER_URL: &str = "SERVER_URL";
pub const ENV_BIND_HOST: &str = "BIND_HOST";
pub const ENV_ISSUER: &str = "ISSUER";
// the misspelling is part of the deployed contract
pub const ENV_SECRET_KEY: &str = "SERCRET_KEY";
pub const ENV_SECRET_KEY_FALLBACK: &str = "SECRET_KEY";
pub const ENV_DOMAIN: &str = "DOMAIN";
pub const ENV_ADMIN_USER_ID: &str = "ADMIN_USER_ID";
pub const ENV_TOKEN_TTL_SECONDS: &str = "TOKEN_TTL_SECONDS";

// HTTP surface
pub const CREATE_TOKEN_PATH: &str = "/createToken";
pub const HEALTH_PATH: &str = "/health";
pub const TOKEN_HEADER: &str = "token";
