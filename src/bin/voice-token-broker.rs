use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{debug, info};
use voice_token_broker::config::loader::process_env;
use voice_token_broker::config::settings::{DispatchConfig, LogFormat, MetricsConfig};
use voice_token_broker::server;
use voice_token_broker::utils::config_loader;
use voice_token_broker::utils::constants::{DEFAULT_ENV_FILE, DEFAULT_METRICS_PATH};
use voice_token_broker::utils::logging;
use voice_token_broker::utils::logging::LogLevel;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TLS private key (PEM). Secure mode needs both key and certificate.
    key_path: Option<PathBuf>,
    /// TLS certificate chain (PEM).
    cert_path: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,
    #[arg(long = "metrics", env = "METRICS_ENABLED")]
    metrics_enabled: bool,
    #[arg(long, env = "METRICS_PATH", default_value = DEFAULT_METRICS_PATH)]
    metrics_path: String,
    /// Serve `kick` tokens signed as ADMIN_USER_ID.
    #[arg(long, env = "ALLOW_ADMIN_TOKENS")]
    allow_admin_tokens: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Make preparations
    //
    // seed env from .env before clap reads its env fallbacks
    // -------------------------------

    let env_file = std::env::var("ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_owned());
    let dotenv = dotenvy::from_path(&env_file);

    let args = Args::parse();
    logging::run(args.log_level, args.log_format);

    match dotenv {
        Ok(()) => info!("loaded environment from {}", env_file),
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!("no env file at {}, using process environment", env_file)
        }
        Err(e) => return Err(anyhow!("invalid env file {}: {}", env_file, e)),
    }

    // -------------------------------
    // 2. Load configuration
    // -------------------------------

    let config = config_loader::run(
        process_env,
        args.key_path,
        args.cert_path,
        MetricsConfig {
            path: args.metrics_path,
            is_enabled: args.metrics_enabled,
        },
        DispatchConfig {
            allow_admin_tokens: args.allow_admin_tokens,
        },
    )?;

    // -------------------------------
    // 3. Start http(s) server
    // -------------------------------

    info!("Service starting...");
    server::server::start(config).await
}
