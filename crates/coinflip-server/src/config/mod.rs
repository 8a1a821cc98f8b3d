//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use coinflip_core::error::{CoinFlipError, Result};

pub use schema::{FlipSection, MetricsSection, ServerConfig, ServerSection};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "COINFLIP_CONFIG";
/// Config file used when `COINFLIP_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "coinflip.yaml";

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CoinFlipError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| CoinFlipError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config the binary should run with.
///
/// An explicit `COINFLIP_CONFIG` must exist. Without it, `coinflip.yaml` is
/// read when present and built-in defaults are used otherwise.
pub fn load_from_env() -> Result<ServerConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(&path),
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        Err(_) => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "config file not found, using defaults");
            Ok(ServerConfig::default())
        }
    }
}
