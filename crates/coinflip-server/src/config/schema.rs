use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::Deserialize;
use coinflip_core::error::{CoinFlipError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub flip: FlipSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            flip: FlipSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CoinFlipError::InvalidConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;
        self.flip.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            CoinFlipError::InvalidConfig(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Labels attached to every exported sample.
    #[serde(default = "default_labels")]
    pub default_labels: BTreeMap<String, String>,

    #[serde(default = "default_process_metrics")]
    pub process_metrics: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            default_labels: default_labels(),
            process_metrics: default_process_metrics(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        for name in self.default_labels.keys() {
            if !is_valid_label_name(name) {
                return Err(CoinFlipError::InvalidConfig(format!(
                    "metrics.default_labels has invalid label name: {name:?}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlipSection {
    /// Largest `times` accepted by `/flip-coins`; unbounded when unset.
    #[serde(default)]
    pub max_times: Option<u64>,
}

impl FlipSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_times == Some(0) {
            return Err(CoinFlipError::InvalidConfig(
                "flip.max_times must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, without the reserved `__` prefix.
pub(crate) fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !name.starts_with("__")
}

fn default_listen() -> String {
    "0.0.0.0:5000".into()
}
fn default_labels() -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), "coin-api".to_string())])
}
fn default_process_metrics() -> bool {
    true
}
