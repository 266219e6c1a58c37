use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::ProbeError;

/// Rounded webhook route of the WeWash dashboard preview deployment.
pub const DEFAULT_URL: &str =
    "https://wewash-dashboard-git-master-arkanyzs-projects.vercel.app/api/webhooks/rounded";

/// Placeholder; the receiving side does not verify it.
pub const DEFAULT_SIGNATURE: &str = "test-signature";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const ENV_PREFIX: &str = "HOOKPROBE";

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ProbeConfig {
    pub target: TargetConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub url: String,
    pub signature: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            signature: DEFAULT_SIGNATURE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout; `0` waits indefinitely.
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl ProbeConfig {
    /// Layers built-in defaults, the TOML file at `path` (skipped when absent)
    /// and `HOOKPROBE_*` environment variables, e.g. `HOOKPROBE_TARGET__URL`.
    pub fn load(path: &str) -> Result<Self, ProbeError> {
        let s = defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(s.try_deserialize()?)
    }

    /// Defaults overlaid with an in-memory TOML document. No environment lookup.
    pub fn from_toml_str(toml: &str) -> Result<Self, ProbeError> {
        let s = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("target.url", DEFAULT_URL)?
        .set_default("target.signature", DEFAULT_SIGNATURE)?
        .set_default("http.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)
}
