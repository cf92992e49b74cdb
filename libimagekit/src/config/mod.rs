//! Client configuration.
//!
//! This module manages the account credentials and API settings with
//! sensible defaults, loading from a YAML file or from `IMAGEKIT_*`
//! environment variables.

use crate::auth::Credentials;
use crate::client::ClientConfig;
use crate::error::{ImageKitError, Result};
use config::{Config as ConfigRs, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub cloud: Cloud,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub network: Network,
}

/// Environment variables recognised by [`Config::from_env`], after the
/// `IMAGEKIT_` prefix has been stripped.
#[derive(Debug, Deserialize)]
struct EnvVars {
    private_key: Option<String>,
    public_key: Option<String>,
    endpoint_url: Option<String>,
    api_prefix: Option<String>,
}

impl Config {
    /// Creates a configuration from explicit credentials, keeping every
    /// other setting at its default.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::Config;
    ///
    /// let config = Config::from_params("private", "public", "https://ik.imagekit.io/demo/");
    /// assert_eq!(config.api.prefix, "https://api.imagekit.io/v1/");
    /// ```
    pub fn from_params(
        private_key: impl Into<String>,
        public_key: impl Into<String>,
        url_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            cloud: Cloud {
                private_key: private_key.into(),
                public_key: public_key.into(),
                url_endpoint: url_endpoint.into(),
            },
            ..Self::default()
        }
    }

    /// Parses a `Config` from a YAML string, layered over the defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// When the path is `None` the defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(true));
        }

        Self::from_builder(builder).map_err(|e| match (e, path) {
            (ImageKitError::Config { message, source, .. }, Some(p)) => ImageKitError::Config {
                message,
                path: Some(p.display().to_string()),
                source,
            },
            (e, _) => e,
        })
    }

    /// Loads a `Config` from the process environment.
    ///
    /// Reads `IMAGEKIT_PRIVATE_KEY`, `IMAGEKIT_PUBLIC_KEY` and
    /// `IMAGEKIT_ENDPOINT_URL`, plus the optional `IMAGEKIT_API_PREFIX`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `IMAGEKIT_PRIVATE_KEY` is unset or
    /// empty.
    pub fn from_env() -> Result<Self> {
        Self::from_env_source(None)
    }

    /// Same as [`Config::from_env`] but reads from `vars` instead of the
    /// process environment when given.
    pub fn from_env_source(vars: Option<Map<String, String>>) -> Result<Self> {
        let env = ConfigRs::builder()
            .add_source(Environment::with_prefix("IMAGEKIT").source(vars))
            .build()
            .and_then(|cfg| cfg.try_deserialize::<EnvVars>())
            .map_err(|e| {
                ImageKitError::config_with_source(
                    "Failed to read IMAGEKIT_* environment variables",
                    None,
                    e,
                )
            })?;

        let private_key = env
            .private_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ImageKitError::config("IMAGEKIT_PRIVATE_KEY is not set", None))?;

        let mut config = Self::from_params(
            private_key,
            env.public_key.unwrap_or_default(),
            env.endpoint_url.unwrap_or_default(),
        );
        if let Some(prefix) = env.api_prefix {
            config.api.prefix = prefix;
        }

        Ok(config)
    }

    /// Returns the credentials described by this configuration.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            &self.cloud.private_key,
            &self.cloud.public_key,
            &self.cloud.url_endpoint,
        )
    }

    /// Returns the HTTP client settings described by this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.network.timeout)
            .with_max_idle_per_host(self.network.max_idle_per_host)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            ImageKitError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                ImageKitError::config_with_source(
                    "Failed to deserialize configuration",
                    None,
                    e,
                )
            })
    }
}

/// Account credentials.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Cloud {
    #[serde(default)]
    pub private_key: String,

    #[serde(default)]
    pub public_key: String,

    #[serde(default)]
    pub url_endpoint: String,
}

impl std::fmt::Debug for Cloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloud")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("url_endpoint", &self.url_endpoint)
            .finish()
    }
}

/// API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    #[serde(default = "default_api_prefix")]
    pub prefix: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            prefix: default_api_prefix(),
        }
    }
}

fn default_api_prefix() -> String {
    "https://api.imagekit.io/v1/".to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            max_idle_per_host: default_max_idle_per_host(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

fn default_max_idle_per_host() -> usize {
    10
}
