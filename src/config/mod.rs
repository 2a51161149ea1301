// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    ENV_ADDRESS, ENV_API_KEY, ENV_API_SECRET, ENV_CDN_HOST, ENV_CLOUD_NAME, ENV_PORT,
    LEGACY_ISSUE_PATH,
};
use crate::error::ConfigError;
use crate::signing::TransformSpec;

pub mod logging;
pub mod media;
pub mod server;

pub use logging::{LogFormat, LoggingConfig};
pub use media::MediaConfig;
pub use server::{SecurityLimitsConfig, ServerConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let config: Config = serde_yaml::from_str(&substituted)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Build a configuration from defaults and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from defaults and an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(address) = lookup(ENV_ADDRESS) {
            config.server.address = address;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: ENV_PORT.to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(cdn_host) = lookup(ENV_CDN_HOST) {
            config.media.cdn_host = cdn_host;
        }

        config.fill_credentials_from(lookup);
        Ok(config)
    }

    /// Load from a YAML file when given, otherwise from the environment
    ///
    /// Credential fields left empty by the file are taken from the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let mut config = Self::from_file(path)?;
                config.fill_credentials_from(|name| std::env::var(name).ok());
                Ok(config)
            }
            None => Self::from_env(),
        }
    }

    fn fill_credentials_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let media = &mut self.media;
        for (slot, name) in [
            (&mut media.cloud_name, ENV_CLOUD_NAME),
            (&mut media.api_key, ENV_API_KEY),
            (&mut media.api_secret, ENV_API_SECRET),
        ] {
            if slot.as_deref().map_or(true, |v| v.trim().is_empty()) {
                *slot = lookup(name);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::Invalid("server.port cannot be 0".to_string()));
        }

        if server.threads == 0 {
            return Err(ConfigError::Invalid(
                "server.threads must be at least 1".to_string(),
            ));
        }

        if server.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid(
                "server.max_concurrent_requests must be at least 1".to_string(),
            ));
        }

        if !server.issue_path.starts_with('/') || server.issue_path.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "server.issue_path '{}' must start with / and name a path",
                server.issue_path
            )));
        }

        if matches!(server.issue_path.as_str(), "/health" | "/ready" | "/metrics") {
            return Err(ConfigError::Invalid(format!(
                "server.issue_path '{}' collides with a built-in endpoint",
                server.issue_path
            )));
        }

        let media = &self.media;

        for (field, value) in [
            ("media.cdn_host", media.cdn_host.as_str()),
            ("media.resource_type", media.resource_type.as_str()),
            ("media.delivery_type", media.delivery_type.as_str()),
        ] {
            if !is_url_token(value, true) {
                return Err(ConfigError::Invalid(format!(
                    "{} '{}' must be a non-empty host or path token",
                    field, value
                )));
            }
        }

        if let Some(cloud_name) = media.cloud_name.as_deref().map(str::trim) {
            if !cloud_name.is_empty() && !is_url_token(cloud_name, false) {
                return Err(ConfigError::Invalid(format!(
                    "media.cloud_name '{}' contains characters not allowed in a URL path",
                    cloud_name
                )));
            }
        }

        TransformSpec::parse(&media.default_transformation).map_err(|e| {
            ConfigError::Invalid(format!("media.default_transformation: {}", e))
        })?;

        Ok(())
    }

    /// Every path the signing endpoint answers on
    pub fn issue_paths(&self) -> Vec<String> {
        let mut paths = vec![self.server.issue_path.clone()];
        if self.server.issue_path != LEGACY_ISSUE_PATH {
            paths.push(LEGACY_ISSUE_PATH.to_string());
        }
        paths
    }
}

fn is_url_token(value: &str, allow_dot: bool) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || (allow_dot && c == '.'))
}
