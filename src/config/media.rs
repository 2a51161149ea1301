//! Media delivery configuration.
//!
//! Holds the CDN layout and the three credential components. Credentials are
//! optional at the type level: a process started without them still serves
//! `/health`, and every signing request answers with a configuration error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CDN_HOST, DEFAULT_DELIVERY_TYPE, DEFAULT_RESOURCE_TYPE, DEFAULT_TRANSFORMATION,
    ENV_API_KEY, ENV_API_SECRET, ENV_CLOUD_NAME,
};
use crate::signing::Credentials;

fn default_cdn_host() -> String {
    DEFAULT_CDN_HOST.to_string()
}

fn default_resource_type() -> String {
    DEFAULT_RESOURCE_TYPE.to_string()
}

fn default_delivery_type() -> String {
    DEFAULT_DELIVERY_TYPE.to_string()
}

fn default_transformation() -> String {
    DEFAULT_TRANSFORMATION.to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Account identifier placed in the URL path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_secret: Option<String>,
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    #[serde(default = "default_delivery_type")]
    pub delivery_type: String,
    /// Applied when a request carries no `options` (default: f_auto,q_auto,dpr_auto)
    #[serde(default = "default_transformation")]
    pub default_transformation: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            cdn_host: default_cdn_host(),
            resource_type: default_resource_type(),
            delivery_type: default_delivery_type(),
            default_transformation: default_transformation(),
        }
    }
}

// Hand-written so the secret never reaches a log line.
impl fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "****"))
            .field("cdn_host", &self.cdn_host)
            .field("resource_type", &self.resource_type)
            .field("delivery_type", &self.delivery_type)
            .field("default_transformation", &self.default_transformation)
            .finish()
    }
}

impl MediaConfig {
    /// Resolved credentials, or None if any component is missing or blank
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::resolve(
            self.cloud_name.as_deref(),
            self.api_key.as_deref(),
            self.api_secret.as_deref(),
        )
    }

    /// Environment variable names of the missing credential components
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.cloud_name) {
            missing.push(ENV_CLOUD_NAME);
        }
        if blank(&self.api_key) {
            missing.push(ENV_API_KEY);
        }
        if blank(&self.api_secret) {
            missing.push(ENV_API_SECRET);
        }
        missing
    }
}
