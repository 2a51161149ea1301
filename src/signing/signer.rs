//! Signed URL generation
//!
//! The signature is computed as:
//! ```text
//! signature = hex(SHA-256(segment + "/" + path + timestamp + secret))
//! ```
//! where `segment` is the comma-joined transformation directives, `path` the
//! normalized asset path and `timestamp` the Unix time in seconds. The
//! concatenation order is the wire contract with the verifying CDN origin and
//! is not configurable.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use super::path::AssetPath;
use super::transform::TransformSpec;
use crate::config::MediaConfig;
use crate::error::{ConfigError, IssueError};

/// Message returned when any credential component is missing
pub const CREDENTIALS_NOT_CONFIGURED: &str = "Media signing credentials not configured";

/// Message returned for unexpected signing failures
pub const SIGNING_FAILED: &str = "Failed to generate signed URL";

/// The shared signing secret
///
/// Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(****)")
    }
}

impl fmt::Display for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

/// The three credential components, all present and non-empty
#[derive(Debug, Clone)]
pub struct Credentials {
    cloud_name: String,
    api_key: String,
    api_secret: SigningSecret,
}

impl Credentials {
    /// Build credentials, treating blank values as missing
    pub fn resolve(
        cloud_name: Option<&str>,
        api_key: Option<&str>,
        api_secret: Option<&str>,
    ) -> Option<Self> {
        let present = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        // The secret enters the payload byte for byte, so only the blank check trims it.
        let secret = api_secret.filter(|s| !s.trim().is_empty())?;

        Some(Self {
            cloud_name: present(cloud_name)?,
            api_key: present(api_key)?,
            api_secret: SigningSecret::new(secret),
        })
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// A signed delivery URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    url: String,
    timestamp: u64,
    signature: String,
}

impl SignedUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Issues signed URLs for private media assets
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct UrlSigner {
    credentials: Option<Credentials>,
    cdn_host: String,
    resource_type: String,
    delivery_type: String,
    default_transform: TransformSpec,
}

impl UrlSigner {
    pub fn new(credentials: Option<Credentials>) -> Self {
        let media = MediaConfig::default();
        Self {
            credentials,
            cdn_host: media.cdn_host,
            resource_type: media.resource_type,
            delivery_type: media.delivery_type,
            default_transform: TransformSpec::default(),
        }
    }

    /// Build a signer from the media section of the configuration
    pub fn from_config(media: &MediaConfig) -> Result<Self, ConfigError> {
        let default_transform = TransformSpec::parse(&media.default_transformation)
            .map_err(|e| ConfigError::Invalid(format!("media.default_transformation: {}", e)))?;

        Ok(Self {
            credentials: media.credentials(),
            cdn_host: media.cdn_host.clone(),
            resource_type: media.resource_type.clone(),
            delivery_type: media.delivery_type.clone(),
            default_transform,
        })
    }

    /// Whether all credential components are present
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn default_transform(&self) -> &TransformSpec {
        &self.default_transform
    }

    /// Issue a signed URL stamped with the current time
    pub fn issue_signed_url(
        &self,
        asset_path: Option<&str>,
        transform_options: Option<&str>,
    ) -> Result<SignedUrl, IssueError> {
        // Credentials are checked before any input is looked at.
        self.credentials()?;
        let timestamp = current_timestamp()?;
        self.issue_signed_url_at(asset_path, transform_options, timestamp)
    }

    /// Issue a signed URL for an explicit timestamp
    pub fn issue_signed_url_at(
        &self,
        asset_path: Option<&str>,
        transform_options: Option<&str>,
        timestamp: u64,
    ) -> Result<SignedUrl, IssueError> {
        let credentials = self.credentials()?;

        let raw_path = asset_path.ok_or_else(|| IssueError::input(super::path::PATH_REQUIRED))?;
        let path = AssetPath::parse(raw_path)?;
        let transform = TransformSpec::from_options(transform_options, &self.default_transform)?;

        Ok(self.sign(credentials, &transform, &path, timestamp))
    }

    /// Check a signature previously produced by this signer
    ///
    /// When `max_age_secs` is set, timestamps further than that from `now`
    /// (in either direction) are rejected even if the signature matches.
    pub fn verify(
        &self,
        transform: &TransformSpec,
        path: &AssetPath,
        timestamp: u64,
        signature: &str,
        now: u64,
        max_age_secs: Option<u64>,
    ) -> bool {
        let Some(credentials) = self.credentials.as_ref() else {
            return false;
        };

        if let Some(max_age) = max_age_secs {
            if now.abs_diff(timestamp) > max_age {
                return false;
            }
        }

        let payload = signing_payload(
            &transform.segment(),
            path.as_str(),
            timestamp,
            &credentials.api_secret,
        );
        constant_time_compare(signature, &compute_signature(payload.as_bytes()))
    }

    /// Fail with the configuration error when credentials are missing
    pub fn ensure_configured(&self) -> Result<(), IssueError> {
        self.credentials().map(|_| ())
    }

    fn credentials(&self) -> Result<&Credentials, IssueError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| IssueError::configuration(CREDENTIALS_NOT_CONFIGURED))
    }

    fn sign(
        &self,
        credentials: &Credentials,
        transform: &TransformSpec,
        path: &AssetPath,
        timestamp: u64,
    ) -> SignedUrl {
        let segment = transform.segment();
        let payload = signing_payload(&segment, path.as_str(), timestamp, &credentials.api_secret);
        let signature = compute_signature(payload.as_bytes());

        let url = format!(
            "https://{}/{}/{}/{}/{}/{}?timestamp={}&signature={}",
            self.cdn_host,
            credentials.cloud_name,
            self.resource_type,
            self.delivery_type,
            segment,
            path,
            timestamp,
            signature
        );

        SignedUrl {
            url,
            timestamp,
            signature,
        }
    }
}

/// Build the exact byte string that is hashed
pub fn signing_payload(segment: &str, path: &str, timestamp: u64, secret: &SigningSecret) -> String {
    format!("{}/{}{}{}", segment, path, timestamp, secret.expose())
}

/// SHA-256 digest of the payload, lowercase hex
pub fn compute_signature(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Current Unix time in seconds
pub fn current_timestamp() -> Result<u64, IssueError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| IssueError::internal(SIGNING_FAILED, format!("system clock error: {}", e)))
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
