// Constants module - centralized default values for configuration
//
// Every default used by the config layer, the signer and the endpoint
// handlers lives here so the wire contract is visible in one place.

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum concurrent requests
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 1000;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

/// Default path of the signing endpoint
pub const DEFAULT_ISSUE_PATH: &str = "/issue";

/// Legacy path of the signing endpoint, still answered alongside the configured one
pub const LEGACY_ISSUE_PATH: &str = "/api/cloudinary-url";

/// Seconds suggested to clients rejected by the concurrency limit
pub const RETRY_AFTER_SECS: u64 = 5;

// =============================================================================
// Security defaults
// =============================================================================

/// Default maximum header size (64 KB)
pub const DEFAULT_MAX_HEADER_SIZE: usize = 64 * 1024;

/// Default maximum URI length (8 KB)
pub const DEFAULT_MAX_URI_LENGTH: usize = 8192;

/// Maximum accepted length of a normalized asset path
pub const MAX_ASSET_PATH_LENGTH: usize = 1024;

/// Maximum number of transformation directives in one request
pub const MAX_TRANSFORM_DIRECTIVES: usize = 32;

// =============================================================================
// Media defaults
// =============================================================================

/// Default CDN host serving signed assets
pub const DEFAULT_CDN_HOST: &str = "res.cloudinary.com";

/// Default resource type segment
pub const DEFAULT_RESOURCE_TYPE: &str = "image";

/// Default delivery type segment for private assets
pub const DEFAULT_DELIVERY_TYPE: &str = "authenticated";

/// Transformation applied when the caller does not supply one
pub const DEFAULT_TRANSFORMATION: &str = "f_auto,q_auto,dpr_auto";

/// Width of the `thumb` preset
pub const PRESET_THUMB_WIDTH: u32 = 800;

/// Width of the `display` preset
pub const PRESET_DISPLAY_WIDTH: u32 = 1400;

/// Width of the `large` preset
pub const PRESET_LARGE_WIDTH: u32 = 2000;

// =============================================================================
// Environment variables
// =============================================================================

pub const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_API_SECRET: &str = "CLOUDINARY_API_SECRET";
pub const ENV_ADDRESS: &str = "UTSUSHI_ADDRESS";
pub const ENV_PORT: &str = "UTSUSHI_PORT";
pub const ENV_CDN_HOST: &str = "UTSUSHI_CDN_HOST";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
