//! Signed media URL issuance
//!
//! Turns a caller-supplied asset path and optional transformation options
//! into a time-stamped, signed delivery URL for a private asset:
//!
//! ```text
//! https://<cdn-host>/<cloud>/image/authenticated/<transform>/<path>?timestamp=<ts>&signature=<hex>
//! ```
//!
//! - [`path`] - asset path normalization and validation
//! - [`transform`] - transformation option parsing
//! - [`signer`] - payload composition, digest and URL assembly

pub mod path;
pub mod signer;
pub mod transform;

pub use path::AssetPath;
pub use signer::{
    compute_signature, current_timestamp, signing_payload, Credentials, SignedUrl, SigningSecret,
    UrlSigner,
};
pub use transform::TransformSpec;
