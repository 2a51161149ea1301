//! Asset path normalization
//!
//! Callers identify an asset by its path in the media store, e.g.
//! `grid/IMG_1234.jpg`. The same asset is often written as `/grid/IMG_1234.jpg`
//! or with a version prefix `v1712345678/grid/IMG_1234.jpg`; all of these
//! normalize to one canonical form so the signed payload does not depend on
//! how the caller formatted the identifier.
//!
//! The path is untrusted. It is never touched as a filesystem path, but it is
//! embedded verbatim in the delivery URL, so anything that could change the
//! URL's meaning (traversal segments, query or fragment delimiters, control
//! characters, percent escapes) is rejected.

use std::fmt;

use crate::constants::MAX_ASSET_PATH_LENGTH;
use crate::error::IssueError;
use crate::security;

/// Message returned when the `path` parameter is absent or blank
pub const PATH_REQUIRED: &str = "Image path is required";

/// A validated, normalized asset path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath(String);

impl AssetPath {
    /// Normalize and validate a caller-supplied asset path
    pub fn parse(raw: &str) -> Result<Self, IssueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IssueError::input(PATH_REQUIRED));
        }

        let normalized = normalize(trimmed);
        if normalized.is_empty() {
            return Err(IssueError::input("Image path must name an asset"));
        }

        if normalized.len() > MAX_ASSET_PATH_LENGTH {
            return Err(IssueError::input(format!(
                "Image path length {} exceeds limit {}",
                normalized.len(),
                MAX_ASSET_PATH_LENGTH
            )));
        }

        security::check_path_traversal(normalized)
            .map_err(|e| IssueError::input(format!("Invalid image path: {}", e)))?;

        if let Some(bad) = normalized.chars().find(|c| !is_path_char(*c)) {
            return Err(IssueError::input(format!(
                "Invalid image path: character {:?} is not allowed",
                bad
            )));
        }

        if normalized.split('/').any(|segment| segment.is_empty()) {
            return Err(IssueError::input(
                "Invalid image path: empty path segment",
            ));
        }

        Ok(AssetPath(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip leading slashes and a leading `v<digits>/` version segment
///
/// Performs no validation; see [`AssetPath::parse`].
pub fn normalize(raw: &str) -> &str {
    let without_slashes = raw.trim_start_matches('/');
    strip_version_prefix(without_slashes).trim_start_matches('/')
}

fn strip_version_prefix(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('v') else {
        return path;
    };

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return path;
    }

    match rest[digits..].strip_prefix('/') {
        Some(remainder) => remainder,
        None => path,
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '/' | '-' | '_' | '.' | '~' | '(' | ')' | '!' | '+' | '=' | '@' | ',')
}
