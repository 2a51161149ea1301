//! Transformation specification parsing
//!
//! Options arrive as a comma-separated token list, e.g. `w:800,q_auto,f_auto`.
//! Each token is either a shorthand (`key:value` or `key=value` with a known
//! key), a named preset, or a directive that is passed through verbatim.
//!
//! Directive order is preserved: it is part of the signed payload, so
//! `f_auto,q_auto` and `q_auto,f_auto` produce distinct, equally valid
//! signatures.

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_TRANSFORMATION, MAX_TRANSFORM_DIRECTIVES, PRESET_DISPLAY_WIDTH, PRESET_LARGE_WIDTH,
    PRESET_THUMB_WIDTH,
};
use crate::error::IssueError;

/// Ordered list of canonical transformation directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    directives: Vec<String>,
}

impl TransformSpec {
    /// Parse a comma-separated option string
    ///
    /// Blank tokens are skipped. A string with no tokens at all is an error;
    /// use [`TransformSpec::from_options`] to fall back to a default instead.
    pub fn parse(options: &str) -> Result<Self, IssueError> {
        let mut directives = Vec::new();

        for token in options.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            directives.push(canonicalize_token(token)?);
        }

        if directives.is_empty() {
            return Err(IssueError::input("Transformation options are empty"));
        }

        if directives.len() > MAX_TRANSFORM_DIRECTIVES {
            return Err(IssueError::input(format!(
                "Too many transformation directives: {} (limit {})",
                directives.len(),
                MAX_TRANSFORM_DIRECTIVES
            )));
        }

        Ok(Self { directives })
    }

    /// Parse caller options, using `default` when absent or blank
    pub fn from_options(options: Option<&str>, default: &TransformSpec) -> Result<Self, IssueError> {
        match options {
            Some(raw) if !raw.trim().is_empty() => Self::parse(raw),
            _ => Ok(default.clone()),
        }
    }

    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    /// The exact string placed in the URL path and the signed payload
    pub fn segment(&self) -> String {
        self.directives.join(",")
    }
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            directives: DEFAULT_TRANSFORMATION.split(',').map(String::from).collect(),
        }
    }
}

impl FromStr for TransformSpec {
    type Err = IssueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}

/// Convert one option token into its canonical directive
pub fn canonicalize_token(token: &str) -> Result<String, IssueError> {
    if let Some(bad) = token.chars().find(|c| !is_directive_char(*c)) {
        return Err(IssueError::input(format!(
            "Invalid transformation option '{}': character {:?} is not allowed",
            token, bad
        )));
    }

    if let Some(directive) = preset(token) {
        return Ok(directive);
    }

    if let Some((key, value)) = split_shorthand(token) {
        if let Some(prefix) = shorthand_prefix(key) {
            if value.is_empty() {
                return Err(IssueError::input(format!(
                    "Transformation option '{}' has no value",
                    token
                )));
            }
            return Ok(format!("{}_{}", prefix, value));
        }
    }

    Ok(token.to_string())
}

fn split_shorthand(token: &str) -> Option<(&str, &str)> {
    let idx = token.find(|c: char| c == ':' || c == '=')?;
    Some((&token[..idx], &token[idx + 1..]))
}

fn shorthand_prefix(key: &str) -> Option<&'static str> {
    match key.to_ascii_lowercase().as_str() {
        "w" | "width" => Some("w"),
        "h" | "height" => Some("h"),
        "q" | "quality" => Some("q"),
        "f" | "fmt" | "format" => Some("f"),
        "dpr" => Some("dpr"),
        "c" | "crop" | "fit" => Some("c"),
        "g" | "gravity" => Some("g"),
        "ar" | "aspect" => Some("ar"),
        _ => None,
    }
}

fn preset(token: &str) -> Option<String> {
    let width = match token.to_ascii_lowercase().as_str() {
        "thumb" => PRESET_THUMB_WIDTH,
        "display" => PRESET_DISPLAY_WIDTH,
        "large" => PRESET_LARGE_WIDTH,
        _ => return None,
    };
    Some(format!("w_{}", width))
}

fn is_directive_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-' | '!' | '=')
}
